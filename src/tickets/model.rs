//! Support ticket types.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

pub const MAX_TOPIC_CHARS: usize = 200;
pub const MAX_MESSAGE_CHARS: usize = 2000;
pub const MAX_CONTACT_CHARS: usize = 200;

const ID_SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A support ticket as written to the ticket log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub trainer_id: Option<String>,
    pub topic: String,
    pub message: String,
    pub contact: Option<String>,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Caller-supplied ticket fields, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub trainer_id: Option<String>,
    pub topic: Option<String>,
    pub message: Option<String>,
    pub contact: Option<String>,
}

/// Errors from creating or storing a ticket.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("missing 'topic' or 'message'")]
    MissingFields,

    #[error("failed to serialize ticket: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to append ticket: {0}")]
    Storage(#[from] std::io::Error),
}

impl Ticket {
    /// Validate and normalize caller input into a ticket stamped with `now`.
    ///
    /// Over-long fields are truncated, not rejected. Empty optional fields
    /// are stored as null.
    pub fn from_request(input: NewTicket, now: DateTime<Utc>) -> Result<Self, TicketError> {
        let topic = present(input.topic).ok_or(TicketError::MissingFields)?;
        let message = present(input.message).ok_or(TicketError::MissingFields)?;

        Ok(Self {
            id: generate_id(now),
            trainer_id: present(input.trainer_id),
            topic: truncate_chars(&topic, MAX_TOPIC_CHARS),
            message: truncate_chars(&message, MAX_MESSAGE_CHARS),
            contact: present(input.contact).map(|c| truncate_chars(&c, MAX_CONTACT_CHARS)),
            created_at: now,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Keep at most `max` characters.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// `t_<unix millis>_<6 base-36 chars>`. Not checked for uniqueness.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("t_{}_{}", now.timestamp_millis(), suffix)
}
