//! Append-only ticket log.
//!
//! # Design Decisions
//! - One JSON object per line, UTF-8
//! - Each line is written with a single `write_all` on a file opened with
//!   `O_APPEND`, so concurrent writers never interleave partial lines
//! - No retries: a failed append is reported to the caller as-is

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::tickets::model::{NewTicket, Ticket, TicketError};

/// Writes tickets to a line-delimited log file.
#[derive(Debug, Clone)]
pub struct TicketSink {
    path: PathBuf,
}

impl TicketSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate the input, build a ticket and append it to the log.
    ///
    /// Blocking; call from a blocking-capable context.
    pub fn create(&self, input: NewTicket) -> Result<Ticket, TicketError> {
        let ticket = Ticket::from_request(input, Utc::now())?;
        self.append(&ticket)?;
        Ok(ticket)
    }

    /// Append one ticket as a single line.
    pub fn append(&self, ticket: &Ticket) -> Result<(), TicketError> {
        let mut line = serde_json::to_vec(ticket)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)?;

        tracing::debug!(ticket_id = %ticket.id, path = %self.path.display(), "Ticket appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn new_ticket(topic: &str, message: Option<&str>) -> NewTicket {
        NewTicket {
            trainer_id: Some("t-42".into()),
            topic: Some(topic.into()),
            message: message.map(String::from),
            contact: None,
        }
    }

    #[test]
    fn test_create_appends_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TicketSink::new(dir.path().join("tickets.jsonl"));

        let ticket = sink.create(new_ticket("Question", Some("Hi"))).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let stored: Ticket = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(stored.id, ticket.id);
        assert_eq!(stored.topic, "Question");
        assert_eq!(stored.trainer_id.as_deref(), Some("t-42"));
    }

    #[test]
    fn test_appends_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TicketSink::new(dir.path().join("tickets.jsonl"));

        sink.create(new_ticket("One", Some("first"))).unwrap();
        sink.create(new_ticket("Two", Some("second"))).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_invalid_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TicketSink::new(dir.path().join("tickets.jsonl"));

        let err = sink.create(new_ticket("Question", None)).unwrap_err();
        assert!(matches!(err, TicketError::MissingFields));
        assert!(!sink.path().exists());
    }

    #[test]
    fn test_unwritable_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TicketSink::new(dir.path().join("missing-dir").join("tickets.jsonl"));

        let err = sink.create(new_ticket("Question", Some("Hi"))).unwrap_err();
        assert!(matches!(err, TicketError::Storage(_)));
    }
}
