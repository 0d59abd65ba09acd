//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Wrap every success payload as `{"ok": true, ...payload}`
//! - Map every failure to a status code and `{"ok": false, "error": ...}`
//!
//! # Design Decisions
//! - Handlers return `Result<Json<Envelope<T>>, ApiError>`; nothing else
//!   escapes to the client
//! - Error messages are fixed strings; internal details go to the log only

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::links::PolicyViolation;
use crate::tickets::TicketError;

/// Success envelope: `ok: true` plus the payload's fields.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Wrap a payload in a success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { ok: true, data })
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    ok: bool,
    error: &'a str,
}

/// Every failure a handler can report.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing url_key")]
    MissingUrlKey,

    #[error("Missing 'topic' or 'message'")]
    MissingTicketFields,

    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("url_key not found")]
    LinkNotFound,

    #[error("Could not resolve checkout")]
    CheckoutUnresolved,

    #[error("URL is not HTTPS")]
    NotHttps,

    #[error("Domain not allowed")]
    DomainNotAllowed,

    #[error("Could not save the ticket")]
    Storage,

    #[error("Not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrlKey
            | ApiError::MissingTicketFields
            | ApiError::InvalidBody(_)
            | ApiError::NotHttps
            | ApiError::DomainNotAllowed => StatusCode::BAD_REQUEST,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::LinkNotFound | ApiError::CheckoutUnresolved | ApiError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PolicyViolation> for ApiError {
    fn from(violation: PolicyViolation) -> Self {
        match violation {
            PolicyViolation::NotHttps => ApiError::NotHttps,
            PolicyViolation::DomainNotAllowed => ApiError::DomainNotAllowed,
        }
    }
}

impl From<TicketError> for ApiError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::MissingFields => ApiError::MissingTicketFields,
            TicketError::Encode(_) | TicketError::Storage(_) => ApiError::Storage,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InvalidBody(detail) = &self {
            tracing::debug!(detail = %detail, "Rejected request body");
        }

        let message = self.to_string();
        let body = ErrorBody {
            ok: false,
            error: &message,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Fallback for known routes hit with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
