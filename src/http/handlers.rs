//! Endpoint handlers.
//!
//! | Route                 | Handler          |
//! |-----------------------|------------------|
//! | `GET /health`         | [`health`]       |
//! | `POST /open_link`     | [`open_link`]    |
//! | `POST /open_checkout` | [`open_checkout`]|
//! | `POST /create_ticket` | [`create_ticket`]|

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::request::{lenient_string, JsonBody};
use crate::http::response::{ok, ApiError, Envelope};
use crate::http::server::AppState;
use crate::links::{check_policy, Provenance, ResolutionRequest, ResolutionResult, Resolver};
use crate::observability::metrics;
use crate::tickets::{NewTicket, TicketError};

/// Link type resolved by `open_checkout`.
pub const CHECKOUT_LINK_TYPE: &str = "checkout";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenLinkRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenLinkResponse {
    pub url_key: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenCheckoutRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub trainer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenCheckoutResponse {
    pub resolved_key: String,
    pub resolved_from: Provenance,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTicketRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub trainer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTicketResponse {
    pub ticket_id: String,
}

pub async fn health() -> Json<Envelope<HealthStatus>> {
    ok(HealthStatus {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn open_link(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OpenLinkRequest>,
) -> Result<Json<Envelope<OpenLinkResponse>>, ApiError> {
    let url_key = request
        .url_key
        .filter(|k| !k.is_empty())
        .ok_or(ApiError::MissingUrlKey)?;

    let resolved = Resolver::new(&state.links)
        .resolve(&ResolutionRequest::by_key(&url_key))
        .ok_or_else(|| {
            tracing::info!(url_key = %url_key, "Unknown url_key");
            ApiError::LinkNotFound
        })?;
    enforce_policy(&resolved)?;

    Ok(ok(OpenLinkResponse {
        url_key,
        url: resolved.url,
    }))
}

pub async fn open_checkout(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OpenCheckoutRequest>,
) -> Result<Json<Envelope<OpenCheckoutResponse>>, ApiError> {
    let resolution = ResolutionRequest::by_type(CHECKOUT_LINK_TYPE, request.trainer_id.as_deref())
        .with_key(request.url_key.as_deref());

    let resolved = Resolver::new(&state.links)
        .resolve(&resolution)
        .ok_or_else(|| {
            tracing::info!(
                trainer_id = ?request.trainer_id,
                url_key = ?request.url_key,
                "Checkout could not be resolved"
            );
            ApiError::CheckoutUnresolved
        })?;
    enforce_policy(&resolved)?;

    Ok(ok(OpenCheckoutResponse {
        resolved_key: resolved.source_key,
        resolved_from: resolved.provenance,
        url: resolved.url,
    }))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTicketRequest>,
) -> Result<Json<Envelope<CreateTicketResponse>>, ApiError> {
    let input = NewTicket {
        trainer_id: request.trainer_id,
        topic: request.topic,
        message: request.message,
        contact: request.contact,
    };

    let sink = state.sink.clone();
    let created = tokio::task::spawn_blocking(move || sink.create(input))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Ticket writer task failed");
            ApiError::Internal
        })?;

    match created {
        Ok(ticket) => {
            metrics::record_ticket_created();
            tracing::info!(ticket_id = %ticket.id, topic = %ticket.topic, "Ticket created");
            Ok(ok(CreateTicketResponse {
                ticket_id: ticket.id,
            }))
        }
        Err(TicketError::MissingFields) => Err(ApiError::MissingTicketFields),
        Err(e) => {
            metrics::record_ticket_failure();
            tracing::error!(path = %state.sink.path().display(), error = %e, "Failed to save ticket");
            Err(e.into())
        }
    }
}

fn enforce_policy(resolved: &ResolutionResult) -> Result<(), ApiError> {
    check_policy(&resolved.url).map_err(|violation| {
        metrics::record_policy_rejection(violation);
        tracing::warn!(
            key = %resolved.source_key,
            url = %resolved.url,
            reason = violation.as_str(),
            "Refusing resolved link"
        );
        ApiError::from(violation)
    })?;

    metrics::record_resolution(resolved.provenance);
    Ok(())
}
