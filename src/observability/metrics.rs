//! Metrics collection and exposition.
//!
//! # Metrics
//! - `actions_requests_total` (counter): requests by endpoint, status
//! - `actions_request_duration_seconds` (histogram): latency by endpoint
//! - `actions_resolutions_total` (counter): resolved links by provenance
//! - `actions_policy_rejections_total` (counter): refused URLs by reason
//! - `actions_tickets_created_total` (counter)
//! - `actions_ticket_failures_total` (counter): failed ticket appends
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::links::{PolicyViolation, Provenance};

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: String, status: u16, start: Instant) {
    counter!("actions_requests_total", "endpoint" => endpoint.clone(), "status" => status.to_string())
        .increment(1);
    histogram!("actions_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_resolution(provenance: Provenance) {
    counter!("actions_resolutions_total", "provenance" => provenance.as_str()).increment(1);
}

pub fn record_policy_rejection(violation: PolicyViolation) {
    counter!("actions_policy_rejections_total", "reason" => violation.as_str()).increment(1);
}

pub fn record_ticket_created() {
    counter!("actions_tickets_created_total").increment(1);
}

pub fn record_ticket_failure() {
    counter!("actions_ticket_failures_total").increment(1);
}
