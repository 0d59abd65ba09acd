//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and loaders produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, request ID via TraceLayer spans
//! - Metrics are cheap and disabled by default

pub mod logging;
pub mod metrics;
