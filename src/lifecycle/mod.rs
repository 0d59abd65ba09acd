//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load links → Prepare ticket sink → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger or signal received → Stop accepting → Drain in-flight → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then links and sink, then listener
//! - No reload signal: links are loaded once per process

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
