//! Upselia actions backend library.
//!
//! Resolves symbolic link keys to whitelisted external URLs and records
//! support tickets in an append-only log.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod links;
pub mod observability;
pub mod tickets;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use links::LinkConfig;
pub use tickets::TicketSink;
