//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout, limits)
//!     → request.rs (lenient JSON body extraction)
//!     → handlers.rs (resolver / validator / ticket sink)
//!     → response.rs (uniform {ok, ...} envelopes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{JsonBody, X_REQUEST_ID};
pub use response::{ApiError, Envelope};
pub use server::{AppState, HttpServer};
