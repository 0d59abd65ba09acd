//! Support ticket subsystem.
//!
//! # Data Flow
//! ```text
//! create_ticket request
//!     → model.rs (require topic/message, truncate, stamp id + time)
//!     → sink.rs (append one JSON line to the ticket log)
//! ```

pub mod model;
pub mod sink;

pub use model::{NewTicket, Ticket, TicketError};
pub use sink::TicketSink;
