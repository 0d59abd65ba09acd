//! Link subsystem.
//!
//! # Data Flow
//! ```text
//! links file (JSON)
//!     → store.rs (parse, shape report, degrade to empty on failure)
//!     → LinkConfig (immutable, shared via Arc)
//!
//! Per request:
//!     ResolutionRequest
//!     → resolver.rs (key → trainer → default)
//!     → validator.rs (HTTPS + allowed domain)
//!     → resolved URL or refusal
//! ```

pub mod resolver;
pub mod store;
pub mod validator;

pub use resolver::{Provenance, ResolutionRequest, ResolutionResult, Resolver};
pub use store::{load_links, LinkConfig};
pub use validator::{check_policy, is_allowed_domain, is_https, PolicyViolation};
