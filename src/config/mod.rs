//! Service configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional, path from ACTIONS_CONFIG)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The links document is not part of this config; see `crate::links`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::ServiceConfig;
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, PathsConfig};
