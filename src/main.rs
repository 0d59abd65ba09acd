//! Upselia actions backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │              ACTIONS BACKEND                  │
//!   POST /open_link    │  ┌────────┐   ┌──────────┐   ┌───────────┐   │
//!   POST /open_checkout┼─▶│  http  │──▶│ resolver │──▶│ validator │   │
//!                      │  │handlers│   │key→trainer│  │https+domain│  │
//!                      │  └───┬────┘   │→default  │   └───────────┘   │
//!                      │      │        └────┬─────┘                   │
//!                      │      │             ▼                         │
//!                      │      │       ┌───────────┐  Links_Env.json   │
//!                      │      │       │LinkConfig │◀─ (loaded once)   │
//!                      │      │       └───────────┘                   │
//!   POST /create_ticket│      ▼                                       │
//!   ───────────────────┼─▶ ┌──────────┐                               │
//!                      │   │ tickets  │──▶ tickets.jsonl (append)     │
//!                      │   └──────────┘                               │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use upselia_actions_backend::config::load_from_env;
use upselia_actions_backend::lifecycle::{startup, Shutdown};
use upselia_actions_backend::observability::{logging, metrics};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("failed to initialize logging: {e}");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "upselia-actions-backend starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        links_file = %config.paths.links_file.display(),
        tickets_file = %config.paths.tickets_file.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    match startup::run(config, &shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
