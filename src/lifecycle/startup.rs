//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the links document (degrading, never fatal)
//! - Prepare the ticket sink
//! - Bind the listener and hand everything to the HTTP server
//!
//! # Design Decisions
//! - The service config is validated before this point; an invalid one
//!   is fatal, a broken links file is not
//! - Listener binds last (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::links::load_links;
use crate::tickets::TicketSink;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the server from config and serve until shutdown.
pub async fn run(config: ServiceConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let links = Arc::new(load_links(&config.paths.links_file));
    let sink = Arc::new(TicketSink::new(config.paths.tickets_file.clone()));

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let server = HttpServer::new(config, links, sink);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
