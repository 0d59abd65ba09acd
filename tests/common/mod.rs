//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

use upselia_actions_backend::{HttpServer, LinkConfig, ServiceConfig, Shutdown, TicketSink};

/// A running backend on an ephemeral port, torn down on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub tickets_path: PathBuf,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body and return (status, decoded body).
    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Backend unreachable");
        let status = res.status().as_u16();
        (status, res.json().await.expect("Response is not JSON"))
    }

    /// Lines currently in the ticket log.
    pub fn ticket_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.tickets_path)
            .map(|content| content.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Link document used by most tests.
pub fn sample_links() -> Value {
    json!({
        "links": {
            "calendly_main": "https://calendly.com/coach-ana",
            "calendly_sub": "https://team.calendly.com/coach-ana",
            "whatsapp": "https://wa.me/5215555555555",
            "plain_http": "http://calendly.com/coach-ana",
            "plain_offsite": "http://example.org/page",
            "evil_lookalike": "https://evil-calendly.com/phish",
            "offsite": "https://example.org/page",
            "stripe_basic": "https://buy.stripe.com/basic",
            "stripe_pro": "https://buy.stripe.com/pro",
            "paypal_direct": "https://paypal.com/me/coach",
            "insecure_checkout": "http://buy.stripe.com/legacy"
        },
        "defaults": {
            "checkout": "stripe_basic"
        },
        "trainers": {
            "t-42": { "checkout": "stripe_pro" },
            "t-legacy": { "checkout": "insecure_checkout" },
            "t-broken": { "checkout": "does_not_exist" }
        }
    })
}

/// Start a backend serving the given link document.
pub async fn start_server(links: Value) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let tickets_path = dir.path().join("tickets.jsonl");
    start_with_tickets(links, dir, tickets_path).await
}

/// Start a backend whose ticket log path is chosen by the caller.
pub async fn start_with_tickets(links: Value, dir: TempDir, tickets_path: PathBuf) -> TestServer {
    let config = ServiceConfig::default();
    let links = Arc::new(LinkConfig::from_value(&links));
    let sink = Arc::new(TicketSink::new(tickets_path.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, links, sink);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        tickets_path,
        client,
        shutdown,
        _dir: dir,
    }
}
