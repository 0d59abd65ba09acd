//! End-to-end tests against a running backend.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_health() {
    let server = common::start_server(json!({})).await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "upselia-actions-backend");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_open_link_success() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/open_link", json!({ "url_key": "calendly_main" })).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "ok": true, "url_key": "calendly_main", "url": "https://calendly.com/coach-ana" })
    );
}

#[tokio::test]
async fn test_open_link_subdomain_allowed() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/open_link", json!({ "url_key": "calendly_sub" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["url"], "https://team.calendly.com/coach-ana");
}

#[tokio::test]
async fn test_open_link_missing_key() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/open_link", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "ok": false, "error": "Missing url_key" }));

    let (status, _) = server.post("/open_link", json!({ "url_key": "" })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_open_link_without_body() {
    let server = common::start_server(common::sample_links()).await;

    let res = server.client.post(server.url("/open_link")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing url_key");
}

#[tokio::test]
async fn test_open_link_unknown_key() {
    let server = common::start_server(common::sample_links()).await;

    for key in ["nope", "stripe", "CALENDLY_MAIN"] {
        let (status, body) = server.post("/open_link", json!({ "url_key": key })).await;
        assert_eq!(status, 404, "key {key}");
        assert_eq!(body["ok"], false);
    }
}

#[tokio::test]
async fn test_open_link_rejects_plain_http() {
    let server = common::start_server(common::sample_links()).await;

    for key in ["plain_http", "plain_offsite"] {
        let (status, body) = server.post("/open_link", json!({ "url_key": key })).await;
        assert_eq!(status, 400, "key {key}");
        assert_eq!(body["error"], "URL is not HTTPS");
    }
}

#[tokio::test]
async fn test_open_link_rejects_foreign_domains() {
    let server = common::start_server(common::sample_links()).await;

    for key in ["evil_lookalike", "offsite"] {
        let (status, body) = server.post("/open_link", json!({ "url_key": key })).await;
        assert_eq!(status, 400, "key {key}");
        assert_eq!(body["error"], "Domain not allowed");
    }
}

#[tokio::test]
async fn test_open_link_is_repeatable() {
    let server = common::start_server(common::sample_links()).await;

    let first = server.post("/open_link", json!({ "url_key": "whatsapp" })).await;
    let second = server.post("/open_link", json!({ "url_key": "whatsapp" })).await;
    assert_eq!(first, second);
    assert_eq!(first.0, 200);
}

#[tokio::test]
async fn test_open_checkout_explicit_key_wins() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server
        .post("/open_checkout", json!({ "trainer_id": "t-42", "url_key": "paypal_direct" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "ok": true,
            "resolved_key": "paypal_direct",
            "resolved_from": "key",
            "url": "https://paypal.com/me/coach"
        })
    );
}

#[tokio::test]
async fn test_open_checkout_unknown_key_does_not_fall_back() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server
        .post("/open_checkout", json!({ "trainer_id": "t-42", "url_key": "missing" }))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Could not resolve checkout");
}

#[tokio::test]
async fn test_open_checkout_trainer_mapping() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/open_checkout", json!({ "trainer_id": "t-42" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["resolved_key"], "stripe_pro");
    assert_eq!(body["resolved_from"], "trainer");
    assert_eq!(body["url"], "https://buy.stripe.com/pro");
}

#[tokio::test]
async fn test_open_checkout_default_fallback() {
    let server = common::start_server(common::sample_links()).await;

    for body in [json!({}), json!({ "trainer_id": "unknown" }), json!({ "trainer_id": "t-broken" })] {
        let (status, resolved) = server.post("/open_checkout", body.clone()).await;
        assert_eq!(status, 200, "request {body}");
        assert_eq!(resolved["resolved_key"], "stripe_basic");
        assert_eq!(resolved["resolved_from"], "default");
    }
}

#[tokio::test]
async fn test_open_checkout_policy_applies_after_resolution() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/open_checkout", json!({ "trainer_id": "t-legacy" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "URL is not HTTPS");
}

#[tokio::test]
async fn test_open_checkout_without_configuration() {
    let server = common::start_server(json!({ "links": {}, "defaults": {}, "trainers": {} })).await;

    let (status, body) = server.post("/open_checkout", json!({ "trainer_id": "t-42" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_create_ticket_appends_line() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server
        .post("/create_ticket", json!({ "topic": "Question", "message": "Hi" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);

    let ticket_id = body["ticket_id"].as_str().unwrap();
    assert!(!ticket_id.is_empty());

    let lines = server.ticket_lines();
    assert_eq!(lines.len(), 1);

    let stored: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(stored["id"], ticket_id);
    assert_eq!(stored["topic"], "Question");
    assert_eq!(stored["message"], "Hi");
    assert_eq!(stored["trainer_id"], Value::Null);
    assert_eq!(stored["contact"], Value::Null);
}

#[tokio::test]
async fn test_create_ticket_truncates_and_keeps_optionals() {
    let server = common::start_server(common::sample_links()).await;

    let (status, _) = server
        .post(
            "/create_ticket",
            json!({
                "trainer_id": "t-42",
                "topic": "x".repeat(500),
                "message": "m".repeat(5000),
                "contact": "+52 555 555 5555"
            }),
        )
        .await;
    assert_eq!(status, 200);

    let stored: Value = serde_json::from_str(&server.ticket_lines()[0]).unwrap();
    assert_eq!(stored["topic"].as_str().unwrap().len(), 200);
    assert_eq!(stored["message"].as_str().unwrap().len(), 2000);
    assert_eq!(stored["trainer_id"], "t-42");
    assert_eq!(stored["contact"], "+52 555 555 5555");
}

#[tokio::test]
async fn test_create_ticket_missing_message() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/create_ticket", json!({ "topic": "Question" })).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "ok": false, "error": "Missing 'topic' or 'message'" }));
    assert!(server.ticket_lines().is_empty());
}

#[tokio::test]
async fn test_create_ticket_storage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let unwritable = dir.path().join("no-such-dir").join("tickets.jsonl");
    let server = common::start_with_tickets(common::sample_links(), dir, unwritable).await;

    let (status, body) = server
        .post("/create_ticket", json!({ "topic": "Question", "message": "Hi" }))
        .await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "ok": false, "error": "Could not save the ticket" }));
}

#[tokio::test]
async fn test_concurrent_tickets_do_not_interleave() {
    let server = common::start_server(common::sample_links()).await;

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = server.client.clone();
        let url = server.url("/create_ticket");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "topic": format!("topic {i}"), "message": "m".repeat(1500) }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), 200);
    }

    let lines = server.ticket_lines();
    assert_eq!(lines.len(), 20);
    for line in lines {
        let ticket: Value = serde_json::from_str(&line).expect("Corrupted ticket line");
        assert_eq!(ticket["message"].as_str().unwrap().len(), 1500);
    }
}

#[tokio::test]
async fn test_malformed_links_file_serves_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Links_Env.json");
    std::fs::write(&path, "{ broken").unwrap();

    let links = upselia_actions_backend::links::load_links(&path);
    let server = common::start_server(serde_json::to_value(&links).unwrap()).await;

    let (status, _) = server.post("/open_link", json!({ "url_key": "calendly_main" })).await;
    assert_eq!(status, 404);

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_create_ticket_large_message_is_truncated_not_rejected() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server
        .post("/create_ticket", json!({ "topic": "Question", "message": "m".repeat(80_000) }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);

    let lines = server.ticket_lines();
    assert_eq!(lines.len(), 1);
    let stored: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(stored["message"].as_str().unwrap().len(), 2000);
}

#[tokio::test]
async fn test_non_string_link_is_refused_as_not_https() {
    let server = common::start_server(json!({
        "links": { "num": 42, "flag": true },
        "defaults": {},
        "trainers": {}
    }))
    .await;

    for key in ["num", "flag"] {
        let (status, body) = server.post("/open_link", json!({ "url_key": key })).await;
        assert_eq!(status, 400, "key {key}");
        assert_eq!(body, json!({ "ok": false, "error": "URL is not HTTPS" }));
    }
}

#[tokio::test]
async fn test_wrong_method_on_known_route() {
    let server = common::start_server(common::sample_links()).await;

    let res = server.client.get(server.url("/open_link")).send().await.unwrap();
    assert_eq!(res.status(), 405);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "ok": false, "error": "Method not allowed" }));
}

#[tokio::test]
async fn test_structured_field_values_are_rejected() {
    let server = common::start_server(common::sample_links()).await;

    let (status, body) = server.post("/open_link", json!({ "url_key": { "k": 1 } })).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "ok": false, "error": "Invalid request body" }));

    let (status, body) = server
        .post("/create_ticket", json!({ "topic": ["a", "b"], "message": "Hi" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "ok": false, "error": "Invalid request body" }));
}
