//! Wire-level delivery tests against a mock Bot API server.
//!
//! Covers the strategy ladder end to end: the Bot API client call, the
//! raw `setMessageReaction` fallback, and the strict 200-plus-ok-body
//! success rule for the raw strategy.

use httpmock::prelude::*;
use reaction_fleet::bot::reaction::{ReactionError, Strategy};
use reaction_fleet::bot::ReactionTransport;
use reqwest::Url;
use serde_json::json;
use teloxide::types::{ChatId, MessageId};
use teloxide::Bot;

const TOKEN: &str = "1234567890:TEST-token-for-wire-tests";

fn raw_path() -> String {
    format!("/bot{TOKEN}/setMessageReaction")
}

fn mock_bot(server: &MockServer) -> Bot {
    let url = Url::parse(&server.base_url()).expect("mock server url");
    Bot::new(TOKEN).set_api_url(url)
}

/// A bot pointed at a closed loopback port, so the library strategy
/// fails with a connection error without touching any mock.
fn dead_bot() -> Bot {
    let url = Url::parse("http://127.0.0.1:9/").expect("static url");
    Bot::new(TOKEN).set_api_url(url)
}

#[tokio::test]
async fn test_library_success_short_circuits_raw_fallback() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .json_body(json!({ "ok": true, "result": true }));
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let attempt = transport
        .deliver(&mock_bot(&server), ChatId(-100), MessageId(7), "❤️")
        .await;

    assert!(attempt.delivered());
    assert_eq!(attempt.outcomes.len(), 1);
    assert_eq!(attempt.outcomes[0].strategy, Strategy::Library);
    // Exactly one request reached the API, so the fallback never ran
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_raw_fallback_recovers_library_failure() {
    let server = MockServer::start();
    let raw = server.mock(|when, then| {
        when.method(POST).path(raw_path());
        then.status(200)
            .json_body(json!({ "ok": true, "result": true }));
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let attempt = transport
        .deliver(&dead_bot(), ChatId(-100), MessageId(7), "👀")
        .await;

    assert!(attempt.delivered());
    assert_eq!(attempt.outcomes.len(), 2);
    assert_eq!(attempt.outcomes[0].strategy, Strategy::Library);
    assert!(matches!(
        attempt.outcomes[0].error,
        Some(ReactionError::Library(_))
    ));
    assert_eq!(attempt.outcomes[1].strategy, Strategy::RawHttp);
    assert!(attempt.outcomes[1].error.is_none());
    raw.assert();
}

#[tokio::test]
async fn test_failed_attempt_records_both_strategies() {
    let server = MockServer::start();
    let raw = server.mock(|when, then| {
        when.method(POST).path(raw_path());
        then.status(200)
            .json_body(json!({ "ok": false, "error_code": 400 }));
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let attempt = transport
        .deliver(&dead_bot(), ChatId(-100), MessageId(7), "🔥")
        .await;

    assert!(!attempt.delivered());
    assert_eq!(attempt.outcomes.len(), 2);
    let summary = attempt.summary();
    assert!(summary.contains("Library"));
    assert!(summary.contains("RawHttp"));
    raw.assert();
}

#[tokio::test]
async fn test_raw_request_carries_reaction_payload() {
    let server = MockServer::start();
    let raw = server.mock(|when, then| {
        when.method(POST).path(raw_path()).json_body(json!({
            "chat_id": -1_001_234_567_890_i64,
            "message_id": 42,
            "reaction": [{ "type": "emoji", "emoji": "👻" }],
        }));
        then.status(200)
            .json_body(json!({ "ok": true, "result": true }));
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let res = transport
        .via_raw_http(ChatId(-1_001_234_567_890), MessageId(42), "👻")
        .await;

    assert!(res.is_ok());
    raw.assert();
}

#[tokio::test]
async fn test_raw_accepts_spaced_ok_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(raw_path());
        then.status(200).body(r#"{ "ok" : true, "result" : true }"#);
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let res = transport.via_raw_http(ChatId(-100), MessageId(1), "💯").await;

    assert!(res.is_ok());
}

#[tokio::test]
async fn test_raw_rejects_ok_false_on_200() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(raw_path());
        then.status(200).json_body(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message can't be reacted",
        }));
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let res = transport.via_raw_http(ChatId(-100), MessageId(2), "🙈").await;

    match res {
        Err(ReactionError::Unconfirmed { status, body }) => {
            assert_eq!(status, 200);
            assert!(body.contains("error_code"));
        }
        other => panic!("expected unconfirmed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_raw_rejects_non_200_even_with_ok_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(raw_path());
        then.status(400)
            .json_body(json!({ "ok": true, "result": true }));
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let res = transport.via_raw_http(ChatId(-100), MessageId(3), "🥰").await;

    match res {
        Err(ReactionError::Unconfirmed { status, .. }) => assert_eq!(status, 400),
        other => panic!("expected unconfirmed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_raw_rejects_server_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(raw_path());
        then.status(500).body("Internal Server Error");
    });

    let transport = ReactionTransport::with_api_base(TOKEN, server.base_url());
    let res = transport.via_raw_http(ChatId(-100), MessageId(4), "🎉").await;

    match res {
        Err(ReactionError::Unconfirmed { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected unconfirmed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_raw_reports_connection_failure_as_http_error() {
    let transport = ReactionTransport::with_api_base(TOKEN, "http://127.0.0.1:9");
    let res = transport.via_raw_http(ChatId(-100), MessageId(5), "⚡").await;

    assert!(matches!(res, Err(ReactionError::Http(_))));
}
