//! End-to-end webhook handling: signed request in, GitHub API calls out.
//!
//! The receiver is wired to the real token issuer and notification client,
//! both pointed at a local mock of the GitHub REST API.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bridge::AppId;
use github::{ApiSettings, AppSigningKey, AssertionSigner, GitHubClient, InstallationTokenIssuer};
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use listener::{router, EventDispatcher, SignatureVerifier, WebhookReceiver, WebhookSecret};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

const APP_KEY: &str = include_str!("../../github/tests/fixtures/app_key.pem");
const WEBHOOK_SECRET: &str = "integration-secret";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app(server: &MockServer) -> Router {
    let settings = ApiSettings::new(server.base_url(), "hookbridge-tests", Duration::from_secs(5));
    let http = settings.build_http_client().unwrap();
    let signer = AssertionSigner::new(
        AppId::new("123456").unwrap(),
        AppSigningKey::from_pem(APP_KEY.as_bytes()).unwrap(),
    );
    let tokens = InstallationTokenIssuer::new(signer, http.clone(), settings.clone());
    let notifications = GitHubClient::new(http, settings);

    let receiver = WebhookReceiver::new(
        SignatureVerifier::new(WebhookSecret::new(WEBHOOK_SECRET)),
        EventDispatcher::new(Arc::new(tokens), Arc::new(notifications)),
    );
    router(Arc::new(receiver))
}

fn signature_for(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

fn signed_delivery(event: &str, payload: &Value) -> Request<Body> {
    let body = serde_json::to_vec(payload).unwrap();
    Request::post("/api/webhook")
        .header("content-type", "application/json")
        .header("X-GitHub-Event", event)
        .header("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
        .header("X-Hub-Signature-256", signature_for(&body))
        .body(Body::from(body))
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn mock_token_exchange(server: &MockServer, installation: u64) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/app/installations/{installation}/access_tokens"))
                .header_exists("authorization");
            then.status(201).json_body(json!({
                "token": "ghs_integration",
                "expires_at": "2030-01-01T00:00:00Z"
            }));
        })
        .await
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_pull_request_gets_greeting_comment() {
    let server = MockServer::start_async().await;
    let exchange = mock_token_exchange(&server, 42).await;
    let comment = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/octo/hello/issues/7/comments")
                .header("authorization", "token ghs_integration")
                .json_body(json!({ "body": "👋 Hello! Your PR has been detected!" }));
            then.status(201).json_body(json!({ "id": 1 }));
        })
        .await;

    let payload = json!({
        "action": "opened",
        "pull_request": { "number": 7 },
        "repository": { "full_name": "octo/hello" },
        "installation": { "id": 42 }
    });
    let response = app(&server)
        .oneshot(signed_delivery("pull_request", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body, json!({ "status": "success" }));
    exchange.assert_calls_async(1).await;
    comment.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_issue_gets_acknowledgement_comment() {
    let server = MockServer::start_async().await;
    let exchange = mock_token_exchange(&server, 9).await;
    let comment = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/octo/hello/issues/3/comments")
                .json_body(json!({
                    "body": "📝 Thanks for creating an issue! We'll look into it!"
                }));
            then.status(201);
        })
        .await;

    let payload = json!({
        "action": "opened",
        "issue": { "number": 3 },
        "repository": { "full_name": "octo/hello" },
        "installation": { "id": 9 }
    });
    let response = app(&server)
        .oneshot(signed_delivery("issues", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    exchange.assert_calls_async(1).await;
    comment.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_missing_signature_makes_no_outbound_calls() {
    let server = MockServer::start_async().await;
    let exchange = mock_token_exchange(&server, 42).await;

    let request = Request::post("/api/webhook")
        .header("X-GitHub-Event", "pull_request")
        .body(Body::from(r#"{"pull_request":{"number":7}}"#))
        .unwrap();
    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_body(response).await, b"Invalid signature");
    exchange.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_push_without_commits_opens_issue_with_fallback_message() {
    let server = MockServer::start_async().await;
    let exchange = mock_token_exchange(&server, 11).await;
    let issue = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/octo/hello/issues")
                .body_includes("New push detected by alice")
                .body_includes("No commit message");
            then.status(201).json_body(json!({ "number": 99 }));
        })
        .await;

    let payload = json!({
        "ref": "refs/heads/main",
        "repository": { "full_name": "octo/hello" },
        "installation": { "id": 11 },
        "pusher": { "name": "alice" },
        "commits": []
    });
    let response = app(&server)
        .oneshot(signed_delivery("push", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    exchange.assert_calls_async(1).await;
    issue.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_push_issue_quotes_latest_commit_message() {
    let server = MockServer::start_async().await;
    mock_token_exchange(&server, 11).await;
    let issue = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/octo/hello/issues")
                .body_includes("Fix flaky build");
            then.status(201);
        })
        .await;

    let payload = json!({
        "repository": { "full_name": "octo/hello" },
        "installation": { "id": 11 },
        "pusher": { "name": "alice" },
        "commits": [
            { "message": "Add readme" },
            { "message": "Fix flaky build" }
        ]
    });
    let response = app(&server)
        .oneshot(signed_delivery("push", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    issue.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_token_response_without_token_is_server_error() {
    let server = MockServer::start_async().await;
    let exchange = server
        .mock_async(|when, then| {
            when.method(POST).path("/app/installations/42/access_tokens");
            then.status(200).json_body(json!({ "error": "bad_credentials" }));
        })
        .await;
    let comment = server
        .mock_async(|when, then| {
            when.method(POST).path("/repos/octo/hello/issues/7/comments");
            then.status(201);
        })
        .await;

    let payload = json!({
        "pull_request": { "number": 7 },
        "repository": { "full_name": "octo/hello" },
        "installation": { "id": 42 }
    });
    let response = app(&server)
        .oneshot(signed_delivery("pull_request", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body, json!({ "error": "Installation token fetch failed" }));
    exchange.assert_calls_async(1).await;
    comment.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_rejected_comment_still_acknowledges_delivery() {
    let server = MockServer::start_async().await;
    mock_token_exchange(&server, 42).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/repos/octo/hello/issues/7/comments");
            then.status(403).body("Resource not accessible by integration");
        })
        .await;

    let payload = json!({
        "pull_request": { "number": 7 },
        "repository": { "full_name": "octo/hello" },
        "installation": { "id": 42 }
    });
    let response = app(&server)
        .oneshot(signed_delivery("pull_request", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unsupported_event_is_acknowledged_without_calls() {
    let server = MockServer::start_async().await;
    let exchange = mock_token_exchange(&server, 42).await;

    let payload = json!({ "action": "created", "installation": { "id": 42 } });
    let response = app(&server)
        .oneshot(signed_delivery("star", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body, json!({ "status": "success" }));
    exchange.assert_calls_async(0).await;
}
