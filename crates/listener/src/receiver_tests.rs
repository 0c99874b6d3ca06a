use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use bridge::{
    InstallationId, InstallationToken, InstallationTokenSource, Notification, NotificationError,
    NotificationSink, TokenExchangeError,
};
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use serde_json::json;
use sha2::Sha256;
use tower::ServiceExt;

use super::*;
use crate::WebhookSecret;

const SECRET: &str = "test-secret";

#[derive(Default)]
struct CountingTokens {
    calls: AtomicUsize,
}

#[async_trait]
impl InstallationTokenSource for CountingTokens {
    async fn installation_token(
        &self,
        _installation: InstallationId,
    ) -> Result<InstallationToken, TokenExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(InstallationToken::new("ghs_fake", None))
    }
}

struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    async fn deliver(
        &self,
        _token: &InstallationToken,
        _notification: &Notification,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

fn app(tokens: Arc<CountingTokens>) -> Router {
    let receiver = WebhookReceiver::new(
        SignatureVerifier::new(WebhookSecret::new(SECRET)),
        EventDispatcher::new(tokens, Arc::new(NullSink)),
    );
    router(Arc::new(receiver))
}

fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

fn webhook(event: &str, body: &'static str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::post(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .header("X-GitHub-Event", event)
        .header("X-GitHub-Delivery", "d-1");
    if let Some(sig) = signature {
        builder = builder.header("X-Hub-Signature-256", sig);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_missing_signature_is_forbidden() {
    let tokens = Arc::new(CountingTokens::default());
    let response = app(tokens.clone())
        .oneshot(webhook("issues", "{}", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "Invalid signature");
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_signature_is_forbidden() {
    let tokens = Arc::new(CountingTokens::default());
    let response = app(tokens.clone())
        .oneshot(webhook("issues", "{}", Some(sign(b"{ }"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_event_is_acknowledged() {
    let body = r#"{"zen":"Keep it logically awesome."}"#;
    let tokens = Arc::new(CountingTokens::default());
    let response = app(tokens.clone())
        .oneshot(webhook("ping", body, Some(sign(body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json, json!({ "status": "success" }));
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_undecodable_payload_is_bad_request() {
    let body = r#"{"issue":{"number":1}}"#;
    let tokens = Arc::new(CountingTokens::default());
    let response = app(tokens.clone())
        .oneshot(webhook("issues", body, Some(sign(body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json, json!({ "error": "Invalid payload" }));
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_valid_issue_event_is_dispatched() {
    let body = r#"{"issue":{"number":1},"repository":{"full_name":"octo/hello"},"installation":{"id":5}}"#;
    let tokens = Arc::new(CountingTokens::default());
    let response = app(tokens.clone())
        .oneshot(webhook("issues", body, Some(sign(body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_signature_covers_raw_bytes_as_sent() {
    // Irregular whitespace and key order; re-serialising would change the bytes.
    let body = "{ \"installation\" : {\"id\":5},\n  \"repository\":{ \"full_name\" :\"octo/hello\" },\r\n\t\"issue\": {\"number\":   1 } }";
    let tokens = Arc::new(CountingTokens::default());
    let response = app(tokens.clone())
        .oneshot(webhook("issues", body, Some(sign(body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 1);

    let compact = serde_json::to_vec(&serde_json::from_str::<serde_json::Value>(body).unwrap()).unwrap();
    let response = app(tokens.clone())
        .oneshot(webhook("issues", body, Some(sign(&compact))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(tokens.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app(Arc::new(CountingTokens::default()))
        .oneshot(Request::get(HEALTH_PATH).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[test]
fn test_response_status_codes() {
    assert_eq!(WebhookResponse::Accepted.status_code(), StatusCode::OK);
    assert_eq!(WebhookResponse::InvalidSignature.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(WebhookResponse::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        WebhookResponse::TokenFetchFailed.status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
