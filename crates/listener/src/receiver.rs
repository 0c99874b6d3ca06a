//! HTTP intake for GitHub webhook deliveries.
//!
//! # Processing Steps
//!
//! 1. Read the raw body bytes (before any JSON parsing) and the
//!    `X-Hub-Signature-256`, `X-GitHub-Event` and `X-GitHub-Delivery` headers.
//! 2. Verify the signature; reject with `403` on mismatch.
//! 3. Decode the payload for the event kind; reject with `400` if a required
//!    field is missing.
//! 4. Dispatch; a failed token exchange yields `500`, everything else `200`.
//!
//! The response is returned only after the dispatch has finished.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bridge::{DeliveryId, WebhookEvent};
use bytes::Bytes;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn, Span};

use crate::{DispatchOutcome, EventDispatcher, SignatureVerifier};

/// Route the webhook is served on.
pub const WEBHOOK_PATH: &str = "/api/webhook";
/// Liveness probe route.
pub const HEALTH_PATH: &str = "/healthz";

/// Carries `sha256=<hex>` computed over the raw body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
/// Names the event kind, e.g. `pull_request`.
pub const EVENT_HEADER: &str = "x-github-event";
/// Unique id of the delivery, used for log correlation.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// GitHub caps webhook payloads at 25 MB; axum's default limit is lower.
const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

// ============================================================================
// Webhook Response
// ============================================================================

/// Immediate HTTP answer to a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResponse {
    /// 200 - processed, ignored, or notification failed (best effort).
    Accepted,
    /// 403 - signature missing or wrong.
    InvalidSignature,
    /// 400 - a supported event kind with an undecodable payload.
    InvalidPayload,
    /// 500 - no installation token could be obtained.
    TokenFetchFailed,
}

impl WebhookResponse {
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Accepted => StatusCode::OK,
            Self::InvalidSignature => StatusCode::FORBIDDEN,
            Self::InvalidPayload => StatusCode::BAD_REQUEST,
            Self::TokenFetchFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Accepted => (status, Json(json!({ "status": "success" }))).into_response(),
            Self::InvalidSignature => (status, "Invalid signature").into_response(),
            Self::InvalidPayload => (status, Json(json!({ "error": "Invalid payload" }))).into_response(),
            Self::TokenFetchFailed => (
                status,
                Json(json!({ "error": "Installation token fetch failed" })),
            )
                .into_response(),
        }
    }
}

// ============================================================================
// Webhook Receiver
// ============================================================================

/// Verifies, decodes and dispatches webhook deliveries.
pub struct WebhookReceiver {
    verifier: SignatureVerifier,
    dispatcher: EventDispatcher,
}

impl WebhookReceiver {
    pub fn new(verifier: SignatureVerifier, dispatcher: EventDispatcher) -> Self {
        Self {
            verifier,
            dispatcher,
        }
    }

    /// Processes one delivery and returns the response to send.
    #[instrument(skip_all, fields(delivery_id, event))]
    pub async fn receive(&self, headers: &HeaderMap, body: &[u8]) -> WebhookResponse {
        let delivery = DeliveryId::from_header_or_random(header(headers, DELIVERY_HEADER));
        let kind = header(headers, EVENT_HEADER);
        let span = Span::current();
        span.record("delivery_id", delivery.as_str());
        span.record("event", kind.unwrap_or("unknown"));

        if !self.verifier.verify(body, header(headers, SIGNATURE_HEADER)) {
            warn!("Rejected webhook with invalid signature");
            return WebhookResponse::InvalidSignature;
        }

        let event = match WebhookEvent::decode(kind, body) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Rejected undecodable webhook payload");
                return WebhookResponse::InvalidPayload;
            }
        };

        match self.dispatcher.dispatch(&delivery, &event).await {
            Ok(outcome) => {
                if outcome != DispatchOutcome::Ignored {
                    info!(?outcome, "Webhook processed");
                }
                WebhookResponse::Accepted
            }
            Err(_) => WebhookResponse::TokenFetchFailed,
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// ============================================================================
// Router
// ============================================================================

/// Builds the HTTP router serving [`WEBHOOK_PATH`] and [`HEALTH_PATH`].
pub fn router(receiver: Arc<WebhookReceiver>) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_webhook))
        .route(HEALTH_PATH, get(health))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(receiver)
}

async fn handle_webhook(
    State(receiver): State<Arc<WebhookReceiver>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse {
    receiver.receive(&headers, &body).await
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
