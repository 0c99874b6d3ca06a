//! hookbridge webhook receiver.
//!
//! Serves `POST /api/webhook`, verifies the HMAC-SHA256 signature of every
//! delivery over its raw bytes, decodes the payload into a
//! [`bridge::WebhookEvent`] and dispatches it to the notification action for
//! its kind.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport details (axum, headers, status codes) and
//! signature checking live here. Token exchange and notification writes are
//! reached only through the [`bridge`] port traits, so this crate has no
//! dependency on the GitHub adapter outside of tests.
//!
//! ## Response Contract
//!
//! | Situation | Status | Body |
//! |-----------|--------|------|
//! | Signature missing or wrong | 403 | `Invalid signature` |
//! | Supported kind, undecodable payload | 400 | `{"error": "Invalid payload"}` |
//! | Installation token fetch failed | 500 | `{"error": "Installation token fetch failed"}` |
//! | Anything else | 200 | `{"status": "success"}` |

pub mod dispatcher;
pub mod receiver;
pub mod signature;

pub use dispatcher::{DispatchError, DispatchOutcome, EventDispatcher};
pub use receiver::{router, WebhookReceiver, WebhookResponse, HEALTH_PATH, WEBHOOK_PATH};
pub use signature::{SignatureVerifier, WebhookSecret, SIGNATURE_PREFIX};
