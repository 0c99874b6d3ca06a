//! Error taxonomy for the hookbridge domain.
//!
//! Each failure class a webhook delivery can hit has its own type so the
//! endpoint can map it to an HTTP outcome without inspecting messages:
//!
//! | Type | Outcome for the delivery |
//! |------|--------------------------|
//! | [`DecodeError`] | rejected as a bad payload |
//! | [`TokenExchangeError`] | halted, reported as a server error |
//! | [`NotificationError`] | logged only; the delivery still succeeds |
//!
//! None of these are retried.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Payload decoding
// ---------------------------------------------------------------------------

/// A webhook payload for a recognised event kind could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON, or a required field is absent or has the
    /// wrong type.
    #[error("Invalid '{event}' payload: {message}")]
    InvalidPayload {
        /// The `X-GitHub-Event` kind that was being decoded.
        event: String,
        /// Decoder diagnostic, including the path of the offending field.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Installation token exchange
// ---------------------------------------------------------------------------

/// Exchanging the app assertion for an installation token failed.
///
/// Variants that saw a response keep the raw body for diagnostics. Token
/// values never appear here because a successful body is never an error.
#[derive(Debug, Error)]
pub enum TokenExchangeError {
    /// The remote authority answered with a non-success status.
    #[error("Token exchange rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response was successful but carried no string `token` field.
    #[error("Token exchange response (status {status}) has no token: {body}")]
    MissingToken {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The assertion expired before the exchange was sent.
    #[error("Signed assertion expired before the token exchange")]
    ExpiredAssertion,

    /// The assertion could not be signed.
    #[error("Failed to sign app assertion: {message}")]
    Signing {
        /// Signer diagnostic.
        message: String,
    },

    /// The request never produced a response (connect failure, timeout).
    #[error("Token exchange transport failure: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Notification delivery
// ---------------------------------------------------------------------------

/// Posting a comment or creating an issue failed.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The API answered with a non-success status.
    #[error("Notification rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("Notification transport failure: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },
}
