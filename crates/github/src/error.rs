//! Errors raised while preparing GitHub credentials.
//!
//! Request-time failures use the domain errors from [`bridge`]
//! ([`bridge::TokenExchangeError`], [`bridge::NotificationError`]); only the
//! start-up key loading has its own type, since it is fatal to the process.

use std::path::PathBuf;

use thiserror::Error;

/// The app's private key could not be loaded.
///
/// Raised once at start-up. The process must not serve webhooks without a
/// usable signing key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key file could not be read.
    #[error("Failed to read private key '{path}': {source}")]
    Read {
        /// Path that was configured.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a usable PEM-encoded RSA private key.
    #[error("Invalid RSA private key: {message}")]
    InvalidKey {
        /// Parser or signer diagnostic.
        message: String,
    },
}

/// Renders a `reqwest` error for a transport-failure variant.
pub(crate) fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    }
}
