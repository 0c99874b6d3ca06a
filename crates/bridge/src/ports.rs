//! Port traits implemented by infrastructure crates.
//!
//! The dispatcher in `listener` only sees these traits; the `github` crate
//! supplies the HTTP implementations and tests supply in-memory fakes.

use async_trait::async_trait;

use crate::{InstallationId, InstallationToken, Notification, NotificationError, TokenExchangeError};

/// Produces installation-scoped access tokens.
///
/// Implementations must not cache: each call yields a freshly fetched token.
/// Callers that need throughput should wrap an implementation in an
/// expiry-aware cache rather than change this contract.
#[async_trait]
pub trait InstallationTokenSource: Send + Sync {
    /// Fetches a new token for `installation`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenExchangeError`] when no token could be obtained. The
    /// error is terminal; implementations do not retry.
    async fn installation_token(
        &self,
        installation: InstallationId,
    ) -> Result<InstallationToken, TokenExchangeError>;
}

/// Performs a [`Notification`] write against the repository host.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends `notification` authenticated with `token`, exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the write was not accepted.
    async fn deliver(
        &self,
        token: &InstallationToken,
        notification: &Notification,
    ) -> Result<(), NotificationError>;
}
