//! Routes a verified, decoded delivery to its notification action.
//!
//! One delivery drives at most one token exchange and one notification write,
//! in sequence. A failed token exchange halts the delivery; a failed
//! notification is logged and otherwise ignored, since the endpoint's job is
//! to acknowledge receipt rather than guarantee the downstream write.

use std::sync::Arc;

use bridge::{
    DeliveryId, InstallationTokenSource, Notification, NotificationSink, TokenExchangeError,
    WebhookEvent,
};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// How a dispatched delivery ended, short of a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event kind is not acted on. No outbound calls were made.
    Ignored,
    /// The notification was accepted.
    Delivered,
    /// A token was obtained but the notification write failed.
    NotificationFailed,
}

/// A delivery that could not be processed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No installation token could be obtained; nothing was written.
    #[error("Installation token fetch failed: {0}")]
    TokenExchange(#[from] TokenExchangeError),
}

/// Sequences the token fetch and the notification write for each event.
pub struct EventDispatcher {
    tokens: Arc<dyn InstallationTokenSource>,
    notifications: Arc<dyn NotificationSink>,
}

impl EventDispatcher {
    pub fn new(
        tokens: Arc<dyn InstallationTokenSource>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            tokens,
            notifications,
        }
    }

    /// Acts on `event`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TokenExchange`] when the installation token
    /// cannot be fetched. Notification failures are not errors.
    #[instrument(skip(self, event), fields(%delivery, event = event.kind()))]
    pub async fn dispatch(
        &self,
        delivery: &DeliveryId,
        event: &WebhookEvent,
    ) -> Result<DispatchOutcome, DispatchError> {
        let (Some(installation), Some(notification)) =
            (event.installation(), Notification::for_event(event))
        else {
            debug!("Ignoring unhandled webhook event kind");
            return Ok(DispatchOutcome::Ignored);
        };

        info!(
            repository = %notification.repository(),
            %installation,
            action = notification.action(),
            "Received webhook event"
        );

        let token = self
            .tokens
            .installation_token(installation)
            .await
            .inspect_err(|e| error!(error = %e, "Installation token fetch failed"))?;

        match self.notifications.deliver(&token, &notification).await {
            Ok(()) => {
                info!(action = notification.action(), "Notification sent");
                Ok(DispatchOutcome::Delivered)
            }
            Err(e) => {
                warn!(action = notification.action(), error = %e, "Notification failed");
                Ok(DispatchOutcome::NotificationFailed)
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
