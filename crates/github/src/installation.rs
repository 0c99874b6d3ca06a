//! Installation token issuer.
//!
//! Exchanges a freshly signed app assertion for an access token scoped to one
//! installation:
//!
//! 1. Sign an assertion (`iat = now`, `exp = now + 600`, `iss = app id`).
//! 2. `POST {api}/app/installations/{id}/access_tokens` with the assertion as
//!    bearer credential.
//! 3. Return the `token` field of the response, or an error carrying the raw
//!    response body.
//!
//! There is no caching and no retry. Every call signs a new
//! assertion and performs a new exchange.

use async_trait::async_trait;
use bridge::{InstallationId, InstallationToken, InstallationTokenSource, Timestamp, TokenExchangeError};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::transport_message;
use crate::{ApiSettings, AssertionSigner, SignedAssertion, GITHUB_ACCEPT};

/// Obtains installation access tokens for one GitHub App.
///
/// Read-only after construction; safe to share across concurrent requests.
#[derive(Debug, Clone)]
pub struct InstallationTokenIssuer {
    signer: AssertionSigner,
    http: reqwest::Client,
    settings: ApiSettings,
}

impl InstallationTokenIssuer {
    pub fn new(signer: AssertionSigner, http: reqwest::Client, settings: ApiSettings) -> Self {
        Self {
            signer,
            http,
            settings,
        }
    }

    /// Fetches a new installation token.
    ///
    /// # Errors
    ///
    /// - [`TokenExchangeError::Signing`] if the assertion cannot be signed.
    /// - [`TokenExchangeError::Transport`] if no response was received.
    /// - [`TokenExchangeError::Rejected`] for a non-success status.
    /// - [`TokenExchangeError::MissingToken`] if the body has no `token`.
    #[instrument(skip(self), fields(app_id = %self.signer.app_id()))]
    pub async fn get_installation_token(
        &self,
        installation: InstallationId,
    ) -> Result<InstallationToken, TokenExchangeError> {
        let assertion = self.signer.sign().map_err(|e| {
            error!(error = %e, "Failed to sign app assertion");
            TokenExchangeError::Signing {
                message: e.to_string(),
            }
        })?;

        self.exchange(installation, &assertion, Timestamp::now()).await
    }

    /// Sends the exchange request for an already signed assertion.
    pub(crate) async fn exchange(
        &self,
        installation: InstallationId,
        assertion: &SignedAssertion,
        now: Timestamp,
    ) -> Result<InstallationToken, TokenExchangeError> {
        if assertion.is_expired_at(now) {
            warn!(expires_at = %assertion.expires_at(), "Refusing to exchange expired assertion");
            return Err(TokenExchangeError::ExpiredAssertion);
        }

        let url = self
            .settings
            .url(&format!("/app/installations/{installation}/access_tokens"));
        debug!(%url, "Requesting installation token");

        let response = self
            .http
            .post(&url)
            .bearer_auth(assertion.as_str())
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Installation token request failed");
                TokenExchangeError::Transport {
                    message: transport_message(&e),
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TokenExchangeError::Transport {
            message: transport_message(&e),
        })?;

        match parse_token_response(status, body) {
            Ok(token) => {
                info!(status, expires_at = ?token.expires_at(), "Obtained installation token");
                Ok(token)
            }
            Err(e) => {
                error!(status, error = %e, "Failed to obtain installation token");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl InstallationTokenSource for InstallationTokenIssuer {
    async fn installation_token(
        &self,
        installation: InstallationId,
    ) -> Result<InstallationToken, TokenExchangeError> {
        self.get_installation_token(installation).await
    }
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    token: String,
    #[serde(default)]
    expires_at: Option<String>,
}

/// Interprets a token exchange response. Never panics on malformed bodies.
pub(crate) fn parse_token_response(
    status: u16,
    body: String,
) -> Result<InstallationToken, TokenExchangeError> {
    if !(200..300).contains(&status) {
        return Err(TokenExchangeError::Rejected { status, body });
    }

    match serde_json::from_str::<AccessTokenResponse>(&body) {
        Ok(parsed) if !parsed.token.is_empty() => Ok(InstallationToken::new(
            parsed.token,
            parsed.expires_at.as_deref().and_then(Timestamp::parse_rfc3339),
        )),
        _ => Err(TokenExchangeError::MissingToken { status, body }),
    }
}

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;
