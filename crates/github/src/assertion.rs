//! Signed app assertions (GitHub App JWTs).
//!
//! An assertion proves the app's identity to GitHub and is good for nothing
//! except obtaining an installation token. It is created per token request,
//! never stored, and never reused.

use bridge::{AppId, Timestamp};
use jsonwebtoken::{Algorithm, Header};
use serde::{Deserialize, Serialize};

use crate::AppSigningKey;

/// Lifetime of every assertion: `exp - iat` is always exactly this many
/// seconds. GitHub rejects assertions valid for longer than ten minutes.
pub const ASSERTION_LIFETIME_SECS: i64 = 600;

/// Claims carried by an app assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issued at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// The app id.
    pub iss: String,
}

/// An encoded, RS256-signed assertion together with its validity window.
#[derive(Clone)]
pub struct SignedAssertion {
    token: String,
    issued_at: Timestamp,
    expires_at: Timestamp,
}

impl SignedAssertion {
    /// The compact JWT, for use as a bearer credential.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// `true` once `now` has reached the expiry time.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

impl std::fmt::Debug for SignedAssertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedAssertion")
            .field("token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Signs assertions for one app with its private key.
///
/// Holds only read-only state, so one signer can be shared by every request
/// handler without locking.
#[derive(Debug, Clone)]
pub struct AssertionSigner {
    app_id: AppId,
    key: AppSigningKey,
}

impl AssertionSigner {
    pub fn new(app_id: AppId, key: AppSigningKey) -> Self {
        Self { app_id, key }
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// Signs an assertion issued at the current time.
    ///
    /// # Errors
    ///
    /// Returns the signer error; with a key that passed
    /// [`AppSigningKey::from_pem`] this does not happen in practice.
    pub fn sign(&self) -> Result<SignedAssertion, jsonwebtoken::errors::Error> {
        self.sign_at(Timestamp::now())
    }

    /// Signs an assertion issued at `now`. Deterministic for a given `now`.
    ///
    /// # Errors
    ///
    /// See [`AssertionSigner::sign`].
    pub fn sign_at(&self, now: Timestamp) -> Result<SignedAssertion, jsonwebtoken::errors::Error> {
        let issued_at = now.truncated_to_seconds();
        let expires_at = issued_at.plus_seconds(ASSERTION_LIFETIME_SECS);
        let claims = AssertionClaims {
            iat: issued_at.unix_seconds(),
            exp: expires_at.unix_seconds(),
            iss: self.app_id.to_string(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            self.key.encoding_key(),
        )?;

        Ok(SignedAssertion {
            token,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
#[path = "assertion_tests.rs"]
mod tests;
