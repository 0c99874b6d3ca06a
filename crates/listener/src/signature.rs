//! Webhook signature verification.
//!
//! GitHub signs every delivery with HMAC-SHA256 keyed by the webhook secret
//! and sends the result as `X-Hub-Signature-256: sha256=<hex>`. The expected
//! value is recomputed over the raw body bytes and compared in constant time,
//! so response timing reveals nothing about where a forged signature first
//! differs.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, error};
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm tag prepended to the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// The shared webhook secret.
///
/// Never logged (`Debug` is redacted) and wiped from memory on drop.
#[derive(Clone)]
pub struct WebhookSecret(Vec<u8>);

impl WebhookSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for WebhookSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret([REDACTED])")
    }
}

/// Checks that a delivery was produced by a holder of the webhook secret.
///
/// Stateless apart from the read-only secret; one instance serves all
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: WebhookSecret,
}

impl SignatureVerifier {
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }

    /// Returns `true` only if `presented` equals `sha256=<hex(HMAC(secret, raw_body))>`.
    ///
    /// Fails closed: an absent or empty signature is `false`. Never panics.
    pub fn verify(&self, raw_body: &[u8], presented: Option<&str>) -> bool {
        let Some(presented) = presented.filter(|s| !s.is_empty()) else {
            debug!("Webhook signature header missing");
            return false;
        };

        let Some(expected) = self.expected_signature(raw_body) else {
            return false;
        };

        expected.as_bytes().ct_eq(presented.as_bytes()).into()
    }

    fn expected_signature(&self, raw_body: &[u8]) -> Option<String> {
        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            Err(e) => {
                error!(error = %e, "Failed to key HMAC with webhook secret");
                return None;
            }
        };
        mac.update(raw_body);
        Some(format!(
            "{SIGNATURE_PREFIX}{}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
