//! The GitHub App's private signing key.

use std::path::Path;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::debug;

use crate::KeyError;

/// RSA private key used to sign app assertions (RS256).
///
/// Loaded once at start-up and owned for the process lifetime. The key is
/// exercised with a probe signature during loading so a malformed key fails
/// immediately instead of on the first webhook. Key material never leaves the
/// process and is not printed by `Debug`.
#[derive(Clone)]
pub struct AppSigningKey {
    key: EncodingKey,
}

impl AppSigningKey {
    /// Parses a PEM-encoded RSA private key (PKCS#1 or PKCS#8).
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if the PEM cannot be parsed or cannot
    /// produce an RS256 signature.
    pub fn from_pem(pem: &[u8]) -> Result<Self, KeyError> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(|e| KeyError::InvalidKey {
            message: e.to_string(),
        })?;

        #[derive(Serialize)]
        struct Probe {
            probe: bool,
        }

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &Probe { probe: true }, &key)
            .map_err(|e| KeyError::InvalidKey {
                message: e.to_string(),
            })?;

        Ok(Self { key })
    }

    /// Reads and parses the key file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Read`] if the file cannot be read, or
    /// [`KeyError::InvalidKey`] if its content is not a usable key.
    pub fn from_pem_file(path: &Path) -> Result<Self, KeyError> {
        let pem = std::fs::read(path).map_err(|source| KeyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let key = Self::from_pem(&pem)?;
        debug!(path = %path.display(), "Loaded app signing key");
        Ok(key)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.key
    }
}

impl std::fmt::Debug for AppSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AppSigningKey([REDACTED])")
    }
}

#[cfg(test)]
#[path = "app_key_tests.rs"]
mod tests;
