//! Shared value types for the hookbridge domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! values with handling rules (tokens must never be logged, timestamps are
//! always UTC).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Opaque bearer credential scoped to one installation.
///
/// Obtained by exchanging a signed app assertion. Held only for the duration
/// of a single webhook delivery; it is never cached or persisted. The `Debug`
/// implementation redacts the secret value so the token can travel through
/// `tracing` fields and error messages safely.
#[derive(Clone, PartialEq, Eq)]
pub struct InstallationToken {
    secret: String,
    expires_at: Option<Timestamp>,
}

impl InstallationToken {
    /// Wraps a raw token value returned by the token exchange.
    pub fn new(secret: impl Into<String>, expires_at: Option<Timestamp>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn expose_secret(&self) -> &str {
        &self.secret
    }

    /// Expiry reported by the remote authority, if any. Informational only.
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }
}

impl std::fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationToken")
            .field("secret", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from whole seconds since the Unix epoch.
    ///
    /// Returns `None` if the value is outside the range chrono can represent.
    pub fn from_unix_seconds(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Parses an RFC 3339 timestamp such as `2016-07-11T22:14:10Z`.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Drops the sub-second part.
    pub fn truncated_to_seconds(self) -> Self {
        Self(self.0 - Duration::nanoseconds(i64::from(self.0.timestamp_subsec_nanos())))
    }

    /// Returns this timestamp moved `secs` seconds forward (or back, if negative).
    pub fn plus_seconds(self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Returns whole seconds since the Unix epoch.
    pub fn unix_seconds(self) -> i64 {
        self.0.timestamp()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
