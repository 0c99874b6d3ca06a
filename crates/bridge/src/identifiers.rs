//! Newtype domain identifiers.
//!
//! Every concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! an [`InstallationId`] with an [`IssueNumber`] even though both are `u64`
//! under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and a
// `TryFrom<String>` used by serde so empty values are rejected on decode.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| format!("{} must not be empty", stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (GitHub-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: GitHub-integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies one installation of the GitHub App on an account or
    /// organisation.
    ///
    /// Each installation has its own scoped access token; the id is carried in
    /// every webhook payload under `installation.id`.
    InstallationId
}

u64_id! {
    /// An issue or pull request number within a repository.
    ///
    /// GitHub shares one number space between issues and pull requests, and
    /// comments on both are posted through the issues API.
    IssueNumber
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (configuration / GitHub names)
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies the GitHub App itself.
    ///
    /// Used as the `iss` claim of every signed assertion. Supplied via
    /// configuration and immutable for the process lifetime.
    AppId
}

string_id! {
    /// Identifies a GitHub repository in `"owner/repo"` format.
    RepositoryName
}

// ---------------------------------------------------------------------------
// Identifiers: delivery correlation
// ---------------------------------------------------------------------------

/// Identifies one webhook delivery.
///
/// Taken from the `X-GitHub-Delivery` header when present; otherwise a random
/// id is generated so every log line of a request can still be correlated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(String);

impl DeliveryId {
    /// Uses the header value when it is present and non-blank, otherwise
    /// generates a random id.
    pub fn from_header_or_random(header: Option<&str>) -> Self {
        match header.map(str::trim) {
            Some(v) if !v.is_empty() => Self(v.to_string()),
            _ => Self(Uuid::new_v4().to_string()),
        }
    }

    /// Returns the delivery id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
