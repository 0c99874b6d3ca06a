//! hookbridge GitHub infrastructure adapter.
//!
//! Implements the port traits defined in the [`bridge`] crate
//! ([`bridge::InstallationTokenSource`], [`bridge::NotificationSink`]) against
//! the GitHub REST API with `reqwest` and `jsonwebtoken`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Assertion
//! signing, the token exchange, and the notification writes live here; the
//! [`bridge`] crate never sees HTTP.
//!
//! ## Authentication Flow
//!
//! ```text
//! AppSigningKey ──▶ AssertionSigner ──▶ SignedAssertion (RS256, 600 s)
//!                                            │
//!                                            ▼
//!                      POST /app/installations/{id}/access_tokens
//!                                            │
//!                                            ▼
//!                                   InstallationToken ──▶ GitHubClient
//! ```

pub mod app_key;
pub mod assertion;
pub mod client;
pub mod error;
pub mod installation;
pub mod settings;

pub use app_key::AppSigningKey;
pub use assertion::{AssertionClaims, AssertionSigner, SignedAssertion, ASSERTION_LIFETIME_SECS};
pub use client::GitHubClient;
pub use error::KeyError;
pub use installation::InstallationTokenIssuer;
pub use settings::{
    ApiSettings, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
    GITHUB_ACCEPT,
};
