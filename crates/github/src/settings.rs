//! Connection settings shared by every outbound GitHub call.

use std::time::Duration;

/// Default REST API base for github.com.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("hookbridge/", env!("CARGO_PKG_VERSION"));

/// Media type requested on every call.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Default per-request timeout. No retry is layered on top of it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the GitHub REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl ApiSettings {
    /// `base_url` may carry a trailing slash; it is stripped.
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            user_agent: user_agent.into(),
            timeout,
        }
    }

    /// Builds the HTTP client shared by the token issuer and the
    /// notification client. GitHub rejects requests without a `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the TLS backend cannot be initialised.
    pub fn build_http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_API_BASE_URL,
            DEFAULT_USER_AGENT,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }
}
