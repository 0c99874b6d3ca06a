//! Process configuration, read once from the environment at start-up.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `WEBHOOK_SECRET` | yes | |
//! | `APP_ID` | yes | |
//! | `PRIVATE_KEY_PATH` | yes | |
//! | `BIND_ADDRESS` | no | `0.0.0.0:3000` |
//! | `GITHUB_API_URL` | no | `https://api.github.com` |
//! | `HTTP_TIMEOUT_SECS` | no | `10` |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | no | unset (no span export) |
//!
//! `RUST_LOG` is read by the subscriber directly; see [`crate::observability`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bridge::AppId;
use github::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use listener::WebhookSecret;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub webhook_secret: WebhookSecret,
    pub app_id: AppId,
    pub private_key_path: PathBuf,
    pub github_api_url: String,
    pub http_timeout: Duration,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is unset or a value does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| var(name).ok_or_else(|| anyhow!("{name} must be set"));

        let bind_address = var("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDRESS must be a socket address such as 0.0.0.0:3000")?;

        let app_id = AppId::new(required("APP_ID")?)
            .ok_or_else(|| anyhow!("APP_ID must not be empty"))?;

        let http_timeout = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            bind_address,
            webhook_secret: WebhookSecret::new(required("WEBHOOK_SECRET")?),
            app_id,
            private_key_path: PathBuf::from(required("PRIVATE_KEY_PATH")?),
            github_api_url: var("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            http_timeout,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))?;
    if secs == 0 {
        return Err(anyhow!("HTTP_TIMEOUT_SECS must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
