//! hookbridge server entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Load configuration**: honour a `.env` file, then read [`Config`] from
//!    the environment.
//! 2. **Wire observability**: JSON logs plus optional OTLP span export.
//! 3. **Construct infrastructure**: load the app signing key (fatal if it is
//!    unreadable or malformed), build one shared HTTP client, the installation
//!    token issuer and the notification client, and inject them into the
//!    dispatcher.
//! 4. **Serve**: bind the listen address and run the webhook router until
//!    Ctrl+C.

mod config;
mod observability;

use std::sync::Arc;

use anyhow::{Context, Result};
use github::{
    ApiSettings, AppSigningKey, AssertionSigner, GitHubClient, InstallationTokenIssuer,
    DEFAULT_USER_AGENT,
};
use listener::{router, EventDispatcher, SignatureVerifier, WebhookReceiver, WEBHOOK_PATH};
use tracing::{error, info};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    let _telemetry = observability::init(config.otlp_endpoint.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        app_id = %config.app_id,
        "Starting hookbridge"
    );

    let key = AppSigningKey::from_pem_file(&config.private_key_path).with_context(|| {
        format!(
            "failed to load GitHub App private key from {}",
            config.private_key_path.display()
        )
    })?;

    let settings = ApiSettings::new(
        config.github_api_url.clone(),
        DEFAULT_USER_AGENT,
        config.http_timeout,
    );
    let http = settings
        .build_http_client()
        .context("failed to build HTTP client")?;

    let tokens = InstallationTokenIssuer::new(
        AssertionSigner::new(config.app_id.clone(), key),
        http.clone(),
        settings.clone(),
    );
    let notifications = GitHubClient::new(http, settings);
    let receiver = WebhookReceiver::new(
        SignatureVerifier::new(config.webhook_secret.clone()),
        EventDispatcher::new(Arc::new(tokens), Arc::new(notifications)),
    );
    let app = router(Arc::new(receiver));

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(address = %config.bind_address, path = WEBHOOK_PATH, "Listening for webhooks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server keeps running until killed.
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
