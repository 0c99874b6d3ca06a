//! REST client for the notification writes.
//!
//! Each [`Notification`] maps to one `POST` authenticated with an
//! installation token (`Authorization: token <...>`). Failures are reported
//! once and never retried.

use async_trait::async_trait;
use bridge::{
    InstallationToken, IssueNumber, Notification, NotificationError, NotificationSink,
    RepositoryName,
};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::error::transport_message;
use crate::{ApiSettings, GITHUB_ACCEPT};

/// Posts comments and creates issues on behalf of an installation.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    settings: ApiSettings,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, settings: ApiSettings) -> Self {
        Self { http, settings }
    }

    /// `POST /repos/{repo}/issues/{number}/comments`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] for a non-success status or a transport
    /// failure.
    #[instrument(skip(self, token, body), fields(%repository, %number))]
    pub async fn post_issue_comment(
        &self,
        token: &InstallationToken,
        repository: &RepositoryName,
        number: IssueNumber,
        body: &str,
    ) -> Result<(), NotificationError> {
        let url = self
            .settings
            .url(&format!("/repos/{repository}/issues/{number}/comments"));
        self.post(token, &url, &json!({ "body": body })).await
    }

    /// `POST /repos/{repo}/issues`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] for a non-success status or a transport
    /// failure.
    #[instrument(skip(self, token, body), fields(%repository))]
    pub async fn create_issue(
        &self,
        token: &InstallationToken,
        repository: &RepositoryName,
        title: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let url = self.settings.url(&format!("/repos/{repository}/issues"));
        self.post(token, &url, &json!({ "title": title, "body": body }))
            .await
    }

    async fn post(
        &self,
        token: &InstallationToken,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<(), NotificationError> {
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("token {}", token.expose_secret()))
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotificationError::Transport {
                message: transport_message(&e),
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "Notification delivered");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %body, "Notification rejected");
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NotificationSink for GitHubClient {
    async fn deliver(
        &self,
        token: &InstallationToken,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        match notification {
            Notification::IssueComment {
                repository,
                number,
                body,
            } => self.post_issue_comment(token, repository, *number, body).await,
            Notification::NewIssue {
                repository,
                title,
                body,
            } => self.create_issue(token, repository, title, body).await,
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
