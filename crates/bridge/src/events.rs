//! Decoded webhook events.
//!
//! A delivery is decoded into one [`WebhookEvent`] variant per supported
//! `X-GitHub-Event` kind. Every field the notification actions rely on is
//! required; a payload missing one fails with [`DecodeError`] instead of
//! being partially processed. Kinds the bridge does not act on decode to
//! [`WebhookEvent::Ignored`] without looking at the body.

use serde::Deserialize;

use crate::{DecodeError, InstallationId, IssueNumber, RepositoryName};

/// `X-GitHub-Event` value for pull request activity.
pub const PULL_REQUEST_EVENT: &str = "pull_request";
/// `X-GitHub-Event` value for issue activity.
pub const ISSUES_EVENT: &str = "issues";
/// `X-GitHub-Event` value for branch and tag pushes.
pub const PUSH_EVENT: &str = "push";

// ---------------------------------------------------------------------------
// Public event types
// ---------------------------------------------------------------------------

/// A pull request was opened, edited, synchronised, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub number: IssueNumber,
    pub repository: RepositoryName,
    pub installation: InstallationId,
}

/// An issue was opened, edited, closed, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesEvent {
    pub number: IssueNumber,
    pub repository: RepositoryName,
    pub installation: InstallationId,
}

/// One commit included in a push, in push order.
///
/// Only the latest commit is required to carry a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitSummary {
    #[serde(default)]
    pub message: Option<String>,
}

/// Commits were pushed to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub repository: RepositoryName,
    pub installation: InstallationId,
    /// Name of the account that pushed.
    pub pusher: String,
    /// May be empty, e.g. for a branch deletion or a tag push.
    pub commits: Vec<CommitSummary>,
}

impl PushEvent {
    /// Message of the most recent commit, if the push contained any.
    pub fn latest_commit_message(&self) -> Option<&str> {
        self.commits.last().and_then(|c| c.message.as_deref())
    }
}

/// A verified webhook delivery, decoded by event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    PullRequest(PullRequestEvent),
    Issues(IssuesEvent),
    Push(PushEvent),
    /// Any other kind, or a delivery without an event header. Acknowledged
    /// and otherwise ignored.
    Ignored { kind: Option<String> },
}

impl WebhookEvent {
    /// Decodes `body` according to the `X-GitHub-Event` header value.
    ///
    /// `body` must be the raw request bytes that were signature-checked.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidPayload`] when the kind is one of the
    /// supported ones and the body is not valid JSON or lacks a required
    /// field. Unsupported kinds never fail.
    pub fn decode(kind: Option<&str>, body: &[u8]) -> Result<Self, DecodeError> {
        match kind {
            Some(PULL_REQUEST_EVENT) => {
                let p: PullRequestPayload = parse(PULL_REQUEST_EVENT, body)?;
                Ok(Self::PullRequest(PullRequestEvent {
                    number: p.pull_request.number,
                    repository: p.repository.full_name,
                    installation: p.installation.id,
                }))
            }
            Some(ISSUES_EVENT) => {
                let p: IssuesPayload = parse(ISSUES_EVENT, body)?;
                Ok(Self::Issues(IssuesEvent {
                    number: p.issue.number,
                    repository: p.repository.full_name,
                    installation: p.installation.id,
                }))
            }
            Some(PUSH_EVENT) => {
                let p: PushPayload = parse(PUSH_EVENT, body)?;
                if p.commits.last().is_some_and(|c| c.message.is_none()) {
                    return Err(DecodeError::InvalidPayload {
                        event: PUSH_EVENT.to_string(),
                        message: "missing field `message` in the latest commit".to_string(),
                    });
                }
                Ok(Self::Push(PushEvent {
                    repository: p.repository.full_name,
                    installation: p.installation.id,
                    pusher: p.pusher.name,
                    commits: p.commits,
                }))
            }
            other => Ok(Self::Ignored {
                kind: other.map(str::to_string),
            }),
        }
    }

    /// The event kind as it appeared in `X-GitHub-Event`.
    pub fn kind(&self) -> &str {
        match self {
            Self::PullRequest(_) => PULL_REQUEST_EVENT,
            Self::Issues(_) => ISSUES_EVENT,
            Self::Push(_) => PUSH_EVENT,
            Self::Ignored { kind } => kind.as_deref().unwrap_or("unknown"),
        }
    }

    /// The installation whose token is needed to act on this event.
    pub fn installation(&self) -> Option<InstallationId> {
        match self {
            Self::PullRequest(e) => Some(e.installation),
            Self::Issues(e) => Some(e.installation),
            Self::Push(e) => Some(e.installation),
            Self::Ignored { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes (only the fields the bridge needs)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RepositoryRef {
    full_name: RepositoryName,
}

#[derive(Deserialize)]
struct InstallationRef {
    id: InstallationId,
}

#[derive(Deserialize)]
struct NumberedRef {
    number: IssueNumber,
}

#[derive(Deserialize)]
struct PusherRef {
    name: String,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    pull_request: NumberedRef,
    repository: RepositoryRef,
    installation: InstallationRef,
}

#[derive(Deserialize)]
struct IssuesPayload {
    issue: NumberedRef,
    repository: RepositoryRef,
    installation: InstallationRef,
}

#[derive(Deserialize)]
struct PushPayload {
    repository: RepositoryRef,
    installation: InstallationRef,
    pusher: PusherRef,
    commits: Vec<CommitSummary>,
}

fn parse<'a, T: Deserialize<'a>>(event: &str, body: &'a [u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|e| DecodeError::InvalidPayload {
        event: event.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
