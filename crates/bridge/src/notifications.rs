//! Notification actions rendered from webhook events.
//!
//! Each supported event maps to exactly one write against the repository:
//! a comment on the pull request or issue, or a new issue recording a push.

use crate::{IssueNumber, PushEvent, RepositoryName, WebhookEvent};

/// Comment posted on every pull request event.
pub const PULL_REQUEST_GREETING: &str = "👋 Hello! Your PR has been detected!";

/// Comment posted on every issue event.
pub const ISSUE_ACKNOWLEDGEMENT: &str = "📝 Thanks for creating an issue! We'll look into it!";

/// Stands in for the latest commit message when a push has no commits.
pub const NO_COMMIT_MESSAGE: &str = "No commit message";

/// A single write to perform with an installation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Comment on an existing issue or pull request.
    IssueComment {
        repository: RepositoryName,
        number: IssueNumber,
        body: String,
    },
    /// Open a new issue.
    NewIssue {
        repository: RepositoryName,
        title: String,
        body: String,
    },
}

impl Notification {
    /// Renders the action for `event`, or `None` for ignored kinds.
    pub fn for_event(event: &WebhookEvent) -> Option<Self> {
        match event {
            WebhookEvent::PullRequest(pr) => Some(Self::IssueComment {
                repository: pr.repository.clone(),
                number: pr.number,
                body: PULL_REQUEST_GREETING.to_string(),
            }),
            WebhookEvent::Issues(issue) => Some(Self::IssueComment {
                repository: issue.repository.clone(),
                number: issue.number,
                body: ISSUE_ACKNOWLEDGEMENT.to_string(),
            }),
            WebhookEvent::Push(push) => Some(push_issue(push)),
            WebhookEvent::Ignored { .. } => None,
        }
    }

    /// Repository the write targets.
    pub fn repository(&self) -> &RepositoryName {
        match self {
            Self::IssueComment { repository, .. } | Self::NewIssue { repository, .. } => repository,
        }
    }

    /// Short label for logs.
    pub fn action(&self) -> &'static str {
        match self {
            Self::IssueComment { .. } => "issue_comment",
            Self::NewIssue { .. } => "new_issue",
        }
    }
}

fn push_issue(push: &PushEvent) -> Notification {
    let latest = push.latest_commit_message().unwrap_or(NO_COMMIT_MESSAGE);
    Notification::NewIssue {
        repository: push.repository.clone(),
        title: format!("🚀 New push detected by {}", push.pusher),
        body: format!(
            "New code push detected in **{}**\n\n🔹 **Pusher**: {}\n🔹 **Latest commit message**: {}",
            push.repository, push.pusher, latest
        ),
    }
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
