//! Core domain for hookbridge.
//!
//! This crate contains every domain concept, newtype identifier, decoded event
//! type and error type used by the webhook bridge. Infrastructure crates
//! implement the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`InstallationId`, `RepositoryName`, etc.) |
//! | [`types`] | Value types (`InstallationToken`, `Timestamp`) |
//! | [`events`] | Decoded webhook events |
//! | [`notifications`] | Comment / issue actions rendered from events |
//! | [`ports`] | Traits implemented by infrastructure crates |
//! | [`errors`] | Decode, token exchange and notification errors |

pub mod errors;
pub mod events;
pub mod identifiers;
pub mod notifications;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{DecodeError, NotificationError, TokenExchangeError};
pub use events::{
    CommitSummary, IssuesEvent, PullRequestEvent, PushEvent, WebhookEvent, ISSUES_EVENT,
    PULL_REQUEST_EVENT, PUSH_EVENT,
};
pub use identifiers::{AppId, DeliveryId, InstallationId, IssueNumber, RepositoryName};
pub use notifications::{
    Notification, ISSUE_ACKNOWLEDGEMENT, NO_COMMIT_MESSAGE, PULL_REQUEST_GREETING,
};
pub use ports::{InstallationTokenSource, NotificationSink};
pub use types::{InstallationToken, Timestamp};
