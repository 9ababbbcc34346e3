//! Error types for episodic-core

use thiserror::Error;

use crate::models::UserId;

/// Result type alias using episodic-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in episodic-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The merge source does not exist (never created, or already merged)
    #[error("Guest not found: user {0} does not exist")]
    GuestNotFound(UserId),

    /// The merge source exists but is a registered account
    #[error("User {0} is not a mergeable guest")]
    NotAGuest(UserId),

    /// The merge target does not exist
    #[error("Target user not found: {0}")]
    TargetNotFound(UserId),

    /// Guest and target are the same identity
    #[error("Cannot merge user {0} into itself")]
    SameIdentity(UserId),

    /// Another merge for the same guest is running
    #[error("A merge for guest {0} is already in progress")]
    MergeInProgress(UserId),

    /// The guest row could not be removed at the end of a merge
    #[error("Failed to remove guest identity {0}")]
    IdentityCleanup(UserId),
}

impl Error {
    /// Whether the error was raised by a precondition check, before any write.
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::GuestNotFound(_)
                | Self::NotAGuest(_)
                | Self::TargetNotFound(_)
                | Self::SameIdentity(_)
                | Self::MergeInProgress(_)
        )
    }
}
