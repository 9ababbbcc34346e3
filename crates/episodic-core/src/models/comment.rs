//! Comment and comment-like models

use serde::{Deserialize, Serialize};

use super::{EntityKind, OwnedRow, UserId};
use crate::util::unix_millis_now;

/// A comment on an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Row identifier
    pub id: i64,
    /// Author
    pub user_id: UserId,
    /// Episode commented on
    pub episode_id: i64,
    /// Comment body
    pub content: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl Comment {
    /// Build an unsaved comment
    #[must_use]
    pub fn new(user_id: UserId, episode_id: i64, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id,
            episode_id,
            content: content.into(),
            created_at: unix_millis_now(),
        }
    }
}

impl OwnedRow for Comment {
    /// Comments carry no per-user uniqueness
    type Key = ();

    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
    }

    fn natural_key(&self) {}
}

/// A user's like on a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentLike {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: UserId,
    /// Liked comment
    pub comment_id: i64,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl CommentLike {
    /// Build an unsaved like
    #[must_use]
    pub fn new(user_id: UserId, comment_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            comment_id,
            created_at: unix_millis_now(),
        }
    }
}

impl OwnedRow for CommentLike {
    type Key = i64;

    const KIND: EntityKind = EntityKind::CommentLike;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
    }

    fn natural_key(&self) -> i64 {
        self.comment_id
    }
}
