//! User-owned rows and how each kind is reconciled during a merge

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserId;

/// How a guest row that collides with a target row is reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// The row with the greater `updated_at` wins; ties keep the target's row
    Temporal,
    /// Membership only: an existing target row wins, the guest row is dropped
    FirstClaim,
    /// No natural key across users; rows are always moved
    Reassign,
}

/// Entity types folded into the target account during a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    WatchProgress,
    Favorite,
    EpisodeReaction,
    Comment,
    CommentLike,
}

impl EntityKind {
    /// Order in which the orchestrator processes entity types.
    pub const MERGE_ORDER: [Self; 5] = [
        Self::WatchProgress,
        Self::Favorite,
        Self::EpisodeReaction,
        Self::Comment,
        Self::CommentLike,
    ];

    /// Conflict policy applied to this kind
    pub const fn policy(self) -> ConflictPolicy {
        match self {
            Self::WatchProgress | Self::EpisodeReaction => ConflictPolicy::Temporal,
            Self::Favorite | Self::CommentLike => ConflictPolicy::FirstClaim,
            Self::Comment => ConflictPolicy::Reassign,
        }
    }

    /// Backing table name
    pub const fn table(self) -> &'static str {
        match self {
            Self::WatchProgress => "watch_progress",
            Self::Favorite => "favorites",
            Self::EpisodeReaction => "episode_reactions",
            Self::Comment => "comments",
            Self::CommentLike => "comment_likes",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A row owned by a user that takes part in an account merge
pub trait OwnedRow: Clone {
    /// Natural key columns other than the owner
    type Key: Clone + Eq + fmt::Debug;

    /// Entity kind of this row type
    const KIND: EntityKind;

    /// Primary key
    fn id(&self) -> i64;

    /// Owning user
    fn user_id(&self) -> UserId;

    /// Change the owning user
    fn set_user_id(&mut self, user_id: UserId);

    /// Natural key (without the owner column)
    fn natural_key(&self) -> Self::Key;

    /// Last-activity timestamp for temporally resolved kinds
    fn updated_at(&self) -> Option<i64> {
        None
    }

    /// Take the resolved value from a newer twin row
    fn adopt_value(&mut self, _newer: &Self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_order_covers_every_kind_once() {
        let unique: std::collections::HashSet<_> = EntityKind::MERGE_ORDER.iter().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(EntityKind::MERGE_ORDER[0], EntityKind::WatchProgress);
        assert_eq!(EntityKind::MERGE_ORDER[4], EntityKind::CommentLike);
    }

    #[test]
    fn test_policies() {
        assert_eq!(EntityKind::WatchProgress.policy(), ConflictPolicy::Temporal);
        assert_eq!(EntityKind::EpisodeReaction.policy(), ConflictPolicy::Temporal);
        assert_eq!(EntityKind::Favorite.policy(), ConflictPolicy::FirstClaim);
        assert_eq!(EntityKind::CommentLike.policy(), ConflictPolicy::FirstClaim);
        assert_eq!(EntityKind::Comment.policy(), ConflictPolicy::Reassign);
    }
}
