//! Guest-to-user account merge.
//!
//! A merge folds every row a guest identity owns into a registered target
//! identity inside one `SQLite` transaction, then revokes the guest's
//! sessions and deletes the guest. Two interchangeable executors implement
//! the per-entity step: [`RowWiseExecutor`] walks guest rows one by one and
//! [`BatchExecutor`] issues three set-based statements per entity kind. Both
//! leave the same end state and report the same counters.

mod batch;
mod executor;
mod locks;
mod orchestrator;
mod progress;
mod queue;
mod resolver;
mod row_wise;

pub use batch::BatchExecutor;
pub use executor::{MergeExecutor, MergeStrategy};
pub use locks::{GuestLockGuard, GuestLocks};
pub use orchestrator::{merge_preview, AccountMerger};
pub use progress::{MergeProgress, MergeStage};
pub use queue::{JobStatus, MergeJob, MergeQueue, MergeTicket};
pub use resolver::{resolve, Resolution};
pub use row_wise::RowWiseExecutor;

use serde::{Deserialize, Serialize};

use crate::models::EntityKind;

/// What happened to one entity kind's guest rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityOutcome {
    /// Guest rows now owned by the target
    pub migrated: u64,
    /// Guest rows dropped because the target already had the natural key
    pub discarded: u64,
}

/// Counters returned by a successful merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub watch_progress: u64,
    pub favorites: u64,
    pub episode_reactions: u64,
    pub comments: u64,
    pub comment_likes: u64,
    pub deleted_duplicates: u64,
    pub duration_ms: u64,
}

impl MergeStats {
    /// Fold one entity kind's outcome into the totals
    pub fn record(&mut self, kind: EntityKind, outcome: EntityOutcome) {
        let slot = match kind {
            EntityKind::WatchProgress => &mut self.watch_progress,
            EntityKind::Favorite => &mut self.favorites,
            EntityKind::EpisodeReaction => &mut self.episode_reactions,
            EntityKind::Comment => &mut self.comments,
            EntityKind::CommentLike => &mut self.comment_likes,
        };
        *slot += outcome.migrated;
        self.deleted_duplicates += outcome.discarded;
    }

    /// Rows moved to the target across every kind
    pub const fn migrated_total(&self) -> u64 {
        self.watch_progress
            + self.favorites
            + self.episode_reactions
            + self.comments
            + self.comment_likes
    }
}

/// Read-only count of the rows a guest owns, per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePreview {
    pub watch_progress: u64,
    pub favorites: u64,
    pub episode_reactions: u64,
    pub comments: u64,
    pub comment_likes: u64,
    pub total: u64,
}
