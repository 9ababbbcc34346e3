//! Watch progress model

use serde::{Deserialize, Serialize};

use super::{EntityKind, OwnedRow, UserId};

/// Playback position of one user on one episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProgress {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: UserId,
    /// Episode being watched
    pub episode_id: i64,
    /// Second at which playback stopped
    pub stop_at_second: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl WatchProgress {
    /// Build an unsaved row; `id` is assigned on insert
    #[must_use]
    pub const fn new(
        user_id: UserId,
        episode_id: i64,
        stop_at_second: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            episode_id,
            stop_at_second,
            updated_at,
        }
    }
}

impl OwnedRow for WatchProgress {
    type Key = i64;

    const KIND: EntityKind = EntityKind::WatchProgress;

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
        self.episode_id
    }

    fn updated_at(&self) -> Option<i64> {
        Some(self.updated_at)
    }

    fn adopt_value(&mut self, newer: &Self) {
        self.stop_at_second = newer.stop_at_second;
        self.updated_at = newer.updated_at;
    }
}
