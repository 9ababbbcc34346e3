//! Merge progress reporting

use serde::Serialize;

use crate::models::EntityKind;

/// Step a merge has just completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "kind", rename_all = "snake_case")]
pub enum MergeStage {
    Started,
    Entity(EntityKind),
    Cleanup,
    Committed,
}

/// Snapshot handed to a progress observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeProgress {
    pub percent: u8,
    pub stage: MergeStage,
}

impl MergeProgress {
    pub const STARTED: Self = Self {
        percent: 10,
        stage: MergeStage::Started,
    };

    pub const CLEANUP: Self = Self {
        percent: 95,
        stage: MergeStage::Cleanup,
    };

    pub const COMMITTED: Self = Self {
        percent: 100,
        stage: MergeStage::Committed,
    };

    /// Progress after the `index`-th entity kind of the merge order finished
    #[allow(clippy::cast_possible_truncation)] // index < 5
    pub const fn entity(index: usize, kind: EntityKind) -> Self {
        Self {
            percent: 10 + 16 * (index as u8 + 1),
            stage: MergeStage::Entity(kind),
        }
    }
}
