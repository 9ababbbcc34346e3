//! Executor contract and strategy selection

use std::fmt;
use std::str::FromStr;

use rusqlite::Transaction;
use serde::{Deserialize, Serialize};

use super::{BatchExecutor, EntityOutcome, RowWiseExecutor};
use crate::db::{
    OwnedRepository, SqliteCommentLikeRepository, SqliteCommentRepository,
    SqliteEpisodeReactionRepository, SqliteFavoriteRepository, SqliteWatchProgressRepository,
};
use crate::error::{Error, Result};
use crate::models::{EntityKind, UserId};

/// Moves one entity kind's guest rows into the target inside a transaction.
///
/// Implementations must agree on the end state and on the returned
/// [`EntityOutcome`] for every input.
pub trait MergeExecutor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Merge every `kind` row owned by `guest` into `target`
    fn merge_kind(
        &self,
        tx: &Transaction<'_>,
        kind: EntityKind,
        guest: UserId,
        target: UserId,
    ) -> Result<EntityOutcome>;
}

/// Per-repository half of an executor, generic over the row type
pub(crate) trait EntityMerge {
    fn merge_rows<R: OwnedRepository>(
        &self,
        repo: &R,
        guest: UserId,
        target: UserId,
    ) -> Result<EntityOutcome>;
}

/// Run `merger` against the repository backing `kind`
pub(crate) fn dispatch<M: EntityMerge>(
    merger: &M,
    tx: &Transaction<'_>,
    kind: EntityKind,
    guest: UserId,
    target: UserId,
) -> Result<EntityOutcome> {
    match kind {
        EntityKind::WatchProgress => {
            merger.merge_rows(&SqliteWatchProgressRepository::new(tx), guest, target)
        }
        EntityKind::Favorite => merger.merge_rows(&SqliteFavoriteRepository::new(tx), guest, target),
        EntityKind::EpisodeReaction => {
            merger.merge_rows(&SqliteEpisodeReactionRepository::new(tx), guest, target)
        }
        EntityKind::Comment => merger.merge_rows(&SqliteCommentRepository::new(tx), guest, target),
        EntityKind::CommentLike => {
            merger.merge_rows(&SqliteCommentLikeRepository::new(tx), guest, target)
        }
    }
}

/// Which executor a merge runs with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    RowWise,
    #[default]
    Batch,
}

impl MergeStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RowWise => "row-wise",
            Self::Batch => "batch",
        }
    }

    /// The executor implementing this strategy
    pub fn executor(self) -> &'static dyn MergeExecutor {
        match self {
            Self::RowWise => &RowWiseExecutor,
            Self::Batch => &BatchExecutor,
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "row-wise" | "row_wise" | "rowwise" => Ok(Self::RowWise),
            "batch" => Ok(Self::Batch),
            other => Err(Error::InvalidInput(format!(
                "unknown merge strategy '{other}' (expected 'row-wise' or 'batch')"
            ))),
        }
    }
}
