//! Set-based executor: three statements per entity kind

use rusqlite::Transaction;

use super::executor::{dispatch, EntityMerge};
use super::{EntityOutcome, MergeExecutor};
use crate::db::OwnedRepository;
use crate::error::Result;
use crate::models::{EntityKind, UserId};

/// Resolves collisions in place, deletes the colliding guest rows, then
/// moves whatever is left in one `UPDATE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchExecutor;

impl EntityMerge for BatchExecutor {
    fn merge_rows<R: OwnedRepository>(
        &self,
        repo: &R,
        guest: UserId,
        target: UserId,
    ) -> Result<EntityOutcome> {
        let adopted = repo.adopt_newer(guest, target)?;
        let discarded = repo.delete_collisions(guest, target)?;
        let migrated = repo.reassign_all(guest, target)?;
        tracing::trace!(adopted, discarded, migrated, "batch step counts");

        Ok(EntityOutcome {
            migrated: migrated as u64,
            discarded: discarded as u64,
        })
    }
}

impl MergeExecutor for BatchExecutor {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn merge_kind(
        &self,
        tx: &Transaction<'_>,
        kind: EntityKind,
        guest: UserId,
        target: UserId,
    ) -> Result<EntityOutcome> {
        dispatch(self, tx, kind, guest, target)
    }
}
