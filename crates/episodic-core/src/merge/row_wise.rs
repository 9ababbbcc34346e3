//! Reference executor: one guest row at a time

use rusqlite::Transaction;

use super::executor::{dispatch, EntityMerge};
use super::resolver::{resolve, Resolution};
use super::{EntityOutcome, MergeExecutor};
use crate::db::OwnedRepository;
use crate::error::Result;
use crate::models::{EntityKind, OwnedRow, UserId};

/// Loads every guest row, looks up the target's twin by natural key and
/// applies [`resolve`] to each pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowWiseExecutor;

impl EntityMerge for RowWiseExecutor {
    fn merge_rows<R: OwnedRepository>(
        &self,
        repo: &R,
        guest: UserId,
        target: UserId,
    ) -> Result<EntityOutcome> {
        let mut outcome = EntityOutcome::default();

        for row in repo.list_for_user(guest)? {
            let twin = repo.find_by_key(target, &row.natural_key())?;
            match resolve(&row, twin.as_ref(), target) {
                Resolution::Reassign(moved) => {
                    repo.save(&moved)?;
                    outcome.migrated += 1;
                }
                Resolution::KeepTarget { discard } => {
                    repo.delete(discard)?;
                    outcome.discarded += 1;
                }
                Resolution::AdoptGuest { updated, discard } => {
                    repo.delete(discard)?;
                    repo.save(&updated)?;
                    outcome.discarded += 1;
                }
            }
        }

        Ok(outcome)
    }
}

impl MergeExecutor for RowWiseExecutor {
    fn name(&self) -> &'static str {
        "row-wise"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SqliteUserRepository, SqliteWatchProgressRepository, UserRepository};
    use crate::models::WatchProgress;

    #[test]
    fn test_progress_rows_are_resolved_one_by_one() {
        let mut db = Database::open_in_memory().unwrap();
        let (guest, target) = {
            let users = SqliteUserRepository::new(db.connection());
            (
                users.create_guest("g").unwrap().id,
                users.create_registered("t").unwrap().id,
            )
        };
        {
            let repo = SqliteWatchProgressRepository::new(db.connection());
            repo.insert(&WatchProgress::new(guest, 1, 100, 20)).unwrap();
            repo.insert(&WatchProgress::new(guest, 2, 200, 20)).unwrap();
            repo.insert(&WatchProgress::new(guest, 3, 300, 5)).unwrap();
            repo.insert(&WatchProgress::new(target, 1, 10, 10)).unwrap();
            repo.insert(&WatchProgress::new(target, 3, 30, 10)).unwrap();
        }

        let tx = db.connection_mut().transaction().unwrap();
        let outcome = RowWiseExecutor
            .merge_kind(&tx, EntityKind::WatchProgress, guest, target)
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(
            outcome,
            EntityOutcome {
                migrated: 1,
                discarded: 2
            }
        );
        let repo = SqliteWatchProgressRepository::new(db.connection());
        let mut stops: Vec<_> = repo
            .list_for_user(target)
            .unwrap()
            .into_iter()
            .map(|row| (row.episode_id, row.stop_at_second))
            .collect();
        stops.sort_unstable();
        assert_eq!(stops, vec![(1, 100), (2, 200), (3, 30)]);
    }
}
