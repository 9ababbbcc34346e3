//! Watch progress and episode reaction repositories
//!
//! Both entity types are keyed on `(user_id, episode_id)` and resolved by
//! `updated_at` when a guest row collides with a target row.

use crate::error::Result;
use crate::models::{EntityKind, EpisodeReaction, UserId, WatchProgress};
use rusqlite::{params, Connection, OptionalExtension};

use super::owned::{count_owned, delete_owned, expect_updated, reassign_owned, OwnedRepository};

/// `SQLite` repository for `watch_progress`
pub struct SqliteWatchProgressRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteWatchProgressRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WatchProgress> {
        Ok(WatchProgress {
            id: row.get(0)?,
            user_id: row.get(1)?,
            episode_id: row.get(2)?,
            stop_at_second: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl OwnedRepository for SqliteWatchProgressRepository<'_> {
    type Row = WatchProgress;

    fn insert(&self, row: &WatchProgress) -> Result<WatchProgress> {
        self.conn.execute(
            "INSERT INTO watch_progress (user_id, episode_id, stop_at_second, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![row.user_id, row.episode_id, row.stop_at_second, row.updated_at],
        )?;
        Ok(WatchProgress {
            id: self.conn.last_insert_rowid(),
            ..row.clone()
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<WatchProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, episode_id, stop_at_second, updated_at
             FROM watch_progress WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count_for_user(&self, user_id: UserId) -> Result<u64> {
        count_owned(self.conn, EntityKind::WatchProgress, user_id)
    }

    fn find_by_key(&self, user_id: UserId, episode_id: &i64) -> Result<Option<WatchProgress>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, episode_id, stop_at_second, updated_at
                 FROM watch_progress WHERE user_id = ?1 AND episode_id = ?2",
                params![user_id, episode_id],
                Self::parse_row,
            )
            .optional()?;
        Ok(row)
    }

    fn save(&self, row: &WatchProgress) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE watch_progress SET user_id = ?1, stop_at_second = ?2, updated_at = ?3
             WHERE id = ?4",
            params![row.user_id, row.stop_at_second, row.updated_at, row.id],
        )?;
        expect_updated(rows, EntityKind::WatchProgress, row.id)
    }

    fn delete(&self, id: i64) -> Result<()> {
        delete_owned(self.conn, EntityKind::WatchProgress, id)
    }

    fn adopt_newer(&self, from: UserId, into: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "UPDATE watch_progress AS t
             SET stop_at_second = g.stop_at_second, updated_at = g.updated_at
             FROM watch_progress AS g
             WHERE g.user_id = ?1
               AND t.user_id = ?2
               AND g.episode_id = t.episode_id
               AND g.updated_at > t.updated_at",
            params![from, into],
        )?;
        Ok(rows)
    }

    fn delete_collisions(&self, from: UserId, into: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM watch_progress
             WHERE user_id = ?1
               AND episode_id IN (SELECT episode_id FROM watch_progress WHERE user_id = ?2)",
            params![from, into],
        )?;
        Ok(rows)
    }

    fn reassign_all(&self, from: UserId, into: UserId) -> Result<usize> {
        reassign_owned(self.conn, EntityKind::WatchProgress, from, into)
    }
}

/// `SQLite` repository for `episode_reactions`
pub struct SqliteEpisodeReactionRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteEpisodeReactionRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EpisodeReaction> {
        Ok(EpisodeReaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            episode_id: row.get(2)?,
            reaction_type: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl OwnedRepository for SqliteEpisodeReactionRepository<'_> {
    type Row = EpisodeReaction;

    fn insert(&self, row: &EpisodeReaction) -> Result<EpisodeReaction> {
        self.conn.execute(
            "INSERT INTO episode_reactions (user_id, episode_id, reaction_type, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![row.user_id, row.episode_id, row.reaction_type, row.updated_at],
        )?;
        Ok(EpisodeReaction {
            id: self.conn.last_insert_rowid(),
            ..row.clone()
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<EpisodeReaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, episode_id, reaction_type, updated_at
             FROM episode_reactions WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count_for_user(&self, user_id: UserId) -> Result<u64> {
        count_owned(self.conn, EntityKind::EpisodeReaction, user_id)
    }

    fn find_by_key(&self, user_id: UserId, episode_id: &i64) -> Result<Option<EpisodeReaction>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, episode_id, reaction_type, updated_at
                 FROM episode_reactions WHERE user_id = ?1 AND episode_id = ?2",
                params![user_id, episode_id],
                Self::parse_row,
            )
            .optional()?;
        Ok(row)
    }

    fn save(&self, row: &EpisodeReaction) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE episode_reactions SET user_id = ?1, reaction_type = ?2, updated_at = ?3
             WHERE id = ?4",
            params![row.user_id, row.reaction_type, row.updated_at, row.id],
        )?;
        expect_updated(rows, EntityKind::EpisodeReaction, row.id)
    }

    fn delete(&self, id: i64) -> Result<()> {
        delete_owned(self.conn, EntityKind::EpisodeReaction, id)
    }

    fn adopt_newer(&self, from: UserId, into: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "UPDATE episode_reactions AS t
             SET reaction_type = g.reaction_type, updated_at = g.updated_at
             FROM episode_reactions AS g
             WHERE g.user_id = ?1
               AND t.user_id = ?2
               AND g.episode_id = t.episode_id
               AND g.updated_at > t.updated_at",
            params![from, into],
        )?;
        Ok(rows)
    }

    fn delete_collisions(&self, from: UserId, into: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM episode_reactions
             WHERE user_id = ?1
               AND episode_id IN (SELECT episode_id FROM episode_reactions WHERE user_id = ?2)",
            params![from, into],
        )?;
        Ok(rows)
    }

    fn reassign_all(&self, from: UserId, into: UserId) -> Result<usize> {
        reassign_owned(self.conn, EntityKind::EpisodeReaction, from, into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SqliteUserRepository, UserRepository};
    use crate::models::ReactionType;

    fn setup() -> (Database, UserId, UserId) {
        let db = Database::open_in_memory().unwrap();
        let users = SqliteUserRepository::new(db.connection());
        let guest = users.create_guest("guest").unwrap().id;
        let target = users.create_registered("target").unwrap().id;
        (db, guest, target)
    }

    #[test]
    fn test_insert_and_find_by_key() {
        let (db, guest, _) = setup();
        let repo = SqliteWatchProgressRepository::new(db.connection());

        let row = repo.insert(&WatchProgress::new(guest, 10, 120, 2_000)).unwrap();
        assert!(row.id > 0);

        let found = repo.find_by_key(guest, &10).unwrap().unwrap();
        assert_eq!(found, row);
        assert!(repo.find_by_key(guest, &11).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_natural_key_is_rejected() {
        let (db, guest, _) = setup();
        let repo = SqliteWatchProgressRepository::new(db.connection());

        repo.insert(&WatchProgress::new(guest, 10, 1, 1)).unwrap();
        assert!(repo.insert(&WatchProgress::new(guest, 10, 2, 2)).is_err());
    }

    #[test]
    fn test_adopt_newer_only_touches_older_target_rows() {
        let (db, guest, target) = setup();
        let repo = SqliteWatchProgressRepository::new(db.connection());

        repo.insert(&WatchProgress::new(guest, 10, 120, 2_000)).unwrap();
        repo.insert(&WatchProgress::new(guest, 11, 5, 1_000)).unwrap();
        repo.insert(&WatchProgress::new(target, 10, 30, 1_000)).unwrap();
        repo.insert(&WatchProgress::new(target, 11, 90, 3_000)).unwrap();

        assert_eq!(repo.adopt_newer(guest, target).unwrap(), 1);

        let ep10 = repo.find_by_key(target, &10).unwrap().unwrap();
        assert_eq!((ep10.stop_at_second, ep10.updated_at), (120, 2_000));
        let ep11 = repo.find_by_key(target, &11).unwrap().unwrap();
        assert_eq!((ep11.stop_at_second, ep11.updated_at), (90, 3_000));
    }

    #[test]
    fn test_delete_collisions_then_reassign() {
        let (db, guest, target) = setup();
        let repo = SqliteEpisodeReactionRepository::new(db.connection());

        repo.insert(&EpisodeReaction::new(guest, 1, ReactionType::Like, 10))
            .unwrap();
        repo.insert(&EpisodeReaction::new(guest, 2, ReactionType::Dislike, 10))
            .unwrap();
        repo.insert(&EpisodeReaction::new(target, 1, ReactionType::Dislike, 5))
            .unwrap();

        assert_eq!(repo.delete_collisions(guest, target).unwrap(), 1);
        assert_eq!(repo.reassign_all(guest, target).unwrap(), 1);
        assert_eq!(repo.count_for_user(guest).unwrap(), 0);
        assert_eq!(repo.count_for_user(target).unwrap(), 2);
    }

    #[test]
    fn test_save_and_delete_missing_row_is_not_found() {
        let (db, guest, _) = setup();
        let repo = SqliteEpisodeReactionRepository::new(db.connection());

        let mut ghost = EpisodeReaction::new(guest, 1, ReactionType::Like, 1);
        ghost.id = 999;
        assert!(matches!(
            repo.save(&ghost),
            Err(crate::Error::NotFound(_))
        ));
        assert!(matches!(repo.delete(999), Err(crate::Error::NotFound(_))));
    }
}
