//! Favorite repository

use crate::error::Result;
use crate::models::{EntityKind, Favorite, FavoriteKey, UserId};
use rusqlite::{params, Connection, OptionalExtension};

use super::owned::{count_owned, delete_owned, expect_updated, reassign_owned, OwnedRepository};

/// `SQLite` repository for `favorites`
///
/// A missing `episode_id` is part of the key. Lookups compare it with `IS`,
/// so `NULL` only matches `NULL`; the unique index folds it to `-1`.
pub struct SqliteFavoriteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteFavoriteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Favorite> {
        Ok(Favorite {
            id: row.get(0)?,
            user_id: row.get(1)?,
            series_id: row.get(2)?,
            favorite_type: row.get(3)?,
            episode_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl OwnedRepository for SqliteFavoriteRepository<'_> {
    type Row = Favorite;

    fn insert(&self, row: &Favorite) -> Result<Favorite> {
        self.conn.execute(
            "INSERT INTO favorites (user_id, series_id, favorite_type, episode_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.user_id,
                row.series_id,
                row.favorite_type,
                row.episode_id,
                row.created_at
            ],
        )?;
        Ok(Favorite {
            id: self.conn.last_insert_rowid(),
            ..row.clone()
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Favorite>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, series_id, favorite_type, episode_id, created_at
             FROM favorites WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count_for_user(&self, user_id: UserId) -> Result<u64> {
        count_owned(self.conn, EntityKind::Favorite, user_id)
    }

    fn find_by_key(&self, user_id: UserId, key: &FavoriteKey) -> Result<Option<Favorite>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, series_id, favorite_type, episode_id, created_at
                 FROM favorites
                 WHERE user_id = ?1
                   AND series_id = ?2
                   AND favorite_type = ?3
                   AND episode_id IS ?4",
                params![user_id, key.series_id, key.favorite_type, key.episode_id],
                Self::parse_row,
            )
            .optional()?;
        Ok(row)
    }

    fn save(&self, row: &Favorite) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE favorites SET user_id = ?1 WHERE id = ?2",
            params![row.user_id, row.id],
        )?;
        expect_updated(rows, EntityKind::Favorite, row.id)
    }

    fn delete(&self, id: i64) -> Result<()> {
        delete_owned(self.conn, EntityKind::Favorite, id)
    }

    fn delete_collisions(&self, from: UserId, into: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM favorites
             WHERE user_id = ?1
               AND EXISTS (
                   SELECT 1 FROM favorites AS t
                   WHERE t.user_id = ?2
                     AND t.series_id = favorites.series_id
                     AND t.favorite_type = favorites.favorite_type
                     AND t.episode_id IS favorites.episode_id
               )",
            params![from, into],
        )?;
        Ok(rows)
    }

    fn reassign_all(&self, from: UserId, into: UserId) -> Result<usize> {
        reassign_owned(self.conn, EntityKind::Favorite, from, into)
    }
}
