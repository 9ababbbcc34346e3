//! Comment and comment-like repositories

use crate::error::Result;
use crate::models::{Comment, CommentLike, EntityKind, UserId};
use rusqlite::{params, Connection, OptionalExtension};

use super::owned::{count_owned, delete_owned, expect_updated, reassign_owned, OwnedRepository};

/// `SQLite` repository for `comments`
///
/// Comments have no per-user natural key, so nothing ever collides.
pub struct SqliteCommentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCommentRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get a comment by ID
    pub fn get(&self, id: i64) -> Result<Option<Comment>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, episode_id, content, created_at FROM comments WHERE id = ?1",
                params![id],
                Self::parse_row,
            )
            .optional()?;
        Ok(row)
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: row.get(0)?,
            user_id: row.get(1)?,
            episode_id: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl OwnedRepository for SqliteCommentRepository<'_> {
    type Row = Comment;

    fn insert(&self, row: &Comment) -> Result<Comment> {
        self.conn.execute(
            "INSERT INTO comments (user_id, episode_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![row.user_id, row.episode_id, row.content, row.created_at],
        )?;
        Ok(Comment {
            id: self.conn.last_insert_rowid(),
            ..row.clone()
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, episode_id, content, created_at
             FROM comments WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count_for_user(&self, user_id: UserId) -> Result<u64> {
        count_owned(self.conn, EntityKind::Comment, user_id)
    }

    fn find_by_key(&self, _user_id: UserId, _key: &()) -> Result<Option<Comment>> {
        Ok(None)
    }

    fn save(&self, row: &Comment) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE comments SET user_id = ?1 WHERE id = ?2",
            params![row.user_id, row.id],
        )?;
        expect_updated(rows, EntityKind::Comment, row.id)
    }

    fn delete(&self, id: i64) -> Result<()> {
        delete_owned(self.conn, EntityKind::Comment, id)
    }

    fn delete_collisions(&self, _from: UserId, _into: UserId) -> Result<usize> {
        Ok(0)
    }

    fn reassign_all(&self, from: UserId, into: UserId) -> Result<usize> {
        reassign_owned(self.conn, EntityKind::Comment, from, into)
    }
}

/// `SQLite` repository for `comment_likes`
pub struct SqliteCommentLikeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCommentLikeRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentLike> {
        Ok(CommentLike {
            id: row.get(0)?,
            user_id: row.get(1)?,
            comment_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl OwnedRepository for SqliteCommentLikeRepository<'_> {
    type Row = CommentLike;

    fn insert(&self, row: &CommentLike) -> Result<CommentLike> {
        self.conn.execute(
            "INSERT INTO comment_likes (user_id, comment_id, created_at) VALUES (?1, ?2, ?3)",
            params![row.user_id, row.comment_id, row.created_at],
        )?;
        Ok(CommentLike {
            id: self.conn.last_insert_rowid(),
            ..row.clone()
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<CommentLike>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, comment_id, created_at
             FROM comment_likes WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count_for_user(&self, user_id: UserId) -> Result<u64> {
        count_owned(self.conn, EntityKind::CommentLike, user_id)
    }

    fn find_by_key(&self, user_id: UserId, comment_id: &i64) -> Result<Option<CommentLike>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, comment_id, created_at
                 FROM comment_likes WHERE user_id = ?1 AND comment_id = ?2",
                params![user_id, comment_id],
                Self::parse_row,
            )
            .optional()?;
        Ok(row)
    }

    fn save(&self, row: &CommentLike) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE comment_likes SET user_id = ?1 WHERE id = ?2",
            params![row.user_id, row.id],
        )?;
        expect_updated(rows, EntityKind::CommentLike, row.id)
    }

    fn delete(&self, id: i64) -> Result<()> {
        delete_owned(self.conn, EntityKind::CommentLike, id)
    }

    fn delete_collisions(&self, from: UserId, into: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM comment_likes
             WHERE user_id = ?1
               AND comment_id IN (SELECT comment_id FROM comment_likes WHERE user_id = ?2)",
            params![from, into],
        )?;
        Ok(rows)
    }

    fn reassign_all(&self, from: UserId, into: UserId) -> Result<usize> {
        reassign_owned(self.conn, EntityKind::CommentLike, from, into)
    }
}
