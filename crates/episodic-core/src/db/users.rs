//! User and session repositories

use crate::error::Result;
use crate::models::{generate_guest_token, RefreshToken, User, UserId};
use crate::util::unix_millis_now;
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for user storage operations
pub trait UserRepository {
    /// Create a guest identity with a fresh guest token
    fn create_guest(&self, nickname: &str) -> Result<User>;

    /// Create a registered identity
    fn create_registered(&self, nickname: &str) -> Result<User>;

    /// Get a user by ID
    fn get(&self, id: UserId) -> Result<Option<User>>;

    /// Hard delete a user, returning the number of rows removed
    fn delete(&self, id: UserId) -> Result<usize>;
}

/// `SQLite` implementation of `UserRepository`
pub struct SqliteUserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteUserRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn insert(&self, nickname: &str, guest_token: Option<String>) -> Result<User> {
        let created_at = unix_millis_now();
        let is_guest = guest_token.is_some();
        self.conn.execute(
            "INSERT INTO users (nickname, is_guest, guest_token, is_active, created_at)
             VALUES (?1, ?2, ?3, 1, ?4)",
            params![nickname, is_guest, guest_token, created_at],
        )?;

        Ok(User {
            id: UserId::new(self.conn.last_insert_rowid()),
            nickname: nickname.to_string(),
            is_guest,
            guest_token,
            is_active: true,
            created_at,
        })
    }

    /// Parse a user from a database row
    fn parse_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            nickname: row.get(1)?,
            is_guest: row.get(2)?,
            guest_token: row.get(3)?,
            is_active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_guest(&self, nickname: &str) -> Result<User> {
        self.insert(nickname, Some(generate_guest_token()))
    }

    fn create_registered(&self, nickname: &str) -> Result<User> {
        self.insert(nickname, None)
    }

    fn get(&self, id: UserId) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, nickname, is_guest, guest_token, is_active, created_at
                 FROM users WHERE id = ?1",
                params![id],
                Self::parse_user,
            )
            .optional()?;
        Ok(user)
    }

    fn delete(&self, id: UserId) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows)
    }
}

/// Trait for refresh token (session) storage operations
pub trait RefreshTokenRepository {
    /// Issue a new refresh token for a user
    fn issue(&self, user_id: UserId, device_info: Option<&str>, expires_at: i64)
        -> Result<RefreshToken>;

    /// List a user's tokens, oldest first
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<RefreshToken>>;

    /// Revoke every token of a user, returning the number removed
    fn delete_for_user(&self, user_id: UserId) -> Result<usize>;
}

/// `SQLite` implementation of `RefreshTokenRepository`
pub struct SqliteRefreshTokenRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRefreshTokenRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl RefreshTokenRepository for SqliteRefreshTokenRepository<'_> {
    fn issue(
        &self,
        user_id: UserId,
        device_info: Option<&str>,
        expires_at: i64,
    ) -> Result<RefreshToken> {
        let token = uuid::Uuid::now_v7().simple().to_string();
        let created_at = unix_millis_now();
        self.conn.execute(
            "INSERT INTO refresh_tokens (user_id, token, device_info, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, token, device_info, expires_at, created_at],
        )?;

        Ok(RefreshToken {
            id: self.conn.last_insert_rowid(),
            user_id,
            token,
            device_info: device_info.map(str::to_string),
            expires_at,
            created_at,
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<RefreshToken>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, token, device_info, expires_at, created_at
             FROM refresh_tokens WHERE user_id = ?1 ORDER BY id",
        )?;

        let tokens = stmt
            .query_map(params![user_id], |row| {
                Ok(RefreshToken {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    token: row.get(2)?,
                    device_info: row.get(3)?,
                    expires_at: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tokens)
    }

    fn delete_for_user(&self, user_id: UserId) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM refresh_tokens WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(rows)
    }
}
