//! Repository contract shared by every user-owned entity type

#![allow(clippy::cast_sign_loss)] // COUNT(*) is never negative

use crate::error::{Error, Result};
use crate::models::{EntityKind, OwnedRow, UserId};
use rusqlite::{params, Connection};

/// Storage operations a merge needs for one user-owned entity type.
///
/// The per-row methods back the row-wise executor; `adopt_newer`,
/// `delete_collisions` and `reassign_all` are single set-based statements
/// backing the batch executor. In the set-based methods `from` is the
/// guest and `into` the target.
pub trait OwnedRepository {
    /// Row type stored by this repository
    type Row: OwnedRow;

    /// Insert a row, returning it with its assigned id
    fn insert(&self, row: &Self::Row) -> Result<Self::Row>;

    /// All rows owned by a user, in id order
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Self::Row>>;

    /// Number of rows owned by a user
    fn count_for_user(&self, user_id: UserId) -> Result<u64>;

    /// The row a user owns for a natural key, if any
    fn find_by_key(
        &self,
        user_id: UserId,
        key: &<Self::Row as OwnedRow>::Key,
    ) -> Result<Option<Self::Row>>;

    /// Persist the owner and resolved value(s) of an existing row
    fn save(&self, row: &Self::Row) -> Result<()>;

    /// Delete a row by id
    fn delete(&self, id: i64) -> Result<()>;

    /// Copy newer guest values onto colliding target rows
    fn adopt_newer(&self, _from: UserId, _into: UserId) -> Result<usize> {
        Ok(0)
    }

    /// Delete guest rows whose natural key the target already owns
    fn delete_collisions(&self, from: UserId, into: UserId) -> Result<usize>;

    /// Move every remaining guest row to the target
    fn reassign_all(&self, from: UserId, into: UserId) -> Result<usize>;
}

/// Count rows of `kind` owned by `user_id`
pub(crate) fn count_owned(conn: &Connection, kind: EntityKind, user_id: UserId) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?1", kind.table());
    let count: i64 = conn.query_row(&sql, params![user_id], |row| row.get(0))?;
    Ok(count as u64)
}

/// Bulk-reassign rows of `kind` from one owner to another
pub(crate) fn reassign_owned(
    conn: &Connection,
    kind: EntityKind,
    from: UserId,
    into: UserId,
) -> Result<usize> {
    let sql = format!("UPDATE {} SET user_id = ?2 WHERE user_id = ?1", kind.table());
    Ok(conn.execute(&sql, params![from, into])?)
}

/// Delete one row of `kind` by id
pub(crate) fn delete_owned(conn: &Connection, kind: EntityKind, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
    let rows = conn.execute(&sql, params![id])?;
    if rows == 0 {
        return Err(Error::NotFound(format!("{kind} row {id}")));
    }
    Ok(())
}

/// Fail with `NotFound` when an update touched no row
pub(crate) fn expect_updated(rows: usize, kind: EntityKind, id: i64) -> Result<()> {
    if rows == 0 {
        return Err(Error::NotFound(format!("{kind} row {id}")));
    }
    Ok(())
}
