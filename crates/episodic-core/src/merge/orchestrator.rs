//! Merge orchestration: preconditions, the transaction, identity cleanup

use std::time::Instant;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use super::{GuestLocks, MergePreview, MergeProgress, MergeStats, MergeStrategy};
use crate::db::{
    Database, OwnedRepository, RefreshTokenRepository, SqliteCommentLikeRepository,
    SqliteCommentRepository, SqliteEpisodeReactionRepository, SqliteFavoriteRepository,
    SqliteRefreshTokenRepository, SqliteUserRepository, SqliteWatchProgressRepository,
    UserRepository,
};
use crate::error::{Error, Result};
use crate::models::{EntityKind, UserId};

/// Runs guest-to-user merges with a fixed executor strategy.
///
/// Merges of the same guest are serialized through [`GuestLocks`]; share one
/// registry (via [`AccountMerger::with_locks`]) between every merger that
/// can touch the same database.
#[derive(Debug, Clone, Default)]
pub struct AccountMerger {
    strategy: MergeStrategy,
    locks: GuestLocks,
}

impl AccountMerger {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self::with_locks(strategy, GuestLocks::new())
    }

    pub const fn with_locks(strategy: MergeStrategy, locks: GuestLocks) -> Self {
        Self { strategy, locks }
    }

    pub const fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub const fn locks(&self) -> &GuestLocks {
        &self.locks
    }

    /// Whether `guest` exists and carries the guest flag
    pub fn can_merge(db: &Database, guest: UserId) -> Result<bool> {
        let user = SqliteUserRepository::new(db.connection()).get(guest)?;
        Ok(user.is_some_and(|user| user.is_guest))
    }

    /// Merge `guest` into `target` and delete the guest
    pub fn merge_guest_to_user(
        &self,
        db: &mut Database,
        guest: UserId,
        target: UserId,
    ) -> Result<MergeStats> {
        self.merge_with_progress(db, guest, target, |_| {})
    }

    /// Like [`Self::merge_guest_to_user`], reporting each completed step
    pub fn merge_with_progress<F>(
        &self,
        db: &mut Database,
        guest: UserId,
        target: UserId,
        mut on_progress: F,
    ) -> Result<MergeStats>
    where
        F: FnMut(MergeProgress),
    {
        if let Err(error) = check_preconditions(db.connection(), guest, target) {
            tracing::warn!(%guest, %target, %error, "Merge refused");
            return Err(error);
        }
        let _guard = self.locks.try_acquire(guest).inspect_err(|error| {
            tracing::warn!(%guest, %target, %error, "Merge refused");
        })?;

        let started = Instant::now();
        tracing::info!(%guest, %target, strategy = %self.strategy, "Merging guest account");

        match self.run(db.connection_mut(), guest, target, &mut on_progress) {
            Ok(mut stats) => {
                stats.duration_ms =
                    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                tracing::info!(
                    %guest,
                    %target,
                    migrated = stats.migrated_total(),
                    deleted_duplicates = stats.deleted_duplicates,
                    duration_ms = stats.duration_ms,
                    "Guest account merged"
                );
                Ok(stats)
            }
            Err(error) => {
                tracing::warn!(%guest, %target, %error, "Merge rolled back");
                Err(error)
            }
        }
    }

    fn run(
        &self,
        conn: &mut Connection,
        guest: UserId,
        target: UserId,
        on_progress: &mut dyn FnMut(MergeProgress),
    ) -> Result<MergeStats> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        // A concurrent merge may have committed between the checks above and
        // taking the write lock.
        check_preconditions(&tx, guest, target)?;
        on_progress(MergeProgress::STARTED);

        let executor = self.strategy.executor();
        let mut stats = MergeStats::default();
        for (index, kind) in EntityKind::MERGE_ORDER.into_iter().enumerate() {
            let outcome = executor.merge_kind(&tx, kind, guest, target)?;
            tracing::debug!(
                %kind,
                executor = executor.name(),
                migrated = outcome.migrated,
                discarded = outcome.discarded,
                "Merged entity kind"
            );
            stats.record(kind, outcome);
            on_progress(MergeProgress::entity(index, kind));
        }

        cleanup_identity(&tx, guest)?;
        on_progress(MergeProgress::CLEANUP);

        tx.commit()?;
        on_progress(MergeProgress::COMMITTED);
        Ok(stats)
    }
}

/// Read-only per-kind counts of the rows `guest` owns
pub fn merge_preview(db: &Database, guest: UserId) -> Result<MergePreview> {
    let conn = db.connection();
    let mut preview = MergePreview {
        watch_progress: SqliteWatchProgressRepository::new(conn).count_for_user(guest)?,
        favorites: SqliteFavoriteRepository::new(conn).count_for_user(guest)?,
        episode_reactions: SqliteEpisodeReactionRepository::new(conn).count_for_user(guest)?,
        comments: SqliteCommentRepository::new(conn).count_for_user(guest)?,
        comment_likes: SqliteCommentLikeRepository::new(conn).count_for_user(guest)?,
        total: 0,
    };
    preview.total = preview.watch_progress
        + preview.favorites
        + preview.episode_reactions
        + preview.comments
        + preview.comment_likes;
    Ok(preview)
}

fn check_preconditions(conn: &Connection, guest: UserId, target: UserId) -> Result<()> {
    if guest == target {
        return Err(Error::SameIdentity(guest));
    }

    let users = SqliteUserRepository::new(conn);
    match users.get(guest)? {
        None => return Err(Error::GuestNotFound(guest)),
        Some(user) if !user.is_guest => return Err(Error::NotAGuest(guest)),
        Some(_) => {}
    }
    if users.get(target)?.is_none() {
        return Err(Error::TargetNotFound(target));
    }
    Ok(())
}

/// Revoke the guest's sessions, then delete the guest row itself.
///
/// The user delete must remove exactly one row; foreign keys reject it while
/// any owned row still references the guest.
fn cleanup_identity(tx: &Transaction<'_>, guest: UserId) -> Result<()> {
    let revoked = SqliteRefreshTokenRepository::new(tx).delete_for_user(guest)?;
    let removed = SqliteUserRepository::new(tx).delete(guest)?;
    if removed != 1 {
        return Err(Error::IdentityCleanup(guest));
    }
    tracing::debug!(%guest, revoked, "Guest identity removed");
    Ok(())
}
