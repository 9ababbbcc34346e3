use std::env;
use std::path::{Path, PathBuf};

use episodic_core::db::Database;
use episodic_core::merge::merge_preview;
use episodic_core::{AccountMerger, MergeConfig, MergePreview, MergeStats, UserId};

use crate::error::CliError;

pub const DB_PATH_ENV: &str = "EPISODIC_DB_PATH";

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("episodic")
        .join("episodic.db")
}

/// Open an existing database; maintenance commands never create one
pub fn open_database(path: &Path, config: &MergeConfig) -> Result<Database, CliError> {
    if !path.exists() {
        return Err(CliError::DatabaseMissing(path.to_path_buf()));
    }
    Ok(Database::open_with_timeout(path, config.busy_timeout())?)
}

pub fn preview_guest(
    db_path: &Path,
    guest: UserId,
    config: &MergeConfig,
) -> Result<MergePreview, CliError> {
    let db = open_database(db_path, config)?;
    Ok(merge_preview(&db, guest)?)
}

pub fn check_guest(db_path: &Path, guest: UserId, config: &MergeConfig) -> Result<bool, CliError> {
    let db = open_database(db_path, config)?;
    Ok(AccountMerger::can_merge(&db, guest)?)
}

pub fn merge_accounts(
    db_path: &Path,
    guest: UserId,
    target: UserId,
    config: &MergeConfig,
) -> Result<MergeStats, CliError> {
    let mut db = open_database(db_path, config)?;
    let merger = AccountMerger::new(config.strategy);
    Ok(merger.merge_guest_to_user(&mut db, guest, target)?)
}

pub fn format_preview_lines(guest: UserId, preview: &MergePreview) -> Vec<String> {
    vec![
        format!("Guest {guest} owns {} rows", preview.total),
        format!("  watch progress     {}", preview.watch_progress),
        format!("  favorites          {}", preview.favorites),
        format!("  episode reactions  {}", preview.episode_reactions),
        format!("  comments           {}", preview.comments),
        format!("  comment likes      {}", preview.comment_likes),
    ]
}

pub fn format_stats_lines(guest: UserId, target: UserId, stats: &MergeStats) -> Vec<String> {
    vec![
        format!(
            "Merged guest {guest} into user {target} in {}ms",
            stats.duration_ms
        ),
        format!("  watch progress     {}", stats.watch_progress),
        format!("  favorites          {}", stats.favorites),
        format!("  episode reactions  {}", stats.episode_reactions),
        format!("  comments           {}", stats.comments),
        format!("  comment likes      {}", stats.comment_likes),
        format!("  duplicates dropped {}", stats.deleted_duplicates),
    ]
}
