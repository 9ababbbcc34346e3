use std::path::PathBuf;

use clap::Parser;
use episodic_core::db::{
    Database, OwnedRepository, SqliteFavoriteRepository, SqliteUserRepository,
    SqliteWatchProgressRepository, UserRepository,
};
use episodic_core::models::{Favorite, WatchProgress};
use episodic_core::{MergeConfig, MergePreview, MergeStats, MergeStrategy, UserId};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::cli::{Cli, Commands, StrategyArg};
use crate::commands::common::{
    check_guest, format_preview_lines, format_stats_lines, merge_accounts, preview_guest,
    resolve_db_path,
};
use crate::error::CliError;

fn seeded_db() -> (TempDir, PathBuf, UserId, UserId) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("episodic.db");
    let db = Database::open(&path).unwrap();
    let users = SqliteUserRepository::new(db.connection());
    let target = users.create_registered("member").unwrap().id;
    let guest = users.create_guest("guest").unwrap().id;

    let progress = SqliteWatchProgressRepository::new(db.connection());
    progress
        .insert(&WatchProgress::new(guest, 10, 120, 2_000))
        .unwrap();
    progress
        .insert(&WatchProgress::new(target, 10, 30, 1_000))
        .unwrap();
    let favorites = SqliteFavoriteRepository::new(db.connection());
    favorites.insert(&Favorite::series(guest, 7)).unwrap();
    favorites.insert(&Favorite::series(guest, 8)).unwrap();
    favorites.insert(&Favorite::series(target, 7)).unwrap();

    (dir, path, guest, target)
}

#[test]
fn resolve_db_path_prefers_cli_argument() {
    let explicit = PathBuf::from("/tmp/explicit.db");
    assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
}

#[test]
fn parses_merge_command() {
    let cli = Cli::try_parse_from([
        "episodic",
        "--db-path",
        "/tmp/x.db",
        "merge",
        "--guest",
        "5",
        "--target",
        " 1",
        "--strategy",
        "row-wise",
        "--json",
    ])
    .unwrap();

    assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/x.db")));
    let Commands::Merge {
        guest,
        target,
        strategy,
        json,
    } = cli.command
    else {
        panic!("expected merge command");
    };
    assert_eq!((guest, target), (UserId::new(5), UserId::new(1)));
    assert_eq!(strategy, Some(StrategyArg::RowWise));
    assert_eq!(MergeStrategy::from(StrategyArg::RowWise), MergeStrategy::RowWise);
    assert!(json);
}

#[test]
fn rejects_non_numeric_user_id() {
    assert!(Cli::try_parse_from(["episodic", "preview", "--guest", "abc"]).is_err());
    assert!(Cli::try_parse_from(["episodic", "merge", "--guest", "5"]).is_err());
}

#[test]
fn missing_database_is_reported_not_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.db");

    let result = preview_guest(&path, UserId::new(1), &MergeConfig::default());
    assert!(matches!(result, Err(CliError::DatabaseMissing(_))));
    assert!(!path.exists());
}

#[test]
fn preview_then_merge_round() {
    let (_dir, path, guest, target) = seeded_db();
    let config = MergeConfig::default();

    let preview = preview_guest(&path, guest, &config).unwrap();
    assert_eq!(
        preview,
        MergePreview {
            watch_progress: 1,
            favorites: 2,
            total: 3,
            ..MergePreview::default()
        }
    );
    assert!(check_guest(&path, guest, &config).unwrap());
    assert!(!check_guest(&path, target, &config).unwrap());

    let stats = merge_accounts(&path, guest, target, &config).unwrap();
    assert_eq!(stats.favorites, 1);
    assert_eq!(stats.deleted_duplicates, 2);
    assert!(!check_guest(&path, guest, &config).unwrap());

    let err = merge_accounts(&path, guest, target, &config).unwrap_err();
    assert!(matches!(
        err,
        CliError::Core(episodic_core::Error::GuestNotFound(_))
    ));
}

#[test]
fn row_wise_strategy_from_config_is_used() {
    let (_dir, path, guest, target) = seeded_db();
    let config = MergeConfig {
        strategy: MergeStrategy::RowWise,
        ..MergeConfig::default()
    };

    let stats = merge_accounts(&path, guest, target, &config).unwrap();
    assert_eq!(stats.favorites + stats.watch_progress, 1);

    let db = Database::open(&path).unwrap();
    let progress = SqliteWatchProgressRepository::new(db.connection())
        .list_for_user(target)
        .unwrap();
    assert_eq!(progress[0].stop_at_second, 120);
}

#[test]
fn format_lines_include_counts() {
    let preview = MergePreview {
        comments: 4,
        total: 4,
        ..MergePreview::default()
    };
    let lines = format_preview_lines(UserId::new(5), &preview);
    assert_eq!(lines[0], "Guest 5 owns 4 rows");
    assert!(lines.iter().any(|line| line.contains("comments") && line.ends_with('4')));

    let stats = MergeStats {
        comment_likes: 2,
        deleted_duplicates: 1,
        duration_ms: 7,
        ..MergeStats::default()
    };
    let lines = format_stats_lines(UserId::new(5), UserId::new(1), &stats);
    assert_eq!(lines[0], "Merged guest 5 into user 1 in 7ms");
    assert!(lines.last().unwrap().ends_with('1'));
}
