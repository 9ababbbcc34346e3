//! Shared fixtures for merge integration tests

#![allow(dead_code)]

use episodic_core::db::{
    Database, OwnedRepository, RefreshTokenRepository, SqliteCommentLikeRepository,
    SqliteCommentRepository, SqliteEpisodeReactionRepository, SqliteFavoriteRepository,
    SqliteRefreshTokenRepository, SqliteUserRepository, SqliteWatchProgressRepository,
    UserRepository,
};
use episodic_core::models::{
    Comment, CommentLike, EpisodeReaction, Favorite, ReactionType, WatchProgress,
};
use episodic_core::UserId;

pub const TABLES: [&str; 7] = [
    "users",
    "refresh_tokens",
    "watch_progress",
    "favorites",
    "episode_reactions",
    "comments",
    "comment_likes",
];

/// Tables with a `user_id` column
pub const OWNED_TABLES: [&str; 6] = [
    "refresh_tokens",
    "watch_progress",
    "favorites",
    "episode_reactions",
    "comments",
    "comment_likes",
];

#[derive(Debug, Clone, Copy)]
pub struct Cast {
    pub guest: UserId,
    pub target: UserId,
    pub bystander: UserId,
}

pub fn create_cast(db: &Database) -> Cast {
    let users = SqliteUserRepository::new(db.connection());
    Cast {
        target: users.create_registered("member").unwrap().id,
        bystander: users.create_registered("bystander").unwrap().id,
        guest: users.create_guest("guest").unwrap().id,
    }
}

fn progress(user: UserId, episode: i64, stop: i64, at: i64) -> WatchProgress {
    WatchProgress::new(user, episode, stop, at)
}

fn reaction(user: UserId, episode: i64, kind: ReactionType, at: i64) -> EpisodeReaction {
    EpisodeReaction::new(user, episode, kind, at)
}

fn series(user: UserId, series_id: i64) -> Favorite {
    Favorite {
        created_at: 1_000,
        ..Favorite::series(user, series_id)
    }
}

fn episode(user: UserId, series_id: i64, episode_id: i64) -> Favorite {
    Favorite {
        created_at: 1_000,
        ..Favorite::episode(user, series_id, episode_id)
    }
}

/// Seed every collision shape for every entity kind
pub fn seed_mixed(db: &Database, cast: Cast) {
    let Cast {
        guest,
        target,
        bystander,
    } = cast;
    let conn = db.connection();

    let wp = SqliteWatchProgressRepository::new(conn);
    // guest newer
    wp.insert(&progress(guest, 10, 120, 2_000)).unwrap();
    wp.insert(&progress(target, 10, 30, 1_000)).unwrap();
    // target newer
    wp.insert(&progress(guest, 11, 5, 1_000)).unwrap();
    wp.insert(&progress(target, 11, 90, 3_000)).unwrap();
    // tie
    wp.insert(&progress(guest, 12, 50, 1_500)).unwrap();
    wp.insert(&progress(target, 12, 60, 1_500)).unwrap();
    // guest only
    wp.insert(&progress(guest, 13, 700, 100)).unwrap();
    wp.insert(&progress(bystander, 10, 1, 9_999)).unwrap();

    let reactions = SqliteEpisodeReactionRepository::new(conn);
    reactions
        .insert(&reaction(guest, 1, ReactionType::Dislike, 50))
        .unwrap();
    reactions
        .insert(&reaction(target, 1, ReactionType::Like, 10))
        .unwrap();
    reactions
        .insert(&reaction(guest, 2, ReactionType::Like, 5))
        .unwrap();
    reactions
        .insert(&reaction(guest, 3, ReactionType::Like, 5))
        .unwrap();
    reactions
        .insert(&reaction(target, 3, ReactionType::Dislike, 9))
        .unwrap();

    let favorites = SqliteFavoriteRepository::new(conn);
    favorites.insert(&series(guest, 7)).unwrap();
    favorites.insert(&series(target, 7)).unwrap();
    favorites.insert(&episode(guest, 7, 70)).unwrap();
    favorites.insert(&episode(guest, 8, 80)).unwrap();
    favorites.insert(&episode(target, 8, 80)).unwrap();
    favorites.insert(&series(guest, 9)).unwrap();
    favorites.insert(&series(bystander, 9)).unwrap();

    let comments = SqliteCommentRepository::new(conn);
    let at = |c: Comment| Comment {
        created_at: 2_000,
        ..c
    };
    let by_guest = comments.insert(&at(Comment::new(guest, 10, "first"))).unwrap();
    comments
        .insert(&at(Comment::new(guest, 11, "second")))
        .unwrap();
    let by_target = comments
        .insert(&at(Comment::new(target, 10, "hello")))
        .unwrap();
    let by_bystander = comments
        .insert(&at(Comment::new(bystander, 10, "hey")))
        .unwrap();

    let likes = SqliteCommentLikeRepository::new(conn);
    let like = |user, comment: &Comment| CommentLike {
        created_at: 3_000,
        ..CommentLike::new(user, comment.id)
    };
    likes.insert(&like(guest, &by_target)).unwrap();
    likes.insert(&like(target, &by_target)).unwrap();
    likes.insert(&like(guest, &by_bystander)).unwrap();
    likes.insert(&like(guest, &by_guest)).unwrap();
    likes.insert(&like(bystander, &by_guest)).unwrap();

    let tokens = SqliteRefreshTokenRepository::new(conn);
    for device in ["phone", "tablet", "tv"] {
        tokens.issue(guest, Some(device), 9_000_000).unwrap();
    }
    tokens.issue(target, None, 9_000_000).unwrap();
    tokens.issue(bystander, None, 9_000_000).unwrap();
}

/// Seed `n` rows per kind, half of them colliding with the target
pub fn seed_bulk(db: &Database, cast: Cast, n: i64) {
    let Cast { guest, target, .. } = cast;
    let conn = db.connection();
    let wp = SqliteWatchProgressRepository::new(conn);
    let reactions = SqliteEpisodeReactionRepository::new(conn);
    let favorites = SqliteFavoriteRepository::new(conn);
    let comments = SqliteCommentRepository::new(conn);
    let likes = SqliteCommentLikeRepository::new(conn);

    for i in 0..n {
        wp.insert(&progress(guest, i, i, i % 7)).unwrap();
        let kind = if i % 3 == 0 {
            ReactionType::Like
        } else {
            ReactionType::Dislike
        };
        reactions.insert(&reaction(guest, i, kind, i % 5)).unwrap();
        favorites.insert(&series(guest, i)).unwrap();
        let comment = comments
            .insert(&Comment {
                created_at: i,
                ..Comment::new(target, i, format!("comment {i}"))
            })
            .unwrap();
        likes
            .insert(&CommentLike {
                created_at: i,
                ..CommentLike::new(guest, comment.id)
            })
            .unwrap();

        if i % 2 == 0 {
            wp.insert(&progress(target, i, i * 2, 3)).unwrap();
            reactions
                .insert(&reaction(target, i, ReactionType::Like, 2))
                .unwrap();
            favorites.insert(&series(target, i)).unwrap();
            likes
                .insert(&CommentLike {
                    created_at: i,
                    ..CommentLike::new(target, comment.id)
                })
                .unwrap();
        }
        comments
            .insert(&Comment {
                created_at: i,
                ..Comment::new(guest, i, "guest comment")
            })
            .unwrap();
    }
}

/// Every row of every table, rendered column by column, in id order
pub fn dump(db: &Database) -> Vec<(&'static str, Vec<Vec<String>>)> {
    TABLES
        .iter()
        .map(|table| {
            let mut stmt = db
                .connection()
                .prepare(&format!("SELECT * FROM {table} ORDER BY id"))
                .unwrap();
            let columns = stmt.column_count();
            let rows = stmt
                .query_map([], |row| {
                    (0..columns)
                        .map(|i| row.get_ref(i).map(|value| format!("{value:?}")))
                        .collect::<rusqlite::Result<Vec<_>>>()
                })
                .unwrap()
                .collect::<rusqlite::Result<Vec<_>>>()
                .unwrap();
            (*table, rows)
        })
        .collect()
}

/// Rows anywhere that still reference `user`
pub fn rows_referencing(db: &Database, user: UserId) -> i64 {
    OWNED_TABLES
        .iter()
        .map(|table| {
            db.connection()
                .query_row(
                    &format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?1"),
                    [user.get()],
                    |row| row.get::<_, i64>(0),
                )
                .unwrap()
        })
        .sum()
}

/// Natural keys owned more than once by the same user, across all kinds
pub fn duplicate_keys(db: &Database) -> i64 {
    [
        "SELECT COUNT(*) FROM (SELECT 1 FROM watch_progress GROUP BY user_id, episode_id HAVING COUNT(*) > 1)",
        "SELECT COUNT(*) FROM (SELECT 1 FROM episode_reactions GROUP BY user_id, episode_id HAVING COUNT(*) > 1)",
        "SELECT COUNT(*) FROM (SELECT 1 FROM favorites GROUP BY user_id, series_id, favorite_type, IFNULL(episode_id, -1) HAVING COUNT(*) > 1)",
        "SELECT COUNT(*) FROM (SELECT 1 FROM comment_likes GROUP BY user_id, comment_id HAVING COUNT(*) > 1)",
    ]
    .iter()
    .map(|sql| {
        db.connection()
            .query_row(sql, [], |row| row.get::<_, i64>(0))
            .unwrap()
    })
    .sum()
}

pub fn owned_count<R: OwnedRepository>(repo: &R, user: UserId) -> u64 {
    repo.count_for_user(user).unwrap()
}
