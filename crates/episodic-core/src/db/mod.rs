//! Database layer for Episodic

mod activity;
mod comments;
mod connection;
mod favorites;
mod migrations;
mod owned;
mod users;

pub use activity::{SqliteEpisodeReactionRepository, SqliteWatchProgressRepository};
pub use comments::{SqliteCommentLikeRepository, SqliteCommentRepository};
pub use connection::{Database, DEFAULT_BUSY_TIMEOUT};
pub use favorites::SqliteFavoriteRepository;
pub use owned::OwnedRepository;
pub use users::{
    RefreshTokenRepository, SqliteRefreshTokenRepository, SqliteUserRepository, UserRepository,
};
