//! Data models for Episodic

mod comment;
mod episode_reaction;
mod favorite;
mod owned;
mod refresh_token;
mod user;
mod watch_progress;

pub use comment::{Comment, CommentLike};
pub use episode_reaction::{EpisodeReaction, ReactionType};
pub use favorite::{Favorite, FavoriteKey, FavoriteType};
pub use owned::{ConflictPolicy, EntityKind, OwnedRow};
pub use refresh_token::RefreshToken;
pub use user::{generate_guest_token, User, UserId};
pub use watch_progress::WatchProgress;
