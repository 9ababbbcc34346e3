//! Favorite model

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{EntityKind, OwnedRow, UserId};
use crate::error::Error;
use crate::util::unix_millis_now;

/// What a favorite points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteType {
    /// A whole series
    #[default]
    Series,
    /// A single episode of a series
    Episode,
}

impl FavoriteType {
    /// Stored representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for FavoriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FavoriteType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => Err(Error::InvalidInput(format!("unknown favorite type '{other}'"))),
        }
    }
}

impl ToSql for FavoriteType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for FavoriteType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Natural key of a favorite, scoped to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FavoriteKey {
    pub series_id: i64,
    pub favorite_type: FavoriteType,
    pub episode_id: Option<i64>,
}

/// A bookmarked series or episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: UserId,
    /// Series the favorite belongs to
    pub series_id: i64,
    /// Series-level or episode-level favorite
    pub favorite_type: FavoriteType,
    /// Episode, for episode-level favorites
    pub episode_id: Option<i64>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl Favorite {
    /// Build an unsaved series-level favorite
    #[must_use]
    pub fn series(user_id: UserId, series_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            series_id,
            favorite_type: FavoriteType::Series,
            episode_id: None,
            created_at: unix_millis_now(),
        }
    }

    /// Build an unsaved episode-level favorite
    #[must_use]
    pub fn episode(user_id: UserId, series_id: i64, episode_id: i64) -> Self {
        Self {
            favorite_type: FavoriteType::Episode,
            episode_id: Some(episode_id),
            ..Self::series(user_id, series_id)
        }
    }
}

impl OwnedRow for Favorite {
    type Key = FavoriteKey;

    const KIND: EntityKind = EntityKind::Favorite;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
    }

    fn natural_key(&self) -> FavoriteKey {
        FavoriteKey {
            series_id: self.series_id,
            favorite_type: self.favorite_type,
            episode_id: self.episode_id,
        }
    }
}
