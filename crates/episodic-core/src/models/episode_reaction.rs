//! Episode reaction model

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{EntityKind, OwnedRow, UserId};
use crate::error::Error;

/// Like or dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Dislike,
}

impl ReactionType {
    /// Stored representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(Error::InvalidInput(format!("unknown reaction type '{other}'"))),
        }
    }
}

impl ToSql for ReactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ReactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A user's like/dislike on an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeReaction {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: UserId,
    /// Episode reacted to
    pub episode_id: i64,
    /// Current reaction
    pub reaction_type: ReactionType,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl EpisodeReaction {
    /// Build an unsaved row; `id` is assigned on insert
    #[must_use]
    pub const fn new(
        user_id: UserId,
        episode_id: i64,
        reaction_type: ReactionType,
        updated_at: i64,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            episode_id,
            reaction_type,
            updated_at,
        }
    }
}

impl OwnedRow for EpisodeReaction {
    type Key = i64;

    const KIND: EntityKind = EntityKind::EpisodeReaction;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
    }

    fn natural_key(&self) -> i64 {
        self.episode_id
    }

    fn updated_at(&self) -> Option<i64> {
        Some(self.updated_at)
    }

    fn adopt_value(&mut self, newer: &Self) {
        self.reaction_type = newer.reaction_type;
        self.updated_at = newer.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_type_round_trips_through_str() {
        assert_eq!("like".parse::<ReactionType>().unwrap(), ReactionType::Like);
        assert_eq!(ReactionType::Dislike.to_string(), "dislike");
        assert!("love".parse::<ReactionType>().is_err());
    }
}
