//! episodic-core - Core library for Episodic
//!
//! This crate contains the models, `SQLite` database layer, repositories and
//! the guest-to-user account merge used by the Episodic backend and CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod merge;
pub mod models;
pub mod util;

pub use config::MergeConfig;
pub use error::{Error, Result};
pub use merge::{AccountMerger, MergePreview, MergeStats, MergeStrategy};
pub use models::UserId;
