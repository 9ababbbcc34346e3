//! Runtime configuration for merges.
//!
//! Values come from the environment (a `.env` file is loaded by the CLI
//! before this runs). Unset variables fall back to defaults; set but invalid
//! values are errors rather than silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::merge::MergeStrategy;
use crate::util::normalize_text_option;

pub const STRATEGY_ENV: &str = "EPISODIC_MERGE_STRATEGY";
pub const BUSY_TIMEOUT_ENV: &str = "EPISODIC_BUSY_TIMEOUT_MS";
pub const JOB_RETENTION_ENV: &str = "EPISODIC_JOB_RETENTION_HOURS";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_JOB_RETENTION_HOURS: u64 = 24;

/// Merge settings shared by the orchestrator, the queue and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub strategy: MergeStrategy,
    pub busy_timeout_ms: u64,
    pub job_retention_hours: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            strategy: MergeStrategy::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            job_retention_hours: DEFAULT_JOB_RETENTION_HOURS,
        }
    }
}

impl MergeConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| normalize_text_option(lookup(key));
        let mut config = Self::default();

        if let Some(raw) = value(STRATEGY_ENV) {
            config.strategy = raw.parse()?;
        }
        if let Some(raw) = value(BUSY_TIMEOUT_ENV) {
            config.busy_timeout_ms = parse_u64(BUSY_TIMEOUT_ENV, &raw)?;
        }
        if let Some(raw) = value(JOB_RETENTION_ENV) {
            config.job_retention_hours = parse_u64(JOB_RETENTION_ENV, &raw)?;
        }

        Ok(config)
    }

    /// `SQLite` busy timeout for merge connections
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// How long finished background jobs are kept
    pub const fn job_retention(&self) -> Duration {
        Duration::from_secs(self.job_retention_hours.saturating_mul(3_600))
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| Error::InvalidInput(format!("{key} must be a non-negative integer, got '{raw}'")))
}
