use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] episodic_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Database not found at {}. Pass --db-path or set EPISODIC_DB_PATH.", .0.display())]
    DatabaseMissing(PathBuf),
}
