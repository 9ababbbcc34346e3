use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use episodic_core::{MergeStrategy, UserId};

#[derive(Parser)]
#[command(name = "episodic")]
#[command(about = "Inspect and merge guest accounts in an Episodic database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count the rows a guest would bring into a merge
    Preview {
        /// Guest user ID
        #[arg(long, value_name = "ID")]
        guest: UserId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a user is a mergeable guest
    CanMerge {
        /// User ID to check
        #[arg(long, value_name = "ID")]
        guest: UserId,
    },
    /// Merge a guest account into a registered account
    Merge {
        /// Guest user ID (deleted after the merge)
        #[arg(long, value_name = "ID")]
        guest: UserId,
        /// Registered user ID receiving the guest's data
        #[arg(long, value_name = "ID")]
        target: UserId,
        /// Merge algorithm (defaults to EPISODIC_MERGE_STRATEGY, then batch)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StrategyArg {
    RowWise,
    Batch,
}

impl From<StrategyArg> for MergeStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::RowWise => Self::RowWise,
            StrategyArg::Batch => Self::Batch,
        }
    }
}
