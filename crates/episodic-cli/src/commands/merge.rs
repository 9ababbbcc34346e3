use std::path::Path;

use episodic_core::{MergeConfig, UserId};

use crate::commands::common::{format_stats_lines, merge_accounts};
use crate::error::CliError;

pub fn run_merge(
    guest: UserId,
    target: UserId,
    as_json: bool,
    db_path: &Path,
    config: &MergeConfig,
) -> Result<(), CliError> {
    let stats = merge_accounts(db_path, guest, target, config)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats_lines(guest, target, &stats) {
            println!("{line}");
        }
    }

    Ok(())
}
