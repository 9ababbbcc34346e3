use std::path::Path;

use episodic_core::{MergeConfig, UserId};

use crate::commands::common::{format_preview_lines, preview_guest};
use crate::error::CliError;

pub fn run_preview(
    guest: UserId,
    as_json: bool,
    db_path: &Path,
    config: &MergeConfig,
) -> Result<(), CliError> {
    let preview = preview_guest(db_path, guest, config)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        for line in format_preview_lines(guest, &preview) {
            println!("{line}");
        }
    }

    Ok(())
}
