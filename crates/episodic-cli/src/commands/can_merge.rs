use std::path::Path;

use episodic_core::{MergeConfig, UserId};

use crate::commands::common::check_guest;
use crate::error::CliError;

pub fn run_can_merge(guest: UserId, db_path: &Path, config: &MergeConfig) -> Result<(), CliError> {
    if check_guest(db_path, guest, config)? {
        println!("User {guest} is a guest and can be merged");
    } else {
        println!("User {guest} is not a mergeable guest");
    }
    Ok(())
}
