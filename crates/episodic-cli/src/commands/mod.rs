pub mod can_merge;
pub mod common;
pub mod merge;
pub mod preview;
