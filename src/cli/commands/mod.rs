//! CLI command implementations

pub mod catalog;
pub mod completions;
pub mod estimate;
pub mod generate;
pub mod summary;
pub mod validate;
