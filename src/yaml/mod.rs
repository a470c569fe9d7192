//! YAML file handling

pub mod diagnostics;
