//! devscen: synthetic medical-device development project scenarios
//!
//! Generates populations of hypothetical project records (classification
//! attributes, complexity category and an estimated duration range) as CSV
//! for downstream duration analysis.

pub mod cli;
pub mod core;
pub mod yaml;
