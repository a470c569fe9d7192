//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    catalog::CatalogArgs, completions::CompletionsArgs, estimate::EstimateArgs,
    generate::GenerateArgs, summary::SummaryArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "devscen")]
#[command(author, version, about = "Medical-device development scenario generator")]
#[command(long_about = "Synthesizes populations of hypothetical medical-device development projects with complexity categories and estimated duration ranges, written as CSV.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog override file (YAML, same shape as `devscen catalog -f yaml`)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a scenario dataset
    Generate(GenerateArgs),

    /// Estimate the duration range of a single project
    Estimate(EstimateArgs),

    /// Validate a component set against the forbidden pairings
    Validate(ValidateArgs),

    /// Show the effective attribute catalog
    Catalog(CatalogArgs),

    /// Summarize a generated dataset and check its invariants
    Summary(SummaryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output chosen per command
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Markdown tables
    Md,
}
