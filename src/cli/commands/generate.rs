//! `devscen generate` command - write a scenario dataset

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{load_catalog, make_rng, resolve_config};
use crate::cli::GlobalOpts;
use crate::core::generate::{batch_count, generate};
use crate::core::{Config, DatasetSink};

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Number of scenarios to generate [default: 3000]
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Rows drawn and flushed per batch [default: 1000]
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// Output CSV file, appended to [default: project_scenarios.csv]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Random seed for a reproducible run
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Truncate the output file instead of appending to it
    #[arg(long)]
    pub fresh: bool,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = resolve_config(
        global,
        Config {
            num_samples: args.samples,
            batch_size: args.batch_size,
            output: args.output,
            seed: args.seed,
            catalog: None,
        },
    )?;
    let catalog = load_catalog(&config)?;

    let num_samples = config.num_samples();
    let batch_size = config.batch_size();
    if batch_size == 0 {
        return Err(miette::miette!("--batch-size must be at least 1"));
    }
    let output = config.output();

    if global.verbose {
        eprintln!(
            "{} {} samples in batches of {} (seed: {}, catalog: {})",
            style("⚙").cyan(),
            num_samples,
            batch_size,
            config
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "random".to_string()),
            config
                .catalog
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
        );
    }

    let mut sink = DatasetSink::new(&output);
    if args.fresh {
        sink.truncate().into_diagnostic()?;
    }

    let total = batch_count(num_samples, batch_size);
    let written = generate(
        &catalog,
        num_samples,
        batch_size,
        make_rng(config.seed),
        &mut sink,
        |progress| {
            if global.quiet {
                return;
            }
            if global.verbose {
                eprintln!(
                    "Processed batch {} of {} {}",
                    style(progress.batch).cyan(),
                    total,
                    style(format!("(rows {}-{})", progress.start + 1, progress.end)).dim()
                );
            } else {
                eprintln!("Processed batch {} of {}", style(progress.batch).cyan(), total);
            }
        },
    )
    .into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Generated {} scenarios in {}",
            style("✓").green(),
            style(written).cyan(),
            style(output.display()).cyan()
        );
    }

    Ok(())
}
