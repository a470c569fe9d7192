//! `devscen summary` command - report on a generated dataset

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::catalog_for;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{ComplexityCategory, DatasetSummary};

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Generated CSV file
    pub file: PathBuf,

    /// Exit with an error when any row breaks a generation invariant
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = catalog_for(global)?;
    let summary = DatasetSummary::from_path(&args.file, &catalog)
        .map_err(|e| miette::miette!("{}: {}", args.file.display(), e))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&summary).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Auto | OutputFormat::Md => print!("{}", render_markdown(&summary)),
    }

    let violations = summary.violations();
    if violations > 0 {
        if !global.quiet {
            eprintln!(
                "{} {} row(s) break generation invariants",
                style("!").yellow(),
                style(violations).red()
            );
        }
        if args.strict {
            return Err(miette::miette!(
                "{} contains {} invalid row(s)",
                args.file.display(),
                violations
            ));
        }
    }

    Ok(())
}

fn render_markdown(summary: &DatasetSummary) -> String {
    let mut output = String::new();
    output.push_str("# Scenario Dataset Summary\n\n");

    let mut overview = Builder::default();
    overview.push_record(["Metric", "Value"]);
    overview.push_record(["Runs".to_string(), summary.runs.to_string()]);
    overview.push_record(["Rows".to_string(), summary.rows.to_string()]);
    overview.push_record([
        "Canonical components".to_string(),
        format!(
            "{} ({:.1}%)",
            summary.canonical_rows,
            summary.canonical_share() * 100.0
        ),
    ]);
    overview.push_record([
        "Joint division".to_string(),
        summary.joint_division_rows.to_string(),
    ]);
    overview.push_record([
        "Mean duration range".to_string(),
        format!("{:.2}-{:.2}", summary.mean_lower, summary.mean_upper),
    ]);
    output.push_str(&overview.build().with(Style::markdown()).to_string());

    output.push_str("\n\n## Complexity Categories\n\n");
    let mut categories = Builder::default();
    categories.push_record(["Category", "Rows"]);
    for category in ComplexityCategory::ALL {
        let count = summary.by_category.get(&category).copied().unwrap_or(0);
        categories.push_record([category.to_string(), count.to_string()]);
    }
    output.push_str(&categories.build().with(Style::markdown()).to_string());

    output.push_str("\n\n## Invariant Checks\n\n");
    let mut checks = Builder::default();
    checks.push_record(["Check", "Failing Rows"]);
    for (check, count) in [
        ("Category matches design/manufacturing", summary.classification_mismatches),
        ("No forbidden component pair", summary.forbidden_pair_rows),
        ("CC3+ includes forced pathway", summary.missing_forced_pathway),
        ("SKU count inside a bracket", summary.sku_out_of_range),
        ("Positive, ordered duration range", summary.invalid_ranges),
    ] {
        checks.push_record([check.to_string(), count.to_string()]);
    }
    output.push_str(&checks.build().with(Style::markdown()).to_string());
    output.push('\n');

    output
}
