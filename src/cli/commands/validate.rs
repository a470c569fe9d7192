//! `devscen validate` command - check a component set

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{catalog_for, ensure_known};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Components to check (quote names containing spaces)
    #[arg(required = true)]
    pub components: Vec<String>,
}

#[derive(Serialize)]
struct ValidationReport {
    input: Vec<String>,
    result: Vec<String>,
    changed: bool,
    forbidden_pair: Option<[String; 2]>,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = catalog_for(global)?;
    ensure_known("component", &args.components, &catalog.components)?;

    let rules = &catalog.component_rules;
    let result = rules.validate(&args.components);
    let report = ValidationReport {
        changed: result != args.components,
        forbidden_pair: rules.forbidden_pair_in(&args.components).cloned(),
        input: args.components,
        result,
    };

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&report).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Auto | OutputFormat::Md => {
            if global.quiet {
                println!("{}", report.result.join(", "));
                return Ok(());
            }
            match (&report.forbidden_pair, report.changed) {
                (Some([a, b]), _) => println!(
                    "{} {} and {} cannot ship together; replaced with fallback set",
                    style("✗").red(),
                    style(a).yellow(),
                    style(b).yellow()
                ),
                (None, true) => println!(
                    "{} Component set adjusted",
                    style("!").yellow()
                ),
                (None, false) => println!("{} Component set is valid", style("✓").green()),
            }
            println!("   {}", style(report.result.join(", ")).cyan());
        }
    }

    Ok(())
}
