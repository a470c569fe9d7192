//! `devscen estimate` command - duration range for a single project

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{catalog_for, ensure_known, in_catalog_order};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::duration::DurationEstimate;
use crate::core::{ComplexityCategory, DurationEstimator, DurationInputs, Rating, Sterility};

#[derive(clap::Args, Debug)]
pub struct EstimateArgs {
    /// Project type (e.g. "New system", "Line extension")
    #[arg(long, short = 't', default_value = "New system")]
    pub project_type: String,

    /// Overall complexity category (CC1-CC6)
    #[arg(long, short = 'c', conflicts_with_all = ["design", "mfg"])]
    pub complexity: Option<ComplexityCategory>,

    /// Design complexity (1-3), used with --mfg
    #[arg(long, requires = "mfg")]
    pub design: Option<Rating>,

    /// Manufacturing complexity (1-3), used with --design
    #[arg(long, requires = "design")]
    pub mfg: Option<Rating>,

    /// Project spans every division
    #[arg(long)]
    pub joint_division: bool,

    /// Business unit (repeatable)
    #[arg(long = "unit", short = 'u')]
    pub units: Vec<String>,

    /// Component (repeatable)
    #[arg(long = "component", short = 'C')]
    pub components: Vec<String>,

    /// SKU count
    #[arg(long)]
    pub sku: u32,

    /// Product is delivered sterile
    #[arg(long)]
    pub sterile: bool,

    /// Regulatory pathway (repeatable)
    #[arg(long = "pathway", short = 'p')]
    pub pathways: Vec<String>,
}

#[derive(Serialize)]
struct EstimateReport {
    project_type: String,
    complexity: ComplexityCategory,
    division: String,
    business_units: Vec<String>,
    components: Vec<String>,
    regulatory_pathways: Vec<String>,
    sku_count: u32,
    sterility: Sterility,
    estimate: DurationEstimate,
    duration_range: String,
}

pub fn run(args: EstimateArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = catalog_for(global)?;

    let profile = catalog.project_type(&args.project_type).ok_or_else(|| {
        let known: Vec<&str> = catalog.project_types.iter().map(|p| p.name.as_str()).collect();
        miette::miette!(
            help = format!("Known project types: {}", known.join(", ")),
            "Unknown project type: '{}'",
            args.project_type
        )
    })?;

    let complexity = match (args.complexity, args.design, args.mfg) {
        (Some(category), _, _) => category,
        (None, Some(design), Some(mfg)) => ComplexityCategory::classify(design, mfg),
        _ => {
            return Err(miette::miette!(
                "Provide --complexity, or both --design and --mfg"
            ))
        }
    };

    ensure_known("business unit", &args.units, &catalog.business_units)?;
    ensure_known("component", &args.components, &catalog.components)?;
    let pathway_names = catalog.pathway_names();
    ensure_known("regulatory pathway", &args.pathways, &pathway_names)?;

    let units = in_catalog_order(&args.units, &catalog.business_units);
    let components = catalog
        .component_rules
        .validate(&in_catalog_order(&args.components, &catalog.components));
    let mut pathways = args.pathways.clone();
    if complexity.requires_clearance() {
        pathways.push(catalog.forced_pathway.clone());
    }
    let pathways = in_catalog_order(&pathways, &pathway_names);

    let division = catalog.division_label(args.joint_division);
    let sterility = if args.sterile { Sterility::Yes } else { Sterility::No };

    let estimate = DurationEstimator::new(&catalog)
        .estimate(&DurationInputs {
            base_months: profile.base_months.get(complexity),
            category: complexity,
            division: &division,
            business_units: &units,
            components: &components,
            sku_count: args.sku,
            sterility,
            pathways: &pathways,
        })
        .map_err(|e| {
            let first = catalog.sku_brackets.iter().map(|b| b.min).min().unwrap_or(1);
            let last = catalog.sku_brackets.iter().map(|b| b.max).max().unwrap_or(1);
            miette::miette!(help = format!("SKU brackets cover {}-{}", first, last), "{}", e)
        })?;

    let report = EstimateReport {
        project_type: profile.name.clone(),
        complexity,
        division,
        business_units: units,
        components,
        regulatory_pathways: pathways,
        sku_count: args.sku,
        sterility,
        duration_range: estimate.range.to_string(),
        estimate,
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
                println!("{}", report.duration_range);
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

fn print_report(report: &EstimateReport) {
    let estimate = &report.estimate;
    println!(
        "{:<13}{} {}",
        style("Complexity:").bold(),
        style(report.complexity).yellow(),
        style(format!(
            "(base {:.2} months, ±{:.1}%)",
            estimate.base_months,
            estimate.variability * 100.0
        ))
        .dim()
    );
    println!("{:<13}{}", style("Division:").bold(), report.division);
    println!(
        "{:<13}{}",
        style("Components:").bold(),
        report.components.join(", ")
    );
    println!(
        "{:<13}{}",
        style("Pathways:").bold(),
        report.regulatory_pathways.join(", ")
    );
    if estimate.adjustments.is_empty() {
        println!("{:<13}{}", style("Additions:").bold(), style("none").dim());
    } else {
        for (i, adj) in estimate.adjustments.iter().enumerate() {
            let label = if i == 0 { "Additions:" } else { "" };
            println!(
                "{:<13}{:>+7.2}  {}",
                style(label).bold(),
                adj.months,
                style(&adj.reason).dim()
            );
        }
    }
    println!(
        "{:<13}{} months",
        style("Duration:").bold(),
        style(&report.duration_range).green().bold()
    );
}
