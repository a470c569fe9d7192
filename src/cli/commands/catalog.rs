//! `devscen catalog` command - print the effective catalog

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::catalog_for;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, ComplexityCategory};

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {}

pub fn run(_args: CatalogArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = catalog_for(global)?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&catalog).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Md => print!("{}", render_markdown(&catalog)),
        OutputFormat::Auto | OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&catalog).into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn render_markdown(catalog: &Catalog) -> String {
    let mut output = String::new();
    output.push_str("# Scenario Catalog\n\n");

    output.push_str("## Base Duration (months)\n\n");
    let mut durations = Builder::default();
    let mut header = vec!["Project Type".to_string()];
    header.extend(ComplexityCategory::ALL.iter().map(|c| c.to_string()));
    durations.push_record(header);
    for profile in &catalog.project_types {
        let mut row = vec![profile.name.clone()];
        row.extend(profile.base_months.iter().map(|(_, v)| format!("{:.1}", v)));
        durations.push_record(row);
    }
    let mut variability = vec!["Variability".to_string()];
    variability.extend(
        catalog
            .variability
            .iter()
            .map(|(_, v)| format!("±{:.1}%", v * 100.0)),
    );
    durations.push_record(variability);
    output.push_str(&durations.build().with(Style::markdown()).to_string());

    output.push_str("\n\n## SKU Brackets\n\n");
    let mut brackets = Builder::default();
    brackets.push_record(["Bracket", "Min", "Max", "Add-on (months)"]);
    for b in &catalog.sku_brackets {
        brackets.push_record([
            b.label.clone(),
            b.min.to_string(),
            b.max.to_string(),
            format!("{:.2}", b.add_on_months),
        ]);
    }
    output.push_str(&brackets.build().with(Style::markdown()).to_string());

    output.push_str("\n\n## Duration Modifiers\n\n");
    let m = &catalog.modifiers;
    let mut modifiers = Builder::default();
    modifiers.push_record(["Condition", "Add-on (months)"]);
    modifiers.push_record([
        format!("Division: {}", catalog.division_label(true)),
        format!("{:.2}", m.joint_division_months),
    ]);
    modifiers.push_record([
        "More than one business unit".to_string(),
        format!("{:.2}", m.multiple_business_units_months),
    ]);
    modifiers.push_record([
        format!("Any of: {}", m.digital_components.join(", ")),
        format!("{:.2}", m.digital_components_months),
    ]);
    modifiers.push_record(["Sterile".to_string(), format!("{:.2}", m.sterile_months)]);
    for pathway in &catalog.regulatory_pathways {
        modifiers.push_record([
            format!("Pathway: {}", pathway.name),
            format!("{:.2}", pathway.add_on_months),
        ]);
    }
    output.push_str(&modifiers.build().with(Style::markdown()).to_string());

    output.push_str("\n\n## Forbidden Component Pairs\n\n");
    let mut pairs = Builder::default();
    pairs.push_record(["Component", "Component"]);
    for [a, b] in &catalog.component_rules.forbidden_pairs {
        pairs.push_record([a.as_str(), b.as_str()]);
    }
    output.push_str(&pairs.build().with(Style::markdown()).to_string());
    output.push_str(&format!(
        "\n\nFallback set: {}\n",
        catalog.component_rules.fallback.join(", ")
    ));
    output.push_str(&format!(
        "Canonical set: {} ({:.0}% of samples)\n",
        catalog.canonical_components.join(", "),
        catalog.canonical_share * 100.0
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_lists_tables() {
        let md = render_markdown(&Catalog::default());
        assert!(md.contains("## Base Duration (months)"));
        assert!(md.contains("| New system"));
        assert!(md.contains("200-500"));
        assert!(md.contains("Cases & Trays"));
        assert!(md.contains("70% of samples"));
    }
}
