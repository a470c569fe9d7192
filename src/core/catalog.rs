//! Attribute catalogs
//!
//! The closed value domains scenarios are drawn from, plus the lookup tables
//! the duration estimator reads. A catalog is built once at startup (either
//! the built-in one or a YAML override) and shared by reference afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::combinations::non_empty_subsets;
use crate::core::complexity::{CategoryTable, ComplexityCategory};
use crate::core::components::{same_members, ComponentRules};
use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Errors raised while loading or checking a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog list '{0}' must not be empty")]
    EmptyList(&'static str),

    #[error("'{value}' in {field} is not a catalog {domain}")]
    UnknownValue {
        field: &'static str,
        value: String,
        domain: &'static str,
    },

    #[error("Variability for {category} must be in [0, 1) (got {value})")]
    InvalidVariability {
        category: ComplexityCategory,
        value: f64,
    },

    #[error("Base duration for '{project_type}' {category} must be positive (got {value})")]
    InvalidBaseDuration {
        project_type: String,
        category: ComplexityCategory,
        value: f64,
    },

    #[error("SKU bracket '{label}' has an invalid range {min}-{max}")]
    InvalidBracket { label: String, min: u32, max: u32 },

    #[error("{field} must be between 0 and 1 (got {value})")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("{field} contains the forbidden component pair {pair:?}")]
    ForbiddenPairInSet {
        field: &'static str,
        pair: [String; 2],
    },

    #[error("Add-on {field} must be a non-negative number of months (got {value})")]
    InvalidAddOn { field: String, value: f64 },

    #[error("At least two divisions are needed to tell joint projects apart")]
    TooFewDivisions,

    #[error("Every valid component combination collapses to the canonical set")]
    NoAlternativeComponents,
}

/// Base development durations for one project type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTypeProfile {
    pub name: String,

    /// Base months per complexity category
    pub base_months: CategoryTable,
}

/// Labelled inclusive SKU count range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuBracket {
    pub label: String,
    pub min: u32,
    pub max: u32,

    /// Months added when a scenario's SKU count falls in this bracket
    pub add_on_months: f64,
}

impl SkuBracket {
    fn new(label: &str, min: u32, max: u32, add_on_months: f64) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
            add_on_months,
        }
    }

    pub fn contains(&self, count: u32) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Regulatory pathway and the months it adds to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryPathway {
    pub name: String,
    pub add_on_months: f64,
}

/// Situational duration add-ons that shift both bounds of a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationModifiers {
    /// Project spans more than one division
    pub joint_division_months: f64,

    /// More than one business unit involved
    pub multiple_business_units_months: f64,

    /// Components that trigger `digital_components_months`
    pub digital_components: Vec<String>,
    pub digital_components_months: f64,

    /// Sterile product
    pub sterile_months: f64,
}

/// Complete attribute catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub project_types: Vec<ProjectTypeProfile>,
    pub business_units: Vec<String>,
    pub business_impacts: Vec<String>,

    /// First entry is the home division; the joint label lists all of them
    pub divisions: Vec<String>,

    /// Chance that a scenario spans every division
    pub joint_division_probability: f64,

    pub components: Vec<String>,
    pub component_rules: ComponentRules,

    /// Component set deliberately over-represented in generated populations
    pub canonical_components: Vec<String>,

    /// Share of samples reserved for `canonical_components`
    pub canonical_share: f64,

    pub target_markets: Vec<String>,
    pub regulatory_pathways: Vec<RegulatoryPathway>,

    /// Pathway that CC3 and above must include
    pub forced_pathway: String,

    /// Fractional spread around the base duration per category
    pub variability: CategoryTable,

    /// Declaration order matters: the first bracket containing a count wins
    pub sku_brackets: Vec<SkuBracket>,

    pub modifiers: DurationModifiers,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            project_types: vec![
                ProjectTypeProfile {
                    name: "New system".to_string(),
                    base_months: CategoryTable::new([14.0, 18.0, 20.0, 26.0, 32.0, 38.0]),
                },
                ProjectTypeProfile {
                    name: "Line extension".to_string(),
                    base_months: CategoryTable::new([10.0, 10.5, 14.0, 17.5, 23.0, 31.0]),
                },
            ],
            business_units: strings(&["Foot & Ankle", "Trauma", "Upper Extremities"]),
            business_impacts: strings(&[
                "Revenue generator",
                "Strategic importance",
                "Innovation",
                "Fill The Bag",
            ]),
            divisions: strings(&["Trauma & Extremities", "Other"]),
            joint_division_probability: 0.05,
            components: strings(&[
                "Implants",
                "Instruments",
                "Software",
                "Electronics",
                "Cases & Trays",
                "Biologics",
                "Combination Devices",
                "OEM",
            ]),
            component_rules: ComponentRules::default(),
            canonical_components: strings(&["Implants", "Instruments", "Cases & Trays"]),
            canonical_share: 0.70,
            target_markets: strings(&["United States"]),
            regulatory_pathways: vec![
                RegulatoryPathway {
                    name: "510(k)".to_string(),
                    add_on_months: 4.14,
                },
                RegulatoryPathway {
                    name: "Letter to File".to_string(),
                    add_on_months: 0.0,
                },
            ],
            forced_pathway: "510(k)".to_string(),
            variability: CategoryTable::new([0.05, 0.075, 0.09, 0.13, 0.175, 0.20]),
            sku_brackets: vec![
                SkuBracket::new("1-5", 1, 5, 0.0),
                SkuBracket::new("6-25", 6, 25, 1.0),
                SkuBracket::new("26-50", 26, 50, 3.0),
                SkuBracket::new("50-100", 50, 100, 6.0),
                SkuBracket::new("100-200", 100, 200, 10.0),
                SkuBracket::new("200-500", 200, 500, 14.0),
            ],
            modifiers: DurationModifiers {
                joint_division_months: 6.0,
                multiple_business_units_months: 2.0,
                digital_components: strings(&["Software", "Electronics"]),
                digital_components_months: 6.0,
                sterile_months: 4.0,
            },
        }
    }
}

impl Catalog {
    /// Load a catalog from a YAML file and validate it
    pub fn load(path: &Path) -> Result<Self, YamlError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_yml::from_str(&contents).map_err(|e| {
            YamlSyntaxError::from_serde_error(&e, &contents, &path.display().to_string())
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the invariants the sampler and estimator rely on
    pub fn validate(&self) -> Result<(), CatalogError> {
        let non_empty: [(&'static str, bool); 9] = [
            ("project_types", self.project_types.is_empty()),
            ("business_units", self.business_units.is_empty()),
            ("business_impacts", self.business_impacts.is_empty()),
            ("divisions", self.divisions.is_empty()),
            ("components", self.components.is_empty()),
            ("canonical_components", self.canonical_components.is_empty()),
            ("target_markets", self.target_markets.is_empty()),
            ("regulatory_pathways", self.regulatory_pathways.is_empty()),
            ("sku_brackets", self.sku_brackets.is_empty()),
        ];
        if let Some((name, _)) = non_empty.into_iter().find(|(_, empty)| *empty) {
            return Err(CatalogError::EmptyList(name));
        }

        for profile in &self.project_types {
            for (category, value) in profile.base_months.iter() {
                if value.is_nan() || value <= 0.0 {
                    return Err(CatalogError::InvalidBaseDuration {
                        project_type: profile.name.clone(),
                        category,
                        value,
                    });
                }
            }
        }

        for (category, value) in self.variability.iter() {
            if !(0.0..1.0).contains(&value) {
                return Err(CatalogError::InvalidVariability { category, value });
            }
        }

        if self.divisions.len() < 2 {
            return Err(CatalogError::TooFewDivisions);
        }

        for bracket in &self.sku_brackets {
            if bracket.min == 0 || bracket.min > bracket.max {
                return Err(CatalogError::InvalidBracket {
                    label: bracket.label.clone(),
                    min: bracket.min,
                    max: bracket.max,
                });
            }
        }

        for (field, value) in self.add_ons() {
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidAddOn { field, value });
            }
        }

        for (field, value) in [
            ("joint_division_probability", self.joint_division_probability),
            ("canonical_share", self.canonical_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CatalogError::InvalidProbability { field, value });
            }
        }

        self.check_components("canonical_components", &self.canonical_components)?;
        self.check_components("component_rules.fallback", &self.component_rules.fallback)?;
        for pair in &self.component_rules.forbidden_pairs {
            self.check_components("component_rules.forbidden_pairs", pair)?;
        }
        for (field, set) in [
            ("canonical_components", &self.canonical_components),
            ("component_rules.fallback", &self.component_rules.fallback),
        ] {
            if let Some(pair) = self.component_rules.forbidden_pair_in(set) {
                return Err(CatalogError::ForbiddenPairInSet {
                    field,
                    pair: pair.clone(),
                });
            }
        }

        if self.pathway(&self.forced_pathway).is_none() {
            return Err(CatalogError::UnknownValue {
                field: "forced_pathway",
                value: self.forced_pathway.clone(),
                domain: "regulatory pathway",
            });
        }

        let has_alternative = non_empty_subsets(&self.components)
            .iter()
            .map(|combo| self.component_rules.validate(combo))
            .any(|combo| !same_members(&combo, &self.canonical_components));
        if !has_alternative {
            return Err(CatalogError::NoAlternativeComponents);
        }

        Ok(())
    }

    /// Every additive month offset, labelled by where it lives
    fn add_ons(&self) -> Vec<(String, f64)> {
        let modifiers = &self.modifiers;
        let mut add_ons = vec![
            ("modifiers.joint_division_months".to_string(), modifiers.joint_division_months),
            (
                "modifiers.multiple_business_units_months".to_string(),
                modifiers.multiple_business_units_months,
            ),
            (
                "modifiers.digital_components_months".to_string(),
                modifiers.digital_components_months,
            ),
            ("modifiers.sterile_months".to_string(), modifiers.sterile_months),
        ];
        add_ons.extend(
            self.sku_brackets
                .iter()
                .map(|b| (format!("sku_brackets[{}]", b.label), b.add_on_months)),
        );
        add_ons.extend(
            self.regulatory_pathways
                .iter()
                .map(|p| (format!("regulatory_pathways[{}]", p.name), p.add_on_months)),
        );
        add_ons
    }

    fn check_components(&self, field: &'static str, values: &[String]) -> Result<(), CatalogError> {
        match values.iter().find(|v| !self.components.contains(v)) {
            Some(value) => Err(CatalogError::UnknownValue {
                field,
                value: value.clone(),
                domain: "component",
            }),
            None => Ok(()),
        }
    }

    pub fn project_type(&self, name: &str) -> Option<&ProjectTypeProfile> {
        self.project_types
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn pathway(&self, name: &str) -> Option<&RegulatoryPathway> {
        self.regulatory_pathways.iter().find(|p| p.name == name)
    }

    /// First declared bracket whose inclusive range contains `count`
    pub fn sku_bracket_for(&self, count: u32) -> Option<&SkuBracket> {
        self.sku_brackets.iter().find(|b| b.contains(count))
    }

    /// Division label: the home division alone, or every division joined
    pub fn division_label(&self, joint: bool) -> String {
        if joint {
            self.divisions.join(", ")
        } else {
            self.divisions.first().cloned().unwrap_or_default()
        }
    }

    /// Pathway names in catalog order
    pub fn pathway_names(&self) -> Vec<String> {
        self.regulatory_pathways.iter().map(|p| p.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        Catalog::default().validate().unwrap();
    }

    #[test]
    fn test_variability_increases_with_category() {
        let catalog = Catalog::default();
        let values: Vec<f64> = catalog.variability.iter().map(|(_, v)| v).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(catalog.variability.get(ComplexityCategory::Cc1), 0.05);
        assert_eq!(catalog.variability.get(ComplexityCategory::Cc6), 0.20);
    }

    #[test]
    fn test_sku_bracket_lookup() {
        let catalog = Catalog::default();
        assert_eq!(catalog.sku_bracket_for(1).unwrap().label, "1-5");
        assert_eq!(catalog.sku_bracket_for(10).unwrap().label, "6-25");
        assert_eq!(catalog.sku_bracket_for(500).unwrap().label, "200-500");
        assert!(catalog.sku_bracket_for(0).is_none());
        assert!(catalog.sku_bracket_for(501).is_none());
    }

    #[test]
    fn test_sku_bracket_overlap_first_declared_wins() {
        let catalog = Catalog::default();
        assert_eq!(catalog.sku_bracket_for(50).unwrap().label, "26-50");
        assert_eq!(catalog.sku_bracket_for(100).unwrap().label, "50-100");
        assert_eq!(catalog.sku_bracket_for(200).unwrap().label, "100-200");
    }

    #[test]
    fn test_division_labels() {
        let catalog = Catalog::default();
        assert_eq!(catalog.division_label(false), "Trauma & Extremities");
        assert_eq!(catalog.division_label(true), "Trauma & Extremities, Other");
    }

    #[test]
    fn test_project_type_lookup() {
        let catalog = Catalog::default();
        let profile = catalog.project_type("line extension").unwrap();
        assert_eq!(profile.base_months.get(ComplexityCategory::Cc3), 14.0);
        assert!(catalog.project_type("Unknown").is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_forced_pathway() {
        let mut catalog = Catalog::default();
        catalog.forced_pathway = "PMA".to_string();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnknownValue { field: "forced_pathway", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let mut catalog = Catalog::default();
        catalog.business_units.clear();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::EmptyList("business_units"))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_bracket() {
        let mut catalog = Catalog::default();
        catalog.sku_brackets[0].min = 10;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidBracket { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_fallback_component() {
        let mut catalog = Catalog::default();
        catalog.component_rules.fallback = vec!["Widgets".to_string()];
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_requires_alternative_components() {
        let mut catalog = Catalog::default();
        catalog.components = catalog.canonical_components.clone();
        catalog.component_rules.forbidden_pairs.clear();
        catalog.component_rules.small_set_pair = None;
        // Only subsets of the canonical set remain, and those still differ from it
        assert!(catalog.validate().is_ok());

        catalog.components = vec!["Implants".to_string()];
        catalog.canonical_components = vec!["Implants".to_string()];
        catalog.component_rules.fallback = vec!["Implants".to_string()];
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::NoAlternativeComponents)
        ));
    }

    #[test]
    fn test_validate_rejects_forbidden_fallback() {
        let mut catalog = Catalog::default();
        let pair = vec!["Software".to_string(), "Biologics".to_string()];
        catalog.component_rules.fallback = pair.clone();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::ForbiddenPairInSet { field: "component_rules.fallback", .. })
        ));

        let mut catalog = Catalog::default();
        catalog.canonical_components = pair;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::ForbiddenPairInSet { field: "canonical_components", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_add_ons() {
        let mut catalog = Catalog::default();
        catalog.modifiers.sterile_months = -50.0;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidAddOn { ref field, .. }) if field == "modifiers.sterile_months"
        ));

        let mut catalog = Catalog::default();
        catalog.sku_brackets[2].add_on_months = -1.0;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidAddOn { ref field, .. }) if field == "sku_brackets[26-50]"
        ));

        let mut catalog = Catalog::default();
        catalog.regulatory_pathways[0].add_on_months = f64::NAN;
        assert!(matches!(catalog.validate(), Err(CatalogError::InvalidAddOn { .. })));
    }

    #[test]
    fn test_validate_rejects_single_division() {
        let mut catalog = Catalog::default();
        catalog.divisions.truncate(1);
        catalog.joint_division_probability = 0.0;
        assert!(matches!(catalog.validate(), Err(CatalogError::TooFewDivisions)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let catalog = Catalog::default();
        let yaml = serde_yml::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_load_reports_yaml_errors() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "project_types: [\n  - bad").unwrap();
        assert!(matches!(Catalog::load(tmp.path()), Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_load_validates() {
        let mut catalog = Catalog::default();
        catalog.canonical_share = 1.5;
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), serde_yml::to_string(&catalog).unwrap()).unwrap();
        assert!(matches!(Catalog::load(tmp.path()), Err(YamlError::Catalog(_))));
    }
}
