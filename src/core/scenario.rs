//! Project scenario record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::complexity::{ComplexityCategory, Rating};
use crate::core::duration::DurationRange;

/// Column headers of the generated dataset, in output order
pub const COLUMNS: [&str; 13] = [
    "Project Type",
    "Business Units",
    "Business Impact",
    "Division Included",
    "Components",
    "Target Market",
    "Regulatory Path",
    "Design Complexity",
    "Manufacturing Complexity",
    "Overall Complexity Score",
    "SKU Count",
    "Sterility",
    "Actual Duration Range (months)",
];

/// Separator for multi-valued columns
pub const LIST_SEPARATOR: &str = ", ";

/// Whether the product is delivered sterile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sterility {
    Yes,
    No,
}

impl Sterility {
    pub const ALL: [Sterility; 2] = [Sterility::Yes, Sterility::No];
}

impl fmt::Display for Sterility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sterility::Yes => write!(f, "Yes"),
            Sterility::No => write!(f, "No"),
        }
    }
}

impl FromStr for Sterility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Sterility::Yes),
            "no" | "n" | "false" => Ok(Sterility::No),
            _ => Err(format!("Unknown sterility: {}", s)),
        }
    }
}

/// One synthesized development project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub project_type: String,
    pub business_units: Vec<String>,
    pub business_impacts: Vec<String>,
    pub division: String,
    pub components: Vec<String>,
    pub target_markets: Vec<String>,
    pub regulatory_pathways: Vec<String>,
    pub design_complexity: Rating,
    pub manufacturing_complexity: Rating,
    pub complexity: ComplexityCategory,
    pub sku_count: u32,
    pub sterility: Sterility,
    pub duration: DurationRange,
}

impl Scenario {
    /// Row cells in `COLUMNS` order
    pub fn to_record(&self) -> [String; 13] {
        [
            self.project_type.clone(),
            self.business_units.join(LIST_SEPARATOR),
            self.business_impacts.join(LIST_SEPARATOR),
            self.division.clone(),
            self.components.join(LIST_SEPARATOR),
            // Single-market dataset: only the first market is written
            self.target_markets.first().cloned().unwrap_or_default(),
            self.regulatory_pathways.join(LIST_SEPARATOR),
            self.design_complexity.to_string(),
            self.manufacturing_complexity.to_string(),
            self.complexity.to_string(),
            self.sku_count.to_string(),
            self.sterility.to_string(),
            self.duration.to_string(),
        ]
    }
}

impl TryFrom<&csv::StringRecord> for Scenario {
    type Error = String;

    /// Parse a data row written by the dataset sink
    fn try_from(record: &csv::StringRecord) -> Result<Self, Self::Error> {
        if record.len() != COLUMNS.len() {
            return Err(format!(
                "Expected {} columns, found {}",
                COLUMNS.len(),
                record.len()
            ));
        }
        let cell = |i: usize| record.get(i).unwrap_or_default();

        Ok(Scenario {
            project_type: cell(0).to_string(),
            business_units: split_list(cell(1)),
            business_impacts: split_list(cell(2)),
            division: cell(3).to_string(),
            components: split_list(cell(4)),
            target_markets: split_list(cell(5)),
            regulatory_pathways: split_list(cell(6)),
            design_complexity: cell(7).parse()?,
            manufacturing_complexity: cell(8).parse()?,
            complexity: cell(9).parse()?,
            sku_count: cell(10)
                .trim()
                .parse()
                .map_err(|_| format!("Invalid SKU count: {}", cell(10)))?,
            sterility: cell(11).parse()?,
            duration: cell(12).parse()?,
        })
    }
}

/// Split a multi-valued cell back into its members
pub fn split_list(cell: &str) -> Vec<String> {
    if cell.trim().is_empty() {
        return Vec::new();
    }
    cell.split(LIST_SEPARATOR).map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Scenario {
        Scenario {
            project_type: "New system".to_string(),
            business_units: vec!["Foot & Ankle".to_string(), "Trauma".to_string()],
            business_impacts: vec!["Innovation".to_string()],
            division: "Trauma & Extremities".to_string(),
            components: vec![
                "Implants".to_string(),
                "Instruments".to_string(),
                "Cases & Trays".to_string(),
            ],
            target_markets: vec!["United States".to_string()],
            regulatory_pathways: vec!["510(k)".to_string()],
            design_complexity: Rating::Medium,
            manufacturing_complexity: Rating::High,
            complexity: ComplexityCategory::Cc5,
            sku_count: 42,
            sterility: Sterility::Yes,
            duration: DurationRange {
                lower: 40.5,
                upper: 52.25,
            },
        }
    }

    #[test]
    fn test_record_layout() {
        let record = sample().to_record();
        assert_eq!(record.len(), COLUMNS.len());
        assert_eq!(record[1], "Foot & Ankle, Trauma");
        assert_eq!(record[4], "Implants, Instruments, Cases & Trays");
        assert_eq!(record[5], "United States");
        assert_eq!(record[7], "2");
        assert_eq!(record[9], "CC5");
        assert_eq!(record[11], "Yes");
        assert_eq!(record[12], "40.50-52.25");
    }

    #[test]
    fn test_record_parses_back() {
        let original = sample();
        let record = csv::StringRecord::from(original.to_record().to_vec());
        let parsed = Scenario::try_from(&record).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_record_with_wrong_width() {
        let record = csv::StringRecord::from(vec!["New system", "Trauma"]);
        assert!(Scenario::try_from(&record).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Implants, Instruments, Cases & Trays"),
            vec!["Implants", "Instruments", "Cases & Trays"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_sterility_parse() {
        assert_eq!("Yes".parse::<Sterility>().unwrap(), Sterility::Yes);
        assert_eq!("no".parse::<Sterility>().unwrap(), Sterility::No);
        assert!("maybe".parse::<Sterility>().is_err());
    }
}
