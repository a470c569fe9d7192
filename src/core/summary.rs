//! Dataset summary - reads a generated file back and checks it against the catalog

use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::complexity::ComplexityCategory;
use crate::core::components::same_members;
use crate::core::scenario::{Scenario, COLUMNS};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected header row: {0}")]
    Header(String),

    #[error("Row {row}: {message}")]
    Row { row: usize, message: String },
}

/// Aggregate view of a generated dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Header rows seen; appending runs each write one
    pub runs: usize,
    pub rows: usize,
    pub canonical_rows: usize,
    pub by_category: BTreeMap<ComplexityCategory, usize>,
    pub joint_division_rows: usize,
    pub mean_lower: f64,
    pub mean_upper: f64,

    /// Category does not match the design/manufacturing pair
    pub classification_mismatches: usize,
    /// Component set contains a forbidden pair
    pub forbidden_pair_rows: usize,
    /// CC3+ row without the forced pathway
    pub missing_forced_pathway: usize,
    /// SKU count outside every bracket
    pub sku_out_of_range: usize,
    /// Lower bound above upper, or a non-positive bound
    pub invalid_ranges: usize,
}

impl DatasetSummary {
    pub fn from_path(path: &Path, catalog: &Catalog) -> Result<Self, SummaryError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(file, catalog)
    }

    pub fn from_reader<R: std::io::Read>(reader: R, catalog: &Catalog) -> Result<Self, SummaryError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?;
        if !headers.iter().eq(COLUMNS.iter().copied()) {
            return Err(SummaryError::Header(
                headers.iter().collect::<Vec<_>>().join(","),
            ));
        }

        let mut summary = DatasetSummary {
            runs: 1,
            ..DatasetSummary::default()
        };
        let mut lower_total = 0.0;
        let mut upper_total = 0.0;

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.iter().eq(COLUMNS.iter().copied()) {
                summary.runs += 1;
                continue;
            }
            // Header is row 1
            let row = idx + 2;
            let scenario =
                Scenario::try_from(&record).map_err(|message| SummaryError::Row { row, message })?;
            summary.record(&scenario, catalog);
            lower_total += scenario.duration.lower;
            upper_total += scenario.duration.upper;
        }

        if summary.rows > 0 {
            summary.mean_lower = lower_total / summary.rows as f64;
            summary.mean_upper = upper_total / summary.rows as f64;
        }
        Ok(summary)
    }

    fn record(&mut self, scenario: &Scenario, catalog: &Catalog) {
        self.rows += 1;
        *self.by_category.entry(scenario.complexity).or_insert(0) += 1;

        if same_members(&scenario.components, &catalog.canonical_components) {
            self.canonical_rows += 1;
        }
        if scenario.division == catalog.division_label(true) {
            self.joint_division_rows += 1;
        }

        let expected = ComplexityCategory::classify(
            scenario.design_complexity,
            scenario.manufacturing_complexity,
        );
        if expected != scenario.complexity {
            self.classification_mismatches += 1;
        }
        if catalog
            .component_rules
            .forbidden_pair_in(&scenario.components)
            .is_some()
        {
            self.forbidden_pair_rows += 1;
        }
        if scenario.complexity.requires_clearance()
            && !scenario.regulatory_pathways.contains(&catalog.forced_pathway)
        {
            self.missing_forced_pathway += 1;
        }
        if catalog.sku_bracket_for(scenario.sku_count).is_none() {
            self.sku_out_of_range += 1;
        }
        let range = scenario.duration;
        if range.lower <= 0.0 || range.lower > range.upper {
            self.invalid_ranges += 1;
        }
    }

    /// Share of rows using exactly the canonical component set
    pub fn canonical_share(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.canonical_rows as f64 / self.rows as f64
        }
    }

    /// Total rows breaking any generation invariant
    pub fn violations(&self) -> usize {
        self.classification_mismatches
            + self.forbidden_pair_rows
            + self.missing_forced_pathway
            + self.sku_out_of_range
            + self.invalid_ranges
    }
}
