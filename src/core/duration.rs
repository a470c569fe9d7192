//! Duration range estimation
//!
//! Variability scales only the base, complexity-driven duration. Situational
//! modifiers (division scope, business units, digital components, SKU volume,
//! sterility, regulatory pathway) shift both bounds by the same fixed offset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::complexity::ComplexityCategory;
use crate::core::scenario::Sterility;

#[derive(Debug, Error, PartialEq)]
pub enum DurationError {
    #[error("SKU count {0} is outside every catalog bracket")]
    SkuOutOfRange(u32),
}

/// Lower/upper estimate in months
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub lower: f64,
    pub upper: f64,
}

impl fmt::Display for DurationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}-{:.2}", self.lower, self.upper)
    }
}

impl FromStr for DurationRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lower, upper) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Duration range must look like 'lower-upper': {}", s))?;
        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| format!("Invalid duration bound '{}' in {}", v, s))
        };
        Ok(DurationRange {
            lower: parse(lower)?,
            upper: parse(upper)?,
        })
    }
}

/// Everything the estimator reads about one scenario
#[derive(Debug, Clone, Copy)]
pub struct DurationInputs<'a> {
    pub base_months: f64,
    pub category: ComplexityCategory,
    pub division: &'a str,
    pub business_units: &'a [String],
    pub components: &'a [String],
    pub sku_count: u32,
    pub sterility: Sterility,
    pub pathways: &'a [String],
}

/// One triggered modifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub reason: String,
    pub months: f64,
}

/// Estimate with the pieces that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationEstimate {
    pub base_months: f64,
    pub variability: f64,
    pub adjustments: Vec<Adjustment>,
    pub range: DurationRange,
}

impl DurationEstimate {
    /// Sum of the triggered modifiers
    pub fn additions(&self) -> f64 {
        self.adjustments.iter().map(|a| a.months).sum()
    }
}

/// Duration estimator bound to a catalog
#[derive(Debug, Clone, Copy)]
pub struct DurationEstimator<'c> {
    catalog: &'c Catalog,
}

impl<'c> DurationEstimator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Estimate the duration range for one scenario
    ///
    /// Every catalog pathway listed in `inputs.pathways` adds its own
    /// `add_on_months`. With the built-in catalog only "510(k)" carries a
    /// non-zero add-on (4.14 months), so the pathway adjustment is that fixed
    /// amount whenever 510(k) is present.
    ///
    /// The joint-division add-on applies when `inputs.division` equals the
    /// catalog's joint label. `Catalog::validate` requires two or more
    /// divisions so that label never matches a single-division scenario.
    pub fn estimate(&self, inputs: &DurationInputs<'_>) -> Result<DurationEstimate, DurationError> {
        let catalog = self.catalog;
        let modifiers = &catalog.modifiers;

        let variability = catalog.variability.get(inputs.category);
        let lower_base = inputs.base_months * (1.0 - variability);
        let upper_base = inputs.base_months * (1.0 + variability);

        let mut adjustments = Vec::new();
        let mut add = |reason: String, months: f64| adjustments.push(Adjustment { reason, months });

        if inputs.division == catalog.division_label(true) {
            add("joint division".to_string(), modifiers.joint_division_months);
        }

        if inputs.business_units.len() > 1 {
            add(
                "multiple business units".to_string(),
                modifiers.multiple_business_units_months,
            );
        }

        if let Some(digital) = inputs
            .components
            .iter()
            .find(|c| modifiers.digital_components.contains(c))
        {
            add(digital.to_lowercase(), modifiers.digital_components_months);
        }

        let bracket = catalog
            .sku_bracket_for(inputs.sku_count)
            .ok_or(DurationError::SkuOutOfRange(inputs.sku_count))?;
        add(format!("SKU bracket {}", bracket.label), bracket.add_on_months);

        if inputs.sterility == Sterility::Yes {
            add("sterile".to_string(), modifiers.sterile_months);
        }

        for pathway in &catalog.regulatory_pathways {
            if inputs.pathways.contains(&pathway.name) {
                add(pathway.name.clone(), pathway.add_on_months);
            }
        }

        // Zero-month entries (smallest bracket, Letter to File) carry no information
        adjustments.retain(|a| a.months != 0.0);

        let mut estimate = DurationEstimate {
            base_months: inputs.base_months,
            variability,
            adjustments,
            range: DurationRange {
                lower: lower_base,
                upper: upper_base,
            },
        };
        let additions = estimate.additions();
        estimate.range.lower += additions;
        estimate.range.upper += additions;

        Ok(estimate)
    }
}
