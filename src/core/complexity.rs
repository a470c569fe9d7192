//! Complexity classification
//!
//! Design and manufacturing complexity are each rated 1-3. The pair is folded
//! into one of six ordered categories (CC1..CC6) by sum-rank, with the
//! symmetric off-diagonal cells of the 3x3 grid sharing a category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single complexity rating on the 1-3 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Low, Rating::Medium, Rating::High];

    /// Numeric value (1, 2 or 3)
    pub fn value(self) -> u8 {
        self as u8
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Low),
            2 => Ok(Rating::Medium),
            3 => Ok(Rating::High),
            _ => Err(format!("Complexity rating must be 1, 2 or 3 (got {})", value)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid complexity rating: {}", s))?;
        Rating::try_from(value)
    }
}

/// Overall complexity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityCategory {
    #[serde(rename = "CC1")]
    Cc1,
    #[serde(rename = "CC2")]
    Cc2,
    #[serde(rename = "CC3")]
    Cc3,
    #[serde(rename = "CC4")]
    Cc4,
    #[serde(rename = "CC5")]
    Cc5,
    #[serde(rename = "CC6")]
    Cc6,
}

/// Category for each (design, manufacturing) cell, indexed `[design - 1][mfg - 1]`
const CATEGORY_GRID: [[ComplexityCategory; 3]; 3] = {
    use ComplexityCategory::*;
    [[Cc1, Cc2, Cc3], [Cc2, Cc4, Cc5], [Cc3, Cc5, Cc6]]
};

impl ComplexityCategory {
    pub const ALL: [ComplexityCategory; 6] = [
        ComplexityCategory::Cc1,
        ComplexityCategory::Cc2,
        ComplexityCategory::Cc3,
        ComplexityCategory::Cc4,
        ComplexityCategory::Cc5,
        ComplexityCategory::Cc6,
    ];

    /// Classify a design/manufacturing rating pair
    pub fn classify(design: Rating, manufacturing: Rating) -> Self {
        CATEGORY_GRID[design.index()][manufacturing.index()]
    }

    /// Categories CC3 and above must go through the cleared regulatory pathway
    pub fn requires_clearance(self) -> bool {
        self >= ComplexityCategory::Cc3
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityCategory::Cc1 => "CC1",
            ComplexityCategory::Cc2 => "CC2",
            ComplexityCategory::Cc3 => "CC3",
            ComplexityCategory::Cc4 => "CC4",
            ComplexityCategory::Cc5 => "CC5",
            ComplexityCategory::Cc6 => "CC6",
        }
    }
}

impl fmt::Display for ComplexityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplexityCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown complexity category: {}", s))
    }
}

/// A value for each complexity category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(rename = "CC1")]
    pub cc1: f64,
    #[serde(rename = "CC2")]
    pub cc2: f64,
    #[serde(rename = "CC3")]
    pub cc3: f64,
    #[serde(rename = "CC4")]
    pub cc4: f64,
    #[serde(rename = "CC5")]
    pub cc5: f64,
    #[serde(rename = "CC6")]
    pub cc6: f64,
}

impl CategoryTable {
    pub const fn new(values: [f64; 6]) -> Self {
        Self {
            cc1: values[0],
            cc2: values[1],
            cc3: values[2],
            cc4: values[3],
            cc5: values[4],
            cc6: values[5],
        }
    }

    pub fn get(&self, category: ComplexityCategory) -> f64 {
        match category {
            ComplexityCategory::Cc1 => self.cc1,
            ComplexityCategory::Cc2 => self.cc2,
            ComplexityCategory::Cc3 => self.cc3,
            ComplexityCategory::Cc4 => self.cc4,
            ComplexityCategory::Cc5 => self.cc5,
            ComplexityCategory::Cc6 => self.cc6,
        }
    }

    /// Iterate `(category, value)` in category order
    pub fn iter(&self) -> impl Iterator<Item = (ComplexityCategory, f64)> + '_ {
        ComplexityCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(v: u8) -> Rating {
        Rating::try_from(v).unwrap()
    }

    #[test]
    fn test_classification_grid() {
        let expected = [
            ((1, 1), "CC1"),
            ((1, 2), "CC2"),
            ((2, 1), "CC2"),
            ((1, 3), "CC3"),
            ((3, 1), "CC3"),
            ((2, 2), "CC4"),
            ((2, 3), "CC5"),
            ((3, 2), "CC5"),
            ((3, 3), "CC6"),
        ];
        for ((d, m), cat) in expected {
            assert_eq!(
                ComplexityCategory::classify(r(d), r(m)).to_string(),
                cat,
                "design={} mfg={}",
                d,
                m
            );
        }
    }

    #[test]
    fn test_classification_is_symmetric() {
        for d in Rating::ALL {
            for m in Rating::ALL {
                assert_eq!(
                    ComplexityCategory::classify(d, m),
                    ComplexityCategory::classify(m, d)
                );
            }
        }
    }

    #[test]
    fn test_requires_clearance() {
        assert!(!ComplexityCategory::Cc1.requires_clearance());
        assert!(!ComplexityCategory::Cc2.requires_clearance());
        assert!(ComplexityCategory::Cc3.requires_clearance());
        assert!(ComplexityCategory::Cc6.requires_clearance());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::try_from(0).is_err());
        assert!(Rating::try_from(4).is_err());
        assert_eq!("2".parse::<Rating>().unwrap(), Rating::Medium);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("cc4".parse::<ComplexityCategory>().unwrap(), ComplexityCategory::Cc4);
        assert!("CC7".parse::<ComplexityCategory>().is_err());
    }

    #[test]
    fn test_category_table_yaml_keys() {
        let table = CategoryTable::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let yaml = serde_yml::to_string(&table).unwrap();
        assert!(yaml.contains("CC1: 1.0"));
        let parsed: CategoryTable = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.get(ComplexityCategory::Cc5), 5.0);
    }
}
