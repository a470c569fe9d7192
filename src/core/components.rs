//! Component set validation
//!
//! Some component families never ship together. A set containing any
//! forbidden pair is replaced wholesale by the fallback set; there is no
//! partial repair.

use serde::{Deserialize, Serialize};

/// A pair allowed on its own but not inside larger sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmallSetRule {
    pub pair: [String; 2],

    /// Member removed when the pair appears in a set of three or more
    pub drop: String,
}

/// Forbidden pairings and the fallback used when one is found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRules {
    pub forbidden_pairs: Vec<[String; 2]>,
    pub fallback: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_set_pair: Option<SmallSetRule>,
}

fn pair(a: &str, b: &str) -> [String; 2] {
    [a.to_string(), b.to_string()]
}

impl Default for ComponentRules {
    fn default() -> Self {
        Self {
            forbidden_pairs: vec![
                pair("Software", "Biologics"),
                pair("Software", "Cases & Trays"),
                pair("Biologics", "Cases & Trays"),
                pair("Software", "Combination Devices"),
                pair("Software", "OEM"),
                pair("Biologics", "Implants"),
                pair("Biologics", "Electronics"),
                pair("Electronics", "Combination Devices"),
                pair("Combination Devices", "Implants"),
                pair("Cases & Trays", "Software"),
            ],
            fallback: vec![
                "Implants".to_string(),
                "Instruments".to_string(),
                "Cases & Trays".to_string(),
            ],
            small_set_pair: Some(SmallSetRule {
                pair: pair("Software", "Biologics"),
                drop: "Biologics".to_string(),
            }),
        }
    }
}

/// Order-insensitive set comparison
pub fn same_members(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

fn contains_pair(components: &[String], [a, b]: &[String; 2]) -> bool {
    components.contains(a) && components.contains(b)
}

impl ComponentRules {
    /// First forbidden pair present in `components`, if any
    pub fn forbidden_pair_in(&self, components: &[String]) -> Option<&[String; 2]> {
        self.forbidden_pairs
            .iter()
            .find(|p| contains_pair(components, p))
    }

    /// Return the corrected form of `components`
    pub fn validate(&self, components: &[String]) -> Vec<String> {
        let mut result = if self.forbidden_pair_in(components).is_some() {
            self.fallback.clone()
        } else {
            components.to_vec()
        };

        if let Some(rule) = &self.small_set_pair {
            if result.len() > 2 && contains_pair(&result, &rule.pair) {
                result.retain(|c| *c != rule.drop);
            }
        }

        result
    }

    /// True when `validate` would return `components` unchanged
    pub fn is_valid(&self, components: &[String]) -> bool {
        self.validate(components) == components
    }
}
