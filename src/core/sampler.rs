//! Scenario sampling
//!
//! Candidate pools for every multi-valued attribute are enumerated once. The
//! component dimension is biased: a fixed share of all samples is reserved for
//! the canonical component set, and the rest is filled uniformly from every
//! other validated combination. Each row then draws its remaining attributes
//! independently.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::catalog::Catalog;
use crate::core::combinations::non_empty_subsets;
use crate::core::complexity::{ComplexityCategory, Rating};
use crate::core::components::same_members;
use crate::core::duration::{DurationError, DurationEstimator, DurationInputs};
use crate::core::scenario::{Scenario, Sterility};

/// Uniform pick from a non-empty slice
///
/// Catalog validation guarantees every pool is non-empty.
fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Enumerated candidates for each multi-valued attribute
#[derive(Debug, Clone)]
pub struct CandidatePools {
    pub business_units: Vec<Vec<String>>,
    pub business_impacts: Vec<Vec<String>>,
    /// Validated form of every component subset
    pub components: Vec<Vec<String>>,
    pub regulatory_pathways: Vec<Vec<String>>,
}

impl CandidatePools {
    pub fn build(catalog: &Catalog) -> Self {
        let rules = &catalog.component_rules;
        Self {
            business_units: non_empty_subsets(&catalog.business_units),
            business_impacts: non_empty_subsets(&catalog.business_impacts),
            components: non_empty_subsets(&catalog.components)
                .iter()
                .map(|combo| rules.validate(combo))
                .collect(),
            regulatory_pathways: non_empty_subsets(&catalog.pathway_names()),
        }
    }

    /// Validated component combinations other than `canonical`
    pub fn alternative_components(&self, canonical: &[String]) -> Vec<Vec<String>> {
        self.components
            .iter()
            .filter(|combo| !same_members(combo, canonical))
            .cloned()
            .collect()
    }
}

/// Build the shuffled component choice list for a run of `num_samples`
///
/// `floor(share * num_samples)` entries are the canonical set; the rest are a
/// uniform draw from `alternatives`, taken by repeating the pool until it is
/// long enough and sampling without replacement from that.
pub fn component_choices<R: Rng + ?Sized>(
    canonical: &[String],
    share: f64,
    alternatives: &[Vec<String>],
    num_samples: usize,
    rng: &mut R,
) -> Vec<Vec<String>> {
    let canonical_count = ((share * num_samples as f64).floor() as usize).min(num_samples);
    let needed = num_samples - canonical_count;

    let mut remaining: Vec<Vec<String>> = Vec::new();
    if !alternatives.is_empty() {
        while remaining.len() < needed {
            remaining.extend_from_slice(alternatives);
        }
    }
    remaining.shuffle(rng);
    remaining.truncate(needed);

    let mut choices = vec![canonical.to_vec(); canonical_count];
    choices.append(&mut remaining);
    choices.shuffle(rng);
    choices
}

/// Draws scenarios for one run
pub struct ScenarioSampler<'c, R> {
    catalog: &'c Catalog,
    estimator: DurationEstimator<'c>,
    pools: CandidatePools,
    component_choices: Vec<Vec<String>>,
    remaining: usize,
    rng: R,
}

impl<'c, R: Rng> ScenarioSampler<'c, R> {
    /// Prepare a run of `num_samples` scenarios from a validated catalog
    pub fn new(catalog: &'c Catalog, num_samples: usize, mut rng: R) -> Self {
        let pools = CandidatePools::build(catalog);
        let alternatives = pools.alternative_components(&catalog.canonical_components);
        let component_choices = component_choices(
            &catalog.canonical_components,
            catalog.canonical_share,
            &alternatives,
            num_samples,
            &mut rng,
        );

        Self {
            catalog,
            estimator: DurationEstimator::new(catalog),
            pools,
            component_choices,
            remaining: num_samples,
            rng,
        }
    }

    pub fn pools(&self) -> &CandidatePools {
        &self.pools
    }

    /// The shuffled per-run component choice list
    pub fn component_choices(&self) -> &[Vec<String>] {
        &self.component_choices
    }

    /// Scenarios left in this run
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Draw up to `size` scenarios, fewer when the run is nearly done
    pub fn next_batch(&mut self, size: usize) -> Result<Vec<Scenario>, DurationError> {
        let count = size.min(self.remaining);
        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            batch.push(self.draw()?);
        }
        self.remaining -= count;
        Ok(batch)
    }

    /// Draw a single scenario
    pub fn draw(&mut self) -> Result<Scenario, DurationError> {
        let catalog = self.catalog;
        let rng = &mut self.rng;

        let profile = pick(rng, &catalog.project_types);
        let business_units = pick(rng, &self.pools.business_units).clone();
        let business_impacts = pick(rng, &self.pools.business_impacts).clone();
        let joint = rng.random_bool(catalog.joint_division_probability);
        let division = catalog.division_label(joint);
        let component_choice = if self.component_choices.is_empty() {
            catalog.canonical_components.clone()
        } else {
            pick(rng, &self.component_choices).clone()
        };
        let mut regulatory_pathways = pick(rng, &self.pools.regulatory_pathways).clone();
        let design_complexity = *pick(rng, &Rating::ALL);
        let manufacturing_complexity = *pick(rng, &Rating::ALL);

        let complexity = ComplexityCategory::classify(design_complexity, manufacturing_complexity);
        if complexity.requires_clearance() && !regulatory_pathways.contains(&catalog.forced_pathway)
        {
            regulatory_pathways = catalog
                .pathway_names()
                .into_iter()
                .filter(|p| regulatory_pathways.contains(p) || *p == catalog.forced_pathway)
                .collect();
        }

        let components = catalog.component_rules.validate(&component_choice);

        let bracket = pick(rng, &catalog.sku_brackets);
        let sku_count = rng.random_range(bracket.min..=bracket.max);
        let sterility = *pick(rng, &Sterility::ALL);

        let base_months = profile.base_months.get(complexity);
        let estimate = self.estimator.estimate(&DurationInputs {
            base_months,
            category: complexity,
            division: &division,
            business_units: &business_units,
            components: &components,
            sku_count,
            sterility,
            pathways: &regulatory_pathways,
        })?;

        Ok(Scenario {
            project_type: profile.name.clone(),
            business_units,
            business_impacts,
            division,
            components,
            target_markets: catalog.target_markets.clone(),
            regulatory_pathways,
            design_complexity,
            manufacturing_complexity,
            complexity,
            sku_count,
            sterility,
            duration: estimate.range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_all(catalog: &Catalog, n: usize, seed: u64) -> Vec<Scenario> {
        let mut sampler = ScenarioSampler::new(catalog, n, StdRng::seed_from_u64(seed));
        let mut all = Vec::new();
        while sampler.remaining() > 0 {
            all.extend(sampler.next_batch(1000).unwrap());
        }
        all
    }

    #[test]
    fn test_pool_sizes() {
        let pools = CandidatePools::build(&Catalog::default());
        assert_eq!(pools.business_units.len(), 7);
        assert_eq!(pools.business_impacts.len(), 15);
        assert_eq!(pools.components.len(), 255);
        assert_eq!(pools.regulatory_pathways.len(), 3);
    }

    #[test]
    fn test_alternatives_exclude_canonical() {
        let catalog = Catalog::default();
        let pools = CandidatePools::build(&catalog);
        let alternatives = pools.alternative_components(&catalog.canonical_components);
        assert!(!alternatives.is_empty());
        assert!(alternatives
            .iter()
            .all(|c| !same_members(c, &catalog.canonical_components)));
    }

    #[test]
    fn test_component_choices_reserve_canonical_share() {
        let catalog = Catalog::default();
        let pools = CandidatePools::build(&catalog);
        let alternatives = pools.alternative_components(&catalog.canonical_components);
        let mut rng = StdRng::seed_from_u64(7);

        let choices = component_choices(
            &catalog.canonical_components,
            0.70,
            &alternatives,
            3000,
            &mut rng,
        );
        assert_eq!(choices.len(), 3000);
        let canonical = choices
            .iter()
            .filter(|c| **c == catalog.canonical_components)
            .count();
        assert_eq!(canonical, 2100);
    }

    #[test]
    fn test_component_choices_small_runs() {
        let catalog = Catalog::default();
        let alternatives = vec![vec!["OEM".to_string()]];
        let mut rng = StdRng::seed_from_u64(1);

        assert!(component_choices(&catalog.canonical_components, 0.7, &alternatives, 0, &mut rng)
            .is_empty());
        let one = component_choices(&catalog.canonical_components, 0.7, &alternatives, 1, &mut rng);
        assert_eq!(one, vec![vec!["OEM".to_string()]]);
    }

    #[test]
    fn test_batches_cover_requested_samples() {
        let catalog = Catalog::default();
        let mut sampler = ScenarioSampler::new(&catalog, 2500, StdRng::seed_from_u64(3));
        assert_eq!(sampler.next_batch(1000).unwrap().len(), 1000);
        assert_eq!(sampler.next_batch(1000).unwrap().len(), 1000);
        assert_eq!(sampler.next_batch(1000).unwrap().len(), 500);
        assert!(sampler.next_batch(1000).unwrap().is_empty());
        assert_eq!(sampler.remaining(), 0);
    }

    #[test]
    fn test_scenario_invariants() {
        let catalog = Catalog::default();
        let rules = &catalog.component_rules;
        for s in sample_all(&catalog, 3000, 42) {
            assert_eq!(
                s.complexity,
                ComplexityCategory::classify(s.design_complexity, s.manufacturing_complexity)
            );
            assert!(rules.forbidden_pair_in(&s.components).is_none());
            if s.complexity.requires_clearance() {
                assert!(s.regulatory_pathways.contains(&"510(k)".to_string()));
            }
            assert!(s.duration.lower > 0.0);
            assert!(s.duration.lower <= s.duration.upper);
            assert!(catalog.sku_bracket_for(s.sku_count).is_some());
            assert!(!s.business_units.is_empty());
            assert!(!s.business_impacts.is_empty());
            assert_eq!(s.target_markets, vec!["United States".to_string()]);
        }
    }

    #[test]
    fn test_duration_format_has_two_decimals() {
        let catalog = Catalog::default();
        for s in sample_all(&catalog, 500, 11) {
            let text = s.duration.to_string();
            let (lower, upper) = text.split_once('-').unwrap();
            for bound in [lower, upper] {
                let (_, decimals) = bound.split_once('.').unwrap();
                assert_eq!(decimals.len(), 2, "{}", text);
            }
        }
    }

    #[test]
    fn test_canonical_share() {
        let catalog = Catalog::default();
        let scenarios = sample_all(&catalog, 3000, 2024);
        let canonical = scenarios
            .iter()
            .filter(|s| same_members(&s.components, &catalog.canonical_components))
            .count();
        let share = canonical as f64 / 3000.0;
        assert!((0.67..=0.73).contains(&share), "canonical share {}", share);
    }

    #[test]
    fn test_joint_division_is_rare() {
        let catalog = Catalog::default();
        let joint = sample_all(&catalog, 3000, 5)
            .iter()
            .filter(|s| s.division == "Trauma & Extremities, Other")
            .count();
        assert!((60..=270).contains(&joint), "joint divisions {}", joint);
    }

    #[test]
    fn test_forced_pathway_keeps_catalog_order() {
        let catalog = Catalog::default();
        for s in sample_all(&catalog, 1000, 9) {
            if s.regulatory_pathways.len() == 2 {
                assert_eq!(s.regulatory_pathways, catalog.pathway_names());
            }
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let catalog = Catalog::default();
        assert_eq!(sample_all(&catalog, 200, 99), sample_all(&catalog, 200, 99));
        assert_ne!(sample_all(&catalog, 200, 99), sample_all(&catalog, 200, 100));
    }
}
