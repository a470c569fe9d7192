//! Shared helper functions for CLI commands
//!
//! Configuration resolution, catalog loading and value checks used by
//! several command modules.

use miette::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::GlobalOpts;
use crate::core::{Catalog, Config};

/// Layered config with command-line overrides applied last
pub fn resolve_config(global: &GlobalOpts, overrides: Config) -> Result<Config> {
    let mut config = Config::load()?;
    config.merge(Config {
        catalog: global.catalog.clone(),
        ..Config::default()
    });
    config.merge(overrides);
    Ok(config)
}

/// Catalog override from config, or the built-in catalog
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog {
        Some(path) => Ok(Catalog::load(path)?),
        None => Ok(Catalog::default()),
    }
}

/// Resolve config and catalog for commands that take no extra settings
pub fn catalog_for(global: &GlobalOpts) -> Result<Catalog> {
    let config = resolve_config(global, Config::default())?;
    load_catalog(&config)
}

/// Seeded RNG when a seed is given, OS-seeded otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Check every value belongs to `domain`, naming the first one that does not
pub fn ensure_known(kind: &str, values: &[String], domain: &[String]) -> Result<()> {
    if let Some(unknown) = values.iter().find(|v| !domain.contains(v)) {
        return Err(miette::miette!(
            help = format!("Known {}s: {}", kind, domain.join(", ")),
            "Unknown {}: '{}'",
            kind,
            unknown
        ));
    }
    Ok(())
}

/// Keep `values` in catalog order, dropping duplicates
pub fn in_catalog_order(values: &[String], domain: &[String]) -> Vec<String> {
    domain
        .iter()
        .filter(|d| values.contains(d))
        .cloned()
        .collect()
}
