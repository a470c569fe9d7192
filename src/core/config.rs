//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::generate::{DEFAULT_BATCH_SIZE, DEFAULT_NUM_SAMPLES};
use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Default dataset file name
pub const DEFAULT_OUTPUT: &str = "project_scenarios.csv";

/// Working-directory config file name
pub const LOCAL_CONFIG: &str = "devscen.yaml";

/// Run configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scenarios to generate per run
    pub num_samples: Option<usize>,

    /// Rows per flushed batch
    pub batch_size: Option<usize>,

    /// Dataset path
    pub output: Option<PathBuf>,

    /// Seed for reproducible runs
    pub seed: Option<u64>,

    /// Catalog override file
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// Unreadable or malformed files are reported; missing ones are skipped.
    pub fn load() -> Result<Self, YamlError> {
        let mut config = Config::default();

        // 1. Built-in defaults (resolved by the accessors)

        // 2. Global user config (~/.config/devscen/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path)? {
                config.merge(global);
            }
        }

        // 3. Working-directory config (./devscen.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG))? {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env());

        Ok(config)
    }

    /// Read one config file, `None` when it does not exist
    pub fn read_file(path: &Path) -> Result<Option<Config>, YamlError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Some(Config::default()));
        }
        serde_yml::from_str::<Config>(&contents)
            .map(Some)
            .map_err(|e| {
                YamlSyntaxError::from_serde_error(&e, &contents, &path.display().to_string()).into()
            })
    }

    /// Settings from `DEVSCEN_*` environment variables
    ///
    /// Values that fail to parse are ignored.
    fn from_env() -> Config {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Config {
            num_samples: var("DEVSCEN_SAMPLES").and_then(|v| v.trim().parse().ok()),
            batch_size: var("DEVSCEN_BATCH_SIZE").and_then(|v| v.trim().parse().ok()),
            output: var("DEVSCEN_OUTPUT").map(PathBuf::from),
            seed: var("DEVSCEN_SEED").and_then(|v| v.trim().parse().ok()),
            catalog: var("DEVSCEN_CATALOG").map(PathBuf::from),
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "devscen")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.num_samples.is_some() {
            self.num_samples = other.num_samples;
        }
        if other.batch_size.is_some() {
            self.batch_size = other.batch_size;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples.unwrap_or(DEFAULT_NUM_SAMPLES)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.num_samples(), 3000);
        assert_eq!(config.batch_size(), 1000);
        assert_eq!(config.output(), PathBuf::from("project_scenarios.csv"));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            num_samples: Some(10),
            seed: Some(1),
            ..Config::default()
        };
        base.merge(Config {
            num_samples: Some(20),
            output: Some(PathBuf::from("x.csv")),
            ..Config::default()
        });
        assert_eq!(base.num_samples(), 20);
        assert_eq!(base.seed, Some(1));
        assert_eq!(base.output(), PathBuf::from("x.csv"));
    }

    #[test]
    fn test_read_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devscen.yaml");
        std::fs::write(&path, "num_samples: 500\nseed: 42\n").unwrap();

        let config = Config::read_file(&path).unwrap().unwrap();
        assert_eq!(config.num_samples, Some(500));
        assert_eq!(config.seed, Some(42));
        assert!(config.batch_size.is_none());
    }

    #[test]
    fn test_read_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::read_file(&tmp.path().join("nope.yaml"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_read_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devscen.yaml");
        std::fs::write(&path, "num_samples: [1,\n").unwrap();
        assert!(matches!(Config::read_file(&path), Err(YamlError::Syntax(_))));
    }
}
