//! Core module - scenario catalogs, generation engine and dataset I/O

pub mod catalog;
pub mod combinations;
pub mod complexity;
pub mod components;
pub mod config;
pub mod duration;
pub mod generate;
pub mod sampler;
pub mod scenario;
pub mod sink;
pub mod summary;

pub use catalog::{Catalog, CatalogError, SkuBracket};
pub use complexity::{CategoryTable, ComplexityCategory, Rating};
pub use components::ComponentRules;
pub use config::Config;
pub use duration::{DurationEstimate, DurationEstimator, DurationInputs, DurationRange};
pub use generate::{generate, BatchProgress, GenerateError};
pub use sampler::{CandidatePools, ScenarioSampler};
pub use scenario::{Scenario, Sterility, COLUMNS};
pub use sink::{DatasetSink, SinkError};
pub use summary::{DatasetSummary, SummaryError};
