//! Batch generation pipeline
//!
//! Strictly sequential: each batch is drawn in full, appended to the sink,
//! and only then is the next batch started. A sink failure aborts the run and
//! leaves the rows of earlier batches in place.

use rand::Rng;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::duration::DurationError;
use crate::core::sampler::ScenarioSampler;
use crate::core::sink::{DatasetSink, SinkError};

pub const DEFAULT_NUM_SAMPLES: usize = 3000;
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
}

/// Progress after a batch has been flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based batch number
    pub batch: usize,
    pub total_batches: usize,
    /// Half-open row range covered by this batch
    pub start: usize,
    pub end: usize,
}

/// Number of batches needed for `num_samples`
pub fn batch_count(num_samples: usize, batch_size: usize) -> usize {
    num_samples.div_ceil(batch_size.max(1))
}

/// Generate `num_samples` scenarios into `sink`, calling `on_batch` after each flush
///
/// Returns the number of rows written.
pub fn generate<R, F>(
    catalog: &Catalog,
    num_samples: usize,
    batch_size: usize,
    rng: R,
    sink: &mut DatasetSink,
    mut on_batch: F,
) -> Result<usize, GenerateError>
where
    R: Rng,
    F: FnMut(BatchProgress),
{
    if batch_size == 0 {
        return Err(GenerateError::ZeroBatchSize);
    }

    let mut sampler = ScenarioSampler::new(catalog, num_samples, rng);
    let total_batches = batch_count(num_samples, batch_size);
    let mut written = 0;

    for batch in 1..=total_batches {
        let scenarios = sampler.next_batch(batch_size)?;
        sink.append(&scenarios)?;

        let start = written;
        written += scenarios.len();
        on_batch(BatchProgress {
            batch,
            total_batches,
            start,
            end: written,
        });
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(3000, 1000), 3);
        assert_eq!(batch_count(3001, 1000), 4);
        assert_eq!(batch_count(999, 1000), 1);
        assert_eq!(batch_count(0, 1000), 0);
    }

    #[test]
    fn test_generate_writes_header_and_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scenarios.csv");
        let mut sink = DatasetSink::new(&path);
        let mut progress = Vec::new();

        let written = generate(
            &Catalog::default(),
            2500,
            1000,
            StdRng::seed_from_u64(1),
            &mut sink,
            |p| progress.push(p),
        )
        .unwrap();

        assert_eq!(written, 2500);
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[2].start, 2000);
        assert_eq!(progress[2].end, 2500);
        assert_eq!(progress[2].total_batches, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2501);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let tmp = TempDir::new().unwrap();
        let run = |name: &str| {
            let path = tmp.path().join(name);
            let mut sink = DatasetSink::new(&path);
            generate(
                &Catalog::default(),
                300,
                128,
                StdRng::seed_from_u64(77),
                &mut sink,
                |_| {},
            )
            .unwrap();
            std::fs::read_to_string(&path).unwrap()
        };
        assert_eq!(run("a.csv"), run("b.csv"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut sink = DatasetSink::new(tmp.path().join("x.csv"));
        let result = generate(
            &Catalog::default(),
            10,
            0,
            StdRng::seed_from_u64(1),
            &mut sink,
            |_| {},
        );
        assert!(matches!(result, Err(GenerateError::ZeroBatchSize)));
    }

    #[test]
    fn test_zero_samples_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x.csv");
        let mut sink = DatasetSink::new(&path);
        let written = generate(
            &Catalog::default(),
            0,
            1000,
            StdRng::seed_from_u64(1),
            &mut sink,
            |_| {},
        )
        .unwrap();
        assert_eq!(written, 0);
        assert!(!path.exists());
    }
}
