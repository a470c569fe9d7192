//! Dataset sink - appends scenario batches to a CSV file
//!
//! The file is reopened in append mode for every batch. The header row is
//! written once per sink, ahead of the first batch.

use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::scenario::{Scenario, COLUMNS};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

/// Append-mode CSV writer for generated scenarios
#[derive(Debug)]
pub struct DatasetSink {
    path: PathBuf,
    header_written: bool,
    rows_written: usize,
}

impl DatasetSink {
    /// Sink appending to `path` (created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header_written: false,
            rows_written: 0,
        }
    }

    /// Empty the target file so the run starts from scratch
    pub fn truncate(&self) -> Result<(), SinkError> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map(|_| ())
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows appended so far (header excluded)
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append one batch, writing the header first if this is the first batch
    pub fn append(&mut self, batch: &[Scenario]) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        let write_err = |source: csv::Error| SinkError::Write {
            path: self.path.clone(),
            source,
        };

        if !self.header_written {
            writer.write_record(COLUMNS).map_err(write_err)?;
        }
        for scenario in batch {
            writer.write_record(scenario.to_record()).map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| write_err(csv::Error::from(e)))?;

        self.header_written = true;
        self.rows_written += batch.len();
        Ok(())
    }
}
