//! Dataset file loading

use super::YearBatch;
use crate::error::{AmuError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// On-disk dataset: an ordered list of year batches.
///
/// ```json
/// { "batches": [ { "year": 2021, "records": [ { "name": "A", "raw_metric_a": 120, "raw_metric_b": 60 } ] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub batches: Vec<YearBatch>,
}

impl DatasetConfig {
    pub fn new(batches: Vec<YearBatch>) -> Self {
        Self { batches }
    }

    /// Parse a dataset from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a dataset from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            batches = config.batches.len(),
            records = config.record_count(),
            "Loaded dataset"
        );
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of records across all batches
    pub fn record_count(&self) -> usize {
        self.batches.iter().map(YearBatch::len).sum()
    }

    /// Batch years must be distinct, or the per-year series would merge
    fn validate(&self) -> Result<()> {
        for (i, batch) in self.batches.iter().enumerate() {
            if self.batches[..i].iter().any(|b| b.year == batch.year) {
                return Err(AmuError::ConfigError(format!(
                    "duplicate batch year {}",
                    batch.year
                )));
            }
        }
        Ok(())
    }
}

impl From<Vec<YearBatch>> for DatasetConfig {
    fn from(batches: Vec<YearBatch>) -> Self {
        Self::new(batches)
    }
}
