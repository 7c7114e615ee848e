//! Record types and data sources
//!
//! Records move through three stages, each one wrapping the previous:
//! - [`Record`] - a validated input row tagged with its year
//! - [`NormalizedRecord`] - plus the two rescaled metrics
//! - [`ProjectedRecord`] - plus the two SVD projection coordinates
//!
//! Input arrives as [`YearBatch`]es of [`SourceRecord`]s, either from the
//! bundled sample or from a [`DatasetConfig`] file.

mod dataset;
mod sample;

pub use dataset::DatasetConfig;
pub use sample::{sample_batches, sample_batches_with_categories};

use crate::error::{AmuError, Result};
use serde::{Deserialize, Serialize};

/// One input row as supplied by the caller.
///
/// Both raw metrics are optional here so that an incomplete row can be
/// reported as a [`AmuError::MissingField`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Antimicrobial name, unique within a batch only
    #[serde(alias = "antimicrobial")]
    pub name: String,
    /// First raw metric (pooled days in the bundled data)
    #[serde(alias = "pooledDays")]
    pub raw_metric_a: Option<f64>,
    /// Second raw metric (percentage of days in the bundled data)
    #[serde(alias = "percentageDays")]
    pub raw_metric_b: Option<f64>,
    /// Spectrum label used for grouping, e.g. "Narrow" or "Broad"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SourceRecord {
    /// Create a complete record without a category
    pub fn new(name: impl Into<String>, raw_metric_a: f64, raw_metric_b: f64) -> Self {
        Self {
            name: name.into(),
            raw_metric_a: Some(raw_metric_a),
            raw_metric_b: Some(raw_metric_b),
            category: None,
        }
    }

    /// Builder method to attach a category label
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Validate the row and tag it with `year`.
    ///
    /// Values are not range-checked: negative or non-finite metrics pass through.
    pub fn to_record(&self, year: i32) -> Result<Record> {
        let raw_metric_a = self.raw_metric_a.ok_or_else(|| AmuError::MissingField {
            record: self.name.clone(),
            field: "raw_metric_a",
        })?;
        let raw_metric_b = self.raw_metric_b.ok_or_else(|| AmuError::MissingField {
            record: self.name.clone(),
            field: "raw_metric_b",
        })?;

        Ok(Record {
            name: self.name.clone(),
            raw_metric_a,
            raw_metric_b,
            category: self.category.clone(),
            year,
        })
    }
}

/// An ordered batch of records sharing one year tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBatch {
    pub year: i32,
    pub records: Vec<SourceRecord>,
}

impl YearBatch {
    pub fn new(year: i32, records: Vec<SourceRecord>) -> Self {
        Self { year, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A validated input row with its year assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub raw_metric_a: f64,
    pub raw_metric_b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub year: i32,
}

/// A record plus its two metrics divided by the configured scale constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub norm_a: f64,
    pub norm_b: f64,
}

/// A normalized record plus its projection coordinates.
///
/// `coord1`/`coord2` only make sense relative to the other records that went
/// through the same decomposition call, and their sign depends on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    #[serde(flatten)]
    pub normalized: NormalizedRecord,
    pub coord1: f64,
    pub coord2: f64,
}

impl ProjectedRecord {
    pub fn name(&self) -> &str {
        &self.normalized.record.name
    }

    pub fn year(&self) -> i32 {
        self.normalized.record.year
    }

    pub fn category(&self) -> Option<&str> {
        self.normalized.record.category.as_deref()
    }
}
