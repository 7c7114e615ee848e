//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Default divisor for the first raw metric (pooled days)
pub const DEFAULT_SCALE_A: f64 = 250.0;

/// Default divisor for the second raw metric (percentage of days)
pub const DEFAULT_SCALE_B: f64 = 100.0;

/// How the combiner assigns a year to each record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum YearTagging {
    /// Year of the batch the record came from
    #[default]
    ByBatch,
    /// Compatibility mode: records at combined index `< threshold` get the
    /// first batch's year, all later records the second batch's year.
    /// Only correct when the first batch has exactly `threshold` records.
    IndexThreshold { threshold: usize },
}

impl YearTagging {
    /// Index rule with the two-records-per-batch threshold
    pub fn literal() -> Self {
        YearTagging::IndexThreshold { threshold: 2 }
    }
}

/// Configuration for the combine/normalize stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fixed divisor for `raw_metric_a`; never fitted to the data
    pub scale_a: f64,

    /// Fixed divisor for `raw_metric_b`; never fitted to the data
    pub scale_b: f64,

    /// Year assignment rule
    pub year_tagging: YearTagging,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale_a: DEFAULT_SCALE_A,
            scale_b: DEFAULT_SCALE_B,
            year_tagging: YearTagging::ByBatch,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set both normalization divisors
    pub fn with_scales(mut self, scale_a: f64, scale_b: f64) -> Self {
        self.scale_a = scale_a;
        self.scale_b = scale_b;
        self
    }

    /// Builder method to set the year tagging rule
    pub fn with_year_tagging(mut self, year_tagging: YearTagging) -> Self {
        self.year_tagging = year_tagging;
        self
    }
}
