//! Combine and normalize module
//!
//! Concatenates year batches into one ordered record list, assigns each
//! record its year and rescales the two raw metrics by fixed constants.

mod combiner;
mod config;

pub use combiner::{combine, combine_tagged, normalize, Combined};
pub use config::{PipelineConfig, YearTagging, DEFAULT_SCALE_A, DEFAULT_SCALE_B};
