//! Combine year batches into one normalized record list

use super::config::{PipelineConfig, YearTagging};
use crate::data::{NormalizedRecord, Record, YearBatch};
use crate::error::{AmuError, Result};
use tracing::{debug, warn};

/// Divide both raw metrics by the configured constants.
///
/// No range check: results are only approximately in [0, 1].
pub fn normalize(record: &Record, config: &PipelineConfig) -> NormalizedRecord {
    NormalizedRecord {
        norm_a: record.raw_metric_a / config.scale_a,
        norm_b: record.raw_metric_b / config.scale_b,
        record: record.clone(),
    }
}

/// Output of [`combine_tagged`]
#[derive(Debug, Clone, PartialEq)]
pub struct Combined {
    pub records: Vec<NormalizedRecord>,
    /// Records whose assigned year differs from their batch's year.
    /// Always 0 under [`YearTagging::ByBatch`].
    pub mistagged_years: usize,
}

/// Concatenate `batches` in order, tag each record with a year and normalize it.
///
/// Fails on the first record missing a raw metric; nothing partial is returned.
pub fn combine(batches: &[YearBatch], config: &PipelineConfig) -> Result<Vec<NormalizedRecord>> {
    Ok(combine_tagged(batches, config)?.records)
}

/// Same as [`combine`], also reporting how many records the tagging rule
/// assigned to a year other than their batch's.
pub fn combine_tagged(batches: &[YearBatch], config: &PipelineConfig) -> Result<Combined> {
    let total: usize = batches.iter().map(YearBatch::len).sum();
    let (years, mistagged_years) = assign_years(batches, &config.year_tagging, total)?;

    let mut records = Vec::with_capacity(total);
    let sources = batches.iter().flat_map(|b| b.records.iter());
    for (source, year) in sources.zip(years) {
        let record = source.to_record(year)?;
        records.push(normalize(&record, config));
    }

    debug!(
        batches = batches.len(),
        records = records.len(),
        scale_a = config.scale_a,
        scale_b = config.scale_b,
        "Combined and normalized batches"
    );

    Ok(Combined { records, mistagged_years })
}

/// Year per combined index according to the tagging rule, plus the number of
/// indices where it disagrees with batch origin
fn assign_years(
    batches: &[YearBatch],
    tagging: &YearTagging,
    total: usize,
) -> Result<(Vec<i32>, usize)> {
    let by_batch: Vec<i32> = batches
        .iter()
        .flat_map(|b| std::iter::repeat(b.year).take(b.len()))
        .collect();

    match *tagging {
        YearTagging::ByBatch => Ok((by_batch, 0)),
        YearTagging::IndexThreshold { threshold } => {
            if batches.len() != 2 {
                return Err(AmuError::ConfigError(format!(
                    "index-threshold year tagging needs exactly 2 batches, got {}",
                    batches.len()
                )));
            }
            let (first, second) = (batches[0].year, batches[1].year);
            let literal: Vec<i32> = (0..total)
                .map(|i| if i < threshold { first } else { second })
                .collect();

            let mistagged = literal
                .iter()
                .zip(by_batch.iter())
                .filter(|(a, b)| a != b)
                .count();
            if mistagged > 0 {
                warn!(
                    mistagged,
                    threshold,
                    first_batch_len = batches[0].len(),
                    "Index-threshold year tagging disagrees with batch origin"
                );
            }

            Ok((literal, mistagged))
        }
    }
}
