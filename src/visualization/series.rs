//! Chart series handed to the presenter

use crate::data::ProjectedRecord;
use crate::grouping::{CategoryCount, Clusters};
use serde::{Deserialize, Serialize};

/// One scatter point: `x = coord1`, `y = coord2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// All points of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub year: i32,
    pub label: String,
    pub points: Vec<ScatterPoint>,
}

/// Raw metric pair for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEntry {
    pub name: String,
    pub year: i32,
    pub metric_a: f64,
    pub metric_b: f64,
}

/// Everything a chart component needs from one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenterPayload {
    pub scatter: Vec<ScatterSeries>,
    pub bar: Vec<BarEntry>,
    /// Present only when the records carry categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doughnut: Option<Vec<CategoryCount>>,
    pub singular_values: Vec<f64>,
}

impl PresenterPayload {
    /// Assemble all series from the projected records
    pub fn build(
        records: &[ProjectedRecord],
        clusters: Option<&Clusters>,
        singular_values: Vec<f64>,
    ) -> Self {
        Self {
            scatter: scatter_series(records),
            bar: bar_series(records),
            doughnut: clusters.map(Clusters::counts),
            singular_values,
        }
    }

    /// Scatter series for `year`, if any record carries it
    pub fn series_for_year(&self, year: i32) -> Option<&ScatterSeries> {
        self.scatter.iter().find(|s| s.year == year)
    }
}

/// One series per year, years in first-seen order, points in record order
pub fn scatter_series(records: &[ProjectedRecord]) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for record in records {
        let point = ScatterPoint {
            x: record.coord1,
            y: record.coord2,
        };
        match series.iter_mut().find(|s| s.year == record.year()) {
            Some(existing) => existing.points.push(point),
            None => series.push(ScatterSeries {
                year: record.year(),
                label: format!("{} Data", record.year()),
                points: vec![point],
            }),
        }
    }
    series
}

pub fn bar_series(records: &[ProjectedRecord]) -> Vec<BarEntry> {
    records
        .iter()
        .map(|r| BarEntry {
            name: r.name().to_string(),
            year: r.year(),
            metric_a: r.normalized.record.raw_metric_a,
            metric_b: r.normalized.record.raw_metric_b,
        })
        .collect()
}
