//! End-to-end pipeline: combine -> normalize -> decompose -> project -> group

use crate::data::{ProjectedRecord, YearBatch};
use crate::decomposition::{project, NalgebraSvd, SvdBackend};
use crate::error::Result;
use crate::grouping::{group_by_category, Clusters};
use crate::preprocessing::{combine_tagged, PipelineConfig};
use crate::visualization::PresenterPayload;
use std::time::Instant;
use tracing::{debug, info};

/// Full output of one run, for hosts that want more than the chart payload
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub records: Vec<ProjectedRecord>,
    /// `None` unless at least one record carries a category
    pub clusters: Option<Clusters>,
    pub payload: PresenterPayload,
    /// Records tagged with a year other than their batch's; non-zero only
    /// under index-threshold tagging
    pub mistagged_years: usize,
    /// Seconds spent in the run
    pub elapsed: f64,
}

/// Configured pipeline with a pluggable SVD backend
pub struct Pipeline {
    config: PipelineConfig,
    backend: Box<dyn SvdBackend>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Create a pipeline using the nalgebra backend
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            backend: Box::new(NalgebraSvd::new()),
        }
    }

    /// Builder method to swap the decomposition backend
    pub fn with_backend(mut self, backend: Box<dyn SvdBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run all stages and return only the presenter payload
    pub fn run(&self, batches: &[YearBatch]) -> Result<PresenterPayload> {
        Ok(self.run_detailed(batches)?.payload)
    }

    /// Run all stages. Any failure aborts the run; nothing partial is returned.
    pub fn run_detailed(&self, batches: &[YearBatch]) -> Result<PipelineRun> {
        let start = Instant::now();

        let combined = combine_tagged(batches, &self.config)?;
        let projection = project(&combined.records, self.backend.as_ref())?;

        let categorized = projection.records.iter().any(|r| r.category().is_some());
        let clusters = if categorized {
            Some(group_by_category(&projection.records)?)
        } else {
            debug!("No category labels present, skipping grouping");
            None
        };

        let payload = PresenterPayload::build(
            &projection.records,
            clusters.as_ref(),
            projection.svd.singular_values.to_vec(),
        );
        let elapsed = start.elapsed().as_secs_f64();

        info!(
            records = projection.records.len(),
            years = payload.scatter.len(),
            clusters = clusters.as_ref().map_or(0, Clusters::len),
            mistagged_years = combined.mistagged_years,
            backend = self.backend.name(),
            elapsed_ms = elapsed * 1000.0,
            "Pipeline run complete"
        );

        Ok(PipelineRun {
            records: projection.records,
            clusters,
            payload,
            mistagged_years: combined.mistagged_years,
            elapsed,
        })
    }
}

/// Run the pipeline with default configuration and the nalgebra backend
pub fn run_pipeline(batches: &[YearBatch]) -> Result<PresenterPayload> {
    Pipeline::default().run(batches)
}
