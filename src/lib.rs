//! amu-pca - antimicrobial-usage projection pipeline
//!
//! Turns year batches of antimicrobial-usage records into chart-ready series:
//!
//! 1. [`preprocessing`] - concatenate batches, tag years, rescale metrics
//! 2. [`decomposition`] - direct SVD of the normalized `n x 2` matrix
//! 3. [`grouping`] - partition records by category label
//! 4. [`visualization`] - scatter, bar and doughnut series for a presenter
//!
//! [`pipeline::run_pipeline`] runs all stages; [`cli`] wraps it for the
//! command line.
//!
//! ```no_run
//! use amu_pca::prelude::*;
//!
//! let payload = run_pipeline(&sample_batches()).unwrap();
//! assert_eq!(payload.scatter.len(), 2);
//! ```

pub mod error;

pub mod data;
pub mod decomposition;
pub mod grouping;
pub mod pipeline;
pub mod preprocessing;
pub mod visualization;

pub mod cli;

pub use error::{AmuError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{AmuError, Result};

    pub use crate::data::{
        sample_batches, sample_batches_with_categories, DatasetConfig, NormalizedRecord,
        ProjectedRecord, Record, SourceRecord, YearBatch,
    };
    pub use crate::decomposition::{BackendKind, NalgebraSvd, PowerIterationSvd, Svd, SvdBackend};
    pub use crate::grouping::{group_by_category, CategoryCount, Clusters};
    pub use crate::pipeline::{run_pipeline, Pipeline, PipelineRun};
    pub use crate::preprocessing::{
        combine, combine_tagged, normalize, Combined, PipelineConfig, YearTagging,
    };
    pub use crate::visualization::{BarEntry, PresenterPayload, ScatterPoint, ScatterSeries};
}
