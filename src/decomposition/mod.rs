//! Decomposition module: direct SVD of the normalized metric matrix.
//!
//! This is not covariance PCA. The `n x 2` matrix of `[norm_a, norm_b]` rows
//! is decomposed as-is and the first two columns of `U` become the
//! projection coordinates. Signs are backend-defined; magnitudes are stable.

mod power;
mod projection;
mod svd;

pub use power::PowerIterationSvd;
pub use projection::{build_matrix, project, Projection};
pub use svd::{validate_matrix, NalgebraSvd, Svd, SvdBackend};

use serde::{Deserialize, Serialize};

/// Selectable decomposition backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackendKind {
    #[default]
    Nalgebra,
    PowerIteration,
}

impl BackendKind {
    /// Instantiate the backend with its default settings
    pub fn build(self) -> Box<dyn SvdBackend> {
        match self {
            BackendKind::Nalgebra => Box::new(NalgebraSvd::new()),
            BackendKind::PowerIteration => Box::new(PowerIterationSvd::new()),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = crate::error::AmuError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "nalgebra" => Ok(BackendKind::Nalgebra),
            "power" | "power-iteration" => Ok(BackendKind::PowerIteration),
            other => Err(crate::error::AmuError::ConfigError(format!(
                "unknown SVD backend '{}' (expected nalgebra or power)",
                other
            ))),
        }
    }
}
