//! SVD result type, backend trait and the nalgebra backend

use crate::error::{AmuError, Result};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Thin singular value decomposition `M = U · diag(σ) · Vᵗ`.
///
/// For an `n x d` input with `k = min(n, d)`: `u` is `n x k`, `singular_values`
/// has `k` entries in descending order and `vt` is `k x d`. Columns of `u` and
/// rows of `vt` are unique only up to sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Svd {
    pub u: Array2<f64>,
    pub singular_values: Array1<f64>,
    pub vt: Array2<f64>,
}

impl Svd {
    /// Number of retained components
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    /// Rebuild `U · diag(σ) · Vᵗ`
    pub fn reconstruct(&self) -> Array2<f64> {
        let mut scaled = self.u.clone();
        for (mut col, &s) in scaled.axis_iter_mut(Axis(1)).zip(self.singular_values.iter()) {
            col.mapv_inplace(|x| x * s);
        }
        scaled.dot(&self.vt)
    }

    /// Reorder components by descending singular value
    pub(crate) fn sorted(self) -> Self {
        let mut order: Vec<usize> = (0..self.rank()).collect();
        order.sort_by(|&a, &b| self.singular_values[b].total_cmp(&self.singular_values[a]));
        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return self;
        }
        Self {
            u: self.u.select(Axis(1), &order),
            singular_values: self.singular_values.select(Axis(0), &order),
            vt: self.vt.select(Axis(0), &order),
        }
    }
}

/// Linear-algebra boundary for the decomposer.
///
/// Implementations must reject empty or non-finite input with
/// [`AmuError::DecompositionError`]; [`validate_matrix`] does this check.
pub trait SvdBackend: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Compute the thin SVD of `matrix`
    fn decompose(&self, matrix: &Array2<f64>) -> Result<Svd>;
}

/// Reject matrices no backend can decompose
pub fn validate_matrix(matrix: &Array2<f64>) -> Result<()> {
    let (n, d) = matrix.dim();
    if n == 0 || d == 0 {
        return Err(AmuError::DecompositionError(format!(
            "cannot decompose empty {}x{} matrix",
            n, d
        )));
    }
    if let Some(((i, j), v)) = matrix.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(AmuError::DecompositionError(format!(
            "non-finite value {} at row {}, column {}",
            v, i, j
        )));
    }
    Ok(())
}

/// Thin SVD via nalgebra's Golub-Kahan bidiagonalization
#[derive(Debug, Clone)]
pub struct NalgebraSvd {
    /// Iteration cap passed to nalgebra (0 = unlimited)
    pub max_iterations: usize,
}

impl Default for NalgebraSvd {
    fn default() -> Self {
        Self { max_iterations: 0 }
    }
}

impl NalgebraSvd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn non_convergence_message(&self) -> String {
        match self.max_iterations {
            0 => "SVD did not converge".to_string(),
            n => format!("SVD did not converge within {} iterations", n),
        }
    }
}

impl SvdBackend for NalgebraSvd {
    fn name(&self) -> &'static str {
        "nalgebra"
    }

    fn decompose(&self, matrix: &Array2<f64>) -> Result<Svd> {
        validate_matrix(matrix)?;

        let (n, d) = matrix.dim();
        let m = DMatrix::from_fn(n, d, |i, j| matrix[[i, j]]);
        let svd = m
            .try_svd(true, true, f64::EPSILON, self.max_iterations)
            .ok_or_else(|| AmuError::DecompositionError(self.non_convergence_message()))?;

        let u = svd
            .u
            .ok_or_else(|| AmuError::DecompositionError("U was not computed".to_string()))?;
        let vt = svd
            .v_t
            .ok_or_else(|| AmuError::DecompositionError("Vt was not computed".to_string()))?;

        Ok(Svd {
            u: Array2::from_shape_fn((u.nrows(), u.ncols()), |(i, j)| u[(i, j)]),
            singular_values: svd.singular_values.iter().copied().collect(),
            vt: Array2::from_shape_fn((vt.nrows(), vt.ncols()), |(i, j)| vt[(i, j)]),
        }
        .sorted())
    }
}
