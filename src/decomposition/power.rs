//! Power-iteration SVD backend
//!
//! Finds the right singular vectors as the top eigenvectors of the Gram
//! matrix `MᵀM` using power iteration with deflation, then recovers each
//! left singular vector as `u_j = M v_j / σ_j`. No external LAPACK needed.

use super::svd::{validate_matrix, Svd, SvdBackend};
use crate::error::{AmuError, Result};
use ndarray::{Array1, Array2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Vectors shorter than this are treated as zero
const NORM_TOL: f64 = 1e-12;

/// Singular values below this fraction of the largest are treated as zero
const REL_RANK_TOL: f64 = 1e-6;

/// Power-iteration backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerIterationSvd {
    /// Maximum iterations per component
    pub max_iter: usize,
    /// Convergence threshold on the change of the eigenvector
    pub tol: f64,
    /// Seed for the start vectors
    pub random_state: u64,
}

impl Default for PowerIterationSvd {
    fn default() -> Self {
        Self {
            max_iter: 300,
            tol: 1e-12,
            random_state: 42,
        }
    }
}

impl PowerIterationSvd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Top-k eigenpairs of a symmetric PSD matrix
    fn eigenpairs(&self, gram: &Array2<f64>, k: usize) -> Result<(Vec<f64>, Vec<Array1<f64>>)> {
        let d = gram.nrows();
        let mut eigenvalues = Vec::with_capacity(k);
        let mut eigenvectors: Vec<Array1<f64>> = Vec::with_capacity(k);

        // Deflated copy
        let mut work = gram.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);

        for component in 0..k {
            let mut v: Array1<f64> = (0..d).map(|_| rng.gen_range(-1.0..1.0)).collect();
            orthogonalize(&mut v, &eigenvectors);
            normalize(&mut v);

            let mut converged = false;
            for _iter in 0..self.max_iter {
                let mut w = work.dot(&v);
                orthogonalize(&mut w, &eigenvectors);
                if normalize(&mut w) < NORM_TOL {
                    // Remaining spectrum is zero; any orthogonal direction will do
                    converged = true;
                    break;
                }

                let diff = (&w - &v).mapv(|x| x * x).sum().sqrt();
                v = w;
                if diff < self.tol {
                    converged = true;
                    break;
                }
            }

            // Near-tied eigenvalues converge too slowly; an unconverged vector is rotated
            if !converged {
                return Err(AmuError::DecompositionError(format!(
                    "power iteration did not converge for component {} within {} iterations",
                    component, self.max_iter
                )));
            }

            let eigenvalue = v.dot(&work.dot(&v)).max(0.0);

            // A = A - λ v vᵀ
            for i in 0..d {
                for j in 0..d {
                    work[[i, j]] -= eigenvalue * v[i] * v[j];
                }
            }

            eigenvalues.push(eigenvalue);
            eigenvectors.push(v);
        }

        Ok((eigenvalues, eigenvectors))
    }
}

impl SvdBackend for PowerIterationSvd {
    fn name(&self) -> &'static str {
        "power-iteration"
    }

    fn decompose(&self, matrix: &Array2<f64>) -> Result<Svd> {
        validate_matrix(matrix)?;

        let (n, d) = matrix.dim();
        let k = n.min(d);
        let gram = matrix.t().dot(matrix);
        let (eigenvalues, eigenvectors) = self.eigenpairs(&gram, k)?;

        let mut u = Array2::<f64>::zeros((n, k));
        let mut vt = Array2::<f64>::zeros((k, d));
        let mut singular_values = Array1::<f64>::zeros(k);
        let sigma_max = eigenvalues.iter().fold(0.0f64, |m, &l| m.max(l)).sqrt();
        let cutoff = (sigma_max * REL_RANK_TOL).max(NORM_TOL);

        for (j, (lambda, v)) in eigenvalues.iter().zip(eigenvectors.iter()).enumerate() {
            let sigma = lambda.sqrt();
            singular_values[j] = sigma;
            vt.row_mut(j).assign(v);
            if sigma > cutoff {
                let col = matrix.dot(v) / sigma;
                u.column_mut(j).assign(&col);
            }
        }

        Ok(Svd {
            u,
            singular_values,
            vt,
        }
        .sorted())
    }
}

/// Scale `v` to unit length in place; returns the original norm
fn normalize(v: &mut Array1<f64>) -> f64 {
    let norm = v.dot(v).sqrt();
    if norm > NORM_TOL {
        v.mapv_inplace(|x| x / norm);
    }
    norm
}

/// Remove the components of `v` along each of `basis` (Gram-Schmidt)
fn orthogonalize(v: &mut Array1<f64>, basis: &[Array1<f64>]) {
    for b in basis {
        let proj = v.dot(b);
        v.scaled_add(-proj, b);
    }
}
