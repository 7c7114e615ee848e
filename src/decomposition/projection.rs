//! Project normalized records onto the leading left singular vectors

use super::svd::{Svd, SvdBackend};
use crate::data::{NormalizedRecord, ProjectedRecord};
use crate::error::{AmuError, Result};
use ndarray::Array2;
use tracing::debug;

/// Records with their coordinates, plus the decomposition they came from
#[derive(Debug, Clone)]
pub struct Projection {
    pub records: Vec<ProjectedRecord>,
    pub svd: Svd,
}

/// Stack `[norm_a, norm_b]` rows in record order.
///
/// The values are used as-is: no centering, no unit-variance scaling.
pub fn build_matrix(records: &[NormalizedRecord]) -> Array2<f64> {
    Array2::from_shape_fn((records.len(), 2), |(i, j)| match j {
        0 => records[i].norm_a,
        _ => records[i].norm_b,
    })
}

/// Decompose the record matrix and take `coord1 = U[i, 0]`, `coord2 = U[i, 1]`.
///
/// When `U` has a single column (one record), `coord2` is 0.
pub fn project(records: &[NormalizedRecord], backend: &dyn SvdBackend) -> Result<Projection> {
    let matrix = build_matrix(records);
    let svd = backend.decompose(&matrix)?;

    if svd.u.nrows() != records.len() {
        return Err(AmuError::ShapeError {
            expected: format!("U with {} rows", records.len()),
            actual: format!("{} rows", svd.u.nrows()),
        });
    }

    let coord = |i: usize, j: usize| -> f64 {
        if j < svd.u.ncols() {
            svd.u[[i, j]]
        } else {
            0.0
        }
    };

    let projected: Vec<ProjectedRecord> = records
        .iter()
        .enumerate()
        .map(|(i, normalized)| ProjectedRecord {
            normalized: normalized.clone(),
            coord1: coord(i, 0),
            coord2: coord(i, 1),
        })
        .collect();

    debug!(
        backend = backend.name(),
        rows = projected.len(),
        singular_values = ?svd.singular_values.to_vec(),
        "Projected records onto leading singular vectors"
    );

    Ok(Projection {
        records: projected,
        svd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_batches, SourceRecord, YearBatch};
    use crate::decomposition::{NalgebraSvd, PowerIterationSvd};
    use crate::preprocessing::{combine, PipelineConfig};
    use ndarray::array;

    fn normalized(batches: &[YearBatch]) -> Vec<NormalizedRecord> {
        combine(batches, &PipelineConfig::default()).unwrap()
    }

    /// Backend returning a fixed decomposition
    struct FixedSvd(Svd);

    impl SvdBackend for FixedSvd {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn decompose(&self, _matrix: &Array2<f64>) -> Result<Svd> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_build_matrix_row_order() {
        let records = normalized(&sample_batches());
        let m = build_matrix(&records);
        assert_eq!(m.dim(), (4, 2));
        assert!((m[[0, 0]] - 0.48).abs() < 1e-12);
        assert!((m[[0, 1]] - 0.60).abs() < 1e-12);
        assert!((m[[3, 0]] - 0.84).abs() < 1e-12);
        assert!((m[[3, 1]] - 0.80).abs() < 1e-12);
    }

    #[test]
    fn test_project_takes_u_columns() {
        let records = normalized(&sample_batches()[..1]);
        let backend = FixedSvd(Svd {
            u: array![[0.6, 0.8], [0.8, -0.6]],
            singular_values: array![2.0, 1.0],
            vt: array![[1.0, 0.0], [0.0, 1.0]],
        });
        let projection = project(&records, &backend).unwrap();
        assert_eq!(projection.records[0].coord1, 0.6);
        assert_eq!(projection.records[0].coord2, 0.8);
        assert_eq!(projection.records[1].coord1, 0.8);
        assert_eq!(projection.records[1].coord2, -0.6);
    }

    #[test]
    fn test_project_rejects_row_mismatch() {
        let records = normalized(&sample_batches());
        let backend = FixedSvd(Svd {
            u: array![[1.0, 0.0]],
            singular_values: array![1.0, 0.0],
            vt: array![[1.0, 0.0], [0.0, 1.0]],
        });
        assert!(matches!(
            project(&records, &backend),
            Err(AmuError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_project_two_by_two() {
        let records = normalized(&sample_batches()[..1]);
        let projection = project(&records, &NalgebraSvd::new()).unwrap();
        assert_eq!(projection.records.len(), 2);
    }

    #[test]
    fn test_project_single_record() {
        let batches = vec![YearBatch::new(2021, vec![SourceRecord::new("A", 120.0, 60.0)])];
        let projection = project(&normalized(&batches), &NalgebraSvd::new()).unwrap();
        assert_eq!(projection.records.len(), 1);
        assert!((projection.records[0].coord1.abs() - 1.0).abs() < 1e-12);
        assert_eq!(projection.records[0].coord2, 0.0);
    }

    #[test]
    fn test_project_empty_fails() {
        let err = project(&[], &NalgebraSvd::new()).unwrap_err();
        assert!(matches!(err, AmuError::DecompositionError(_)));
    }

    #[test]
    fn test_project_repeatable_magnitudes() {
        let records = normalized(&sample_batches());
        let first = project(&records, &NalgebraSvd::new()).unwrap();
        let second = project(&records, &PowerIterationSvd::new()).unwrap();
        for (a, b) in first.records.iter().zip(second.records.iter()) {
            assert!((a.coord1.abs() - b.coord1.abs()).abs() < 1e-6);
            assert!((a.coord2.abs() - b.coord2.abs()).abs() < 1e-6);
        }
    }
}
