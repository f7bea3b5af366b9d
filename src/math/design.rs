//! Vandermonde design matrices.
//!
//! Columns are ordered highest power first:
//!
//! ```text
//! row i = [x_i^d, x_i^(d-1), ..., x_i, 1]
//! ```
//!
//! With this ordering a lower degree `d' < d` is simply the trailing `d' + 1`
//! columns, so several series fit against one `x` can share a single matrix
//! built at the maximum degree. The same ordering is used by the Horner
//! evaluator, which consumes coefficients highest power first.

use nalgebra::{DMatrix, DMatrixView};

use crate::error::{FitError, Result};

/// `N x (degree + 1)` Vandermonde matrix for one set of sample points.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    degree: usize,
    matrix: DMatrix<f64>,
}

impl DesignMatrix {
    /// Build the design matrix for samples `x` at `degree`.
    pub fn vandermonde(x: &[f64], degree: usize) -> Result<Self> {
        if degree < 1 {
            return Err(FitError::InvalidDegree(format!(
                "degree must be at least 1, got {degree}"
            )));
        }

        let n = x.len();
        let k = degree + 1;
        let mut matrix = DMatrix::<f64>::zeros(n, k);

        // Fill from the constant column leftwards by repeated multiplication.
        for (i, &xi) in x.iter().enumerate() {
            let mut p = 1.0;
            for j in (0..k).rev() {
                matrix[(i, j)] = p;
                p *= xi;
            }
        }

        // Finite x can still overflow at high powers.
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("design matrix"));
        }

        log::debug!("built {n}x{k} design matrix (degree {degree})");
        Ok(Self { degree, matrix })
    }

    /// Maximum degree represented by this matrix.
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn n_samples(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// View of the trailing `degree + 1` columns, i.e. the design matrix for
    /// a lower (or equal) degree over the same samples.
    pub fn truncated(&self, degree: usize) -> Result<DMatrixView<'_, f64>> {
        if degree < 1 || degree > self.degree {
            return Err(FitError::InvalidDegree(format!(
                "cannot truncate a degree-{} design matrix to degree {degree}",
                self.degree
            )));
        }
        let k = degree + 1;
        let start = self.matrix.ncols() - k;
        Ok(self.matrix.columns(start, k))
    }
}
