//! Least squares solver.
//!
//! We solve
//!
//! ```text
//! minimize ||A c - b||_2
//! ```
//!
//! for one or several right-hand sides at once (the columns of `b`).
//!
//! Implementation choices:
//! - SVD rather than normal equations. Vandermonde matrices get badly
//!   conditioned as the degree grows, and forming `A^T A` squares the
//!   condition number.
//! - Nalgebra's `QR::solve` only handles square systems, so tall systems go
//!   through `SVD::solve` as well.
//! - Rank is counted from the singular values with the usual
//!   `max(N, K) * eps * sigma_max` cutoff. A rank below the column count is an
//!   error instead of a silently regularized answer.
//! - The SVD runs with a fixed iteration budget (`SVD::try_new`); the plain
//!   `svd()` constructor loops until convergence.

use nalgebra::{DMatrix, DVector, SVD};

use crate::error::{FitError, Result};

/// Condition number above which a successful fit is still reported as suspect.
const WARN_CONDITION: f64 = 1e12;

/// Iteration budget for the SVD sweep.
const MAX_SVD_ITER: usize = 10_000;

/// Solve a least squares problem with one column of `b` per series.
///
/// Returns a `K x M` coefficient matrix (`K = a.ncols()`, `M = b.ncols()`).
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (n, k) = a.shape();
    if n == 0 || k == 0 {
        return Err(FitError::EmptyInput("design matrix"));
    }
    if b.nrows() != n {
        return Err(FitError::ShapeMismatch(format!(
            "design matrix has {n} rows but target has {}",
            b.nrows()
        )));
    }

    if a.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("design matrix"));
    }
    if b.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("target values"));
    }

    let svd = SVD::try_new(a.clone(), true, true, f64::EPSILON, MAX_SVD_ITER)
        .ok_or(FitError::NoConvergence { max_iter: MAX_SVD_ITER })?;
    let sigma = &svd.singular_values;
    let sigma_max = sigma.max();
    let tol = n.max(k) as f64 * f64::EPSILON * sigma_max;

    let rank = sigma.iter().filter(|&&s| s > tol).count();
    if rank < k {
        log::debug!("rank {rank} < {k} columns (tol {tol:e})");
        return Err(FitError::RankDeficient { rank, columns: k });
    }

    let cond = sigma_max / sigma.min();
    if cond > WARN_CONDITION {
        log::warn!("design matrix is ill-conditioned (cond ~ {cond:e}); coefficients may be inaccurate");
    }

    let coeffs = svd
        .solve(b, tol)
        .map_err(|e| FitError::ShapeMismatch(e.to_string()))?;

    if coeffs.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("solved coefficients"));
    }
    Ok(coeffs)
}

/// Single right-hand side convenience wrapper.
pub fn solve_least_squares_vec(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    let rhs = DMatrix::from_column_slice(b.len(), 1, b.as_slice());
    let c = solve_least_squares(a, &rhs)?;
    Ok(c.column(0).into_owned())
}
