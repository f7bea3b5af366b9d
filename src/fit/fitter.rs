//! Least-squares polynomial fitting for one or several series.
//!
//! Given:
//! - shared samples `x_i`
//! - one series `y_i`, or a table of series `y_ij`
//! - a degree per series
//!
//! we build one Vandermonde matrix at the largest requested degree and solve:
//! - a single least-squares problem for a lone series
//! - one batched solve (all columns at once) when every series has the same degree
//! - one solve per series against the trailing columns of the shared matrix
//!   otherwise (parallel, merged back in series order)
//!
//! With `FitOptions::centered` the matrix is built on `(x - mean) / spread`
//! instead of raw `x`, so time bases with a large offset stay well conditioned.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::domain::{Centering, DegreeSpec, FitOptions, SampleSet, Series};
use crate::error::Result;
use crate::math::{DesignMatrix, solve_least_squares, solve_least_squares_vec};
use crate::models::{BatchSeriesFit, PolynomialFitModel, RaggedCoeffs, SingleSeriesFit};

/// Fit polynomials of the requested degree(s) to every series of `samples`
/// on the raw abscissa.
///
/// All shape and degree checks run before the solve. Overflowing powers of
/// `x` are rejected as `NonFinite` while building the design matrix; the solve
/// itself can only fail with `RankDeficient` or `NoConvergence`.
pub fn fit_model(samples: &SampleSet, degrees: &DegreeSpec) -> Result<PolynomialFitModel> {
    fit_model_with(samples, degrees, FitOptions::default())
}

/// [`fit_model`] with explicit options.
pub fn fit_model_with(samples: &SampleSet, degrees: &DegreeSpec, options: FitOptions) -> Result<PolynomialFitModel> {
    let resolved = degrees.resolve(samples.n_series())?;
    let max_degree = degrees.max_degree();

    let centering = if options.centered {
        Centering::from_samples(samples.x())
    } else {
        Centering::default()
    };
    if !centering.is_identity() {
        log::debug!("centering x at {} with scale {}", centering.offset, centering.scale);
    }
    let u: Vec<f64> = samples.x().iter().map(|&x| centering.apply(x)).collect();

    let design = DesignMatrix::vandermonde(&u, max_degree)?;

    match samples.y() {
        Series::One(y) => {
            log::debug!("fitting 1 series, degree {max_degree}, {} samples", design.n_samples());
            let b = nalgebra::DVector::from_column_slice(y);
            let c = solve_least_squares_vec(design.as_matrix(), &b)?;
            Ok(SingleSeriesFit::new(c.iter().copied().collect())?
                .with_centering(centering)
                .into())
        }
        Series::Table(table) => {
            let uniform = resolved.windows(2).all(|w| w[0] == w[1]);
            let coeffs = if uniform {
                fit_uniform(&design, table)?
            } else {
                fit_per_series(&design, table, &resolved)?
            };
            Ok(BatchSeriesFit::new(coeffs).with_centering(centering).into())
        }
    }
}

fn fit_uniform(design: &DesignMatrix, table: &DMatrix<f64>) -> Result<RaggedCoeffs> {
    log::debug!(
        "batched solve: {} series, degree {}, {} samples",
        table.ncols(),
        design.degree(),
        design.n_samples()
    );
    let c = solve_least_squares(design.as_matrix(), table)?;
    let series: Vec<Vec<f64>> = c
        .column_iter()
        .map(|col| col.iter().copied().collect())
        .collect();
    RaggedCoeffs::from_series(series)
}

fn fit_per_series(design: &DesignMatrix, table: &DMatrix<f64>, degrees: &[usize]) -> Result<RaggedCoeffs> {
    log::debug!(
        "per-series solve: degrees {degrees:?}, {} samples",
        design.n_samples()
    );

    // Each series is independent; indexed collect keeps series order.
    let series: Vec<Vec<f64>> = degrees
        .par_iter()
        .enumerate()
        .map(|(j, &d)| -> Result<Vec<f64>> {
            let a = design.truncated(d)?.clone_owned();
            let b = table.columns(j, 1).clone_owned();
            let c = solve_least_squares(&a, &b)?;
            Ok(c.iter().copied().collect())
        })
        .collect::<Result<_>>()?;

    RaggedCoeffs::from_series(series)
}

impl PolynomialFitModel {
    /// Shorthand for [`fit_model`].
    pub fn fit(samples: &SampleSet, degrees: impl Into<DegreeSpec>) -> Result<Self> {
        fit_model(samples, &degrees.into())
    }
}
