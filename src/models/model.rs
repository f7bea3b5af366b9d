//! Fitted polynomial models and their evaluation.
//!
//! Coefficients are always stored highest power first, matching the column
//! order of `math::DesignMatrix`, and evaluated with `math::horner`. A model
//! fit on a centered abscissa carries its `Centering` and maps every
//! evaluation point through it first.
//!
//! Models have no mutating API: once built by the fitter (or reloaded from a
//! model file) they are read-only and can be shared across threads freely.

use nalgebra::DMatrix;

use crate::domain::{Centering, Evaluated, Points};
use crate::error::{FitError, Result};
use crate::math::horner;

/// Coefficients of several polynomials of possibly different length, stored
/// back to back.
///
/// Series `i` owns `data[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RaggedCoeffs {
    data: Vec<f64>,
    n_coeffs: Vec<usize>,
    offsets: Vec<usize>,
}

impl RaggedCoeffs {
    /// Build from a flat buffer and per-series coefficient counts.
    pub fn from_parts(n_coeffs: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        if n_coeffs.is_empty() {
            return Err(FitError::EmptyInput("coefficient table has no series"));
        }
        let mut offsets = Vec::with_capacity(n_coeffs.len() + 1);
        let mut end = 0usize;
        offsets.push(0);
        for &k in &n_coeffs {
            if k < 2 {
                return Err(FitError::InvalidDegree(format!(
                    "a series needs at least 2 coefficients, got {k}"
                )));
            }
            end += k;
            offsets.push(end);
        }
        if end != data.len() {
            return Err(FitError::ShapeMismatch(format!(
                "coefficient counts sum to {end} but buffer holds {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            n_coeffs,
            offsets,
        })
    }

    /// Concatenate per-series coefficient vectors.
    pub fn from_series(series: Vec<Vec<f64>>) -> Result<Self> {
        let n_coeffs = series.iter().map(Vec::len).collect();
        let data = series.into_iter().flatten().collect();
        Self::from_parts(n_coeffs, data)
    }

    pub fn n_series(&self) -> usize {
        self.n_coeffs.len()
    }

    pub fn n_coeffs(&self) -> &[usize] {
        &self.n_coeffs
    }

    /// The whole buffer in series order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Coefficients of series `j`, highest power first.
    pub fn series(&self, j: usize) -> Option<&[f64]> {
        let start = *self.offsets.get(j)?;
        let end = *self.offsets.get(j + 1)?;
        Some(&self.data[start..end])
    }
}

/// Fit of a single series.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleSeriesFit {
    degree: usize,
    n_coeffs: usize,
    coeffs: Vec<f64>,
    centering: Centering,
}

impl SingleSeriesFit {
    /// Wrap coefficients ordered highest power first.
    pub fn new(coeffs: Vec<f64>) -> Result<Self> {
        if coeffs.len() < 2 {
            return Err(FitError::InvalidDegree(format!(
                "a fit needs at least 2 coefficients, got {}",
                coeffs.len()
            )));
        }
        Ok(Self {
            degree: coeffs.len() - 1,
            n_coeffs: coeffs.len(),
            coeffs,
            centering: Centering::default(),
        })
    }

    /// Interpret the coefficients in the given abscissa transform.
    pub fn with_centering(mut self, centering: Centering) -> Self {
        self.centering = centering;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn centering(&self) -> Centering {
        self.centering
    }

    /// Value at a single point.
    pub fn eval_one(&self, x: f64) -> f64 {
        horner(&self.coeffs, self.centering.apply(x))
    }

    pub fn eval_slice(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval_one(x)).collect()
    }

    /// Scalar in, scalar out; array in, array of the same length out.
    pub fn evaluate(&self, points: &Points) -> Evaluated {
        match points {
            Points::Scalar(x) => Evaluated::Scalar(self.eval_one(*x)),
            Points::Array(xs) => Evaluated::Array(self.eval_slice(xs)),
        }
    }
}

/// Fits of several series against one shared `x`, each with its own degree.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSeriesFit {
    degrees: Vec<usize>,
    coeffs: RaggedCoeffs,
    centering: Centering,
}

impl BatchSeriesFit {
    pub fn new(coeffs: RaggedCoeffs) -> Self {
        let degrees = coeffs.n_coeffs().iter().map(|k| k - 1).collect();
        Self {
            degrees,
            coeffs,
            centering: Centering::default(),
        }
    }

    /// Interpret every series in the given abscissa transform.
    pub fn with_centering(mut self, centering: Centering) -> Self {
        self.centering = centering;
        self
    }

    pub fn centering(&self) -> Centering {
        self.centering
    }

    pub fn n_series(&self) -> usize {
        self.degrees.len()
    }

    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    pub fn coeffs(&self) -> &RaggedCoeffs {
        &self.coeffs
    }

    /// Series `j` as a standalone single-series fit.
    pub fn series(&self, j: usize) -> Option<SingleSeriesFit> {
        let c = self.coeffs.series(j)?;
        SingleSeriesFit::new(c.to_vec())
            .ok()
            .map(|fit| fit.with_centering(self.centering))
    }

    /// Evaluate every series at the shared points.
    ///
    /// Returns a `P x M` table; column `j` only uses series `j`'s own
    /// coefficients.
    pub fn evaluate(&self, xs: &[f64]) -> DMatrix<f64> {
        let m = self.n_series();
        let us: Vec<f64> = xs.iter().map(|&x| self.centering.apply(x)).collect();
        let mut out = DMatrix::<f64>::zeros(xs.len(), m);
        for j in 0..m {
            let Some(c) = self.coeffs.series(j) else {
                continue;
            };
            for (i, &u) in us.iter().enumerate() {
                out[(i, j)] = horner(c, u);
            }
        }
        out
    }
}

/// A fitted polynomial model over one or several series.
#[derive(Debug, Clone, PartialEq)]
pub enum PolynomialFitModel {
    Single(SingleSeriesFit),
    Batch(BatchSeriesFit),
}

impl PolynomialFitModel {
    /// Number of fitted series `M`.
    pub fn n_fits(&self) -> usize {
        match self {
            PolynomialFitModel::Single(_) => 1,
            PolynomialFitModel::Batch(b) => b.n_series(),
        }
    }

    pub fn degrees(&self) -> &[usize] {
        match self {
            PolynomialFitModel::Single(s) => std::slice::from_ref(&s.degree),
            PolynomialFitModel::Batch(b) => b.degrees(),
        }
    }

    /// Coefficient count (`degree + 1`) per series.
    pub fn n_coeffs(&self) -> &[usize] {
        match self {
            PolynomialFitModel::Single(s) => std::slice::from_ref(&s.n_coeffs),
            PolynomialFitModel::Batch(b) => b.coeffs.n_coeffs(),
        }
    }

    /// All coefficients concatenated in series order, highest power first.
    pub fn coefficients(&self) -> &[f64] {
        match self {
            PolynomialFitModel::Single(s) => s.coeffs(),
            PolynomialFitModel::Batch(b) => b.coeffs.as_slice(),
        }
    }

    /// Coefficients of series `j`.
    pub fn series_coeffs(&self, j: usize) -> Option<&[f64]> {
        match self {
            PolynomialFitModel::Single(s) if j == 0 => Some(s.coeffs()),
            PolynomialFitModel::Single(_) => None,
            PolynomialFitModel::Batch(b) => b.coeffs.series(j),
        }
    }

    /// Abscissa transform the coefficients are expressed in.
    pub fn centering(&self) -> Centering {
        match self {
            PolynomialFitModel::Single(s) => s.centering,
            PolynomialFitModel::Batch(b) => b.centering,
        }
    }

    /// Flat `(n_fits, coeffs, n_coeffs)` view for callers that want plain
    /// buffers instead of the typed model.
    pub fn raw_parts(&self) -> (usize, &[f64], &[usize]) {
        (self.n_fits(), self.coefficients(), self.n_coeffs())
    }

    /// Evaluate at `points`.
    ///
    /// A single-series model mirrors the request shape. A batch model always
    /// returns a `P x M` table; a scalar request is treated as `P = 1`.
    pub fn evaluate(&self, points: &Points) -> Evaluated {
        match self {
            PolynomialFitModel::Single(s) => s.evaluate(points),
            PolynomialFitModel::Batch(b) => Evaluated::Table(b.evaluate(points.as_slice())),
        }
    }
}

impl From<SingleSeriesFit> for PolynomialFitModel {
    fn from(fit: SingleSeriesFit) -> Self {
        PolynomialFitModel::Single(fit)
    }
}

impl From<BatchSeriesFit> for PolynomialFitModel {
    fn from(fit: BatchSeriesFit) -> Self {
        PolynomialFitModel::Batch(fit)
    }
}
