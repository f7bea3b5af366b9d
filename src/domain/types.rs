//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - handed to the fitter as in-memory arrays
//! - exported to JSON/CSV
//! - reloaded later for evaluation

use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

/// Layout of a multi-series table as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrder {
    /// Each row of the table is one series (`M` rows of `N` samples).
    Rows,
    /// Each column of the table is one series (`N` rows of `M` values).
    #[default]
    Cols,
}

impl FromStr for AxisOrder {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" => Ok(AxisOrder::Rows),
            "cols" => Ok(AxisOrder::Cols),
            _ => Err(FitError::UnsupportedOrder(s.to_string())),
        }
    }
}

/// Dependent values, either a lone series or a samples-major table.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    One(Vec<f64>),
    /// `N x M`, one column per series.
    Table(DMatrix<f64>),
}

/// Sample points shared by every series plus the dependent values.
///
/// Invariants (checked on construction):
/// - `x` is non-empty and finite
/// - every series has exactly `x.len()` finite values
/// - a table has at least one series
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    x: Vec<f64>,
    y: Series,
}

impl SampleSet {
    /// A single dependent series.
    pub fn single(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        check_x(&x)?;
        if y.len() != x.len() {
            return Err(FitError::ShapeMismatch(format!(
                "x has {} samples but y has {}",
                x.len(),
                y.len()
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("y"));
        }
        Ok(Self { x, y: Series::One(y) })
    }

    /// Several series given as nested rows in the caller's axis order.
    pub fn table(x: Vec<f64>, rows: &[Vec<f64>], order: AxisOrder) -> Result<Self> {
        check_x(&x)?;
        let n = x.len();

        let Some(first) = rows.first() else {
            return Err(FitError::EmptyInput("series table has no rows"));
        };
        let width = first.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(FitError::ShapeMismatch(format!(
                "table row {i} has {} values, expected {width}",
                row.len()
            )));
        }

        let (n_samples, n_series) = match order {
            AxisOrder::Rows => (width, rows.len()),
            AxisOrder::Cols => (rows.len(), width),
        };
        if n_series == 0 {
            return Err(FitError::EmptyInput("series table has no series"));
        }
        if n_samples != n {
            return Err(FitError::ShapeMismatch(format!(
                "x has {n} samples but each series has {n_samples}"
            )));
        }

        let table = match order {
            AxisOrder::Cols => DMatrix::from_fn(n, n_series, |i, j| rows[i][j]),
            AxisOrder::Rows => DMatrix::from_fn(n, n_series, |i, j| rows[j][i]),
        };
        Self::from_matrix(x, table)
    }

    /// Several series given as an already samples-major `N x M` matrix.
    pub fn from_matrix(x: Vec<f64>, y: DMatrix<f64>) -> Result<Self> {
        check_x(&x)?;
        if y.nrows() != x.len() {
            return Err(FitError::ShapeMismatch(format!(
                "x has {} samples but table has {} rows",
                x.len(),
                y.nrows()
            )));
        }
        if y.ncols() == 0 {
            return Err(FitError::EmptyInput("series table has no series"));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("y"));
        }
        Ok(Self { x, y: Series::Table(y) })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &Series {
        &self.y
    }

    /// Number of samples `N`.
    pub fn n_samples(&self) -> usize {
        self.x.len()
    }

    /// Number of series `M`.
    pub fn n_series(&self) -> usize {
        match &self.y {
            Series::One(_) => 1,
            Series::Table(t) => t.ncols(),
        }
    }

    /// Values of series `j` as an owned vector.
    pub fn series_values(&self, j: usize) -> Option<Vec<f64>> {
        match &self.y {
            Series::One(v) if j == 0 => Some(v.clone()),
            Series::One(_) => None,
            Series::Table(t) if j < t.ncols() => Some(t.column(j).iter().copied().collect()),
            Series::Table(_) => None,
        }
    }
}

fn check_x(x: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(FitError::EmptyInput("x has no samples"));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite("x"));
    }
    Ok(())
}

/// Requested polynomial degree(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DegreeSpec {
    /// One degree applied to every series.
    Uniform(usize),
    /// One degree per series, in series order.
    PerSeries(Vec<usize>),
}

impl DegreeSpec {
    /// Validate against the series count and expand to one degree per series.
    pub fn resolve(&self, n_series: usize) -> Result<Vec<usize>> {
        let degrees = match self {
            DegreeSpec::Uniform(d) => vec![*d; n_series],
            DegreeSpec::PerSeries(ds) => {
                if ds.is_empty() {
                    return Err(FitError::InvalidDegree("degree list is empty".to_string()));
                }
                if ds.len() != n_series {
                    return Err(FitError::ShapeMismatch(format!(
                        "{} degrees given for {n_series} series",
                        ds.len()
                    )));
                }
                ds.clone()
            }
        };
        if let Some(d) = degrees.iter().find(|&&d| d < 1) {
            return Err(FitError::InvalidDegree(format!(
                "degree must be at least 1, got {d}"
            )));
        }
        Ok(degrees)
    }

    /// Largest requested degree (0 for an empty list).
    pub fn max_degree(&self) -> usize {
        match self {
            DegreeSpec::Uniform(d) => *d,
            DegreeSpec::PerSeries(ds) => ds.iter().copied().max().unwrap_or(0),
        }
    }
}

impl From<usize> for DegreeSpec {
    fn from(d: usize) -> Self {
        DegreeSpec::Uniform(d)
    }
}

impl From<Vec<usize>> for DegreeSpec {
    fn from(ds: Vec<usize>) -> Self {
        DegreeSpec::PerSeries(ds)
    }
}

/// Affine change of abscissa applied before fitting.
///
/// Coefficients of a centered fit are in `u = (x - offset) / scale`. The
/// identity (`offset = 0`, `scale = 1`) leaves `x` untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centering {
    pub offset: f64,
    pub scale: f64,
}

impl Default for Centering {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
        }
    }
}

impl Centering {
    /// Center on the mean of `x` and scale by the largest distance from it.
    pub fn from_samples(x: &[f64]) -> Self {
        if x.is_empty() {
            return Self::default();
        }
        let offset = x.iter().sum::<f64>() / x.len() as f64;
        let spread = x.iter().fold(0.0f64, |m, &v| m.max((v - offset).abs()));
        let scale = if spread.is_finite() && spread > 0.0 { spread } else { 1.0 };
        Self { offset, scale }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Map a raw abscissa into the fitted variable.
    pub fn apply(&self, x: f64) -> f64 {
        (x - self.offset) / self.scale
    }

    /// Offset must be finite and scale finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.offset.is_finite() && self.scale.is_finite()) {
            return Err(FitError::NonFinite("centering"));
        }
        if self.scale <= 0.0 {
            return Err(FitError::ShapeMismatch(format!(
                "centering scale must be positive, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Knobs for one fit beyond the degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FitOptions {
    /// Fit in the centered abscissa (see [`Centering::from_samples`]).
    pub centered: bool,
}

/// Points at which to evaluate a model.
#[derive(Debug, Clone, PartialEq)]
pub enum Points {
    Scalar(f64),
    Array(Vec<f64>),
}

impl Points {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Points::Scalar(x) => std::slice::from_ref(x),
            Points::Array(xs) => xs,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<f64> for Points {
    fn from(x: f64) -> Self {
        Points::Scalar(x)
    }
}

impl From<Vec<f64>> for Points {
    fn from(xs: Vec<f64>) -> Self {
        Points::Array(xs)
    }
}

impl From<&[f64]> for Points {
    fn from(xs: &[f64]) -> Self {
        Points::Array(xs.to_vec())
    }
}

/// Result of an evaluation; mirrors the shape of the request.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    Scalar(f64),
    Array(Vec<f64>),
    /// `P x M`, one column per series.
    Table(DMatrix<f64>),
}

impl Evaluated {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Evaluated::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Evaluated::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&DMatrix<f64>> {
        match self {
            Evaluated::Table(t) => Some(t),
            _ => None,
        }
    }

    /// View any result as a `P x M` table (scalar is `1 x 1`, array `P x 1`).
    pub fn into_table(self) -> DMatrix<f64> {
        match self {
            Evaluated::Scalar(v) => DMatrix::from_element(1, 1, v),
            Evaluated::Array(v) => DMatrix::from_column_slice(v.len(), 1, &v),
            Evaluated::Table(t) => t,
        }
    }
}

/// Residuals of one series against its fitted polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResidual {
    pub series: usize,
    pub degree: usize,
    pub y_fit: Vec<f64>,
    pub residual: Vec<f64>,
    pub rmse: f64,
}

/// Resolved configuration for one `polyfit fit` run.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub degrees: DegreeSpec,
    pub order: AxisOrder,
    pub centered: bool,
    pub grid_points: usize,
    pub export_model: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
}

/// Evaluation grid stored next to the coefficients for quick inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGrid {
    pub x: Vec<f64>,
    /// One vector per series, each the same length as `x`.
    pub y: Vec<Vec<f64>>,
}

/// Which model variant a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Single,
    Batch,
}

/// Portable JSON representation of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub kind: ModelKind,
    pub degrees: Vec<usize>,
    pub n_coeffs: Vec<usize>,
    /// All coefficients concatenated in series order, highest power first.
    pub coeffs: Vec<f64>,
    /// Abscissa transform the coefficients are expressed in.
    #[serde(default, skip_serializing_if = "Centering::is_identity")]
    pub centering: Centering,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<ModelGrid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_order_parses_known_values_only() {
        assert_eq!("rows".parse::<AxisOrder>().unwrap(), AxisOrder::Rows);
        assert_eq!(" COLS ".parse::<AxisOrder>().unwrap(), AxisOrder::Cols);
        assert_eq!(
            "diagonal".parse::<AxisOrder>().unwrap_err(),
            FitError::UnsupportedOrder("diagonal".to_string())
        );
    }

    #[test]
    fn rows_and_cols_normalize_to_the_same_table() {
        let x = vec![0.0, 1.0, 2.0];
        // Two series: [1,2,3] and [4,5,6].
        let by_rows = SampleSet::table(x.clone(), &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], AxisOrder::Rows)
            .unwrap();
        let by_cols = SampleSet::table(
            x,
            &[vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]],
            AxisOrder::Cols,
        )
        .unwrap();
        assert_eq!(by_rows, by_cols);
        assert_eq!(by_rows.n_series(), 2);
        assert_eq!(by_rows.series_values(1).unwrap(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn sample_count_mismatch_is_rejected() {
        let err = SampleSet::single(vec![0.0, 1.0, 2.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FitError::ShapeMismatch(_)));

        let err = SampleSet::table(vec![0.0, 1.0], &[vec![1.0, 2.0, 3.0]], AxisOrder::Rows).unwrap_err();
        assert!(matches!(err, FitError::ShapeMismatch(_)));

        let err = SampleSet::table(vec![0.0, 1.0], &[vec![1.0], vec![2.0, 3.0]], AxisOrder::Cols).unwrap_err();
        assert!(matches!(err, FitError::ShapeMismatch(_)));
    }

    #[test]
    fn non_finite_and_empty_inputs_fail_fast() {
        assert_eq!(
            SampleSet::single(vec![0.0, f64::NAN], vec![1.0, 2.0]).unwrap_err(),
            FitError::NonFinite("x")
        );
        assert!(matches!(
            SampleSet::single(vec![], vec![]).unwrap_err(),
            FitError::EmptyInput(_)
        ));
        assert!(matches!(
            SampleSet::table(vec![0.0], &[], AxisOrder::Cols).unwrap_err(),
            FitError::EmptyInput(_)
        ));
    }

    #[test]
    fn degree_spec_resolution() {
        assert_eq!(DegreeSpec::Uniform(2).resolve(3).unwrap(), vec![2, 2, 2]);
        assert_eq!(DegreeSpec::from(vec![2, 3, 1]).resolve(3).unwrap(), vec![2, 3, 1]);
        assert_eq!(DegreeSpec::from(vec![2, 3, 1]).max_degree(), 3);

        assert!(matches!(
            DegreeSpec::from(vec![2, 3]).resolve(3),
            Err(FitError::ShapeMismatch(_))
        ));
        assert!(matches!(DegreeSpec::Uniform(0).resolve(1), Err(FitError::InvalidDegree(_))));
        assert!(matches!(
            DegreeSpec::PerSeries(vec![]).resolve(0),
            Err(FitError::InvalidDegree(_))
        ));
    }

    #[test]
    fn centering_maps_samples_into_unit_range() {
        let c = Centering::from_samples(&[1e5, 1e5 + 2.0, 1e5 + 4.0]);
        assert_eq!(c.offset, 1e5 + 2.0);
        assert_eq!(c.scale, 2.0);
        assert_eq!(c.apply(1e5), -1.0);
        assert_eq!(c.apply(1e5 + 4.0), 1.0);
        assert!(c.validate().is_ok());

        // A constant abscissa keeps unit scale.
        assert_eq!(Centering::from_samples(&[3.0, 3.0]).scale, 1.0);
        assert!(Centering::default().is_identity());
        assert_eq!(Centering::default().apply(7.25), 7.25);

        let bad = Centering { offset: 0.0, scale: 0.0 };
        assert!(matches!(bad.validate(), Err(FitError::ShapeMismatch(_))));
        let bad = Centering { offset: f64::NAN, scale: 1.0 };
        assert_eq!(bad.validate(), Err(FitError::NonFinite("centering")));
    }

    #[test]
    fn degree_spec_json_is_scalar_or_list() {
        let u: DegreeSpec = serde_json::from_str("3").unwrap();
        let p: DegreeSpec = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(u, DegreeSpec::Uniform(3));
        assert_eq!(p, DegreeSpec::PerSeries(vec![1, 2]));
    }
}
