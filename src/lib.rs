//! `polyfit-model` library crate.
//!
//! Least-squares polynomial fitting of one or several series sampled on a
//! shared `x`, with per-series degrees, and Horner evaluation of the result.
//!
//! The binary (`polyfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - callers can embed the fitter directly and skip the CSV/JSON layer
//!
//! ```
//! use polyfit_model::{DegreeSpec, Points, SampleSet};
//!
//! let x = vec![0.0, 1.0, 2.0, 3.0];
//! let y = x.iter().map(|v| 2.0 * v * v - 1.0).collect();
//! let samples = SampleSet::single(x, y).unwrap();
//!
//! let model = polyfit_model::fit_model(&samples, &DegreeSpec::Uniform(2)).unwrap();
//! let y = model.evaluate(&Points::Scalar(4.0)).as_scalar().unwrap();
//! assert!((y - 31.0).abs() < 1e-9);
//! ```

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{AxisOrder, Centering, DegreeSpec, Evaluated, FitOptions, Points, SampleSet};
pub use error::{FitError, Result};
pub use fit::{fit_model, fit_model_with};
pub use math::DesignMatrix;
pub use models::{BatchSeriesFit, PolynomialFitModel, RaggedCoeffs, SingleSeriesFit};
