//! Read/write model JSON files.
//!
//! A model JSON is the "portable" representation of a fit:
//! - variant (single/batch), degrees and coefficient counts
//! - all coefficients, concatenated in series order
//! - the abscissa centering, when the fit used one
//! - an optional precomputed evaluation grid for quick inspection
//!
//! The schema is defined by `domain::ModelFile`. Loading always goes through
//! `model_from_file`, which re-validates the ragged layout.

use std::fs::File;
use std::path::Path;

use crate::domain::{ModelFile, ModelGrid, ModelKind, Points};
use crate::error::{AppError, FitError};
use crate::models::{BatchSeriesFit, PolynomialFitModel, RaggedCoeffs, SingleSeriesFit};

const TOOL: &str = "polyfit";

/// Convert a model to its file representation, optionally with a grid of
/// `grid_points` evenly spaced points over `[x_min, x_max]`.
pub fn model_to_file(model: &PolynomialFitModel, grid: Option<(f64, f64, usize)>) -> ModelFile {
    let kind = match model {
        PolynomialFitModel::Single(_) => ModelKind::Single,
        PolynomialFitModel::Batch(_) => ModelKind::Batch,
    };
    ModelFile {
        tool: TOOL.to_string(),
        kind,
        degrees: model.degrees().to_vec(),
        n_coeffs: model.n_coeffs().to_vec(),
        coeffs: model.coefficients().to_vec(),
        centering: model.centering(),
        grid: grid.map(|(lo, hi, n)| build_grid(model, lo, hi, n)),
    }
}

/// Rebuild a model from its file representation.
pub fn model_from_file(file: &ModelFile) -> Result<PolynomialFitModel, FitError> {
    if file.degrees.len() != file.n_coeffs.len() {
        return Err(FitError::ShapeMismatch(format!(
            "{} degrees but {} coefficient counts",
            file.degrees.len(),
            file.n_coeffs.len()
        )));
    }
    if let Some(j) = file.degrees.iter().zip(&file.n_coeffs).position(|(d, k)| d + 1 != *k) {
        return Err(FitError::ShapeMismatch(format!(
            "series {j}: degree {} does not match {} coefficients",
            file.degrees[j], file.n_coeffs[j]
        )));
    }
    if file.coeffs.iter().any(|c| !c.is_finite()) {
        return Err(FitError::NonFinite("coefficients"));
    }
    file.centering.validate()?;

    match file.kind {
        ModelKind::Single => {
            if file.n_coeffs.len() != 1 || file.n_coeffs[0] != file.coeffs.len() {
                return Err(FitError::ShapeMismatch(
                    "single-series model must hold exactly one coefficient vector".to_string(),
                ));
            }
            Ok(SingleSeriesFit::new(file.coeffs.clone())?
                .with_centering(file.centering)
                .into())
        }
        ModelKind::Batch => {
            let ragged = RaggedCoeffs::from_parts(file.n_coeffs.clone(), file.coeffs.clone())?;
            Ok(BatchSeriesFit::new(ragged).with_centering(file.centering).into())
        }
    }
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, file: &ModelFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model JSON file and rebuild the model.
pub fn read_model_json(path: &Path) -> Result<(ModelFile, PolynomialFitModel), AppError> {
    let f = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let file: ModelFile =
        serde_json::from_reader(f).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    let model = model_from_file(&file)?;
    Ok((file, model))
}

fn build_grid(model: &PolynomialFitModel, x_min: f64, x_max: f64, n: usize) -> ModelGrid {
    let n = n.max(2);
    let (mut x0, mut x1) = (x_min, x_max);
    if !(x0.is_finite() && x1.is_finite()) || x1 < x0 {
        x0 = 0.0;
        x1 = 1.0;
    }
    if (x1 - x0).abs() < 1e-12 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let x: Vec<f64> = (0..n)
        .map(|i| x0 + (x1 - x0) * i as f64 / (n as f64 - 1.0))
        .collect();

    let table = model.evaluate(&Points::Array(x.clone())).into_table();
    let y = table
        .column_iter()
        .map(|col| col.iter().copied().collect())
        .collect();

    ModelGrid { x, y }
}
