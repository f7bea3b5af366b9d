//! Reporting utilities: residuals and formatted terminal output.

use crate::domain::{Points, SampleSet, SeriesResidual};
use crate::error::AppError;
use crate::models::PolynomialFitModel;

pub mod format;

pub use format::*;

/// Fitted values, residuals and RMSE for every series of `samples`.
///
/// `model` must have been fit on a sample set with the same series count.
pub fn compute_residuals(samples: &SampleSet, model: &PolynomialFitModel) -> Result<Vec<SeriesResidual>, AppError> {
    if samples.n_series() != model.n_fits() {
        return Err(AppError::new(
            4,
            format!(
                "Model has {} series but samples have {}.",
                model.n_fits(),
                samples.n_series()
            ),
        ));
    }

    let fitted = model.evaluate(&Points::Array(samples.x().to_vec())).into_table();
    let mut out = Vec::with_capacity(model.n_fits());
    for (j, &degree) in model.degrees().iter().enumerate() {
        let Some(y) = samples.series_values(j) else {
            return Err(AppError::new(4, format!("Series {j} missing from samples.")));
        };

        let y_fit: Vec<f64> = fitted.column(j).iter().copied().collect();
        if y_fit.iter().any(|v| !v.is_finite()) {
            return Err(AppError::new(4, "Non-finite model prediction during residual computation."));
        }
        let residual: Vec<f64> = y.iter().zip(&y_fit).map(|(o, f)| o - f).collect();
        let sse: f64 = residual.iter().map(|r| r * r).sum();
        let rmse = (sse / residual.len() as f64).sqrt();

        out.push(SeriesResidual {
            series: j,
            degree,
            y_fit,
            residual,
            rmse,
        });
    }
    Ok(out)
}
