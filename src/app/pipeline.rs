//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> fit -> residuals
//!
//! Front-ends can then focus on presentation (printing vs exporting).

use crate::domain::{FitConfig, FitOptions, SeriesResidual};
use crate::error::AppError;
use crate::io::ingest::IngestedSamples;
use crate::models::PolynomialFitModel;

/// All computed outputs of a single `polyfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedSamples,
    pub model: PolynomialFitModel,
    pub residuals: Vec<SeriesResidual>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = crate::io::ingest::load_samples(&config.input, config.order)?;
    log::info!(
        "loaded {} samples x {} series from {} ({} rows skipped)",
        ingest.samples.n_samples(),
        ingest.samples.n_series(),
        config.input.display(),
        ingest.row_errors.len()
    );

    run_fit_with_ingest(config, ingest)
}

/// Execute the fitting pipeline on already-loaded samples.
pub fn run_fit_with_ingest(config: &FitConfig, ingest: IngestedSamples) -> Result<RunOutput, AppError> {
    let options = FitOptions {
        centered: config.centered,
    };
    let model = crate::fit::fit_model_with(&ingest.samples, &config.degrees, options)?;
    let residuals = crate::report::compute_residuals(&ingest.samples, &model)?;

    Ok(RunOutput {
        ingest,
        model,
        residuals,
    })
}
