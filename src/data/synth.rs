//! Synthetic sample generation from known polynomials.
//!
//! Useful for demos, for checking a fit against a known truth and as test
//! input. Generation is fully deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SampleSet;
use crate::error::AppError;
use crate::math::horner;

/// Settings for synthetic sample generation.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub n_samples: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// True coefficients per series, highest power first.
    pub series: Vec<Vec<f64>>,
    /// Standard deviation of the additive Gaussian noise.
    pub noise_sigma: f64,
    pub seed: u64,
    /// Draw `x` uniformly at random instead of an even grid.
    pub random_x: bool,
}

/// Generated samples plus the polynomials they were drawn from.
#[derive(Debug, Clone)]
pub struct SyntheticSamples {
    pub samples: SampleSet,
    pub truth: Vec<Vec<f64>>,
}

pub fn generate_samples(config: &SynthConfig) -> Result<SyntheticSamples, AppError> {
    if config.n_samples < 2 {
        return Err(AppError::new(4, "Sample count must be at least 2."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(AppError::new(4, "Invalid x range for sample generation."));
    }
    if config.series.is_empty() || config.series.iter().any(Vec::is_empty) {
        return Err(AppError::new(4, "Every synthetic series needs at least one coefficient."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise_sigma.max(0.0))
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let n = config.n_samples;
    let mut x: Vec<f64> = if config.random_x {
        (0..n).map(|_| rng.gen_range(config.x_min..=config.x_max)).collect()
    } else {
        (0..n)
            .map(|i| config.x_min + (config.x_max - config.x_min) * i as f64 / (n as f64 - 1.0))
            .collect()
    };
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rows: Vec<Vec<f64>> = config
        .series
        .iter()
        .map(|c| x.iter().map(|&xi| horner(c, xi) + normal.sample(&mut rng)).collect())
        .collect();

    let samples = if rows.len() == 1 {
        SampleSet::single(x, rows.into_iter().next().unwrap_or_default())?
    } else {
        SampleSet::table(x, &rows, crate::domain::AxisOrder::Rows)?
    };

    Ok(SyntheticSamples {
        samples,
        truth: config.series.clone(),
    })
}
