//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{Evaluated, FitConfig, SampleSet, SeriesResidual};
use crate::models::PolynomialFitModel;

/// Format the run summary (dataset stats + per-series coefficients and RMSE).
pub fn format_fit_summary(
    samples: &SampleSet,
    model: &PolynomialFitModel,
    residuals: &[SeriesResidual],
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== polyfit - least-squares polynomial fit ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));

    let x = samples.x();
    let (x_min, x_max) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    out.push_str(&format!(
        "Samples: n={} | series={} | x=[{:.4}, {:.4}]\n",
        samples.n_samples(),
        samples.n_series(),
        x_min,
        x_max
    ));

    let kind = match model {
        PolynomialFitModel::Single(_) => "single",
        PolynomialFitModel::Batch(_) => "batch",
    };
    out.push_str(&format!("Model: {kind} | degrees={:?}\n", model.degrees()));
    let centering = model.centering();
    if !centering.is_identity() {
        out.push_str(&format!(
            "Centered: u = (x - {:.6}) / {:.6}; coefficients are in u\n",
            centering.offset, centering.scale
        ));
    }

    out.push_str("\nSeries:\n");
    for r in residuals {
        let coeffs = model.series_coeffs(r.series).unwrap_or(&[]);
        out.push_str(&format!(
            "  [{:>3}] deg={} RMSE={:.6e} coeffs={}\n",
            r.series,
            r.degree,
            r.rmse,
            fmt_vec(coeffs)
        ));
    }

    out
}

/// Format an evaluation result as a whitespace-aligned table.
pub fn format_evaluation(xs: &[f64], values: &Evaluated) -> String {
    let mut out = String::new();
    match values {
        Evaluated::Scalar(v) => {
            let x = xs.first().copied().unwrap_or(f64::NAN);
            out.push_str(&format!("{x:>14.6} {v:>16.8e}\n"));
        }
        Evaluated::Array(vs) => {
            out.push_str(&format!("{:>14} {:>16}\n", "x", "y"));
            for (x, v) in xs.iter().zip(vs) {
                out.push_str(&format!("{x:>14.6} {v:>16.8e}\n"));
            }
        }
        Evaluated::Table(t) => {
            out.push_str(&format!("{:>14}", "x"));
            for j in 0..t.ncols() {
                out.push_str(&format!(" {:>16}", format!("y{j}")));
            }
            out.push('\n');
            for (i, x) in xs.iter().enumerate().take(t.nrows()) {
                out.push_str(&format!("{x:>14.6}"));
                for j in 0..t.ncols() {
                    out.push_str(&format!(" {:>16.8e}", t[(i, j)]));
                }
                out.push('\n');
            }
        }
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6e}")).collect();
    format!("[{}]", parts.join(", "))
}
