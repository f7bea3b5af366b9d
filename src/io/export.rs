//! Export evaluated curves and residuals to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets, plotting
//! scripts or further numerical processing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Evaluated, SampleSet, SeriesResidual};
use crate::error::AppError;

/// Write evaluated values as `x,<series...>` CSV.
pub fn write_evaluation_csv(path: &Path, xs: &[f64], values: &Evaluated, names: &[String]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_evaluation(file, xs, values, names)
}

/// Same as [`write_evaluation_csv`] but to any writer (stdout for `polyfit eval`).
pub fn write_evaluation<W: Write>(mut out: W, xs: &[f64], values: &Evaluated, names: &[String]) -> Result<(), AppError> {
    let table = values.clone().into_table();
    let m = table.ncols();

    let mut header = String::from("x");
    for j in 0..m {
        header.push(',');
        match names.get(j) {
            Some(name) => header.push_str(name),
            None => header.push_str(&format!("y{j}")),
        }
    }
    writeln!(out, "{header}").map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    for (i, x) in xs.iter().enumerate().take(table.nrows()) {
        let mut line = format!("{x:.12e}");
        for j in 0..m {
            line.push_str(&format!(",{:.12e}", table[(i, j)]));
        }
        writeln!(out, "{line}").map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    Ok(())
}

/// Write per-sample residuals as `series,degree,x,y_obs,y_fit,residual` CSV.
pub fn write_residuals_csv(
    path: &Path,
    samples: &SampleSet,
    residuals: &[SeriesResidual],
    names: &[String],
) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residual CSV '{}': {e}", path.display())))?;

    writeln!(file, "series,degree,x,y_obs,y_fit,residual")
        .map_err(|e| AppError::new(2, format!("Failed to write residual CSV header: {e}")))?;

    for r in residuals {
        let name = names.get(r.series).cloned().unwrap_or_else(|| format!("y{}", r.series));
        let y_obs = samples.series_values(r.series).unwrap_or_default();
        for (i, &x) in samples.x().iter().enumerate() {
            writeln!(
                file,
                "{},{},{:.12e},{:.12e},{:.12e},{:.12e}",
                name,
                r.degree,
                x,
                y_obs.get(i).copied().unwrap_or(f64::NAN),
                r.y_fit[i],
                r.residual[i],
            )
            .map_err(|e| AppError::new(2, format!("Failed to write residual CSV row: {e}")))?;
        }
    }

    Ok(())
}

/// Write a sample set as `x,<series...>` CSV (the layout `ingest` reads by default).
pub fn write_samples_csv(path: &Path, samples: &SampleSet, names: &[String]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let values = match samples.y() {
        crate::domain::Series::One(y) => Evaluated::Array(y.clone()),
        crate::domain::Series::Table(t) => Evaluated::Table(t.clone()),
    };
    write_evaluation(file, samples.x(), &values, names)
}
