//! CSV ingest of sample sets.
//!
//! Two layouts are accepted, matching `AxisOrder`:
//!
//! - `cols` (default): a header `x,<series...>` followed by one record per
//!   sample. Records that fail to parse are skipped and reported.
//! - `rows`: one record per series, `<name>,v1,...,vN`, with the record named
//!   `x` holding the sample points. No header. Any bad value is fatal because
//!   dropping a sample from one series would desynchronize the others.
//!
//! A file with exactly one series yields a single-series sample set; more
//! columns yield a table.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{AxisOrder, SampleSet};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated samples + series names + skipped rows.
#[derive(Debug, Clone)]
pub struct IngestedSamples {
    pub samples: SampleSet,
    pub series_names: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a sample CSV laid out in `order`.
pub fn load_samples(path: &Path, order: AxisOrder) -> Result<IngestedSamples, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(order == AxisOrder::Cols)
        .trim(csv::Trim::All)
        .from_reader(file);

    match order {
        AxisOrder::Cols => load_cols(&mut reader),
        AxisOrder::Rows => load_rows(&mut reader),
    }
}

fn load_cols<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<IngestedSamples, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.len() < 2 || !headers[0].eq_ignore_ascii_case("x") {
        return Err(AppError::new(
            2,
            "CSV header must be 'x' followed by at least one series column.",
        ));
    }
    let series_names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let width = headers.len();

    let mut x = Vec::new();
    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        if record.len() != width {
            row_errors.push(RowError {
                line,
                message: format!("expected {width} fields, found {}", record.len()),
            });
            continue;
        }

        match parse_values(&record, 0) {
            Ok(values) => {
                x.push(values[0]);
                rows.push(values[1..].to_vec());
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for e in &row_errors {
        log::warn!("skipping line {}: {}", e.line, e.message);
    }

    let rows_used = rows.len();
    let samples = if series_names.len() == 1 {
        let y = rows.into_iter().map(|r| r[0]).collect();
        SampleSet::single(x, y)?
    } else {
        SampleSet::table(x, &rows, AxisOrder::Cols)?
    };

    Ok(IngestedSamples {
        samples,
        series_names,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn load_rows<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<IngestedSamples, AppError> {
    let mut x: Option<Vec<f64>> = None;
    let mut series_names = Vec::new();
    let mut rows = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        rows_read += 1;

        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        if record.is_empty() || record[0].is_empty() {
            return Err(AppError::new(2, format!("Line {line} has no series name.")));
        }
        let values = parse_values(&record, 1).map_err(|m| AppError::new(2, format!("Line {line}: {m}")))?;

        if record[0].eq_ignore_ascii_case("x") {
            if x.is_some() {
                return Err(AppError::new(2, format!("Duplicate 'x' record on line {line}.")));
            }
            x = Some(values);
        } else {
            series_names.push(record[0].to_string());
            rows.push(values);
        }
    }

    let Some(x) = x else {
        return Err(AppError::new(2, "CSV has no 'x' record."));
    };

    let samples = if rows.len() == 1 {
        let y = rows.pop().unwrap_or_default();
        SampleSet::single(x, y)?
    } else {
        SampleSet::table(x, &rows, AxisOrder::Rows)?
    };

    let rows_used = rows_read;
    Ok(IngestedSamples {
        samples,
        series_names,
        row_errors: Vec::new(),
        rows_read,
        rows_used,
    })
}

/// Parse every field from `skip` onwards as a finite `f64`.
fn parse_values(record: &StringRecord, skip: usize) -> Result<Vec<f64>, String> {
    record
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, field)| {
            let v: f64 = field
                .parse()
                .map_err(|_| format!("field {} ('{field}') is not a number", i + 1))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("field {} is not finite", i + 1))
            }
        })
        .collect()
}
