//! Command-line parsing for the `polyfit` tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/evaluation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::AxisOrder;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "polyfit", version, about = "Least-squares polynomial fitting and evaluation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit polynomials to a sample CSV, print diagnostics and optionally export the model.
    Fit(FitArgs),
    /// Evaluate a previously exported model JSON at new points.
    Eval(EvalArgs),
    /// Generate noisy samples from known polynomials.
    Synth(SynthArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Sample CSV (`x,<series...>` header unless `--order rows`).
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Degree for every series, or a comma-separated list with one degree per series.
    #[arg(short = 'd', long, value_delimiter = ',', num_args = 1.., default_value = "1")]
    pub degree: Vec<usize>,

    /// Layout of the CSV: `cols` (one column per series) or `rows` (one row per series).
    #[arg(long, value_enum, default_value_t = AxisOrder::Cols)]
    pub order: AxisOrder,

    /// Fit in the centered abscissa `(x - mean) / max|x - mean|`.
    #[arg(long)]
    pub centered: bool,

    /// Number of points in the evaluation grid stored with the model.
    #[arg(long, default_value_t = 101)]
    pub grid: usize,

    /// Export the fitted model to JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,

    /// Export per-sample residuals to CSV.
    #[arg(long = "export-residuals", value_name = "CSV")]
    pub export_residuals: Option<PathBuf>,
}

/// Options for evaluating a saved model.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Model JSON produced by `polyfit fit --export-model`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Comma-separated evaluation points.
    #[arg(long, value_delimiter = ',', num_args = 1.., conflicts_with = "linspace", allow_negative_numbers = true)]
    pub at: Vec<f64>,

    /// Evenly spaced points: START STOP COUNT.
    #[arg(long, num_args = 3, value_names = ["START", "STOP", "COUNT"], allow_negative_numbers = true)]
    pub linspace: Vec<f64>,

    /// Write CSV here instead of printing a table.
    #[arg(long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// True coefficients of one series as `c0,c1,...`, highest power first.
    /// Repeat the flag for more series.
    #[arg(long = "coeffs", required = true, allow_hyphen_values = true)]
    pub coeffs: Vec<String>,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub samples: usize,

    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub x_min: f64,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Standard deviation of the Gaussian noise added to every value.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Draw x uniformly at random instead of an even grid.
    #[arg(long)]
    pub random_x: bool,

    /// Output CSV.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,
}
