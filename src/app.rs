//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs fitting / evaluation / sample generation
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, EvalArgs, FitArgs, SynthArgs};
use crate::data::SynthConfig;
use crate::domain::{DegreeSpec, FitConfig, Points};
use crate::error::AppError;

pub mod pipeline;

/// Upper bound on `--linspace` point counts.
const MAX_EVAL_POINTS: usize = 10_000_000;

/// Entry point for the `polyfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Eval(args) => handle_eval(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.ingest.samples, &run.model, &run.residuals, &config)
    );

    if let Some(path) = &config.export_model {
        let x = run.ingest.samples.x();
        let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let grid = (config.grid_points > 0).then_some((lo, hi, config.grid_points));
        let file = crate::io::model_to_file(&run.model, grid);
        crate::io::write_model_json(path, &file)?;
        log::info!("wrote model to {}", path.display());
    }
    if let Some(path) = &config.export_residuals {
        crate::io::write_residuals_csv(path, &run.ingest.samples, &run.residuals, &run.ingest.series_names)?;
        log::info!("wrote residuals to {}", path.display());
    }

    Ok(())
}

fn handle_eval(args: EvalArgs) -> Result<(), AppError> {
    let (_, model) = crate::io::read_model_json(&args.model)?;
    let points = eval_points_from_args(&args)?;

    let values = model.evaluate(&points);
    let xs = points.as_slice();

    match &args.out {
        Some(path) => {
            crate::io::write_evaluation_csv(path, xs, &values, &[])?;
            log::info!("wrote {} evaluated points to {}", xs.len(), path.display());
        }
        None => print!("{}", crate::report::format_evaluation(xs, &values)),
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let series = args
        .coeffs
        .iter()
        .map(|s| parse_coeffs(s))
        .collect::<Result<Vec<_>, _>>()?;

    let config = SynthConfig {
        n_samples: args.samples,
        x_min: args.x_min,
        x_max: args.x_max,
        series,
        noise_sigma: args.noise,
        seed: args.seed,
        random_x: args.random_x,
    };
    let synth = crate::data::generate_samples(&config)?;
    let names: Vec<String> = (0..synth.truth.len()).map(|j| format!("y{j}")).collect();
    crate::io::write_samples_csv(&args.out, &synth.samples, &names)?;
    log::info!("wrote {} samples to {}", args.samples, args.out.display());
    Ok(())
}

/// Resolve CLI arguments into a run configuration.
pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let degrees = match args.degree.as_slice() {
        [] => return Err(AppError::new(4, "At least one degree is required.")),
        [d] => DegreeSpec::Uniform(*d),
        ds => DegreeSpec::PerSeries(ds.to_vec()),
    };
    Ok(FitConfig {
        input: args.input.clone(),
        degrees,
        order: args.order,
        centered: args.centered,
        grid_points: args.grid,
        export_model: args.export_model.clone(),
        export_residuals: args.export_residuals.clone(),
    })
}

fn eval_points_from_args(args: &EvalArgs) -> Result<Points, AppError> {
    match (args.at.as_slice(), args.linspace.as_slice()) {
        ([x], []) => Ok(Points::Scalar(*x)),
        (xs, []) if !xs.is_empty() => Ok(Points::Array(xs.to_vec())),
        ([], [start, stop, count]) => {
            if !(count.is_finite() && *count >= 1.0 && count.fract() == 0.0) {
                return Err(AppError::new(4, format!("Invalid point count {count}.")));
            }
            if *count > MAX_EVAL_POINTS as f64 {
                return Err(AppError::new(
                    4,
                    format!("Point count {count} exceeds the limit of {MAX_EVAL_POINTS}."),
                ));
            }
            let n = *count as usize;
            if n == 1 {
                return Ok(Points::Array(vec![*start]));
            }
            let xs = (0..n)
                .map(|i| start + (stop - start) * i as f64 / (n as f64 - 1.0))
                .collect();
            Ok(Points::Array(xs))
        }
        _ => Err(AppError::new(4, "Provide evaluation points with --at or --linspace.")),
    }
}

fn parse_coeffs(s: &str) -> Result<Vec<f64>, AppError> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<f64>()
                .map_err(|_| AppError::new(4, format!("Invalid coefficient '{t}' in '{s}'.")))
        })
        .collect()
}
