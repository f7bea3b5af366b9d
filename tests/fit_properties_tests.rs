//! Property tests for polynomial fitting and evaluation.
//!
//! ## Test Organization
//!
//! 1. **Exact Recovery** - monomials and interpolation through `d + 1` points
//! 2. **Least Squares** - residuals orthogonal to the design columns
//! 3. **Batch Fits** - heterogeneous degrees against a shared `x`
//! 4. **Failure Modes** - rank deficiency and eager shape checks
//! 5. **Determinism** - repeated evaluation is bit-identical

use approx::{assert_abs_diff_eq, assert_relative_eq};

use polyfit_model::data::{SynthConfig, generate_samples};
use polyfit_model::{
    AxisOrder, DegreeSpec, DesignMatrix, Evaluated, FitError, Points, PolynomialFitModel, SampleSet, fit_model,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| a + (b - a) * i as f64 / (n as f64 - 1.0)).collect()
}

fn eval_array(model: &PolynomialFitModel, xs: &[f64]) -> Vec<f64> {
    match model.evaluate(&Points::Array(xs.to_vec())) {
        Evaluated::Array(v) => v,
        other => panic!("expected an array result, got {other:?}"),
    }
}

// ============================================================================
// Exact Recovery
// ============================================================================

#[test]
fn monomials_round_trip_through_fit_and_evaluate() {
    for d in 1..=6usize {
        for extra in 0..4usize {
            let x = linspace(-1.5, 2.0, d + 1 + extra);
            let y: Vec<f64> = x.iter().map(|v| v.powi(d as i32)).collect();
            let samples = SampleSet::single(x.clone(), y.clone()).unwrap();

            let model = fit_model(&samples, &DegreeSpec::Uniform(d)).unwrap();
            let fitted = eval_array(&model, &x);
            for (f, t) in fitted.iter().zip(&y) {
                assert_abs_diff_eq!(*f, *t, epsilon = 1e-8);
            }

            // Leading coefficient 1, everything else 0.
            let c = model.coefficients();
            assert_eq!(c.len(), d + 1);
            assert_abs_diff_eq!(c[0], 1.0, epsilon = 1e-8);
            for &ci in &c[1..] {
                assert_abs_diff_eq!(ci, 0.0, epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn d_plus_one_points_are_interpolated_exactly() {
    let x = vec![-2.0, -0.5, 1.0, 3.0];
    let y = vec![4.0, -1.0, 2.5, 0.0];
    let samples = SampleSet::single(x.clone(), y.clone()).unwrap();
    let model = fit_model(&samples, &DegreeSpec::Uniform(3)).unwrap();

    for (f, t) in eval_array(&model, &x).iter().zip(&y) {
        assert_abs_diff_eq!(*f, *t, epsilon = 1e-10);
    }
}

#[test]
fn linear_fit_through_two_points_is_the_line() {
    let samples = SampleSet::single(vec![-1.0, 4.0], vec![3.0, -7.0]).unwrap();
    let model = fit_model(&samples, &DegreeSpec::Uniform(1)).unwrap();

    let c = model.coefficients();
    assert_relative_eq!(c[0], -2.0, epsilon = 1e-12);
    assert_relative_eq!(c[1], 1.0, epsilon = 1e-12);

    let mid = model.evaluate(&Points::Scalar(1.5)).as_scalar().unwrap();
    assert_relative_eq!(mid, -2.0, epsilon = 1e-12);
}

// ============================================================================
// Least Squares
// ============================================================================

#[test]
fn training_point_residuals_are_orthogonal_to_the_basis() {
    let x = linspace(0.0, 3.0, 12);
    let y: Vec<f64> = x.iter().map(|v| (2.0 * v).cos() + 0.3 * v).collect();
    let samples = SampleSet::single(x.clone(), y.clone()).unwrap();
    let model = fit_model(&samples, &DegreeSpec::Uniform(2)).unwrap();

    let fitted = eval_array(&model, &x);
    let residual: Vec<f64> = y.iter().zip(&fitted).map(|(o, f)| o - f).collect();

    // Not an interpolant...
    assert!(residual.iter().any(|r| r.abs() > 1e-3));

    // ...but the normal equations A^T r = 0 hold.
    let design = DesignMatrix::vandermonde(&x, 2).unwrap();
    let a = design.as_matrix();
    for col in a.column_iter() {
        let dot: f64 = col.iter().zip(&residual).map(|(c, r)| c * r).sum();
        assert_abs_diff_eq!(dot, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn noisy_samples_recover_the_generating_polynomial() {
    let synth = generate_samples(&SynthConfig {
        n_samples: 400,
        x_min: -1.0,
        x_max: 1.0,
        series: vec![vec![0.5, -1.0, 2.0]],
        noise_sigma: 0.01,
        seed: 1234,
        random_x: true,
    })
    .unwrap();

    let model = fit_model(&synth.samples, &DegreeSpec::Uniform(2)).unwrap();
    for (c, t) in model.coefficients().iter().zip(&synth.truth[0]) {
        assert_abs_diff_eq!(*c, *t, epsilon = 0.01);
    }
}

// ============================================================================
// Batch Fits
// ============================================================================

#[test]
fn heterogeneous_batch_columns_match_single_fits() {
    let x = linspace(-1.0, 2.0, 10);
    let rows: Vec<Vec<f64>> = vec![
        x.iter().map(|v| (v * 1.7).sin()).collect(),
        x.iter().map(|v| (-v).exp()).collect(),
        x.iter().map(|v| v * v - 0.25).collect(),
    ];
    let degrees = vec![2, 3, 1];
    let samples = SampleSet::table(x.clone(), &rows, AxisOrder::Rows).unwrap();
    let model = fit_model(&samples, &DegreeSpec::PerSeries(degrees.clone())).unwrap();

    assert_eq!(model.n_fits(), 3);
    for (j, &d) in degrees.iter().enumerate() {
        assert_eq!(model.n_coeffs()[j], d + 1);
        assert_eq!(model.series_coeffs(j).unwrap().len(), d + 1);
    }

    let at = vec![-0.8, 0.0, 0.3, 1.1, 1.9];
    let table = match model.evaluate(&Points::Array(at.clone())) {
        Evaluated::Table(t) => t,
        other => panic!("expected a table, got {other:?}"),
    };
    assert_eq!(table.shape(), (5, 3));

    for (j, &d) in degrees.iter().enumerate() {
        let one = SampleSet::single(x.clone(), rows[j].clone()).unwrap();
        let single = fit_model(&one, &DegreeSpec::Uniform(d)).unwrap();
        let expected = eval_array(&single, &at);
        for (i, e) in expected.iter().enumerate() {
            assert_abs_diff_eq!(table[(i, j)], *e, epsilon = 1e-10);
        }
    }
}

#[test]
fn axis_orders_give_identical_models() {
    let x = linspace(0.0, 1.0, 6);
    let series: Vec<Vec<f64>> = vec![
        x.iter().map(|v| 3.0 * v + 1.0).collect(),
        x.iter().map(|v| v * v * v).collect(),
    ];
    let samples_major: Vec<Vec<f64>> = (0..x.len()).map(|i| vec![series[0][i], series[1][i]]).collect();

    let by_rows = SampleSet::table(x.clone(), &series, AxisOrder::Rows).unwrap();
    let by_cols = SampleSet::table(x, &samples_major, AxisOrder::Cols).unwrap();

    let spec = DegreeSpec::PerSeries(vec![1, 3]);
    assert_eq!(fit_model(&by_rows, &spec).unwrap(), fit_model(&by_cols, &spec).unwrap());
}

#[test]
fn one_column_table_is_a_batch_of_one() {
    let x = linspace(0.0, 1.0, 4);
    let rows = vec![x.iter().map(|v| 2.0 * v).collect::<Vec<f64>>()];
    let samples = SampleSet::table(x, &rows, AxisOrder::Rows).unwrap();
    let model = fit_model(&samples, &DegreeSpec::Uniform(1)).unwrap();

    assert!(matches!(model, PolynomialFitModel::Batch(_)));
    let out = model.evaluate(&Points::Scalar(0.5));
    assert_eq!(out.as_table().unwrap().shape(), (1, 1));
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn degree_five_on_three_points_is_rank_deficient() {
    let samples = SampleSet::single(vec![0.0, 0.5, 1.0], vec![1.0, 2.0, 0.0]).unwrap();
    match fit_model(&samples, &DegreeSpec::Uniform(5)) {
        Err(FitError::RankDeficient { rank, columns }) => {
            assert_eq!(columns, 6);
            assert!(rank <= 3);
        }
        other => panic!("expected RankDeficient, got {other:?}"),
    }
}

#[test]
fn shape_and_degree_errors_fail_at_construction() {
    let x = linspace(0.0, 1.0, 5);
    let rows = vec![vec![0.0; 5], vec![1.0; 5]];
    let samples = SampleSet::table(x.clone(), &rows, AxisOrder::Rows).unwrap();

    assert!(matches!(
        fit_model(&samples, &DegreeSpec::PerSeries(vec![1, 2, 3])),
        Err(FitError::ShapeMismatch(_))
    ));
    assert!(matches!(
        fit_model(&samples, &DegreeSpec::PerSeries(vec![1, 0])),
        Err(FitError::InvalidDegree(_))
    ));
    assert!(matches!(
        SampleSet::table(x, &[vec![0.0; 4]], AxisOrder::Rows),
        Err(FitError::ShapeMismatch(_))
    ));
    assert!(matches!("columns".parse::<AxisOrder>(), Err(FitError::UnsupportedOrder(_))));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn repeated_evaluation_is_bit_identical() {
    let x = linspace(-3.0, 3.0, 20);
    let rows: Vec<Vec<f64>> = vec![
        x.iter().map(|v| v.sin()).collect(),
        x.iter().map(|v| v.cos()).collect(),
    ];
    let samples = SampleSet::table(x, &rows, AxisOrder::Rows).unwrap();
    let spec = DegreeSpec::PerSeries(vec![5, 4]);

    let model = fit_model(&samples, &spec).unwrap();
    let at = Points::Array(linspace(-3.5, 3.5, 33));
    let a = model.evaluate(&at).into_table();
    let b = model.evaluate(&at).into_table();
    assert!(a.iter().zip(b.iter()).all(|(u, v)| u.to_bits() == v.to_bits()));

    // Refitting (parallel per-series solves) gives the same coefficients.
    let again = fit_model(&samples, &spec).unwrap();
    assert_eq!(model, again);
}
