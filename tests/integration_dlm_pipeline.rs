//! Integration tests for discount DLMs, TVAR fitting, and FFBS.
//!
//! Purpose
//! -------
//! - Validate the conjugate discount-DLM recursions against hand-computed
//!   values, then exercise smoothing, forecasting, and the TVAR wrapper on
//!   top of the same filter.
//! - Check that the scalar FFBS engine agrees with its exact smoother.
//!
//! Coverage
//! --------
//! - `statespace::dlm`: `DLMPrior`, `DLMSpec`, `DiscountFactors`,
//!   `DiscountDLM::filter`, `DLMFit::{smooth, forecast}`.
//! - `statespace::tvar`: `TVARModel::fit` and its coefficient accessors.
//! - `statespace::ffbs`: `UnivariateSSM` forward filter, smoother, and
//!   backward sampler.
//!
//! Exclusions
//! ----------
//! - Validation of individual constructors; those are covered by unit tests.
//! - Python bindings.
use ndarray::{Array1, Array2, array};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};
use rust_statespace::statespace::{
    Coefficient, DLMPrior, DLMSpec, DiscountDLM, DiscountFactors, ErrorKind, SSError,
    TVARModel, UnivariateSSM,
};

/// Local-level DLM with `m0 = 0`, `C0 = 1`, `n0 = s0 = 1` and no
/// discounting.
fn local_level(y: Array1<f64>) -> DiscountDLM {
    let n = y.len();
    let prior = DLMPrior::new(array![0.0], array![[1.0]], 1.0, 1.0).unwrap();
    let spec = DLMSpec::new(
        Array2::ones((n, 1)),
        array![[1.0]],
        prior,
        DiscountFactors::new(1.0, 1.0).unwrap(),
    )
    .unwrap();
    DiscountDLM::new(y, spec).unwrap()
}

#[test]
// Purpose
// -------
// Two conjugate updates of a local-level model reproduce the closed-form
// normal / inverse-gamma posteriors.
//
// Given
// -----
// - y = [1.0, 1.2], δ = β = 1, m0 = 0, C0 = 1, n0 = 1, s0 = 1.
//
// Expect
// ------
// - t = 1: Q = 2, m = 0.5, C = 0.375, n = 2, s = 0.75.
// - t = 2: Q = 1.125, m = 0.7333…, n = 3, s = 0.608888…
fn local_level_matches_hand_computed_posteriors() {
    // Arrange
    let dlm = local_level(array![1.0, 1.2]);

    // Act
    let fit = dlm.filter().unwrap();

    // Assert
    let step1 = &fit.steps()[0];
    assert!((step1.forecast.variance - 2.0).abs() < 1e-12);
    assert!((step1.posterior.mean[0] - 0.5).abs() < 1e-12);
    assert!((step1.posterior.cov[[0, 0]] - 0.375).abs() < 1e-12);
    assert!((step1.posterior.df - 2.0).abs() < 1e-12);
    assert!((step1.posterior.scale - 0.75).abs() < 1e-12);

    let step2 = &fit.steps()[1];
    assert!((step2.forecast.variance - 1.125).abs() < 1e-12);
    assert!((step2.posterior.mean[0] - 0.733_333_333_333).abs() < 1e-9);
    assert!((step2.posterior.df - 3.0).abs() < 1e-12);
    assert!((step2.posterior.scale - 0.608_888_888_889).abs() < 1e-9);

    assert_eq!(fit.pred_loglik().len(), 2);
    assert!(fit.total_loglik().is_finite());
}

#[test]
// Purpose
// -------
// Smoothing and forecasting a filtered local level give consistent outputs:
// the last smoothed state equals the last filtered state, and forecast
// variances grow with the horizon.
fn local_level_smooth_and_forecast_are_consistent() {
    // Arrange
    let mut rng = StdRng::seed_from_u64(3);
    let y: Array1<f64> = (0..60)
        .map(|_| {
            let e: f64 = StandardNormal.sample(&mut rng);
            2.0 + 0.3 * e
        })
        .collect();
    let n = y.len();
    let prior = DLMPrior::new(array![0.0], array![[10.0]], 1.0, 1.0).unwrap();
    let spec = DLMSpec::new(
        Array2::ones((n, 1)),
        array![[1.0]],
        prior,
        DiscountFactors::new(0.95, 0.99).unwrap(),
    )
    .unwrap();

    // Act
    let fit = DiscountDLM::new(y, spec).unwrap().filter().unwrap();
    let smoothed = fit.smooth().unwrap();
    let forecasts = fit.forecast(Array2::ones((5, 1)).view()).unwrap();

    // Assert
    assert_eq!(smoothed.len(), n + 1);
    let last = fit.final_state();
    assert!((smoothed[n].mean[0] - last.mean[0]).abs() < 1e-12);
    assert!((last.mean[0] - 2.0).abs() < 0.5);

    assert_eq!(forecasts.len(), 5);
    for (h, pair) in forecasts.windows(2).enumerate() {
        assert_eq!(pair[0].horizon, h + 1);
        assert!((pair[0].mean - pair[1].mean).abs() < 1e-12);
        assert!(pair[1].variance > pair[0].variance);
    }
}

#[test]
// Purpose
// -------
// A TVAR(2) fit on a stationary AR(2) series tracks the true coefficients.
//
// Given
// -----
// - x_t = 0.5 x_{t-1} − 0.3 x_{t-2} + ε_t, n = 3000, seeded N(0, 1) noise.
// - δ = β = 1 (static regression), vague isotropic prior.
//
// Expect
// ------
// - Final filtered coefficients within 0.07 of (0.5, −0.3).
// - Coefficient matrices have n − p rows.
fn tvar_recovers_static_ar2_coefficients() {
    // Arrange
    let n = 3000;
    let mut rng = StdRng::seed_from_u64(21);
    let mut x = Array1::<f64>::zeros(n);
    for t in 2..n {
        let e: f64 = StandardNormal.sample(&mut rng);
        x[t] = 0.5 * x[t - 1] - 0.3 * x[t - 2] + e;
    }
    let prior = DLMPrior::isotropic(2, 10.0, 1.0, 1.0).unwrap();

    // Act
    let fit = TVARModel::fit(x.view(), 2, prior, DiscountFactors::new(1.0, 1.0).unwrap())
        .unwrap();
    let coef = fit.coefficients();
    let smooth = fit.smoothed_coefficients().unwrap();

    // Assert
    assert_eq!(fit.lag_order(), 2);
    assert_eq!(coef.dim(), (n - 2, 2));
    assert_eq!(smooth.dim(), (n - 2, 2));
    let last = coef.row(n - 3);
    assert!((last[0] - 0.5).abs() < 0.07, "phi_1 = {}", last[0]);
    assert!((last[1] + 0.3).abs() < 0.07, "phi_2 = {}", last[1]);
}

#[test]
// Purpose
// -------
// Misconfigured inputs are classified as configuration errors before any
// recursion starts.
fn misconfigured_inputs_are_configuration_errors() {
    let prior = DLMPrior::isotropic(2, 1.0, 1.0, 1.0).unwrap();
    let err = TVARModel::fit(array![1.0, 2.0].view(), 2, prior, DiscountFactors::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let bad = DiscountFactors::new(1.5, 1.0).unwrap_err();
    assert_eq!(bad.kind(), ErrorKind::Configuration);

    let empty = UnivariateSSM::new(
        Array1::zeros(0),
        Coefficient::Constant(1.0),
        Coefficient::Constant(1.0),
        Coefficient::Constant(1.0),
        1.0,
        0.0,
        1.0,
    )
    .unwrap_err();
    assert!(matches!(empty, SSError::EmptySeries));
}

#[test]
// Purpose
// -------
// FFBS draws from a local-level model are centred on the exact smoothed
// means.
//
// Given
// -----
// - n = 20 observations, V = 0.5, W = 0.2, m0 = 0, C0 = 1.
// - 4000 seeded FFBS draws.
//
// Expect
// ------
// - Every Monte Carlo mean within 5 standard errors of the smoothed mean.
fn ffbs_draws_match_smoothed_moments() {
    // Arrange
    let mut rng = StdRng::seed_from_u64(9);
    let y: Array1<f64> = (0..20).map(|t| (t as f64 * 0.3).sin()).collect();
    let model = UnivariateSSM::new(
        y,
        Coefficient::Constant(1.0),
        Coefficient::Constant(1.0),
        Coefficient::Constant(0.5),
        0.2,
        0.0,
        1.0,
    )
    .unwrap();
    let exact = model.smooth_moments().unwrap();
    let fp = model.forward_filter().unwrap();
    let draws = 4000;

    // Act
    let mut sum = Array1::<f64>::zeros(21);
    for _ in 0..draws {
        sum += &model.backward_sample(&fp, &mut rng).unwrap();
    }
    let mc_mean = sum / draws as f64;

    // Assert
    for t in 0..=20 {
        let se = (exact.var[t] / draws as f64).sqrt();
        assert!(
            (mc_mean[t] - exact.mean[t]).abs() < 5.0 * se,
            "t = {t}: mc {} vs exact {}",
            mc_mean[t],
            exact.mean[t]
        );
    }
}
