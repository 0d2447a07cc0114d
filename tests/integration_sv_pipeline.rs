//! Integration tests for the stochastic-volatility Gibbs sampler.
//!
//! Purpose
//! -------
//! - Validate the end-to-end SV pipeline: simulated returns, data
//!   transformation, mixture approximation, the φ / μ / v / z conditionals,
//!   and the burn-in / thinning loop.
//! - Check the behavioral guarantees a caller relies on: parameter
//!   recovery, φ stability, reproducibility, and input rejection.
//!
//! Coverage
//! --------
//! - `volatility::core`: `SVData`, `NormalMixture`, `SVPriors`,
//!   `SamplerOptions`, `simulate_sv`.
//! - `volatility::models`: `SVSampler::run_seeded`, `gibbs_sweep`, and the
//!   `SVTrace` accessors.
//!
//! Exclusions
//! ----------
//! - Distributional checks of the individual draws; those live in unit
//!   tests next to each conditional.
//! - Python bindings.
use ndarray::Array1;
use rand::{SeedableRng, rngs::StdRng};
use rust_statespace::{
    statespace::ErrorKind,
    volatility::{
        InitialValues, NormalMixture, PhiBounds, PhiDraw, SVData, SVError, SVModel, SVPriors,
        SVSampler, SVState, SamplerOptions, gibbs_sweep, simulate_sv,
    },
};

/// Simulate `n` returns from the AR(1) SV model with the given seed.
fn simulated_returns(n: usize, phi: f64, mu: f64, v: f64, seed: u64) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_sv(n, phi, mu, v, &mut rng).unwrap().returns
}

fn sampler(returns: Array1<f64>, priors: SVPriors, options: SamplerOptions) -> SVSampler {
    SVSampler::new(
        SVData::new(returns).unwrap(),
        NormalMixture::log_chi2_half().unwrap(),
        priors,
        options,
    )
    .unwrap()
}

#[test]
// Purpose
// -------
// Under the default priors, the posterior means recover the parameters
// that generated the series.
//
// Given
// -----
// - n = 500 returns from φ = 0.95, μ = −0.5, v = 0.02 (data seed 101).
// - `SVPriors::default()`, which is not centred on the true v.
// - 2000 retained sweeps after 500 burn-in.
//
// Expect
// ------
// - Posterior mean φ within 0.05, v within 0.01, μ within 0.5.
fn sampler_recovers_simulated_parameters() {
    // Arrange
    let returns = simulated_returns(500, 0.95, -0.5, 0.02, 101);
    let options = SamplerOptions::with_counts(2000, 500, 1).unwrap();
    let s = sampler(returns, SVPriors::default(), options);

    // Act
    let trace = s.run_seeded(7).unwrap();

    // Assert
    let phi = trace.phi().mean().unwrap();
    let v = trace.v().mean().unwrap();
    let mu = trace.mu().mean().unwrap();
    assert_eq!(trace.len(), 2000);
    assert!((phi - 0.95).abs() < 0.05, "posterior mean phi = {phi}");
    assert!((v - 0.02).abs() < 0.01, "posterior mean v = {v}");
    assert!((mu + 0.5).abs() < 0.5, "posterior mean mu = {mu}");
    assert!(trace.acceptance_rate() > 0.0);
}

#[test]
// Purpose
// -------
// φ never leaves the open stability interval, even over a long run on a
// highly persistent series where many proposals land near the boundary.
//
// Given
// -----
// - n = 200 returns from φ = 0.98.
// - 10 000 recorded sweeps under the unit bounds, 2000 under the
//   symmetric bounds.
//
// Expect
// ------
// - Every retained φ lies strictly inside its interval.
// - Rejected proposals keep the previous value.
fn phi_stays_strictly_inside_stability_interval() {
    // Arrange
    let returns = simulated_returns(200, 0.98, -1.0, 0.01, 5);
    let unit = sampler(
        returns.clone(),
        SVPriors::default(),
        SamplerOptions::with_counts(10_000, 0, 1).unwrap(),
    );
    let symmetric = sampler(
        returns,
        SVPriors::default(),
        SamplerOptions::new(2000, 0, 1, PhiBounds::Symmetric, InitialValues::default()).unwrap(),
    );

    // Act
    let unit_trace = unit.run_seeded(99).unwrap();
    let sym_trace = symmetric.run_seeded(100).unwrap();

    // Assert
    assert_eq!(unit_trace.len(), 10_000);
    assert!(unit_trace.phi().iter().all(|&p| p > 0.0 && p < 1.0));
    assert!(sym_trace.phi().iter().all(|&p| p > -1.0 && p < 1.0));
    assert!(unit_trace.v().iter().all(|&v| v.is_finite() && v > 0.0));
}

#[test]
// Purpose
// -------
// Driving the sweep by hand shows the rejected-proposal contract: a
// rejected φ leaves the chain at its previous value.
fn rejected_phi_keeps_previous_value() {
    // Arrange
    let returns = simulated_returns(150, 0.97, -0.8, 0.02, 12);
    let data = SVData::new(returns).unwrap();
    let model =
        SVModel::new(NormalMixture::log_chi2_half().unwrap(), SVPriors::default(), PhiBounds::Unit);
    let mut state = SVState::initial(data.len(), InitialValues::default());
    let mut rng = StdRng::seed_from_u64(13);

    // Act / Assert
    for _ in 0..500 {
        let (next, draw) = gibbs_sweep(&state, &data, &model, &mut rng).unwrap();
        match draw {
            PhiDraw::Accepted { value } => assert_eq!(next.phi, value),
            PhiDraw::Rejected { retained, .. } => {
                assert_eq!(retained, state.phi);
                assert_eq!(next.phi, state.phi);
            }
        }
        state = next;
    }
}

#[test]
// Purpose
// -------
// Runs are reproducible bit for bit from the seed, including the thinned
// latent paths.
fn seeded_runs_are_bit_identical() {
    // Arrange
    let returns = simulated_returns(120, 0.9, 0.0, 0.05, 31);
    let s = sampler(
        returns,
        SVPriors::default(),
        SamplerOptions::with_counts(300, 100, 3).unwrap(),
    );

    // Act
    let a = s.run_seeded(4242).unwrap();
    let b = s.run_seeded(4242).unwrap();

    // Assert
    assert_eq!(a.len(), 100);
    assert_eq!(a, b);
    assert_eq!(a.log_volatility(), b.log_volatility());
    assert_eq!(a.gamma(), b.gamma());
}

#[test]
// Purpose
// -------
// Zero returns are rejected as configuration errors unless an offset is
// supplied, in which case sampling proceeds normally.
fn zero_returns_need_an_offset() {
    // Arrange
    let mut returns = simulated_returns(100, 0.9, -0.5, 0.05, 8);
    returns[10] = 0.0;

    // Act
    let err = SVData::new(returns.clone()).unwrap_err();
    let data = SVData::with_offset(returns, 1e-6).unwrap();
    let s = SVSampler::new(
        data,
        NormalMixture::log_chi2_half().unwrap(),
        SVPriors::default(),
        SamplerOptions::with_counts(50, 10, 1).unwrap(),
    )
    .unwrap();
    let trace = s.run_seeded(1).unwrap();

    // Assert
    assert!(matches!(err, SVError::ZeroReturn { index: 10 }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(trace.len(), 50);
    assert!(trace.volatility_mean().iter().all(|v| v.is_finite() && *v > 0.0));
}
