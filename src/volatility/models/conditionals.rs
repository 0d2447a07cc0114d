//! Full-conditional draws for the AR(1) stochastic-volatility Gibbs sampler.
//!
//! Purpose
//! -------
//! Implement the five stages of one sweep for
//!
//! ```text
//! y_t = z_t + ν_t,                       ν_t ≈ Σ_j q_j N(b_j, w_j)
//! z_t = μ + φ (z_{t-1} − μ) + ε_t,       ε_t ~ N(0, v)
//! z_0 ~ N(μ, v / (1 − φ²))
//! ```
//!
//! in the order γ → φ → μ → v → z. Each stage is a free function of the
//! values it conditions on, so stages can be tested in isolation and the
//! sweep ordering is visible in [`gibbs_sweep`](super::sweep::gibbs_sweep).
//!
//! Key behaviors
//! -------------
//! - [`draw_gamma`]: independent categorical draws of the mixture component
//!   per observation, computed in log space.
//! - [`draw_phi`]: independence Metropolis–Hastings. The proposal is the
//!   prior × AR-likelihood Gaussian truncated to the stability interval;
//!   the acceptance ratio carries the stationary-law term of `z_0`.
//!   Returns a tagged [`PhiDraw`].
//! - [`draw_mu`]: Gaussian conditional combining prior, `z_0`, and the AR
//!   recursion by precision weighting.
//! - [`draw_v`]: inverse-gamma conditional.
//! - [`draw_z`]: FFBS over the mixture-conditioned linear-Gaussian model.
//!
//! Invariants & assumptions
//! ------------------------
//! - `z.len() == y.len() + 1`; `z[t + 1]` pairs with `y[t]`.
//! - `φ` passed in lies strictly inside the stability interval and `v > 0`.
//! - A proposal that lands on or outside the interval is rejected as
//!   [`PhiRejection::OutsideStability`], never raised as an error.
use crate::{
    statespace::ffbs::{Coefficient, UnivariateSSM},
    volatility::{
        core::{
            NormalMixture, PhiBounds,
            draws::{categorical_from_log_weights, inverse_gamma, std_normal, truncated_normal},
            priors::{InverseGammaPrior, NormalPrior},
        },
        errors::{SVError, SVResult},
    },
};
use ndarray::{Array1, ArrayView1, s};
use rand::Rng;

/// Why a φ proposal was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhiRejection {
    /// Lost the Metropolis–Hastings coin flip.
    Metropolis,
    /// Landed on or outside the stability interval.
    OutsideStability,
}

/// Tagged outcome of the φ Metropolis step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhiDraw {
    Accepted { value: f64 },
    Rejected { retained: f64, proposal: f64, reason: PhiRejection },
}

impl PhiDraw {
    /// The value of φ after the step.
    pub fn value(&self) -> f64 {
        match self {
            PhiDraw::Accepted { value } => *value,
            PhiDraw::Rejected { retained, .. } => *retained,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, PhiDraw::Accepted { .. })
    }
}

/// Number of AR(1) transitions in the path `z_0..z_n`.
fn transitions(z: ArrayView1<f64>) -> SVResult<usize> {
    match z.len() {
        0 | 1 => {
            Err(SVError::StateLengthMismatch { expected: 1, actual: z.len().saturating_sub(1) })
        }
        len => Ok(len - 1),
    }
}

/// Draw `γ_t ∈ 0..J` for every observation given the current path.
///
/// `P(γ_t = j) ∝ q_j N(y_t − z_t; b_j, w_j)`.
///
/// Errors
/// ------
/// - `SVError::StateLengthMismatch` unless `z` holds `y.len() + 1` states.
/// - `SVError::DegenerateResponsibilities { t }` if every component weight
///   at `t` underflows or is non-finite.
pub fn draw_gamma<R: Rng + ?Sized>(
    y: ArrayView1<f64>, z: ArrayView1<f64>, mixture: &NormalMixture, rng: &mut R,
) -> SVResult<Vec<usize>> {
    if z.len() != y.len() + 1 {
        return Err(SVError::StateLengthMismatch {
            expected: y.len(),
            actual: z.len().saturating_sub(1),
        });
    }
    let mut buf = vec![0.0; mixture.len()];
    let mut gamma = Vec::with_capacity(y.len());
    for (t, &y_t) in y.iter().enumerate() {
        mixture.fill_log_weights(y_t - z[t + 1], &mut buf);
        gamma.push(categorical_from_log_weights(&mut buf, t, rng)?);
    }
    Ok(gamma)
}

/// One Metropolis–Hastings update of φ.
///
/// With `r = z − μ`, the proposal is
///
/// ```text
/// prec = Σ_{t<n} r_t² / v + 1/φ_v
/// mean = (Σ_{t<n} r_{t+1} r_t / v + φ_m/φ_v) / prec
/// φ*   ~ N(mean, 1/prec) truncated to the stability interval
/// ```
///
/// and `φ*` is accepted with probability `min(1, exp(g(φ*) − g(φ)))`,
///
/// ```text
/// g(φ) = ½ ln(1 − φ²) + ½ φ² (z_0 − μ)² / v.
/// ```
///
/// Errors
/// ------
/// - `SVError::StateLengthMismatch` if `z` holds fewer than two states.
/// - `SVError::DegenerateConditional` when the proposal precision or mean
///   is not finite.
pub fn draw_phi<R: Rng + ?Sized>(
    phi: f64, z: ArrayView1<f64>, mu: f64, v: f64, prior: &NormalPrior, bounds: PhiBounds,
    rng: &mut R,
) -> SVResult<PhiDraw> {
    let n = transitions(z)?;
    let lagged = z.slice(s![..n]);
    let current = z.slice(s![1..]);
    let (sumsq, cross) =
        lagged.iter().zip(current.iter()).fold((0.0, 0.0), |(sq, cr), (&a, &b)| {
            let (ra, rb) = (a - mu, b - mu);
            (sq + ra * ra, cr + ra * rb)
        });

    let prec = sumsq / v + prior.precision();
    let mean = (cross / v + prior.mean * prior.precision()) / prec;
    if !(prec.is_finite() && prec > 0.0 && mean.is_finite()) {
        return Err(SVError::DegenerateConditional { stage: "phi", value: prec });
    }

    let (lo, hi) = bounds.interval();
    let proposal = truncated_normal(mean, prec.recip().sqrt(), lo, hi, rng)?;
    if !bounds.contains(proposal) {
        return Ok(PhiDraw::Rejected {
            retained: phi,
            proposal,
            reason: PhiRejection::OutsideStability,
        });
    }

    let r0 = z[0] - mu;
    let ln_factor = |p: f64| 0.5 * (1.0 - p * p).ln() + 0.5 * p * p * r0 * r0 / v;
    let u: f64 = 1.0 - rng.random::<f64>();
    if u.ln() < ln_factor(proposal) - ln_factor(phi) {
        Ok(PhiDraw::Accepted { value: proposal })
    } else {
        Ok(PhiDraw::Rejected { retained: phi, proposal, reason: PhiRejection::Metropolis })
    }
}

/// Draw μ from its Gaussian full conditional.
///
/// ```text
/// p2 = (1 − φ²)/v,           information from z_0 ~ N(μ, v/(1 − φ²))
/// p3 = n (1 − φ)²/v,         information from the AR recursion
/// p3·m3 = (1 − φ)/v Σ_{t=1..n} (z_t − φ z_{t-1})
/// prec = 1/μ_v + p2 + p3
/// mean = (μ_m/μ_v + p2 z_0 + p3·m3) / prec
/// ```
///
/// Errors
/// ------
/// - `SVError::StateLengthMismatch` if `z` holds fewer than two states.
/// - `SVError::DegenerateConditional` when `prec` is not finite and > 0.
pub fn draw_mu<R: Rng + ?Sized>(
    z: ArrayView1<f64>, phi: f64, v: f64, prior: &NormalPrior, rng: &mut R,
) -> SVResult<f64> {
    let n = transitions(z)?;
    let p2 = (1.0 - phi * phi) / v;
    let p3 = n as f64 * (1.0 - phi) * (1.0 - phi) / v;
    let innov: f64 = (1..=n).map(|t| z[t] - phi * z[t - 1]).sum();
    let p3m3 = (1.0 - phi) / v * innov;

    let prec = prior.precision() + p2 + p3;
    if !(prec.is_finite() && prec > 0.0) {
        return Err(SVError::DegenerateConditional { stage: "mu", value: prec });
    }
    let mean = (prior.mean * prior.precision() + p2 * z[0] + p3m3) / prec;
    if !mean.is_finite() {
        return Err(SVError::DegenerateConditional { stage: "mu", value: mean });
    }
    Ok(mean + prec.recip().sqrt() * std_normal(rng))
}

/// Draw `v` from its inverse-gamma full conditional.
///
/// ```text
/// shape = (a + n + 1) / 2
/// rate  = (a v0 + (1 − φ²)(z_0 − μ)² + Σ_{t=1..n} (r_t − φ r_{t-1})²) / 2
/// ```
///
/// Errors
/// ------
/// - `SVError::StateLengthMismatch` if `z` holds fewer than two states.
/// - Propagates [`inverse_gamma`] failures.
pub fn draw_v<R: Rng + ?Sized>(
    z: ArrayView1<f64>, mu: f64, phi: f64, prior: &InverseGammaPrior, rng: &mut R,
) -> SVResult<f64> {
    let n = transitions(z)?;
    let r0 = z[0] - mu;
    let ss: f64 = (1..=n)
        .map(|t| {
            let e = (z[t] - mu) - phi * (z[t - 1] - mu);
            e * e
        })
        .sum();
    let shape = 0.5 * (prior.df + n as f64 + 1.0);
    let rate = 0.5 * (prior.df * prior.scale + (1.0 - phi * phi) * r0 * r0 + ss);
    inverse_gamma(shape, rate, rng)
}

/// Draw the log-volatility path `z_0..z_n` by FFBS.
///
/// Conditional on γ the model is linear-Gaussian in `x_t = z_t − μ`:
///
/// ```text
/// Y_t = y_t − b_{γ_t} − μ,   V_t = w_{γ_t},   F = 1,   G = φ,   W = v
/// x_0 ~ N(−μ, v / (1 − φ²))
/// ```
///
/// and `μ` is added back to the sampled path.
///
/// Errors
/// ------
/// - `SVError::StateLengthMismatch` unless `gamma` has one entry per return.
/// - `SVError::DegenerateConditional { stage: "z", .. }` if `v`, `μ` or the
///   stationary variance `v / (1 − φ²)` cannot parameterize the model.
/// - `SVError::StateSpace` wrapping any failure of the FFBS recursions.
pub fn draw_z<R: Rng + ?Sized>(
    y: ArrayView1<f64>, gamma: &[usize], mixture: &NormalMixture, phi: f64, v: f64, mu: f64,
    rng: &mut R,
) -> SVResult<Array1<f64>> {
    if gamma.len() != y.len() {
        return Err(SVError::StateLengthMismatch { expected: y.len(), actual: gamma.len() });
    }
    let c0 = v / (1.0 - phi * phi);
    for value in [v, c0] {
        if !(value.is_finite() && value > 0.0) {
            return Err(SVError::DegenerateConditional { stage: "z", value });
        }
    }
    if !mu.is_finite() {
        return Err(SVError::DegenerateConditional { stage: "z", value: mu });
    }
    let means = mixture.means();
    let variances = mixture.variances();
    let obs = Array1::from_iter(y.iter().zip(gamma).map(|(&y_t, &j)| y_t - means[j] - mu));
    let obs_var = Array1::from_iter(gamma.iter().map(|&j| variances[j]));

    let ssm = UnivariateSSM::new(
        obs,
        Coefficient::Constant(1.0),
        Coefficient::Constant(phi),
        Coefficient::Varying(obs_var),
        v,
        -mu,
        c0,
    )
    .map_err(|_| SVError::DegenerateConditional { stage: "z", value: f64::NAN })?;
    let path = ssm.ffbs_draw(rng)?;
    Ok(path + mu)
}
