//! Synthetic data from the AR(1) stochastic-volatility model.
use crate::volatility::{
    core::draws::std_normal,
    errors::{SVError, SVResult},
};
use ndarray::Array1;
use rand::Rng;

/// A simulated SV sample: latent path and returns.
#[derive(Debug, Clone, PartialEq)]
pub struct SVSimulation {
    /// Log-volatility path `z_0..z_n`.
    pub z: Array1<f64>,
    /// Returns `r_1..r_n`, `r_t = exp(z_t) ε_t`.
    pub returns: Array1<f64>,
}

/// Simulate `n` returns from
///
/// ```text
/// z_0 ~ N(μ, v / (1 − φ²))
/// z_t = μ + φ (z_{t-1} − μ) + √v η_t
/// r_t = exp(z_t) ε_t
/// ```
///
/// Errors
/// ------
/// - `SVError::EmptySeries` when `n == 0`.
/// - `SVError::InvalidInitialValue` unless `|φ| < 1`, `v > 0`, and `μ` is
///   finite.
pub fn simulate_sv<R: Rng + ?Sized>(
    n: usize, phi: f64, mu: f64, v: f64, rng: &mut R,
) -> SVResult<SVSimulation> {
    if n == 0 {
        return Err(SVError::EmptySeries);
    }
    if !(phi.is_finite() && phi.abs() < 1.0) {
        return Err(SVError::InvalidInitialValue {
            name: "phi",
            value: phi,
            reason: "simulation requires |phi| < 1",
        });
    }
    if !(v.is_finite() && v > 0.0) {
        return Err(SVError::InvalidInitialValue { name: "v", value: v, reason: "must be > 0" });
    }
    if !mu.is_finite() {
        return Err(SVError::InvalidInitialValue { name: "mu", value: mu, reason: "must be finite" });
    }

    let sd = v.sqrt();
    let mut z = Array1::<f64>::zeros(n + 1);
    z[0] = mu + (v / (1.0 - phi * phi)).sqrt() * std_normal(rng);
    for t in 1..=n {
        z[t] = mu + phi * (z[t - 1] - mu) + sd * std_normal(rng);
    }
    let returns = Array1::from_iter((1..=n).map(|t| z[t].exp() * std_normal(rng)));
    Ok(SVSimulation { z, returns })
}
