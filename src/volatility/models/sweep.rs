//! One Gibbs sweep as a pure state transition.
//!
//! [`gibbs_sweep`] maps `(previous state, data, model, rng)` to a new
//! [`SVState`] plus the tagged φ outcome. Stages run in the fixed order
//! γ → φ → μ → v → z, and every stage conditions on the most recent value
//! of the other four quantities.
use crate::volatility::{
    core::{NormalMixture, PhiBounds, SVData, SVPriors, SVState},
    errors::{SVError, SVResult},
    models::conditionals::{PhiDraw, draw_gamma, draw_mu, draw_phi, draw_v, draw_z},
};
use rand::Rng;

/// `SVModel` — everything a sweep needs besides the data and the state.
///
/// Fields
/// ------
/// - `mixture`: approximation of the observation-noise law.
/// - `priors`: hyperparameters for `(φ, μ, v)`.
/// - `bounds`: stability interval for φ.
#[derive(Debug, Clone, PartialEq)]
pub struct SVModel {
    pub mixture: NormalMixture,
    pub priors: SVPriors,
    pub bounds: PhiBounds,
}

impl SVModel {
    pub fn new(mixture: NormalMixture, priors: SVPriors, bounds: PhiBounds) -> Self {
        SVModel { mixture, priors, bounds }
    }
}

/// Run one full sweep starting from `prev`.
///
/// Returns
/// -------
/// `SVResult<(SVState, PhiDraw)>`
///   The new state and the outcome of the φ step.
///
/// Errors
/// ------
/// - `SVError::StateLengthMismatch` when `prev` is not aligned with `data`.
/// - Any numerical-degeneracy error from a stage; the sweep is abandoned.
pub fn gibbs_sweep<R: Rng + ?Sized>(
    prev: &SVState, data: &SVData, model: &SVModel, rng: &mut R,
) -> SVResult<(SVState, PhiDraw)> {
    let n = data.len();
    if prev.gamma.len() != n || prev.z.len() != n + 1 {
        return Err(SVError::StateLengthMismatch { expected: n, actual: prev.gamma.len() });
    }
    let y = data.y().view();
    let z = prev.z.view();
    let priors = &model.priors;

    let gamma = draw_gamma(y, z, &model.mixture, rng)?;
    let phi_draw = draw_phi(prev.phi, z, prev.mu, prev.v, &priors.phi, model.bounds, rng)?;
    let phi = phi_draw.value();
    let mu = draw_mu(z, phi, prev.v, &priors.mu, rng)?;
    let v = draw_v(z, mu, phi, &priors.v, rng)?;
    let z = draw_z(y, &gamma, &model.mixture, phi, v, mu, rng)?;

    Ok((SVState { z, gamma, mu, phi, v }, phi_draw))
}
