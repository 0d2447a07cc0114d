//! One complete Markov state of the SV Gibbs chain.
use crate::volatility::core::options::InitialValues;
use ndarray::Array1;

/// `SVState` — `(z, γ, μ, φ, v)` after a sweep.
///
/// Fields
/// ------
/// - `z`: log-volatility path `z_0..z_n` (length `n + 1`).
/// - `gamma`: mixture indicators `γ_1..γ_n` (length `n`), each `< J`.
/// - `mu`, `phi`, `v`: mean level, AR(1) coefficient, innovation variance.
///
/// Snapshots are values: a sweep consumes a reference to the previous
/// state and returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SVState {
    pub z: Array1<f64>,
    pub gamma: Vec<usize>,
    pub mu: f64,
    pub phi: f64,
    pub v: f64,
}

impl SVState {
    /// Starting state for `n` observations: `z = 0`, `γ = 0`.
    pub fn initial(n: usize, init: InitialValues) -> Self {
        SVState {
            z: Array1::zeros(n + 1),
            gamma: vec![0; n],
            mu: init.mu,
            phi: init.phi,
            v: init.v,
        }
    }

    /// Number of observations the state is aligned with.
    pub fn nobs(&self) -> usize {
        self.gamma.len()
    }
}
