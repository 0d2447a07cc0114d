//! core — data, mixture tables, priors, options, and primitive draws for
//! the stochastic-volatility sampler.
//!
//! Purpose
//! -------
//! Collect the validated building blocks the Gibbs sampler in
//! `volatility::models` composes: the transformed return series
//! ([`SVData`]), the mixture approximation ([`NormalMixture`]), priors
//! ([`SVPriors`]), loop options ([`SamplerOptions`]), the chain state
//! ([`SVState`]), elementary random draws, and a simulator for synthetic
//! data ([`simulate_sv`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every type here validates at construction; downstream code assumes
//!   finite data, positive variances, and normalized mixture weights.
//! - None of these types holds RNG state; all draws take `&mut R: Rng`.
//!
//! Conventions
//! -----------
//! - Observation index `t` is 0-based into `SVData::y()`; the latent path
//!   `z` has one extra leading entry for the initial state, so `z[t + 1]`
//!   pairs with `y[t]`.

pub mod data;
pub mod draws;
pub mod mixture;
pub mod options;
pub mod priors;
pub mod simulate;
pub mod state;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::SVData;
pub use self::mixture::NormalMixture;
pub use self::options::{InitialValues, PhiBounds, SamplerOptions};
pub use self::priors::{InverseGammaPrior, NormalPrior, SVPriors};
pub use self::simulate::{SVSimulation, simulate_sv};
pub use self::state::SVState;
