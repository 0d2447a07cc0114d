//! models — the AR(1) stochastic-volatility Gibbs sampler.
//!
//! Purpose
//! -------
//! Wire the building blocks from `volatility::core` and the FFBS engine from
//! `statespace::ffbs` into a complete MCMC estimator.
//!
//! Key behaviors
//! -------------
//! - [`conditionals`]: one free function per full conditional, plus the
//!   tagged [`PhiDraw`] outcome of the φ Metropolis step.
//! - [`sweep`]: [`gibbs_sweep`], a pure `(state, data, model, rng) → state`
//!   transition, and the [`SVModel`] bundle it reads.
//! - [`sampler`]: [`SVSampler`] and the read-only [`SVTrace`] it returns.
//!
//! Downstream usage
//! ----------------
//! - Most callers build an [`SVSampler`] and call `run` or `run_seeded`.
//! - Callers that need to stop between sweeps, run custom schedules, or
//!   inspect every intermediate state drive [`gibbs_sweep`] directly.

pub mod conditionals;
pub mod sampler;
pub mod sweep;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::conditionals::{
    PhiDraw, PhiRejection, draw_gamma, draw_mu, draw_phi, draw_v, draw_z,
};
pub use self::sampler::{PhiDiagnostics, SVSampler, SVTrace};
pub use self::sweep::{SVModel, gibbs_sweep};
