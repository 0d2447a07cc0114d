//! volatility — AR(1) stochastic-volatility estimation by Gibbs sampling.
//!
//! Purpose
//! -------
//! Estimate
//!
//! ```text
//! r_t = exp(z_t) ε_t,   z_t = μ + φ (z_{t-1} − μ) + η_t,   η_t ~ N(0, v)
//! ```
//!
//! from a return series by transforming to `y_t = log(r_t²)/2`, replacing
//! the log-χ² noise by a discrete normal mixture, and cycling through the
//! full conditionals of `(γ, φ, μ, v, z)`.
//!
//! Key behaviors
//! -------------
//! - [`core`]: validated data, mixture, priors, options, chain state, and
//!   primitive random draws.
//! - [`models`]: the conditional draws, a pure sweep function, and the
//!   [`SVSampler`] loop producing an [`SVTrace`].
//! - [`errors`]: [`SVError`] / [`SVResult`], classified with the shared
//!   `statespace::errors::ErrorKind`.
//!
//! Invariants & assumptions
//! ------------------------
//! - φ stays strictly inside the configured stability interval in every
//!   state the sampler produces; out-of-interval proposals are rejections.
//! - `v` and every filter variance stay finite and > 0, otherwise the run
//!   fails with a numerical-degeneracy error.
//! - Randomness is injected by the caller; the same seed and inputs give a
//!   bit-identical trace.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`SVData`] from returns (optionally with an offset).
//! 2. Pick a [`NormalMixture`] (usually `log_chi2_half()`), [`SVPriors`],
//!    and [`SamplerOptions`].
//! 3. `SVSampler::new(...)?.run_seeded(seed)?` and read the trace.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    InitialValues, NormalMixture, PhiBounds, SVData, SVPriors, SVSimulation, SVState,
    SamplerOptions, simulate_sv,
};
pub use self::errors::{SVError, SVResult};
pub use self::models::{PhiDraw, PhiRejection, SVModel, SVSampler, SVTrace, gibbs_sweep};
