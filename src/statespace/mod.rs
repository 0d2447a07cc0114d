//! statespace — linear-Gaussian filtering, discount DLMs, and TVARs.
//!
//! Purpose
//! -------
//! Collect the sequential-estimation engines used across the crate: an exact
//! forward-filtering / backward-sampling (FFBS) routine for univariate
//! linear-Gaussian models, a West & Harrison discount DLM with unknown
//! observation variance, and time-varying autoregressions built on it.
//!
//! Key behaviors
//! -------------
//! - [`ffbs`]: Kalman forward pass, RTS smoothed moments, and joint path
//!   draws for [`UnivariateSSM`]. This is the latent-path step of the
//!   stochastic-volatility sampler in `volatility::models`.
//! - [`dlm`]: discount-factor DLM filter ([`DiscountDLM`]), smoother and
//!   k-step forecasts, exposing per-time predictive log densities for
//!   likelihood profiling.
//! - [`tvar`]: TVAR(p) fits via [`TVARModel::fit`].
//! - [`errors`]: the shared [`SSError`] / [`SSResult`] surface and the
//!   crate-wide [`ErrorKind`] taxonomy.
//!
//! Invariants & assumptions
//! ------------------------
//! - All variances and covariances handled here are strictly positive and
//!   finite; any recursion that would produce otherwise fails with
//!   `ErrorKind::NumericalDegeneracy` instead of dividing by zero.
//! - Configuration problems are rejected by constructors before any
//!   recursion runs.
//!
//! Conventions
//! -----------
//! - Time `t = 0` is the prior / initial state and `t = 1..=n` align with
//!   observations `y[0..n]`.
//! - Matrix factorizations go through `nalgebra` via [`linalg`]; every
//!   public container is an `ndarray` type.
//! - Random draws come only from caller-supplied `rand::Rng` values.

pub mod dlm;
pub mod errors;
pub mod ffbs;
pub mod linalg;
pub mod tvar;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::dlm::{
    DLMFit, DLMPrior, DLMSpec, DLMStep, DiscountDLM, DiscountFactors, FilterState, ForecastPoint,
    OneStepForecast, SmoothedState,
};
pub use self::errors::{ErrorKind, SSError, SSResult};
pub use self::ffbs::{Coefficient, ForwardPass, SmoothedMoments, UnivariateSSM};
pub use self::tvar::{TVARFit, TVARModel, ar_design};
