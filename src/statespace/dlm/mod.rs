//! dlm — discount-factor dynamic linear models with unknown observation
//! variance.
//!
//! Purpose
//! -------
//! Sequential Bayesian filtering, retrospective smoothing and k-step
//! forecasting for
//!
//! ```text
//! y_t = F_tᵀ θ_t + ν_t,   θ_t = G θ_{t-1} + ω_t
//! ```
//!
//! where the evolution covariance is implied by a state discount factor and
//! the observation variance is learned by a normal/inverse-gamma update.
//!
//! Key behaviors
//! -------------
//! - [`spec`]: validated configuration ([`DLMSpec`], [`DLMPrior`],
//!   [`DiscountFactors`]); every configuration error surfaces here.
//! - [`filter`]: the forward fold ([`DiscountDLM::filter`]) producing a
//!   [`DLMFit`] of immutable per-time snapshots and predictive ordinates.
//! - [`smoother`]: backward pass over a [`DLMFit`] ([`DLMFit::smooth`]).
//! - [`forecast`]: h-step-ahead predictive moments ([`DLMFit::forecast`]).
//!
//! Conventions
//! -----------
//! - Time `t = 0` is the prior; `t = 1..=n` align with observations.
//! - All covariances are on the scale of the current variance estimate
//!   `s_t`, so marginal state and forecast laws are Student-t.

pub mod filter;
pub mod forecast;
pub mod smoother;
pub mod spec;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::filter::{DLMFit, DLMStep, DiscountDLM, FilterState, OneStepForecast};
pub use self::forecast::ForecastPoint;
pub use self::smoother::SmoothedState;
pub use self::spec::{DLMPrior, DLMSpec, DiscountFactors};
