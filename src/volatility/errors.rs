//! Errors for the stochastic-volatility stack (return data, mixture tables,
//! priors, sampler options, and numerical failures inside a Gibbs sweep).
//!
//! This module defines [`SVError`] and the [`SVResult`] alias used across the
//! volatility core and models. Filter failures from the FFBS step arrive as
//! [`SSError`] and are wrapped in [`SVError::StateSpace`], keeping their
//! original classification.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Every configuration variant is raised by a constructor before the first
//!   sweep; only degeneracy variants can surface mid-run.
//! - A proposed φ outside the stability interval is **not** an error: it is
//!   the rejection branch of the Metropolis step (see `PhiRejection`).
use crate::statespace::errors::{ErrorKind, SSError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::NormalError;

/// Result alias for volatility operations that may produce [`SVError`].
pub type SVResult<T> = Result<T, SVError>;

/// Unified error type for SV data preparation and Gibbs sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum SVError {
    // ---- Return data ----
    /// Return series is empty.
    EmptySeries,

    /// A return is NaN/±inf.
    NonFiniteReturn { index: usize, value: f64 },

    /// A return is exactly zero and no offset was supplied, so log(r²) is −∞.
    ZeroReturn { index: usize },

    /// The log-square offset must be finite and > 0.
    InvalidOffset { value: f64 },

    // ---- Mixture table ----
    /// Mixture table has no components.
    EmptyMixture,

    /// Weight, mean and variance arrays differ in length.
    MixtureLengthMismatch { weights: usize, means: usize, variances: usize },

    /// A weight is negative or non-finite.
    InvalidMixtureWeight { index: usize, value: f64 },

    /// A component mean is non-finite.
    NonFiniteMixtureMean { index: usize, value: f64 },

    /// A component variance is not finite and > 0.
    NonPositiveMixtureVariance { index: usize, value: f64 },

    /// Weights must sum to 1 within 1e-8.
    MixtureWeightsNotNormalized { sum: f64 },

    // ---- Priors / options ----
    /// A prior hyperparameter is invalid.
    InvalidPrior { name: &'static str, value: f64, reason: &'static str },

    /// niter must be ≥ 1.
    InvalidIterations { niter: usize },

    /// thin must be ≥ 1.
    InvalidThin { thin: usize },

    /// A starting value is invalid for the configured model.
    InvalidInitialValue { name: &'static str, value: f64, reason: &'static str },

    /// Supplied previous state does not match the data length.
    StateLengthMismatch { expected: usize, actual: usize },

    // ---- Numerical degeneracy ----
    /// Every mixture responsibility underflowed or became non-finite at t.
    DegenerateResponsibilities { t: usize },

    /// A conditional mean, variance or precision collapsed.
    DegenerateConditional { stage: &'static str, value: f64 },

    /// The inverse-gamma conditional could not be formed.
    InvalidGammaParam { shape: f64, rate: f64 },

    /// Wrapper for statrs::distribution::NormalError.
    InvalidNormalParam,

    /// FFBS or other state-space failure.
    StateSpace(SSError),
}

impl SVError {
    /// Classify this error per the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SVError::DegenerateResponsibilities { .. }
            | SVError::DegenerateConditional { .. }
            | SVError::InvalidGammaParam { .. }
            | SVError::InvalidNormalParam => ErrorKind::NumericalDegeneracy,
            SVError::StateSpace(inner) => inner.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for SVError {}

impl std::fmt::Display for SVError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Return data ----
            SVError::EmptySeries => write!(f, "Return series is empty."),
            SVError::NonFiniteReturn { index, value } => {
                write!(f, "Return at index {index} is non-finite: {value}")
            }
            SVError::ZeroReturn { index } => {
                write!(f, "Return at index {index} is zero; supply a positive offset.")
            }
            SVError::InvalidOffset { value } => {
                write!(f, "Log-square offset must be finite and > 0; got {value}.")
            }
            // ---- Mixture table ----
            SVError::EmptyMixture => write!(f, "Mixture table has no components."),
            SVError::MixtureLengthMismatch { weights, means, variances } => {
                write!(
                    f,
                    "Mixture arrays differ in length: {weights} weights, {means} means, \
                     {variances} variances."
                )
            }
            SVError::InvalidMixtureWeight { index, value } => {
                write!(f, "Mixture weight {index} must be finite and ≥ 0; got {value}.")
            }
            SVError::NonFiniteMixtureMean { index, value } => {
                write!(f, "Mixture mean {index} must be finite; got {value}.")
            }
            SVError::NonPositiveMixtureVariance { index, value } => {
                write!(f, "Mixture variance {index} must be finite and > 0; got {value}.")
            }
            SVError::MixtureWeightsNotNormalized { sum } => {
                write!(f, "Mixture weights must sum to 1 (tolerance 1e-8); got {sum}.")
            }
            // ---- Priors / options ----
            SVError::InvalidPrior { name, value, reason } => {
                write!(f, "Invalid prior {name} = {value}: {reason}")
            }
            SVError::InvalidIterations { niter } => {
                write!(f, "Number of recorded sweeps must be ≥ 1; got {niter}.")
            }
            SVError::InvalidThin { thin } => write!(f, "Thinning interval must be ≥ 1; got {thin}."),
            SVError::InvalidInitialValue { name, value, reason } => {
                write!(f, "Invalid initial {name} = {value}: {reason}")
            }
            SVError::StateLengthMismatch { expected, actual } => {
                write!(f, "Sampler state has {actual} observations; data has {expected}.")
            }
            // ---- Numerical degeneracy ----
            SVError::DegenerateResponsibilities { t } => {
                write!(f, "Mixture responsibilities at t = {t} are all zero or non-finite.")
            }
            SVError::DegenerateConditional { stage, value } => {
                write!(f, "Degenerate full conditional in {stage} draw: {value}.")
            }
            SVError::InvalidGammaParam { shape, rate } => {
                write!(f, "Invalid inverse-gamma conditional: shape {shape}, rate {rate}.")
            }
            SVError::InvalidNormalParam => write!(f, "Invalid normal distribution parameters."),
            SVError::StateSpace(inner) => write!(f, "Latent path draw failed: {inner}"),
        }
    }
}

impl From<SSError> for SVError {
    fn from(err: SSError) -> Self {
        SVError::StateSpace(err)
    }
}

impl From<NormalError> for SVError {
    fn from(_: NormalError) -> Self {
        SVError::InvalidNormalParam
    }
}

#[cfg(feature = "python-bindings")]
impl From<SVError> for PyErr {
    fn from(err: SVError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Wrapped state-space errors keep their classification, and sampler
    // degeneracies are never reported as configuration problems.
    fn kind_follows_wrapped_state_space_error() {
        // Arrange
        let wrapped: SVError =
            SSError::DegenerateVariance { t: 4, quantity: "C_t", value: 0.0 }.into();
        let config: SVError = SSError::EmptySeries.into();

        // Act / Assert
        assert_eq!(wrapped.kind(), ErrorKind::NumericalDegeneracy);
        assert_eq!(config.kind(), ErrorKind::Configuration);
        assert_eq!(
            SVError::DegenerateConditional { stage: "mu", value: f64::NAN }.kind(),
            ErrorKind::NumericalDegeneracy
        );
        assert_eq!(
            SVError::MixtureWeightsNotNormalized { sum: 0.9 }.kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    // Purpose
    // -------
    // `Display` for a zero return names the index and the remedy.
    fn zero_return_display_mentions_offset() {
        let msg = SVError::ZeroReturn { index: 12 }.to_string();
        assert!(msg.contains("12"), "Got: {msg}");
        assert!(msg.contains("offset"), "Got: {msg}");
    }
}
