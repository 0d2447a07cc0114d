//! statespace::errors — error types for FFBS, discount DLMs, and TVARs.
//!
//! Purpose
//! -------
//! Provide a single error enum, [`SSError`], and result alias, [`SSResult`],
//! for every state-space routine in this subtree: input validation for
//! observation series and system matrices, discount / prior configuration
//! checks, and numerical degeneracy detected during filtering or smoothing.
//!
//! Key behaviors
//! -------------
//! - Split failures into two families reported by [`SSError::kind`]:
//!   configuration problems (detected at construction) and numerical
//!   degeneracy (detected mid-recursion).
//! - Attach human-readable `Display` messages that carry the offending value
//!   or time index.
//! - Map `statrs` construction failures into [`SSError`] so `?` can be used
//!   on distribution constructors.
//! - Convert into Python `ValueError`s when `python-bindings` is enabled.
//!
//! Conventions
//! -----------
//! - Time indices in degeneracy variants follow the filter convention: `t = 0`
//!   is the prior, `t = 1..=n` align with observations.
//! - Names of offending quantities are `&'static str` labels such as `"R_t"`
//!   or `"C0"`; they are meant for diagnostics, not matching.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::{NormalError, StudentsTError};

/// Result alias for state-space operations that may produce [`SSError`].
pub type SSResult<T> = Result<T, SSError>;

/// Coarse error taxonomy shared by the state-space and volatility subtrees.
///
/// - `Configuration`: malformed inputs, priors, discount factors, or tables.
///   Always raised before any recursion or sweep starts.
/// - `NumericalDegeneracy`: a variance, covariance, or precision collapsed to
///   a non-positive or non-finite value mid-run. Fatal and non-retriable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    NumericalDegeneracy,
}

/// Unified error type for state-space filtering and smoothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SSError {
    // ---- Input/data validation ----
    /// Observation series is empty.
    EmptySeries,

    /// An observation is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// A per-time input has the wrong length.
    LengthMismatch { name: &'static str, expected: usize, actual: usize },

    /// A matrix input has the wrong shape.
    ShapeMismatch { name: &'static str, expected: (usize, usize), actual: (usize, usize) },

    /// A model parameter is NaN/±inf.
    NonFiniteParam { name: &'static str, value: f64 },

    // ---- Priors / discounting ----
    /// A variance that must be strictly positive is not.
    NonPositiveVariance { name: &'static str, index: usize, value: f64 },

    /// Discount factors must lie in (0, 1].
    InvalidDiscount { name: &'static str, value: f64 },

    /// Prior degrees of freedom must be finite and > 0.
    InvalidDegreesOfFreedom { value: f64 },

    /// Prior observation-variance estimate must be finite and > 0.
    InvalidScale { value: f64 },

    /// Prior state covariance is not symmetric positive definite.
    SingularPriorCovariance,

    /// TVAR lag order must satisfy 1 ≤ p < n.
    InvalidLagOrder { p: usize, len: usize },

    /// Forecast horizon needs at least one future loading row.
    EmptyHorizon,

    // ---- Numerical degeneracy ----
    /// A filter or smoother variance collapsed to a non-positive or
    /// non-finite value at time `t`.
    DegenerateVariance { t: usize, quantity: &'static str, value: f64 },

    /// A one-step-ahead state covariance could not be factorized at time `t`.
    SingularStateCovariance { t: usize },

    // ---- statrs distribution errors ----
    /// Wrapper for statrs::distribution::NormalError.
    InvalidNormalParam,

    /// Wrapper for statrs::distribution::StudentsTError.
    InvalidStudentsTParam,
}

impl SSError {
    /// Classify this error per the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SSError::DegenerateVariance { .. }
            | SSError::SingularStateCovariance { .. }
            | SSError::InvalidNormalParam
            | SSError::InvalidStudentsTParam => ErrorKind::NumericalDegeneracy,
            _ => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for SSError {}

impl std::fmt::Display for SSError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            SSError::EmptySeries => write!(f, "Observation series is empty."),
            SSError::NonFiniteData { index, value } => {
                write!(f, "Observation at index {index} is non-finite: {value}")
            }
            SSError::LengthMismatch { name, expected, actual } => {
                write!(f, "{name} must have length {expected}; got {actual}.")
            }
            SSError::ShapeMismatch { name, expected, actual } => {
                write!(
                    f,
                    "{name} must have shape {}x{}; got {}x{}.",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            SSError::NonFiniteParam { name, value } => {
                write!(f, "Parameter {name} must be finite; got {value}.")
            }
            // ---- Priors / discounting ----
            SSError::NonPositiveVariance { name, index, value } => {
                write!(f, "{name}[{index}] must be finite and > 0; got {value}.")
            }
            SSError::InvalidDiscount { name, value } => {
                write!(f, "Discount factor {name} must lie in (0, 1]; got {value}.")
            }
            SSError::InvalidDegreesOfFreedom { value } => {
                write!(f, "Prior degrees of freedom must be finite and > 0; got {value}.")
            }
            SSError::InvalidScale { value } => {
                write!(f, "Prior variance estimate must be finite and > 0; got {value}.")
            }
            SSError::SingularPriorCovariance => {
                write!(f, "Prior state covariance C0 must be symmetric positive definite.")
            }
            SSError::InvalidLagOrder { p, len } => {
                write!(f, "Lag order must satisfy 1 ≤ p < n; got p = {p}, n = {len}.")
            }
            SSError::EmptyHorizon => write!(f, "Forecast horizon must be at least 1."),
            // ---- Numerical degeneracy ----
            SSError::DegenerateVariance { t, quantity, value } => {
                write!(f, "Degenerate {quantity} at t = {t}: {value} (must be finite and > 0).")
            }
            SSError::SingularStateCovariance { t } => {
                write!(f, "One-step-ahead state covariance at t = {t} is not positive definite.")
            }
            // ---- statrs distribution errors ----
            SSError::InvalidNormalParam => write!(f, "Invalid normal distribution parameters."),
            SSError::InvalidStudentsTParam => {
                write!(f, "Invalid Student-t distribution parameters.")
            }
        }
    }
}

impl From<NormalError> for SSError {
    fn from(_: NormalError) -> Self {
        SSError::InvalidNormalParam
    }
}

impl From<StudentsTError> for SSError {
    fn from(_: StudentsTError) -> Self {
        SSError::InvalidStudentsTParam
    }
}

#[cfg(feature = "python-bindings")]
impl From<SSError> for PyErr {
    fn from(err: SSError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that degeneracy variants classify as `NumericalDegeneracy` and
    // validation variants as `Configuration`.
    fn kind_splits_configuration_from_degeneracy() {
        // Arrange
        let degenerate = SSError::DegenerateVariance { t: 3, quantity: "R_t", value: 0.0 };
        let config = SSError::InvalidDiscount { name: "state", value: 1.5 };

        // Act / Assert
        assert_eq!(degenerate.kind(), ErrorKind::NumericalDegeneracy);
        assert_eq!(config.kind(), ErrorKind::Configuration);
        assert_eq!(SSError::SingularPriorCovariance.kind(), ErrorKind::Configuration);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `Display` embeds the offending time index and quantity name.
    fn degenerate_variance_display_includes_time_and_quantity() {
        // Arrange
        let err = SSError::DegenerateVariance { t: 7, quantity: "C_t", value: -1e-300 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("t = 7"), "Got: {msg}");
        assert!(msg.contains("C_t"), "Got: {msg}");
    }
}
