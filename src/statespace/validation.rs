//! statespace::validation — shared input guards for state-space routines.
//!
//! Purpose
//! -------
//! Centralize the cheap precondition checks every filter in this subtree
//! needs: non-empty finite series, matching lengths and shapes, strictly
//! positive variances, and discount factors in (0, 1]. Callers run these
//! before any recursion so configuration problems never surface mid-run.
//!
//! Conventions
//! -----------
//! - All guards return [`SSResult<()>`] (or the validated value) and never
//!   panic; the first offending element is reported.
use crate::statespace::errors::{SSError, SSResult};
use ndarray::{ArrayView1, ArrayView2};

/// Require a non-empty series whose entries are all finite.
pub fn validate_series(y: ArrayView1<f64>) -> SSResult<()> {
    if y.is_empty() {
        return Err(SSError::EmptySeries);
    }
    for (index, &value) in y.iter().enumerate() {
        if !value.is_finite() {
            return Err(SSError::NonFiniteData { index, value });
        }
    }
    Ok(())
}

/// Require `actual == expected` for a per-time input.
pub fn validate_length(name: &'static str, expected: usize, actual: usize) -> SSResult<()> {
    if expected != actual {
        return Err(SSError::LengthMismatch { name, expected, actual });
    }
    Ok(())
}

/// Require a matrix of the given shape with finite entries.
pub fn validate_matrix(
    name: &'static str, m: ArrayView2<f64>, expected: (usize, usize),
) -> SSResult<()> {
    if m.dim() != expected {
        return Err(SSError::ShapeMismatch { name, expected, actual: m.dim() });
    }
    if let Some(&value) = m.iter().find(|v| !v.is_finite()) {
        return Err(SSError::NonFiniteParam { name, value });
    }
    Ok(())
}

/// Require every entry of a vector parameter to be finite.
pub fn validate_finite(name: &'static str, v: ArrayView1<f64>) -> SSResult<()> {
    if let Some(&value) = v.iter().find(|v| !v.is_finite()) {
        return Err(SSError::NonFiniteParam { name, value });
    }
    Ok(())
}

/// Require every entry of a variance vector to be finite and strictly positive.
pub fn validate_variances(name: &'static str, v: ArrayView1<f64>) -> SSResult<()> {
    for (index, &value) in v.iter().enumerate() {
        if !(value.is_finite() && value > 0.0) {
            return Err(SSError::NonPositiveVariance { name, index, value });
        }
    }
    Ok(())
}

/// Require a discount factor in (0, 1].
pub fn validate_discount(name: &'static str, value: f64) -> SSResult<f64> {
    if !(value.is_finite() && value > 0.0 && value <= 1.0) {
        return Err(SSError::InvalidDiscount { name, value });
    }
    Ok(value)
}
