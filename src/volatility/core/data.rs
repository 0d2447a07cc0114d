//! Return-series container for stochastic-volatility models.
//!
//! Purpose
//! -------
//! Validate a raw return series once and precompute the log-square
//! transform the sampler works on:
//!
//! ```text
//! y_t = log(r_t² + c) / 2
//! ```
//!
//! with `c = 0` by default. Under `r_t = exp(z_t) ε_t` this gives
//! `y_t = z_t + log(ε_t²)/2`, a linear observation of the log-volatility
//! with non-Gaussian noise.
//!
//! Invariants & assumptions
//! ------------------------
//! - Returns are non-empty and finite.
//! - Without an offset every return is non-zero; with an offset `c > 0`
//!   zero returns are allowed and the transform stays finite.
//! - Raw returns are kept unchanged next to the transformed series.
use crate::volatility::errors::{SVError, SVResult};
use ndarray::Array1;

/// `SVData` — validated returns and their log-square transform.
///
/// Fields
/// ------
/// - `returns`: raw returns `r_1..r_n`.
/// - `y`: transformed observations `log(r_t² + c)/2`.
/// - `offset`: the constant `c ≥ 0` used in the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SVData {
    returns: Array1<f64>,
    y: Array1<f64>,
    offset: f64,
}

impl SVData {
    /// Validate returns and compute `y_t = log(r_t²)/2`.
    ///
    /// Errors
    /// ------
    /// - `SVError::EmptySeries` when `returns` is empty.
    /// - `SVError::NonFiniteReturn { index, value }` for the first NaN/±∞.
    /// - `SVError::ZeroReturn { index }` for the first exact zero.
    pub fn new(returns: Array1<f64>) -> SVResult<Self> {
        SVData::build(returns, 0.0)
    }

    /// Same as [`SVData::new`] with `y_t = log(r_t² + offset)/2`.
    ///
    /// Errors
    /// ------
    /// - `SVError::InvalidOffset` unless `offset` is finite and > 0.
    /// - The non-empty / finite checks of [`SVData::new`].
    pub fn with_offset(returns: Array1<f64>, offset: f64) -> SVResult<Self> {
        if !(offset.is_finite() && offset > 0.0) {
            return Err(SVError::InvalidOffset { value: offset });
        }
        SVData::build(returns, offset)
    }

    fn build(returns: Array1<f64>, offset: f64) -> SVResult<Self> {
        if returns.is_empty() {
            return Err(SVError::EmptySeries);
        }
        for (index, &value) in returns.iter().enumerate() {
            if !value.is_finite() {
                return Err(SVError::NonFiniteReturn { index, value });
            }
            if value == 0.0 && offset == 0.0 {
                return Err(SVError::ZeroReturn { index });
            }
        }
        let y = returns.mapv(|r| 0.5 * (r * r + offset).ln());
        Ok(SVData { returns, y, offset })
    }

    pub fn returns(&self) -> &Array1<f64> {
        &self.returns
    }

    /// Transformed observations `y_1..y_n`.
    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of observations `n`.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Always `false`; construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
