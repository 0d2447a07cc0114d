//! Configuration for discount-factor dynamic linear models.
//!
//! Purpose
//! -------
//! Hold the validated inputs a [`DiscountDLM`](super::DiscountDLM) needs:
//! the loading rows `F_t`, the transition matrix `G`, a conjugate
//! normal/inverse-gamma prior `(m0, C0, n0, s0)`, and the state and
//! observation-variance discount factors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `F` is `n × k`, `G` is `k × k`, `m0` has length `k`, `C0` is `k × k`.
//! - `C0` is symmetric positive definite (checked by Cholesky).
//! - `n0 > 0`, `s0 > 0`, and both discounts lie in (0, 1].
//!
//! Conventions
//! -----------
//! - `C0` is on the scale of the observation variance estimate `s0`, as in
//!   West & Harrison: `θ_0 ~ T_{n0}(m0, C0)`.
//! - A state discount of 1 means no evolution noise; a variance discount of
//!   1 means the observation variance is static.
use crate::statespace::{
    errors::{SSError, SSResult},
    linalg::is_positive_definite,
    validation::{validate_discount, validate_finite, validate_matrix},
};
use ndarray::{Array1, Array2};

/// DiscountFactors — state and observation-variance discount factors.
///
/// Fields
/// ------
/// - `state`: `δ ∈ (0, 1]`. The evolution covariance at time `t` is
///   `W_t = G C_{t-1} Gᵀ (1/δ − 1)`.
/// - `variance`: `β ∈ (0, 1]`. Degrees of freedom evolve as
///   `n_t = β n_{t-1} + 1`, so smaller β forgets old variance information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountFactors {
    pub state: f64,
    pub variance: f64,
}

impl DiscountFactors {
    /// Validate and build a discount pair.
    ///
    /// Errors
    /// ------
    /// - `SSError::InvalidDiscount` if either factor is outside (0, 1].
    pub fn new(state: f64, variance: f64) -> SSResult<Self> {
        Ok(DiscountFactors {
            state: validate_discount("state", state)?,
            variance: validate_discount("variance", variance)?,
        })
    }

    /// State discount only; the observation variance is static.
    pub fn state_only(state: f64) -> SSResult<Self> {
        DiscountFactors::new(state, 1.0)
    }

    /// Evolution-inflation multiplier `1/δ − 1`.
    #[inline]
    pub fn inflation(&self) -> f64 {
        1.0 / self.state - 1.0
    }
}

impl Default for DiscountFactors {
    fn default() -> Self {
        DiscountFactors { state: 0.9, variance: 1.0 }
    }
}

/// DLMPrior — conjugate prior for the state vector and observation variance.
#[derive(Debug, Clone, PartialEq)]
pub struct DLMPrior {
    /// Prior state mean `m0` (length `k`).
    pub m0: Array1<f64>,
    /// Prior state covariance `C0` (`k × k`, SPD).
    pub c0: Array2<f64>,
    /// Prior degrees of freedom for the observation variance.
    pub n0: f64,
    /// Prior point estimate of the observation variance.
    pub s0: f64,
}

impl DLMPrior {
    /// Validate and build a prior.
    ///
    /// Errors
    /// ------
    /// - `SSError::ShapeMismatch` when `C0` is not `k × k` with `k = m0.len()`.
    /// - `SSError::NonFiniteParam` for non-finite entries.
    /// - `SSError::SingularPriorCovariance` when `C0` is not SPD.
    /// - `SSError::InvalidDegreesOfFreedom` / `SSError::InvalidScale` for
    ///   non-positive `n0` / `s0`.
    pub fn new(m0: Array1<f64>, c0: Array2<f64>, n0: f64, s0: f64) -> SSResult<Self> {
        let k = m0.len();
        if k == 0 {
            return Err(SSError::LengthMismatch { name: "m0", expected: 1, actual: 0 });
        }
        validate_finite("m0", m0.view())?;
        validate_matrix("C0", c0.view(), (k, k))?;
        if !is_positive_definite(&c0) {
            return Err(SSError::SingularPriorCovariance);
        }
        if !(n0.is_finite() && n0 > 0.0) {
            return Err(SSError::InvalidDegreesOfFreedom { value: n0 });
        }
        if !(s0.is_finite() && s0 > 0.0) {
            return Err(SSError::InvalidScale { value: s0 });
        }
        Ok(DLMPrior { m0, c0, n0, s0 })
    }

    /// Zero-mean prior with `C0 = variance · I_k`.
    pub fn isotropic(k: usize, variance: f64, n0: f64, s0: f64) -> SSResult<Self> {
        DLMPrior::new(Array1::zeros(k), Array2::eye(k) * variance, n0, s0)
    }

    /// State dimension `k`.
    pub fn dim(&self) -> usize {
        self.m0.len()
    }
}

/// DLMSpec — everything except the observations.
///
/// Fields
/// ------
/// - `f`: `n × k` matrix whose row `t - 1` is the loading vector `F_t`.
/// - `g`: `k × k` state transition.
/// - `prior`: validated [`DLMPrior`].
/// - `discounts`: validated [`DiscountFactors`].
#[derive(Debug, Clone, PartialEq)]
pub struct DLMSpec {
    pub f: Array2<f64>,
    pub g: Array2<f64>,
    pub prior: DLMPrior,
    pub discounts: DiscountFactors,
}

impl DLMSpec {
    /// Check that `F`, `G`, and the prior agree on the state dimension.
    ///
    /// Errors
    /// ------
    /// - `SSError::ShapeMismatch` when `F` does not have `k` columns or `G`
    ///   is not `k × k`.
    /// - `SSError::NonFiniteParam` for non-finite entries in `F` or `G`.
    pub fn new(
        f: Array2<f64>, g: Array2<f64>, prior: DLMPrior, discounts: DiscountFactors,
    ) -> SSResult<Self> {
        let k = prior.dim();
        validate_matrix("F", f.view(), (f.nrows(), k))?;
        validate_matrix("G", g.view(), (k, k))?;
        Ok(DLMSpec { f, g, prior, discounts })
    }

    /// State dimension `k`.
    pub fn dim(&self) -> usize {
        self.prior.dim()
    }
}
