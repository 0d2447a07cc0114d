//! statespace::tvar — time-varying autoregressions as discount DLMs.
//!
//! Purpose
//! -------
//! Fit a TVAR(p)
//!
//! ```text
//! x_t = φ_{t,1} x_{t-1} + … + φ_{t,p} x_{t-p} + ν_t,   x_t = y_t − ȳ
//! ```
//!
//! by treating the coefficient vector as the DLM state with `G = I_p` and
//! the lagged values as the loading row `F_t`.
//!
//! Conventions
//! -----------
//! - The first `p` observations only seed the lags; the filter runs over
//!   the `n − p` remaining points, so `TVARFit::fit().len() == n − p`.
//! - Coefficient paths have one row per filtered time and one column per
//!   lag, lag 1 first.
use crate::statespace::{
    dlm::{DLMFit, DLMPrior, DLMSpec, DiscountDLM, DiscountFactors},
    errors::{SSError, SSResult},
    validation::validate_series,
};
use ndarray::{Array1, Array2, ArrayView1, s};

/// Build the lagged design for an AR(p) regression.
///
/// Returns `(target, design)` where `target[i] = x[p + i]` and
/// `design.row(i) = [1?, x[p+i-1], …, x[i]]`.
///
/// Errors
/// ------
/// - `SSError::InvalidLagOrder` unless `1 ≤ p < x.len()`.
pub fn ar_design(
    x: ArrayView1<f64>, p: usize, intercept: bool,
) -> SSResult<(Array1<f64>, Array2<f64>)> {
    let n = x.len();
    if p == 0 || p >= n {
        return Err(SSError::InvalidLagOrder { p, len: n });
    }
    let offset = usize::from(intercept);
    let rows = n - p;
    let mut design = Array2::<f64>::zeros((rows, p + offset));
    for i in 0..rows {
        if intercept {
            design[[i, 0]] = 1.0;
        }
        for lag in 1..=p {
            design[[i, offset + lag - 1]] = x[p + i - lag];
        }
    }
    Ok((x.slice(s![p..]).to_owned(), design))
}

/// Entry point for TVAR fitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TVARModel;

/// A filtered TVAR(p).
#[derive(Debug, Clone, PartialEq)]
pub struct TVARFit {
    lag_order: usize,
    mean: f64,
    fit: DLMFit,
}

impl TVARModel {
    /// Demean `y`, build the lag design, and run the discount filter.
    ///
    /// Parameters
    /// ----------
    /// - `y`: raw series, length `n > p`.
    /// - `p`: lag order.
    /// - `prior`: coefficient prior of dimension `p`.
    /// - `discounts`: state and variance discounts.
    ///
    /// Errors
    /// ------
    /// - `SSError::EmptySeries` / `SSError::NonFiniteData` for a bad `y`.
    /// - `SSError::InvalidLagOrder` unless `1 ≤ p < n`.
    /// - `SSError::LengthMismatch` when `prior.dim() != p`.
    /// - Any error of [`DiscountDLM::filter`].
    pub fn fit(
        y: ArrayView1<f64>, p: usize, prior: DLMPrior, discounts: DiscountFactors,
    ) -> SSResult<TVARFit> {
        validate_series(y)?;
        if prior.dim() != p {
            return Err(SSError::LengthMismatch {
                name: "TVAR prior",
                expected: p,
                actual: prior.dim(),
            });
        }
        let mean = y.mean().unwrap_or(0.0);
        let x = y.mapv(|v| v - mean);
        let (target, design) = ar_design(x.view(), p, false)?;

        let spec = DLMSpec::new(design, Array2::eye(p), prior, discounts)?;
        let fit = DiscountDLM::new(target, spec)?.filter()?;
        Ok(TVARFit { lag_order: p, mean, fit })
    }
}

impl TVARFit {
    pub fn lag_order(&self) -> usize {
        self.lag_order
    }

    /// Sample mean removed before fitting.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Underlying DLM fit.
    pub fn fit(&self) -> &DLMFit {
        &self.fit
    }

    /// Filtered coefficient means, `(n − p) × p`.
    pub fn coefficients(&self) -> Array2<f64> {
        self.fit.filtered_means().slice(s![1.., ..]).to_owned()
    }

    /// Smoothed coefficient means, `(n − p) × p`.
    pub fn smoothed_coefficients(&self) -> SSResult<Array2<f64>> {
        Ok(self.fit.smoothed_means()?.slice(s![1.., ..]).to_owned())
    }

    pub fn pred_loglik(&self) -> Array1<f64> {
        self.fit.pred_loglik()
    }
}
