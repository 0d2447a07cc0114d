//! k-step-ahead forecasting from the final posterior of a discount DLM.
//!
//! The evolution covariance is held at the last discount-implied value
//! `W_{n+1} = G C_n Gᵀ (1/δ − 1)` for every horizon, which is the usual
//! West & Harrison convention for discount models.
use crate::statespace::{
    dlm::filter::{DLMFit, positive},
    errors::{SSError, SSResult},
    validation::validate_matrix,
};
use ndarray::{ArrayView2, Axis};

/// Marginal forecast of `y_{n+h}` given `y_1..y_n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    /// Horizon `h ≥ 1`.
    pub horizon: usize,
    /// Forecast mean `f_n(h)`.
    pub mean: f64,
    /// Forecast scale `Q_n(h)`.
    pub variance: f64,
    /// Student-t degrees of freedom.
    pub df: f64,
}

impl DLMFit {
    /// Forecast `y_{n+1}, …, y_{n+h}` given future loading rows.
    ///
    /// Parameters
    /// ----------
    /// - `f_future`: `h × k` matrix; row `i` is `F_{n+i+1}`.
    ///
    /// Errors
    /// ------
    /// - `SSError::EmptyHorizon` when `f_future` has no rows.
    /// - `SSError::ShapeMismatch` / `SSError::NonFiniteParam` for a bad
    ///   `f_future`.
    /// - `SSError::DegenerateVariance` if a forecast scale collapses.
    pub fn forecast(&self, f_future: ArrayView2<f64>) -> SSResult<Vec<ForecastPoint>> {
        let k = self.prior.mean.len();
        if f_future.nrows() == 0 {
            return Err(SSError::EmptyHorizon);
        }
        validate_matrix("F future", f_future, (f_future.nrows(), k))?;

        let last = self.final_state();
        let g = &self.g;
        let w = g.dot(&last.cov).dot(&g.t()) * self.discounts.inflation();
        let df = self.discounts.variance * last.df;

        let mut a = last.mean.clone();
        let mut r = last.cov.clone();
        let mut out = Vec::with_capacity(f_future.nrows());
        for (i, f_h) in f_future.axis_iter(Axis(0)).enumerate() {
            a = g.dot(&a);
            r = g.dot(&r).dot(&g.t()) + &w;
            let mean = f_h.dot(&a);
            let variance = positive(f_h.dot(&r.dot(&f_h)) + last.scale, self.len() + i + 1, "Q")?;
            out.push(ForecastPoint { horizon: i + 1, mean, variance, df });
        }
        Ok(out)
    }
}
