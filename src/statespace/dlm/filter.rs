//! Forward filtering for discount DLMs with unknown observation variance.
//!
//! Purpose
//! -------
//! Run the West & Harrison conjugate recursion for
//!
//! ```text
//! y_t = F_tᵀ θ_t + ν_t,   ν_t ~ N(0, V)
//! θ_t = G θ_{t-1} + ω_t,  ω_t ~ T(0, W_t)
//! ```
//!
//! where `V` is learned through a normal/inverse-gamma update and `W_t` is
//! implied by the state discount: `W_t = G C_{t-1} Gᵀ (1/δ − 1)`.
//!
//! Key behaviors
//! -------------
//! - The recursion is a fold over time; each step reads the previous
//!   [`FilterState`] and returns a fresh [`DLMStep`]. Nothing is updated in
//!   place, so smoothing and forecasting can index any historical snapshot.
//! - Each step records the one-step forecast `(f_t, Q_t)`, the forecast
//!   error, and the Student-t predictive log density of `y_t`.
//!
//! Conventions
//! -----------
//! - `DLMFit::filtered(0)` is the prior; `DLMFit::filtered(t)` for
//!   `t = 1..=n` is the posterior after `y_t`.
//! - `steps[t - 1]` holds the quantities computed at time `t`.
use crate::statespace::{
    dlm::spec::{DLMSpec, DiscountFactors},
    errors::{SSError, SSResult},
    linalg::symmetrize,
    validation::{validate_length, validate_series},
};
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use statrs::distribution::{Continuous, StudentsT};

/// Posterior snapshot `(m_t, C_t, n_t, s_t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// State mean `m_t`.
    pub mean: Array1<f64>,
    /// State covariance `C_t` (on the scale of `s_t`).
    pub cov: Array2<f64>,
    /// Degrees of freedom `n_t`.
    pub df: f64,
    /// Observation-variance point estimate `s_t`.
    pub scale: f64,
}

/// Prior-to-observation quantities at time `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct OneStepForecast {
    /// Prior state mean `a_t = G m_{t-1}`.
    pub state_mean: Array1<f64>,
    /// Prior state covariance `R_t = G C_{t-1} Gᵀ + W_t`.
    pub state_cov: Array2<f64>,
    /// Discount-implied evolution covariance `W_t`.
    pub evolution_cov: Array2<f64>,
    /// Forecast mean `f_t = F_tᵀ a_t`.
    pub mean: f64,
    /// Forecast scale `Q_t = F_tᵀ R_t F_t + s_{t-1}`.
    pub variance: f64,
    /// Student-t degrees of freedom of the forecast, `β n_{t-1}`.
    pub df: f64,
    /// Forecast error `e_t = y_t − f_t`.
    pub error: f64,
    /// `log p(y_t | y_1..y_{t-1})`.
    pub log_density: f64,
}

/// One filter step: forecast for `y_t` and the posterior after it.
#[derive(Debug, Clone, PartialEq)]
pub struct DLMStep {
    pub forecast: OneStepForecast,
    pub posterior: FilterState,
}

/// Output of [`DiscountDLM::filter`]: the prior plus one [`DLMStep`] per
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct DLMFit {
    pub(crate) prior: FilterState,
    pub(crate) steps: Vec<DLMStep>,
    pub(crate) g: Array2<f64>,
    pub(crate) discounts: DiscountFactors,
}

impl DLMFit {
    /// Number of filtered observations `n`.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` when no observations were filtered.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Per-time steps, `steps()[t - 1]` for time `t`.
    pub fn steps(&self) -> &[DLMStep] {
        &self.steps
    }

    /// Posterior at time `t` (`t = 0` is the prior).
    ///
    /// Panics
    /// ------
    /// - If `t > n`.
    pub fn filtered(&self, t: usize) -> &FilterState {
        if t == 0 { &self.prior } else { &self.steps[t - 1].posterior }
    }

    /// Posterior after the last observation.
    pub fn final_state(&self) -> &FilterState {
        self.filtered(self.len())
    }

    /// Filtered means stacked as an `(n + 1) × k` matrix, row 0 the prior.
    pub fn filtered_means(&self) -> Array2<f64> {
        let k = self.prior.mean.len();
        let mut out = Array2::<f64>::zeros((self.len() + 1, k));
        for (t, mut row) in out.axis_iter_mut(Axis(0)).enumerate() {
            row.assign(&self.filtered(t).mean);
        }
        out
    }

    /// One-step forecast means `f_1..f_n`.
    pub fn forecast_means(&self) -> Array1<f64> {
        self.steps.iter().map(|s| s.forecast.mean).collect()
    }

    /// Predictive log densities `log p(y_t | y_1..y_{t-1})`, `t = 1..=n`.
    pub fn pred_loglik(&self) -> Array1<f64> {
        self.steps.iter().map(|s| s.forecast.log_density).collect()
    }

    /// Sum of the predictive log densities.
    pub fn total_loglik(&self) -> f64 {
        self.steps.iter().map(|s| s.forecast.log_density).sum()
    }

    /// Observation-variance estimates `s_0..s_n`.
    pub fn scales(&self) -> Array1<f64> {
        (0..=self.len()).map(|t| self.filtered(t).scale).collect()
    }
}

/// DiscountDLM — sequential Bayesian filter with discount-factor evolution.
///
/// Purpose
/// -------
/// Pair an observation series with a validated [`DLMSpec`] and run the
/// forward recursion on demand.
///
/// Invariants
/// ----------
/// - `y.len() == spec.f.nrows()` and all `y_t` are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountDLM {
    y: Array1<f64>,
    spec: DLMSpec,
}

impl DiscountDLM {
    /// Build a filter for `y` under `spec`.
    ///
    /// Errors
    /// ------
    /// - `SSError::EmptySeries` / `SSError::NonFiniteData` for a bad `y`.
    /// - `SSError::LengthMismatch` when `F` does not have one row per
    ///   observation.
    pub fn new(y: Array1<f64>, spec: DLMSpec) -> SSResult<Self> {
        validate_series(y.view())?;
        validate_length("F rows", y.len(), spec.f.nrows())?;
        Ok(DiscountDLM { y, spec })
    }

    pub fn observations(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn spec(&self) -> &DLMSpec {
        &self.spec
    }

    /// Run the forward recursion over every observation.
    ///
    /// Returns
    /// -------
    /// `SSResult<DLMFit>` holding the prior and `n` [`DLMStep`]s.
    ///
    /// Errors
    /// ------
    /// - `SSError::DegenerateVariance` when `Q_t` or a diagonal entry of
    ///   `C_t` is not finite and strictly positive.
    /// - `SSError::InvalidStudentsTParam` if the predictive density cannot
    ///   be formed (only reachable through degenerate moments).
    pub fn filter(&self) -> SSResult<DLMFit> {
        let prior = FilterState {
            mean: self.spec.prior.m0.clone(),
            cov: self.spec.prior.c0.clone(),
            df: self.spec.prior.n0,
            scale: self.spec.prior.s0,
        };

        let steps = self.y.iter().enumerate().try_fold(
            Vec::with_capacity(self.y.len()),
            |mut acc: Vec<DLMStep>, (i, &y_t)| {
                let step = {
                    let prev = acc.last().map_or(&prior, |s| &s.posterior);
                    advance(&self.spec, prev, y_t, self.spec.f.row(i), i + 1)?
                };
                acc.push(step);
                Ok::<_, SSError>(acc)
            },
        )?;

        let fit =
            DLMFit { prior, steps, g: self.spec.g.clone(), discounts: self.spec.discounts };
        debug!(
            "discount DLM filtered {} observations (k = {}), total log-likelihood {:.6}",
            fit.len(),
            self.spec.dim(),
            fit.total_loglik()
        );
        Ok(fit)
    }
}

/// One conjugate update from `prev` against `y_t`.
fn advance(
    spec: &DLMSpec, prev: &FilterState, y_t: f64, f_t: ArrayView1<f64>, t: usize,
) -> SSResult<DLMStep> {
    let g = &spec.g;
    let discounts = spec.discounts;

    // Evolution: a_t = G m, P_t = G C Gᵀ, W_t = P_t (1/δ − 1), R_t = P_t + W_t.
    let a = g.dot(&prev.mean);
    let p = symmetrize(&g.dot(&prev.cov).dot(&g.t()));
    let w = &p * discounts.inflation();
    let r = &p + &w;

    // One-step forecast.
    let rf = r.dot(&f_t);
    let f_mean = f_t.dot(&a);
    let q = positive(f_t.dot(&rf) + prev.scale, t, "Q_t")?;
    let pred_df = discounts.variance * prev.df;
    let error = y_t - f_mean;
    let log_density = StudentsT::new(f_mean, q.sqrt(), pred_df)?.ln_pdf(y_t);

    // Variance learning: n_t = β n_{t-1} + 1, s_t = s_{t-1} + s_{t-1}/n_t (e²/Q − 1).
    let df = pred_df + 1.0;
    let scale = positive(prev.scale + prev.scale / df * (error * error / q - 1.0), t, "s_t")?;

    // State update.
    let gain = &rf / q;
    let mean = &a + &(&gain * error);
    let gain_col = gain.view().insert_axis(Axis(1));
    let gain_row = gain.view().insert_axis(Axis(0));
    let cov = symmetrize(&((&r - &(gain_col.dot(&gain_row) * q)) * (scale / prev.scale)));
    for &c in cov.diag() {
        positive(c, t, "C_t")?;
    }

    Ok(DLMStep {
        forecast: OneStepForecast {
            state_mean: a,
            state_cov: r,
            evolution_cov: w,
            mean: f_mean,
            variance: q,
            df: pred_df,
            error,
            log_density,
        },
        posterior: FilterState { mean, cov, df, scale },
    })
}

#[inline]
pub(crate) fn positive(value: f64, t: usize, quantity: &'static str) -> SSResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SSError::DegenerateVariance { t, quantity, value })
    }
}
