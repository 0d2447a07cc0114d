//! Discrete normal-mixture approximation of a non-Gaussian noise law.
//!
//! Purpose
//! -------
//! Hold an immutable table of `(q_j, b_j, w_j)` triples so that the SV
//! observation noise `ν_t = log(ε_t²)/2` can be replaced by
//! `Σ_j q_j N(b_j, w_j)`. Conditioning on a component indicator then makes
//! the observation equation linear-Gaussian and FFBS-compatible.
//!
//! Key behaviors
//! -------------
//! - [`NormalMixture::new`] validates a caller-supplied table strictly.
//! - [`NormalMixture::log_chi2_half`] builds the 7-component Kim, Shephard &
//!   Chib (1998) table, rescaled to one-half log χ²₁.
//! - Per-component and mixture densities, moments, and component
//!   responsibilities for a residual.
//!
//! Invariants & assumptions
//! ------------------------
//! - All three arrays share one length `J ≥ 1`.
//! - Weights are finite, `≥ 0`, and sum to 1 within 1e-8.
//! - Variances are finite and `> 0`; means are finite.
//! - Tables are never mutated after construction; samplers borrow them.
use crate::volatility::errors::{SVError, SVResult};
use ndarray::Array1;
use std::f64::consts::PI;

/// Tolerance on `|Σ q_j − 1|` for caller-supplied tables.
pub const WEIGHT_SUM_TOL: f64 = 1e-8;

/// KSC weights as tabulated (rounded; they sum to 1.0001).
pub const KSC_WEIGHTS: [f64; 7] = [0.0073, 0.0000, 0.1056, 0.2575, 0.3400, 0.2457, 0.0440];
/// KSC component means for log(χ²₁)/2.
pub const KSC_MEANS: [f64; 7] = [-5.7002, -4.9186, -2.6216, -1.1793, -0.3255, 0.2624, 0.7537];
/// KSC component variances for log(χ²₁)/2.
pub const KSC_VARIANCES: [f64; 7] = [1.4490, 1.2949, 0.6534, 0.3157, 0.1600, 0.0851, 0.0418];

/// `NormalMixture` — validated mixture-of-normals table.
///
/// Fields
/// ------
/// - `weights`, `means`, `variances`: the table, index `j = 0..J`.
/// - `log_norm`: cached `ln q_j − ½ ln(2π w_j)`, `−∞` for zero weights.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMixture {
    weights: Array1<f64>,
    means: Array1<f64>,
    variances: Array1<f64>,
    log_norm: Array1<f64>,
}

impl NormalMixture {
    /// Validate and build a mixture table.
    ///
    /// Errors
    /// ------
    /// - `SVError::EmptyMixture` when no components are given.
    /// - `SVError::MixtureLengthMismatch` when the arrays differ in length.
    /// - `SVError::InvalidMixtureWeight` for a negative / non-finite weight.
    /// - `SVError::NonFiniteMixtureMean` for a non-finite mean.
    /// - `SVError::NonPositiveMixtureVariance` for a variance that is not
    ///   finite and > 0.
    /// - `SVError::MixtureWeightsNotNormalized` when `|Σ q_j − 1| > 1e-8`.
    pub fn new(
        weights: Array1<f64>, means: Array1<f64>, variances: Array1<f64>,
    ) -> SVResult<Self> {
        let j = weights.len();
        if j == 0 && means.is_empty() && variances.is_empty() {
            return Err(SVError::EmptyMixture);
        }
        if means.len() != j || variances.len() != j {
            return Err(SVError::MixtureLengthMismatch {
                weights: j,
                means: means.len(),
                variances: variances.len(),
            });
        }
        for (index, &value) in weights.iter().enumerate() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SVError::InvalidMixtureWeight { index, value });
            }
        }
        for (index, &value) in means.iter().enumerate() {
            if !value.is_finite() {
                return Err(SVError::NonFiniteMixtureMean { index, value });
            }
        }
        for (index, &value) in variances.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(SVError::NonPositiveMixtureVariance { index, value });
            }
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOL {
            return Err(SVError::MixtureWeightsNotNormalized { sum });
        }
        let log_norm = weights
            .iter()
            .zip(variances.iter())
            .map(|(&q, &w)| q.ln() - 0.5 * (2.0 * PI * w).ln())
            .collect();
        Ok(NormalMixture { weights, means, variances, log_norm })
    }

    /// Kim–Shephard–Chib approximation to log(χ²₁)/2.
    ///
    /// The tabulated weights are divided by their sum so the table meets the
    /// 1e-8 normalization rule.
    pub fn log_chi2_half() -> SVResult<Self> {
        let raw = Array1::from(KSC_WEIGHTS.to_vec());
        let weights = &raw / raw.sum();
        let means = Array1::from(KSC_MEANS.to_vec());
        let variances = Array1::from(KSC_VARIANCES.to_vec());
        NormalMixture::new(weights, means, variances)
    }

    /// Number of components `J`.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn variances(&self) -> &Array1<f64> {
        &self.variances
    }

    /// Density of component `j` at `x`, ignoring its weight.
    ///
    /// Panics
    /// ------
    /// - If `j >= self.len()`.
    pub fn density(&self, x: f64, j: usize) -> f64 {
        self.log_density(x, j).exp()
    }

    /// Log density of component `j` at `x`, ignoring its weight.
    pub fn log_density(&self, x: f64, j: usize) -> f64 {
        let w = self.variances[j];
        let d = x - self.means[j];
        -0.5 * (2.0 * PI * w).ln() - 0.5 * d * d / w
    }

    /// Mixture density `Σ_j q_j N(x; b_j, w_j)`.
    pub fn mixture_density(&self, x: f64) -> f64 {
        (0..self.len()).map(|j| self.weights[j] * self.density(x, j)).sum()
    }

    /// Mixture mean `Σ_j q_j b_j`.
    pub fn mean(&self) -> f64 {
        self.weights.dot(&self.means)
    }

    /// Mixture variance `Σ_j q_j (w_j + b_j²) − mean²`.
    pub fn variance(&self) -> f64 {
        let second: f64 = (0..self.len())
            .map(|j| self.weights[j] * (self.variances[j] + self.means[j] * self.means[j]))
            .sum();
        let mean = self.mean();
        second - mean * mean
    }

    /// Unnormalized log responsibilities `ln q_j + ln N(residual; b_j, w_j)`
    /// written into `out` (length `J`).
    pub(crate) fn fill_log_weights(&self, residual: f64, out: &mut [f64]) {
        for (j, slot) in out.iter_mut().enumerate() {
            let d = residual - self.means[j];
            *slot = self.log_norm[j] - 0.5 * d * d / self.variances[j];
        }
    }

    /// Posterior component probabilities `P(γ = j | residual)`.
    ///
    /// Returns all-NaN when `residual` is not finite.
    pub fn responsibilities(&self, residual: f64) -> Array1<f64> {
        let mut logw = vec![0.0; self.len()];
        self.fill_log_weights(residual, &mut logw);
        let max = logw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let unnorm = Array1::from_iter(logw.iter().map(|l| (l - max).exp()));
        let total = unnorm.sum();
        unnorm / total
    }
}
