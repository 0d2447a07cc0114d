//! Conjugate / semi-conjugate priors for the AR(1) log-volatility model.
//!
//! ```text
//! φ ~ N(φ_m, φ_v) truncated to the stability interval
//! μ ~ N(μ_m, μ_v)
//! v ~ IG(a/2, a v0/2)      (a = degrees of freedom, v0 = point estimate)
//! ```
//!
//! All hyperparameters are plain numbers supplied by the caller; nothing is
//! elicited from data.
use crate::volatility::errors::{SVError, SVResult};

/// Mean and variance of a normal prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPrior {
    pub mean: f64,
    pub variance: f64,
}

/// Scaled inverse-chi-square prior on `v` with `df` pseudo-observations
/// centred on `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseGammaPrior {
    pub df: f64,
    pub scale: f64,
}

/// `SVPriors` — prior hyperparameters for `(φ, μ, v)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SVPriors {
    pub phi: NormalPrior,
    pub mu: NormalPrior,
    pub v: InverseGammaPrior,
}

impl SVPriors {
    /// Validate and build the prior triple.
    ///
    /// Parameters
    /// ----------
    /// - `phi`: `(mean, variance)` of the φ prior before truncation.
    /// - `mu`: `(mean, variance)` of the μ prior.
    /// - `v`: `(df, scale)` of the inverse-gamma prior on `v`.
    ///
    /// Errors
    /// ------
    /// - `SVError::InvalidPrior` when a mean is non-finite or a variance,
    ///   degrees of freedom, or scale is not finite and > 0.
    pub fn new(phi: (f64, f64), mu: (f64, f64), v: (f64, f64)) -> SVResult<Self> {
        Ok(SVPriors {
            phi: NormalPrior::new("phi", phi.0, phi.1)?,
            mu: NormalPrior::new("mu", mu.0, mu.1)?,
            v: InverseGammaPrior::new(v.0, v.1)?,
        })
    }
}

impl Default for SVPriors {
    fn default() -> Self {
        SVPriors {
            phi: NormalPrior { mean: 1.0, variance: 0.01 },
            mu: NormalPrior { mean: 0.0, variance: 1.0 },
            v: InverseGammaPrior { df: 10.0, scale: 0.01 },
        }
    }
}

impl NormalPrior {
    fn new(name: &'static str, mean: f64, variance: f64) -> SVResult<Self> {
        if !mean.is_finite() {
            return Err(SVError::InvalidPrior { name, value: mean, reason: "mean must be finite" });
        }
        if !(variance.is_finite() && variance > 0.0) {
            return Err(SVError::InvalidPrior {
                name,
                value: variance,
                reason: "variance must be finite and > 0",
            });
        }
        Ok(NormalPrior { mean, variance })
    }

    /// Prior precision `1 / variance`.
    #[inline]
    pub fn precision(&self) -> f64 {
        1.0 / self.variance
    }
}

impl InverseGammaPrior {
    fn new(df: f64, scale: f64) -> SVResult<Self> {
        if !(df.is_finite() && df > 0.0) {
            return Err(SVError::InvalidPrior {
                name: "v df",
                value: df,
                reason: "degrees of freedom must be finite and > 0",
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SVError::InvalidPrior {
                name: "v scale",
                value: scale,
                reason: "scale must be finite and > 0",
            });
        }
        Ok(InverseGammaPrior { df, scale })
    }
}
