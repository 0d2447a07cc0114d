//! Sampler run options: sweep counts, thinning, φ stability interval, and
//! starting values.
use crate::volatility::errors::{SVError, SVResult};

/// Stability interval for the AR(1) coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhiBounds {
    /// `0 < φ < 1`.
    #[default]
    Unit,
    /// `−1 < φ < 1`.
    Symmetric,
}

impl PhiBounds {
    /// Open interval `(lo, hi)`.
    pub fn interval(&self) -> (f64, f64) {
        match self {
            PhiBounds::Unit => (0.0, 1.0),
            PhiBounds::Symmetric => (-1.0, 1.0),
        }
    }

    /// `true` when `phi` lies strictly inside the interval.
    #[inline]
    pub fn contains(&self, phi: f64) -> bool {
        let (lo, hi) = self.interval();
        phi > lo && phi < hi
    }
}

/// Starting values for the chain. The latent path starts at zero and every
/// indicator at component 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialValues {
    pub mu: f64,
    pub phi: f64,
    pub v: f64,
}

impl Default for InitialValues {
    fn default() -> Self {
        InitialValues { mu: 0.0, phi: 0.9, v: 0.002 }
    }
}

/// `SamplerOptions` — loop configuration for [`SVSampler`](crate::volatility::SVSampler).
///
/// Fields
/// ------
/// - `niter`: recorded sweeps after burn-in (≥ 1).
/// - `nburn`: discarded sweeps before recording.
/// - `thin`: keep recorded sweep `i` when `i % thin == 0` (≥ 1).
/// - `bounds`: stability interval for φ.
/// - `init`: starting `(μ, φ, v)`.
///
/// Invariants
/// ----------
/// - `init.phi` lies inside `bounds`, `init.v > 0`, `init.mu` is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerOptions {
    pub niter: usize,
    pub nburn: usize,
    pub thin: usize,
    pub bounds: PhiBounds,
    pub init: InitialValues,
}

impl SamplerOptions {
    /// Validate and build sampler options.
    ///
    /// Errors
    /// ------
    /// - `SVError::InvalidIterations` when `niter == 0`.
    /// - `SVError::InvalidThin` when `thin == 0`.
    /// - `SVError::InvalidInitialValue` for a starting φ outside `bounds`,
    ///   a non-positive `v`, or a non-finite `μ`.
    pub fn new(
        niter: usize, nburn: usize, thin: usize, bounds: PhiBounds, init: InitialValues,
    ) -> SVResult<Self> {
        if niter == 0 {
            return Err(SVError::InvalidIterations { niter });
        }
        if thin == 0 {
            return Err(SVError::InvalidThin { thin });
        }
        if !bounds.contains(init.phi) {
            return Err(SVError::InvalidInitialValue {
                name: "phi",
                value: init.phi,
                reason: "must lie strictly inside the stability interval",
            });
        }
        if !(init.v.is_finite() && init.v > 0.0) {
            return Err(SVError::InvalidInitialValue {
                name: "v",
                value: init.v,
                reason: "must be finite and > 0",
            });
        }
        if !init.mu.is_finite() {
            return Err(SVError::InvalidInitialValue {
                name: "mu",
                value: init.mu,
                reason: "must be finite",
            });
        }
        Ok(SamplerOptions { niter, nburn, thin, bounds, init })
    }

    /// Options with default bounds and starting values.
    pub fn with_counts(niter: usize, nburn: usize, thin: usize) -> SVResult<Self> {
        SamplerOptions::new(niter, nburn, thin, PhiBounds::default(), InitialValues::default())
    }

    /// Number of snapshots a full run retains, `⌈niter / thin⌉`.
    pub fn retained(&self) -> usize {
        self.niter.div_ceil(self.thin)
    }

    /// Total sweeps including burn-in.
    pub fn total_sweeps(&self) -> usize {
        self.nburn + self.niter
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        SamplerOptions {
            niter: 1000,
            nburn: 0,
            thin: 1,
            bounds: PhiBounds::default(),
            init: InitialValues::default(),
        }
    }
}
