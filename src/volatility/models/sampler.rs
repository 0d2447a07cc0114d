//! SVSampler — the burn-in / record / thin loop around [`gibbs_sweep`].
//!
//! Purpose
//! -------
//! Own the configuration of one MCMC run (data, model, options), drive the
//! Gibbs sweeps, and hand back an immutable [`SVTrace`] holding exactly the
//! retained snapshots plus Metropolis diagnostics for φ.
//!
//! Key behaviors
//! -------------
//! - Sweeps are indexed `i = −nburn, …, niter − 1`; sweep `i` is retained
//!   when `i ≥ 0` and `i % thin == 0`, giving `⌈niter / thin⌉` snapshots.
//! - Any stage error aborts the run; no partial trace is returned.
//! - Progress is reported through the `log` facade: `debug!` every 50
//!   sweeps and at the end of the run, `trace!` per sweep, and `warn!` when
//!   the φ acceptance rate falls below 5 %.
//!
//! Conventions
//! -----------
//! - The sampler itself is immutable; `run` can be called repeatedly, and
//!   independent chains can run concurrently on clones with their own RNGs.
use crate::volatility::{
    core::{NormalMixture, SVData, SVPriors, SVState, SamplerOptions},
    errors::SVResult,
    models::{
        conditionals::{PhiDraw, PhiRejection},
        sweep::{SVModel, gibbs_sweep},
    },
};
use log::{debug, trace, warn};
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Sweeps between `debug!` progress lines.
const PROGRESS_EVERY: isize = 50;

/// Acceptance rate below which a completed run logs a warning.
const LOW_ACCEPTANCE: f64 = 0.05;

/// Counts of φ Metropolis outcomes over every sweep of a run, burn-in
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhiDiagnostics {
    pub proposals: usize,
    pub accepted: usize,
    pub metropolis_rejections: usize,
    pub stability_rejections: usize,
}

impl PhiDiagnostics {
    fn record(&mut self, draw: &PhiDraw) {
        self.proposals += 1;
        match draw {
            PhiDraw::Accepted { .. } => self.accepted += 1,
            PhiDraw::Rejected { reason: PhiRejection::Metropolis, .. } => {
                self.metropolis_rejections += 1
            }
            PhiDraw::Rejected { reason: PhiRejection::OutsideStability, .. } => {
                self.stability_rejections += 1
            }
        }
    }

    /// `accepted / proposals`, or 0 before any proposal.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposals == 0 { 0.0 } else { self.accepted as f64 / self.proposals as f64 }
    }
}

/// Read-only record of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SVTrace {
    draws: Vec<SVState>,
    diagnostics: PhiDiagnostics,
}

impl SVTrace {
    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Retained snapshots in sweep order.
    pub fn draws(&self) -> &[SVState] {
        &self.draws
    }

    pub fn phi(&self) -> Array1<f64> {
        self.draws.iter().map(|s| s.phi).collect()
    }

    pub fn mu(&self) -> Array1<f64> {
        self.draws.iter().map(|s| s.mu).collect()
    }

    pub fn v(&self) -> Array1<f64> {
        self.draws.iter().map(|s| s.v).collect()
    }

    /// Retained log-volatility paths, one row per snapshot (`len × (n + 1)`).
    pub fn log_volatility(&self) -> Array2<f64> {
        let cols = self.draws.first().map_or(0, |s| s.z.len());
        let mut out = Array2::<f64>::zeros((self.draws.len(), cols));
        for (mut row, s) in out.axis_iter_mut(Axis(0)).zip(&self.draws) {
            row.assign(&s.z);
        }
        out
    }

    /// Retained mixture indicators, one row per snapshot (`len × n`).
    pub fn gamma(&self) -> Array2<usize> {
        let cols = self.draws.first().map_or(0, |s| s.gamma.len());
        let mut out = Array2::<usize>::zeros((self.draws.len(), cols));
        for (mut row, s) in out.axis_iter_mut(Axis(0)).zip(&self.draws) {
            row.assign(&Array1::from(s.gamma.clone()));
        }
        out
    }

    /// Posterior mean of the volatility `exp(z_t)` for `t = 0..=n`.
    pub fn volatility_mean(&self) -> Array1<f64> {
        let vol = self.log_volatility().mapv(f64::exp);
        vol.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(vol.ncols()))
    }

    /// Fraction of φ proposals accepted over the whole run.
    pub fn acceptance_rate(&self) -> f64 {
        self.diagnostics.acceptance_rate()
    }

    pub fn diagnostics(&self) -> &PhiDiagnostics {
        &self.diagnostics
    }
}

/// `SVSampler` — configured AR(1) stochastic-volatility Gibbs sampler.
///
/// Fields
/// ------
/// - `data`: validated, transformed returns.
/// - `model`: mixture table, priors, and φ bounds.
/// - `options`: sweep counts, thinning, and starting values.
#[derive(Debug, Clone, PartialEq)]
pub struct SVSampler {
    data: SVData,
    model: SVModel,
    options: SamplerOptions,
}

impl SVSampler {
    /// Assemble a sampler from validated parts.
    ///
    /// Every argument is validated by its own constructor, so this cannot
    /// fail; the `Result` keeps the signature stable for callers that chain
    /// construction with `?`.
    pub fn new(
        data: SVData, mixture: NormalMixture, priors: SVPriors, options: SamplerOptions,
    ) -> SVResult<Self> {
        let model = SVModel::new(mixture, priors, options.bounds);
        Ok(SVSampler { data, model, options })
    }

    pub fn data(&self) -> &SVData {
        &self.data
    }

    pub fn model(&self) -> &SVModel {
        &self.model
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Run burn-in and recording with `rng`.
    ///
    /// Returns
    /// -------
    /// `SVResult<SVTrace>` with exactly `options.retained()` snapshots.
    ///
    /// Errors
    /// ------
    /// - Any error from [`gibbs_sweep`]; the run stops at the failing sweep
    ///   and its partial trace is discarded.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> SVResult<SVTrace> {
        let opts = &self.options;
        let mut state = SVState::initial(self.data.len(), opts.init);
        let mut draws = Vec::with_capacity(opts.retained());
        let mut diagnostics = PhiDiagnostics::default();
        let thin = opts.thin as isize;

        for i in -(opts.nburn as isize)..opts.niter as isize {
            let (next, phi_draw) = gibbs_sweep(&state, &self.data, &self.model, rng)?;
            diagnostics.record(&phi_draw);
            state = next;

            if i % PROGRESS_EVERY == 0 {
                debug!(
                    "SV sweep {i}: phi = {:.6}, mu = {:.6}, v = {:.6}",
                    state.phi, state.mu, state.v
                );
            }
            trace!("phi: {:10.6} mu: {:10.6} v: {:10.6}", state.phi, state.mu, state.v);

            if i >= 0 && i % thin == 0 {
                draws.push(state.clone());
            }
        }

        let rate = diagnostics.acceptance_rate();
        debug!(
            "SV run finished: {} sweeps ({} burn-in), {} retained, phi acceptance {:.3}",
            opts.total_sweeps(),
            opts.nburn,
            draws.len(),
            rate
        );
        if rate < LOW_ACCEPTANCE {
            warn!(
                "phi Metropolis acceptance rate {rate:.3} is below {LOW_ACCEPTANCE}; \
                 {} proposals fell outside the stability interval",
                diagnostics.stability_rejections
            );
        }
        Ok(SVTrace { draws, diagnostics })
    }

    /// [`SVSampler::run`] with `StdRng::seed_from_u64(seed)`.
    pub fn run_seeded(&self, seed: u64) -> SVResult<SVTrace> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.run(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        statespace::ErrorKind,
        volatility::core::{InitialValues, PhiBounds, simulate_sv},
    };

    fn sampler(niter: usize, nburn: usize, thin: usize) -> SVSampler {
        let mut rng = StdRng::seed_from_u64(50);
        let sim = simulate_sv(80, 0.9, -0.5, 0.05, &mut rng).unwrap();
        SVSampler::new(
            SVData::new(sim.returns).unwrap(),
            NormalMixture::log_chi2_half().unwrap(),
            SVPriors::default(),
            SamplerOptions::with_counts(niter, nburn, thin).unwrap(),
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The trace holds exactly ⌈niter / thin⌉ snapshots and its accessors
    // agree on shape.
    //
    // Given
    // -----
    // - niter = 25, nburn = 10, thin = 4, n = 80.
    //
    // Expect
    // ------
    // - 7 snapshots; log_volatility is 7 × 81; gamma is 7 × 80.
    // - Diagnostics count all 35 sweeps and partition them.
    fn run_retains_thinned_snapshots() {
        // Arrange
        let s = sampler(25, 10, 4);

        // Act
        let trace = s.run_seeded(1).unwrap();

        // Assert
        assert_eq!(trace.len(), 7);
        assert_eq!(trace.phi().len(), 7);
        assert_eq!(trace.log_volatility().dim(), (7, 81));
        assert_eq!(trace.gamma().dim(), (7, 80));
        assert_eq!(trace.volatility_mean().len(), 81);
        let d = trace.diagnostics();
        assert_eq!(d.proposals, 35);
        assert_eq!(d.accepted + d.metropolis_rejections + d.stability_rejections, 35);
        assert!((0.0..=1.0).contains(&trace.acceptance_rate()));
    }

    #[test]
    // Purpose
    // -------
    // Identical seeds give bit-identical traces; different seeds do not.
    fn run_seeded_is_deterministic() {
        let s = sampler(20, 5, 1);
        let a = s.run_seeded(77).unwrap();
        let b = s.run_seeded(77).unwrap();
        let c = s.run_seeded(78).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.mu(), c.mu());
    }

    #[test]
    // Purpose
    // -------
    // A conditional that degenerates mid-run aborts the whole run with a
    // numerical-degeneracy error instead of returning a partial trace.
    //
    // Given
    // -----
    // - Initial v = 1e-320, which passes option validation but makes the
    //   μ conditional precision (1 − φ²) / v overflow.
    //
    // Expect
    // ------
    // - `run_seeded` returns an error with kind `NumericalDegeneracy`.
    fn run_aborts_on_numerical_degeneracy() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(50);
        let sim = simulate_sv(80, 0.9, -0.5, 0.05, &mut rng).unwrap();
        let init = InitialValues { v: 1e-320, ..InitialValues::default() };
        let s = SVSampler::new(
            SVData::new(sim.returns).unwrap(),
            NormalMixture::log_chi2_half().unwrap(),
            SVPriors::default(),
            SamplerOptions::new(20, 5, 1, PhiBounds::Unit, init).unwrap(),
        )
        .unwrap();

        // Act
        let err = s.run_seeded(3).unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::NumericalDegeneracy, "{err:?}");
    }
}
