//! rust_statespace — Bayesian state-space filtering, discount DLMs, and MCMC
//! stochastic volatility, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the discount DLM and the stochastic-volatility sampler to Python via the
//! `_rust_statespace` extension module. When the `python-bindings` feature is
//! enabled, this module defines the Python-facing classes and submodules used
//! by the `rust_statespace` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`statespace` and `volatility`) as the
//!   public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_statespace` Python extension.
//! - Create and register Python submodules (`statespace`, `volatility`) under
//!   `rust_statespace` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules; this
//!   file performs only FFI glue, input validation, and error mapping.
//! - Python-visible types mirror the invariants of their Rust counterparts
//!   (`DiscountDLM`, `SVSampler`); validation happens in the Rust
//!   constructors and failures surface as `ValueError`.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_statespace.<submodule>`.
//! - Matrices cross the boundary as row-major lists of rows; vectors as
//!   lists of floats.
//! - Randomness: `sample(seed=...)` is reproducible; without a seed the
//!   thread-local generator is used.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`statespace`] and
//!   [`volatility`] and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//! - The Python packaging layer imports `_rust_statespace` and wraps its
//!   classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the integration tests under `tests/`.

pub mod statespace;
pub mod utils;
pub mod volatility;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    statespace::{DLMFit, DLMPrior, DLMSpec, DiscountFactors},
    utils::{extract_f64_matrix, extract_owned_vector, matrix_to_rows},
    volatility::{
        InitialValues, NormalMixture, PhiBounds, SVData, SVPriors, SVSampler, SVTrace,
        SamplerOptions,
    },
};

#[cfg(feature = "python-bindings")]
fn parse_bounds(bounds: Option<&str>) -> PyResult<PhiBounds> {
    match bounds.unwrap_or("unit").to_lowercase().as_str() {
        "unit" => Ok(PhiBounds::Unit),
        "symmetric" => Ok(PhiBounds::Symmetric),
        other => Err(PyValueError::new_err(format!(
            "invalid phi bounds {other:?} (expected 'unit' or 'symmetric')"
        ))),
    }
}

/// StochasticVolatility — Python-facing wrapper for the AR(1) SV sampler.
///
/// Purpose
/// -------
/// Hold validated returns, priors, and φ bounds, run [`SVSampler`] on demand,
/// and expose the most recent [`SVTrace`] through property getters.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `StochasticVolatility(returns, offset=None, phi_prior=(1.0, 0.01),
/// mu_prior=(0.0, 1.0), v_prior=(10.0, 0.01), bounds='unit')`:
/// - `returns`: one-dimensional array-like of finite `f64` values.
/// - `offset`: optional `c > 0` used in `log(r² + c)/2`; required when the
///   series contains exact zeros.
/// - `phi_prior`, `mu_prior`: `(mean, variance)` normal priors.
/// - `v_prior`: `(df, scale)` inverse-gamma prior.
/// - `bounds`: `'unit'` for `0 < φ < 1`, `'symmetric'` for `−1 < φ < 1`.
///
/// Notes
/// -----
/// - Getters raise `ValueError` until `sample` has completed once.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_statespace.volatility", unsendable)]
pub struct StochasticVolatility {
    data: SVData,
    priors: SVPriors,
    bounds: PhiBounds,
    trace: Option<SVTrace>,
}

#[cfg(feature = "python-bindings")]
impl StochasticVolatility {
    fn trace(&self) -> PyResult<&SVTrace> {
        self.trace
            .as_ref()
            .ok_or_else(|| PyValueError::new_err("sampler has not been run; call sample() first"))
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StochasticVolatility {
    #[new]
    #[pyo3(
        signature = (
            returns,
            offset = None,
            phi_prior = (1.0, 0.01),
            mu_prior = (0.0, 1.0),
            v_prior = (10.0, 0.01),
            bounds = None,
        ),
        text_signature = "(returns, /, offset=None, phi_prior=(1.0, 0.01), mu_prior=(0.0, 1.0), \
                          v_prior=(10.0, 0.01), bounds='unit')"
    )]
    pub fn new<'py>(
        py: Python<'py>, returns: &Bound<'py, PyAny>, offset: Option<f64>, phi_prior: (f64, f64),
        mu_prior: (f64, f64), v_prior: (f64, f64), bounds: Option<&str>,
    ) -> PyResult<Self> {
        let r = extract_owned_vector(py, returns, "returns")?;
        let data = match offset {
            Some(c) => SVData::with_offset(r, c)?,
            None => SVData::new(r)?,
        };
        let priors = SVPriors::new(phi_prior, mu_prior, v_prior)?;
        let bounds = parse_bounds(bounds)?;
        Ok(StochasticVolatility { data, priors, bounds, trace: None })
    }

    #[pyo3(
        signature = (
            niter,
            nburn = 0,
            thin = 1,
            seed = None,
            init_mu = 0.0,
            init_phi = 0.9,
            init_v = 0.002,
        ),
        text_signature = "(self, niter, /, nburn=0, thin=1, seed=None, init_mu=0.0, \
                          init_phi=0.9, init_v=0.002)"
    )]
    pub fn sample(
        &mut self, niter: usize, nburn: usize, thin: usize, seed: Option<u64>, init_mu: f64,
        init_phi: f64, init_v: f64,
    ) -> PyResult<()> {
        let init = InitialValues { mu: init_mu, phi: init_phi, v: init_v };
        let options = SamplerOptions::new(niter, nburn, thin, self.bounds, init)?;
        let sampler = SVSampler::new(
            self.data.clone(),
            NormalMixture::log_chi2_half()?,
            self.priors,
            options,
        )?;
        let trace = match seed {
            Some(s) => sampler.run_seeded(s)?,
            None => sampler.run(&mut rand::rng())?,
        };
        self.trace = Some(trace);
        Ok(())
    }

    #[getter]
    pub fn phi(&self) -> PyResult<Vec<f64>> {
        Ok(self.trace()?.phi().to_vec())
    }

    #[getter]
    pub fn mu(&self) -> PyResult<Vec<f64>> {
        Ok(self.trace()?.mu().to_vec())
    }

    #[getter]
    pub fn v(&self) -> PyResult<Vec<f64>> {
        Ok(self.trace()?.v().to_vec())
    }

    /// Retained log-volatility paths, one list of `n + 1` values per draw.
    #[getter]
    pub fn z(&self) -> PyResult<Vec<Vec<f64>>> {
        Ok(matrix_to_rows(&self.trace()?.log_volatility()))
    }

    #[getter]
    pub fn gamma(&self) -> PyResult<Vec<Vec<usize>>> {
        Ok(self.trace()?.draws().iter().map(|s| s.gamma.clone()).collect())
    }

    #[getter]
    pub fn volatility_mean(&self) -> PyResult<Vec<f64>> {
        Ok(self.trace()?.volatility_mean().to_vec())
    }

    #[getter]
    pub fn acceptance_rate(&self) -> PyResult<f64> {
        Ok(self.trace()?.acceptance_rate())
    }
}

/// DiscountDLM — Python-facing wrapper for the conjugate discount DLM.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `DiscountDLM(y, F, G, m0, C0, n0=1.0, s0=1.0, delta=1.0, beta=1.0)`:
/// - `y`: length-`n` observations.
/// - `F`: `n × k` regressors; `G`: `k × k` transition.
/// - `m0`, `C0`, `n0`, `s0`: normal / inverse-gamma prior.
/// - `delta`, `beta`: state and variance discount factors in `(0, 1]`.
///
/// Notes
/// -----
/// - Filtering runs eagerly at construction; getters are O(n k).
#[cfg(feature = "python-bindings")]
#[pyclass(name = "DiscountDLM", module = "rust_statespace.statespace", unsendable)]
pub struct PyDiscountDLM {
    fit: DLMFit,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyDiscountDLM {
    #[new]
    #[pyo3(
        signature = (y, f, g, m0, c0, n0 = 1.0, s0 = 1.0, delta = 1.0, beta = 1.0),
        text_signature = "(y, F, G, m0, C0, /, n0=1.0, s0=1.0, delta=1.0, beta=1.0)"
    )]
    pub fn new<'py>(
        py: Python<'py>, y: &Bound<'py, PyAny>, f: &Bound<'py, PyAny>, g: &Bound<'py, PyAny>,
        m0: &Bound<'py, PyAny>, c0: &Bound<'py, PyAny>, n0: f64, s0: f64, delta: f64, beta: f64,
    ) -> PyResult<Self> {
        let y = extract_owned_vector(py, y, "y")?;
        let m0 = extract_owned_vector(py, m0, "m0")?;
        let f = extract_f64_matrix(f, "F")?;
        let g = extract_f64_matrix(g, "G")?;
        let c0 = extract_f64_matrix(c0, "C0")?;

        let prior = DLMPrior::new(m0, c0, n0, s0)?;
        let discounts = DiscountFactors::new(delta, beta)?;
        let spec = DLMSpec::new(f, g, prior, discounts)?;
        let fit = crate::statespace::DiscountDLM::new(y, spec)?.filter()?;
        Ok(PyDiscountDLM { fit })
    }

    #[getter]
    pub fn filtered_means(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(&self.fit.filtered_means())
    }

    #[getter]
    pub fn forecast_means(&self) -> Vec<f64> {
        self.fit.forecast_means().to_vec()
    }

    #[getter]
    pub fn pred_loglik(&self) -> Vec<f64> {
        self.fit.pred_loglik().to_vec()
    }

    #[getter]
    pub fn total_loglik(&self) -> f64 {
        self.fit.total_loglik()
    }

    #[getter]
    pub fn scales(&self) -> Vec<f64> {
        self.fit.scales().to_vec()
    }

    pub fn smoothed_means(&self) -> PyResult<Vec<Vec<f64>>> {
        Ok(matrix_to_rows(&self.fit.smoothed_means()?))
    }

    /// k-step-ahead forecasts as `(mean, variance, df)` tuples.
    #[pyo3(text_signature = "(self, f_future, /)")]
    pub fn forecast<'py>(&self, f_future: &Bound<'py, PyAny>) -> PyResult<Vec<(f64, f64, f64)>> {
        let f_future = extract_f64_matrix(f_future, "f_future")?;
        let points = self.fit.forecast(f_future.view())?;
        Ok(points.iter().map(|p| (p.mean, p.variance, p.df)).collect())
    }
}

/// _rust_statespace — Python extension module initializer.
///
/// Purpose
/// -------
/// Define the `_rust_statespace` Python module and register the `statespace`
/// and `volatility` submodules used by the public `rust_statespace` package.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_statespace<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let statespace_mod = PyModule::new(_py, "statespace")?;
    let volatility_mod = PyModule::new(_py, "volatility")?;
    statespace_models(m, &statespace_mod)?;
    volatility_models(m, &volatility_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_statespace.statespace", statespace_mod)?;
    modules.set_item("rust_statespace.volatility", volatility_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statespace_models<'py>(
    rust_statespace: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyDiscountDLM>()?;
    rust_statespace.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn volatility_models<'py>(
    rust_statespace: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<StochasticVolatility>()?;
    rust_statespace.add_submodule(m)?;
    Ok(())
}
