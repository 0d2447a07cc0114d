//! statespace::ffbs — forward filtering, backward sampling for univariate
//! linear-Gaussian state-space models.
//!
//! Purpose
//! -------
//! Draw the whole latent path `z_0..z_n` jointly from its posterior under
//!
//! ```text
//! z_t = G_t z_{t-1} + ε_t,   ε_t ~ N(0, W)
//! y_t = F_t z_t     + ν_t,   ν_t ~ N(0, V_t)
//! z_0 ~ N(m0, C0)
//! ```
//!
//! conditional on known `F_t`, `G_t`, `V_t`, `W`. This is the path-refresh
//! step of the stochastic-volatility Gibbs sampler and a standalone tool for
//! any conditionally Gaussian model.
//!
//! Key behaviors
//! -------------
//! - [`UnivariateSSM::forward_filter`] runs the Kalman recursion and stores
//!   every `(a_t, R_t, m_t, C_t)` in a [`ForwardPass`].
//! - [`UnivariateSSM::ffbs_draw`] samples `z_n ~ N(m_n, C_n)` and then each
//!   `z_t | z_{t+1}` backwards, giving an exact joint draw.
//! - [`UnivariateSSM::smooth_moments`] returns the analytic Rauch–Tung–
//!   Striebel means and variances, i.e. the first two moments of the same
//!   distribution `ffbs_draw` samples from.
//!
//! Invariants & assumptions
//! ------------------------
//! - `V_t > 0` for every `t`, `W > 0`, `C0 > 0`; checked at construction.
//! - Variances are updated in their positive forms
//!   `C_t = R_t V_t / Q_t` and `H_t = C_t W / R_{t+1}` rather than by
//!   subtraction. A value that still underflows to zero or becomes
//!   non-finite is reported as [`SSError::DegenerateVariance`].
//!
//! Conventions
//! -----------
//! - Arrays in [`ForwardPass`] have length `n + 1`; index 0 holds the prior
//!   (`a_0 = m_0 = m0`, `R_0 = C_0 = C0`), indices `1..=n` align with
//!   `y[0..n]`.
//! - Randomness comes only from the `rng` argument.
use crate::statespace::{
    errors::{SSError, SSResult},
    validation::{validate_finite, validate_length, validate_series, validate_variances},
};
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// A system coefficient that is either constant over time or given per time.
#[derive(Debug, Clone, PartialEq)]
pub enum Coefficient {
    Constant(f64),
    /// One entry per observation; entry `t - 1` is used at time `t`.
    Varying(Array1<f64>),
}

impl Coefficient {
    #[inline]
    fn at(&self, i: usize) -> f64 {
        match self {
            Coefficient::Constant(c) => *c,
            Coefficient::Varying(v) => v[i],
        }
    }

    fn validate(&self, name: &'static str, n: usize) -> SSResult<()> {
        match self {
            Coefficient::Constant(c) => validate_finite(name, ndarray::aview1(&[*c])),
            Coefficient::Varying(v) => {
                validate_length(name, n, v.len())?;
                validate_finite(name, v.view())
            }
        }
    }
}

/// Univariate linear-Gaussian state-space model with known variances.
///
/// Fields
/// ------
/// - `y`: observations `y_1..y_n` (stored 0-based).
/// - `f`, `g`: observation loading `F_t` and transition `G_t`.
/// - `v`: observation-noise variance `V_t`.
/// - `w`: evolution variance `W`.
/// - `m0`, `c0`: prior mean and variance of `z_0`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnivariateSSM {
    y: Array1<f64>,
    f: Coefficient,
    g: Coefficient,
    v: Coefficient,
    w: f64,
    m0: f64,
    c0: f64,
}

/// Stored forward-filter quantities, all of length `n + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    /// One-step-ahead state means `a_t`.
    pub a: Array1<f64>,
    /// One-step-ahead state variances `R_t`.
    pub r: Array1<f64>,
    /// Filtered means `m_t`.
    pub m: Array1<f64>,
    /// Filtered variances `C_t`.
    pub c: Array1<f64>,
}

/// Analytic smoothed moments `E[z_t | y_1..n]` and `Var[z_t | y_1..n]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedMoments {
    pub mean: Array1<f64>,
    pub var: Array1<f64>,
}

impl UnivariateSSM {
    /// Build and validate a univariate state-space model.
    ///
    /// Errors
    /// ------
    /// - `SSError::EmptySeries` / `SSError::NonFiniteData` for a bad `y`.
    /// - `SSError::LengthMismatch` when a `Varying` coefficient is not of
    ///   length `y.len()`.
    /// - `SSError::NonPositiveVariance` when any `V_t`, `W`, or `C0` is not
    ///   finite and strictly positive.
    /// - `SSError::NonFiniteParam` for non-finite `F_t`, `G_t`, or `m0`.
    pub fn new(
        y: Array1<f64>, f: Coefficient, g: Coefficient, v: Coefficient, w: f64, m0: f64, c0: f64,
    ) -> SSResult<Self> {
        validate_series(y.view())?;
        let n = y.len();
        f.validate("F", n)?;
        g.validate("G", n)?;
        v.validate("V", n)?;
        match &v {
            Coefficient::Constant(c) => validate_variances("V", ndarray::aview1(&[*c]))?,
            Coefficient::Varying(vs) => validate_variances("V", vs.view())?,
        }
        validate_variances("W", ndarray::aview1(&[w]))?;
        validate_variances("C0", ndarray::aview1(&[c0]))?;
        validate_finite("m0", ndarray::aview1(&[m0]))?;
        Ok(UnivariateSSM { y, f, g, v, w, m0, c0 })
    }

    /// Number of observations `n`.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Always `false`; construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Run the Kalman forward recursion and store every intermediate moment.
    ///
    /// Errors
    /// ------
    /// - `SSError::DegenerateVariance` when `R_t`, `Q_t`, or `C_t` is not
    ///   finite and strictly positive.
    pub fn forward_filter(&self) -> SSResult<ForwardPass> {
        let n = self.len();
        let mut a = Array1::<f64>::zeros(n + 1);
        let mut r = Array1::<f64>::zeros(n + 1);
        let mut m = Array1::<f64>::zeros(n + 1);
        let mut c = Array1::<f64>::zeros(n + 1);
        a[0] = self.m0;
        r[0] = self.c0;
        m[0] = self.m0;
        c[0] = self.c0;

        for t in 1..=n {
            let i = t - 1;
            let (f_t, g_t, v_t) = (self.f.at(i), self.g.at(i), self.v.at(i));

            a[t] = g_t * m[t - 1];
            r[t] = positive(g_t * g_t * c[t - 1] + self.w, t, "R_t")?;

            let q_t = positive(f_t * f_t * r[t] + v_t, t, "Q_t")?;
            let gain = r[t] * f_t / q_t;
            m[t] = a[t] + gain * (self.y[i] - f_t * a[t]);
            c[t] = positive(r[t] * v_t / q_t, t, "C_t")?;
        }

        Ok(ForwardPass { a, r, m, c })
    }

    /// Rauch–Tung–Striebel smoothed means and variances for `z_0..z_n`.
    pub fn smooth_moments(&self) -> SSResult<SmoothedMoments> {
        let fp = self.forward_filter()?;
        let n = self.len();
        let mut mean = fp.m.clone();
        let mut var = fp.c.clone();

        for t in (0..n).rev() {
            let b = fp.c[t] * self.g.at(t) / fp.r[t + 1];
            mean[t] = fp.m[t] + b * (mean[t + 1] - fp.a[t + 1]);
            var[t] = positive(fp.c[t] + b * b * (var[t + 1] - fp.r[t + 1]), t, "S_t")?;
        }

        Ok(SmoothedMoments { mean, var })
    }

    /// Draw one path `z_0..z_n` from `p(z_0..z_n | y, F, G, V, W, m0, C0)`.
    ///
    /// Returns
    /// -------
    /// `SSResult<Array1<f64>>`
    ///   A length-`n + 1` path; index 0 is the initial state.
    ///
    /// Errors
    /// ------
    /// - Propagates [`SSError::DegenerateVariance`] from the forward pass.
    /// - `SSError::DegenerateVariance` with quantity `"H_t"` when a
    ///   backward conditional variance collapses.
    pub fn ffbs_draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SSResult<Array1<f64>> {
        let fp = self.forward_filter()?;
        self.backward_sample(&fp, rng)
    }

    /// Backward-sampling half of FFBS, reusing a stored [`ForwardPass`].
    pub fn backward_sample<R: Rng + ?Sized>(
        &self, fp: &ForwardPass, rng: &mut R,
    ) -> SSResult<Array1<f64>> {
        let n = self.len();
        let mut z = Array1::<f64>::zeros(n + 1);
        z[n] = fp.m[n] + fp.c[n].sqrt() * draw_std_normal(rng);

        for t in (0..n).rev() {
            let b = fp.c[t] * self.g.at(t) / fp.r[t + 1];
            let h_mean = fp.m[t] + b * (z[t + 1] - fp.a[t + 1]);
            let h_var = positive(fp.c[t] * self.w / fp.r[t + 1], t, "H_t")?;
            z[t] = h_mean + h_var.sqrt() * draw_std_normal(rng);
        }

        Ok(z)
    }
}

#[inline]
fn draw_std_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

#[inline]
fn positive(value: f64, t: usize, quantity: &'static str) -> SSResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SSError::DegenerateVariance { t, quantity, value })
    }
}
