//! Backward smoothing for a filtered discount DLM.
//!
//! Runs the retrospective recursion over the stored [`DLMFit`] snapshots and
//! returns a separate sequence; the filter output itself is never touched.
//! With unknown observation variance the smoothed covariances are rescaled
//! to the final estimate `s_n`, so every smoothed moment conditions on the
//! full sample.
use crate::statespace::{
    dlm::filter::{DLMFit, positive},
    errors::SSResult,
    linalg::{spd_inverse, symmetrize},
};
use ndarray::{Array1, Array2, Axis};

/// Smoothed moments of `θ_t` given `y_1..y_n`.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedState {
    pub mean: Array1<f64>,
    pub cov: Array2<f64>,
}

impl DLMFit {
    /// Retrospective moments `θ_t | y_1..y_n` for `t = 0..=n`.
    ///
    /// Recursion, for `t = n − 1, …, 0`:
    ///
    /// ```text
    /// B_t   = C_t Gᵀ R_{t+1}⁻¹
    /// m̃_t  = m_t + B_t (m̃_{t+1} − a_{t+1})
    /// C̃_t  = (s_n / s_t) [C_t − B_t (R_{t+1} − (s_t / s_n) C̃_{t+1}) B_tᵀ]
    /// ```
    ///
    /// Errors
    /// ------
    /// - `SSError::SingularStateCovariance { t }` when `R_{t+1}` cannot be
    ///   inverted.
    /// - `SSError::DegenerateVariance` when a smoothed variance is not
    ///   finite and strictly positive.
    pub fn smooth(&self) -> SSResult<Vec<SmoothedState>> {
        let n = self.len();
        let s_n = self.final_state().scale;

        let last = self.final_state();
        let mut next = SmoothedState { mean: last.mean.clone(), cov: last.cov.clone() };
        let mut out = Vec::with_capacity(n + 1);
        out.push(next.clone());

        for t in (0..n).rev() {
            let current = self.filtered(t);
            let ahead = &self.steps[t].forecast;

            let r_inv = spd_inverse(&ahead.state_cov, t + 1)?;
            let b = current.cov.dot(&self.g.t()).dot(&r_inv);

            let mean = &current.mean + &b.dot(&(&next.mean - &ahead.state_mean));
            let ratio = current.scale / s_n;
            let inner = &ahead.state_cov - &(&next.cov * ratio);
            let cov = symmetrize(&((&current.cov - &b.dot(&inner).dot(&b.t())) / ratio));
            for &c in cov.diag() {
                positive(c, t, "smoothed C_t")?;
            }

            next = SmoothedState { mean, cov };
            out.push(next.clone());
        }

        out.reverse();
        Ok(out)
    }

    /// Smoothed means stacked as an `(n + 1) × k` matrix.
    pub fn smoothed_means(&self) -> SSResult<Array2<f64>> {
        let smoothed = self.smooth()?;
        let k = self.prior.mean.len();
        let mut out = Array2::<f64>::zeros((smoothed.len(), k));
        for (mut row, s) in out.axis_iter_mut(Axis(0)).zip(&smoothed) {
            row.assign(&s.mean);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::statespace::dlm::{DLMPrior, DLMSpec, DiscountDLM, DiscountFactors};
    use ndarray::{Array2, array};

    #[test]
    // Purpose
    // -------
    // With no discounting on a local level, the state is static, so every
    // smoothed mean equals the final filtered mean.
    //
    // Given
    // -----
    // - y = [1.0, 1.2, 0.8, 1.1], F = G = 1, δ = β = 1.
    //
    // Expect
    // ------
    // - m̃_t = m_n for all t, and the final smoothed state equals the
    //   final filtered state.
    fn static_level_smooths_to_final_posterior() {
        // Arrange
        let y = array![1.0, 1.2, 0.8, 1.1];
        let prior = DLMPrior::new(array![0.0], array![[1.0]], 1.0, 1.0).unwrap();
        let spec = DLMSpec::new(
            Array2::ones((4, 1)),
            array![[1.0]],
            prior,
            DiscountFactors::new(1.0, 1.0).unwrap(),
        )
        .unwrap();
        let fit = DiscountDLM::new(y, spec).unwrap().filter().unwrap();

        // Act
        let smoothed = fit.smooth().unwrap();

        // Assert
        assert_eq!(smoothed.len(), 5);
        let m_n = fit.final_state().mean[0];
        let c_n = fit.final_state().cov[[0, 0]];
        for s in &smoothed {
            assert!((s.mean[0] - m_n).abs() < 1e-10);
            assert!((s.cov[[0, 0]] - c_n).abs() < 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // With discounting, smoothed variances never exceed their filtered
    // counterparts once both are put on the final variance scale.
    fn smoothing_reduces_rescaled_uncertainty() {
        // Arrange
        let y = array![0.5, 1.5, 0.7, 1.9, 1.2, 0.4];
        let prior = DLMPrior::new(array![0.0], array![[2.0]], 2.0, 1.0).unwrap();
        let spec = DLMSpec::new(
            Array2::ones((6, 1)),
            array![[1.0]],
            prior,
            DiscountFactors::new(0.8, 1.0).unwrap(),
        )
        .unwrap();
        let fit = DiscountDLM::new(y, spec).unwrap().filter().unwrap();
        let s_n = fit.final_state().scale;

        // Act
        let smoothed = fit.smooth().unwrap();

        // Assert
        for (t, s) in smoothed.iter().enumerate() {
            let f = fit.filtered(t);
            let filtered_rescaled = f.cov[[0, 0]] * s_n / f.scale;
            assert!(s.cov[[0, 0]] <= filtered_rescaled + 1e-12, "t = {t}");
            assert!(s.cov[[0, 0]] > 0.0);
        }
    }
}
