//! Elementary random draws used by the SV full conditionals.
//!
//! Purpose
//! -------
//! Keep the three non-trivial primitive samplers in one place:
//!
//! - [`truncated_normal`]: `N(mean, sd²)` restricted to `(lo, hi)`, by
//!   inverse CDF inside the body of the distribution and by exponential
//!   rejection (Robert, 1995) in far tails where the CDF saturates.
//! - [`categorical_from_log_weights`]: one index from unnormalized log
//!   weights, stable against underflow.
//! - [`inverse_gamma`]: `1 / Gamma(shape, 1/rate)`.
//!
//! Conventions
//! -----------
//! - Every function takes `&mut R where R: Rng + ?Sized`; there is no
//!   hidden RNG state.
//! - Degenerate inputs (non-finite moments, all-zero weights) are reported
//!   as numerical-degeneracy errors, never silently repaired.
use crate::volatility::errors::{SVError, SVResult};
use rand::Rng;
use rand_distr::{Distribution, Gamma, StandardNormal};
use statrs::distribution::{ContinuousCDF, Normal};

/// Standardized bound beyond which the inverse CDF loses precision.
const TAIL_SWITCH: f64 = 8.0;

/// Attempts before a rejection sampler gives up.
const MAX_REJECTIONS: usize = 100_000;

/// One standard normal draw.
#[inline]
pub fn std_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Draw from `N(mean, sd²)` truncated to `[lo, hi]`.
///
/// The result is clamped into `[lo, hi]`; callers that need an open
/// interval must check the endpoints themselves.
///
/// Errors
/// ------
/// - `SVError::DegenerateConditional` when `mean`/`sd` are not finite,
///   `sd ≤ 0`, `lo ≥ hi`, or the tail sampler fails to accept.
pub fn truncated_normal<R: Rng + ?Sized>(
    mean: f64, sd: f64, lo: f64, hi: f64, rng: &mut R,
) -> SVResult<f64> {
    if !(mean.is_finite() && sd.is_finite() && sd > 0.0) {
        return Err(SVError::DegenerateConditional { stage: "truncated normal", value: sd });
    }
    if !(lo < hi) {
        return Err(SVError::DegenerateConditional { stage: "truncated normal", value: hi - lo });
    }
    let a = (lo - mean) / sd;
    let b = (hi - mean) / sd;
    // Reflect so the interval never lies wholly in the upper tail.
    let x = if a > 0.0 { -std_truncated(-b, -a, rng)? } else { std_truncated(a, b, rng)? };
    Ok((mean + sd * x).clamp(lo, hi))
}

/// Standard normal truncated to `[a, b]` with `a ≤ 0`.
fn std_truncated<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> SVResult<f64> {
    if b < -TAIL_SWITCH {
        return Ok(-tail_rejection(-b, -a, rng)?);
    }
    let std = Normal::new(0.0, 1.0)?;
    let (pa, pb) = (std.cdf(a), std.cdf(b));
    let u: f64 = rng.random();
    let x = std.inverse_cdf(pa + u * (pb - pa));
    if x.is_nan() {
        return Err(SVError::DegenerateConditional { stage: "truncated normal", value: x });
    }
    Ok(x.clamp(a, b))
}

/// Standard normal truncated to `[c, d]` with `c > 0` large.
fn tail_rejection<R: Rng + ?Sized>(c: f64, d: f64, rng: &mut R) -> SVResult<f64> {
    let alpha = 0.5 * (c + (c * c + 4.0).sqrt());
    let narrow = d - c < 1.0 / alpha;
    for _ in 0..MAX_REJECTIONS {
        let (x, log_accept) = if narrow {
            let x = c + (d - c) * rng.random::<f64>();
            (x, -0.5 * (x * x - c * c))
        } else {
            let e: f64 = 1.0 - rng.random::<f64>();
            let x = c - e.ln() / alpha;
            (x, -0.5 * (x - alpha) * (x - alpha))
        };
        if x > d {
            continue;
        }
        let u: f64 = 1.0 - rng.random::<f64>();
        if u.ln() <= log_accept {
            return Ok(x);
        }
    }
    Err(SVError::DegenerateConditional { stage: "truncated normal tail", value: c })
}

/// Draw an index `j` with probability `∝ exp(log_weights[j])`.
///
/// Errors
/// ------
/// - `SVError::DegenerateResponsibilities { t }` when no weight is finite
///   and positive after max-subtraction.
pub fn categorical_from_log_weights<R: Rng + ?Sized>(
    log_weights: &mut [f64], t: usize, rng: &mut R,
) -> SVResult<usize> {
    let max = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(SVError::DegenerateResponsibilities { t });
    }
    let mut total = 0.0;
    for w in log_weights.iter_mut() {
        total += (*w - max).exp();
        *w = total;
    }
    if !(total.is_finite() && total > 0.0) {
        return Err(SVError::DegenerateResponsibilities { t });
    }
    let u = rng.random::<f64>() * total;
    let j = log_weights.iter().position(|&cum| u < cum).unwrap_or(log_weights.len() - 1);
    Ok(j)
}

/// Draw `v = 1 / g` with `g ~ Gamma(shape, scale = 1 / rate)`.
///
/// Errors
/// ------
/// - `SVError::InvalidGammaParam` when the gamma law cannot be formed.
/// - `SVError::DegenerateConditional` when the draw is not finite and > 0.
pub fn inverse_gamma<R: Rng + ?Sized>(shape: f64, rate: f64, rng: &mut R) -> SVResult<f64> {
    if !(shape.is_finite() && shape > 0.0 && rate.is_finite() && rate > 0.0) {
        return Err(SVError::InvalidGammaParam { shape, rate });
    }
    let gamma =
        Gamma::new(shape, 1.0 / rate).map_err(|_| SVError::InvalidGammaParam { shape, rate })?;
    let v = 1.0 / gamma.sample(rng);
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(SVError::DegenerateConditional { stage: "v", value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Support and first moment of the truncated normal in the body and in
    //   both far tails.
    // - Frequencies of the categorical draw and zero-weight exclusion.
    // - The mean of the inverse-gamma draw.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Draws stay in [lo, hi] and match the analytic truncated mean.
    //
    // Given
    // -----
    // - N(0.5, 0.3²) truncated to (0, 1); 20 000 draws.
    //
    // Expect
    // ------
    // - Sample mean within 0.01 of 0.5 (symmetric truncation).
    fn truncated_normal_body_matches_mean() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;

        // Act
        let draws: Vec<f64> =
            (0..n).map(|_| truncated_normal(0.5, 0.3, 0.0, 1.0, &mut rng).unwrap()).collect();

        // Assert
        assert!(draws.iter().all(|&x| (0.0..=1.0).contains(&x)));
        let mean = draws.iter().sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean {mean}");
    }

    #[test]
    // Purpose
    // -------
    // When the untruncated mean is far outside the interval, draws pile up
    // against the nearer bound without leaving the interval.
    //
    // Given
    // -----
    // - N(1.5, 0.01²) on (0, 1): standardized interval (−150, −50).
    // - N(−2, 0.05²) on (0, 1): standardized interval (40, 60).
    //
    // Expect
    // ------
    // - All draws inside [0, 1], within 0.05 of the near bound.
    fn truncated_normal_far_tails_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..2000 {
            let hi_side = truncated_normal(1.5, 0.01, 0.0, 1.0, &mut rng).unwrap();
            let lo_side = truncated_normal(-2.0, 0.05, 0.0, 1.0, &mut rng).unwrap();
            assert!((0.95..=1.0).contains(&hi_side), "{hi_side}");
            assert!((0.0..=0.05).contains(&lo_side), "{lo_side}");
        }
        assert!(truncated_normal(0.0, 0.0, 0.0, 1.0, &mut rng).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Empirical frequencies match normalized weights, zero weights are
    // never drawn, and all −∞ weights are degenerate.
    fn categorical_matches_weights() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(9);
        let probs = [0.2, 0.0, 0.5, 0.3];
        let n = 50_000;
        let mut counts = [0usize; 4];

        // Act
        for _ in 0..n {
            let mut lw: Vec<f64> = probs.iter().map(|p: &f64| p.ln() - 700.0).collect();
            counts[categorical_from_log_weights(&mut lw, 0, &mut rng).unwrap()] += 1;
        }

        // Assert
        assert_eq!(counts[1], 0);
        for (c, p) in counts.iter().zip(probs) {
            assert!((*c as f64 / n as f64 - p).abs() < 0.01);
        }
        let mut dead = vec![f64::NEG_INFINITY; 3];
        assert_eq!(
            categorical_from_log_weights(&mut dead, 4, &mut rng),
            Err(SVError::DegenerateResponsibilities { t: 4 })
        );
    }

    #[test]
    // Purpose
    // -------
    // E[1/g] = rate / (shape − 1) for g ~ Gamma(shape, 1/rate).
    fn inverse_gamma_mean_matches_closed_form() {
        let mut rng = StdRng::seed_from_u64(21);
        let (shape, rate) = (12.0, 0.22);
        let n = 40_000;
        let mean = (0..n).map(|_| inverse_gamma(shape, rate, &mut rng).unwrap()).sum::<f64>()
            / n as f64;
        let expected = rate / (shape - 1.0);
        assert!((mean / expected - 1.0).abs() < 0.02, "mean {mean} vs {expected}");
        let bad = inverse_gamma(0.0, 1.0, &mut rng);
        assert!(matches!(bad, Err(SVError::InvalidGammaParam { .. })));
    }
}
