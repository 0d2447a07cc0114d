//! statespace::linalg — `ndarray` ↔ `nalgebra` bridge for covariance algebra.
//!
//! Purpose
//! -------
//! The filters store their moments as `ndarray` containers, but Cholesky
//! factorizations and symmetric inverses are taken from `nalgebra`. This
//! module owns the copy between the two representations and the handful of
//! SPD operations the DLM recursions need.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs to [`spd_inverse`] and [`is_positive_definite`] are square.
//!   Symmetry is not checked; the lower triangle is what Cholesky reads.
//! - Outputs of [`spd_inverse`] are re-symmetrized to suppress round-off
//!   drift across long recursions.
use crate::statespace::errors::{SSError, SSResult};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Copy a square `ndarray` matrix into a freshly allocated `DMatrix`.
///
/// The copy walks columns to match `DMatrix`'s column-major storage.
pub fn fill_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = m.dim();
    let mut out = DMatrix::<f64>::zeros(nrows, ncols);
    for j in 0..ncols {
        for i in 0..nrows {
            out[(i, j)] = m[[i, j]];
        }
    }
    out
}

/// Copy a `DMatrix` back into an `ndarray` matrix.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Return `(m + mᵀ) / 2`.
pub fn symmetrize(m: &Array2<f64>) -> Array2<f64> {
    0.5 * (m + &m.t())
}

/// `true` when `m` admits a Cholesky factorization with a strictly positive,
/// finite diagonal.
pub fn is_positive_definite(m: &Array2<f64>) -> bool {
    if m.nrows() == 0 || m.nrows() != m.ncols() || m.iter().any(|v| !v.is_finite()) {
        return false;
    }
    match fill_dmatrix(m).cholesky() {
        Some(chol) => chol.l().diagonal().iter().all(|d| d.is_finite() && *d > 0.0),
        None => false,
    }
}

/// Inverse of a symmetric positive definite matrix via Cholesky.
///
/// Errors
/// ------
/// - `SSError::SingularStateCovariance { t }` when the factorization fails;
///   `t` is the caller's time index and is only used for diagnostics.
pub fn spd_inverse(m: &Array2<f64>, t: usize) -> SSResult<Array2<f64>> {
    let chol = fill_dmatrix(m).cholesky().ok_or(SSError::SingularStateCovariance { t })?;
    let inv = to_array2(&chol.inverse());
    if inv.iter().any(|v| !v.is_finite()) {
        return Err(SSError::SingularStateCovariance { t });
    }
    Ok(symmetrize(&inv))
}
