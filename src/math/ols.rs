//! Least squares solver.
//!
//! The default forecaster fits one small linear regression per instrument
//! (`ln p(t+1)` on an intercept and `ln p(t)`), so the solver only ever sees
//! tall two-column systems.
//!
//! Implementation choices:
//! - SVD solve rather than QR: nalgebra's `QR::solve` is intended for square
//!   systems and will panic on a tall design matrix.
//! - Near-flat price histories make the two columns almost collinear, so we
//!   retry with progressively looser tolerances before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
