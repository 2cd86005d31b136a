//! Weighted least squares solver.
//!
//! For fixed peak widths the spectral model is linear in `(A1, A2, b0, b1)`:
//!
//! ```text
//! minimize Σ ((y_i - x_i^T β) / σ_i)^2
//! ```
//!
//! Callers scale each row by `1/σ_i` and hand us an ordinary least squares
//! problem. SVD handles the tall design matrix (many points, four columns) and
//! survives near-collinear columns, which happen when a very wide peak looks
//! like background.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_overdetermined_noisy_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.1, 2.9, 5.1, 6.9];
        let mut x = DMatrix::zeros(4, 2);
        for (i, &v) in xs.iter().enumerate() {
            x[(i, 0)] = 1.0;
            x[(i, 1)] = v;
        }
        let beta = solve_least_squares(&x, &DVector::from_row_slice(&ys)).unwrap();
        assert!((beta[1] - 1.96).abs() < 1e-9, "slope={}", beta[1]);
    }
}
