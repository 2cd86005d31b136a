//! Width grid generation.
//!
//! The start-point fit searches the two peak widths over a deterministic grid
//! and solves the linear parameters exactly at every node. With only two
//! nonlinear parameters a modest grid is fast and sidesteps local minima.

use crate::error::AppError;
use crate::math::log_space;

/// All `(w1, w2)` pairs from a log-spaced axis shared by both peaks.
pub fn width_grid(min: f64, max: f64, steps: usize) -> Result<Vec<(f64, f64)>, AppError> {
    let values = log_space(min, max, steps)?;
    let mut out = Vec::with_capacity(values.len() * values.len());
    for &w1 in &values {
        for &w2 in &values {
            out.push((w1, w2));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_full_cartesian_product() {
        let grid = width_grid(0.5, 5.0, 4).unwrap();
        assert_eq!(grid.len(), 16);
        assert!((grid[0].0 - 0.5).abs() < 1e-12);
        assert!((grid[15].1 - 5.0).abs() < 1e-12);
        assert!(grid.iter().all(|&(a, b)| a > 0.0 && b > 0.0));
    }

    #[test]
    fn grid_rejects_non_positive_min() {
        assert!(width_grid(0.0, 5.0, 4).is_err());
    }
}
