//! Line-shape primitives for the spectral model.
//!
//! - `lorentzian(x, c, w)`: unit-area Cauchy profile centred at `c` with half-width `w`
//! - `pinned_background(x, x_min, x_max, b0, b1)`: straight line through
//!   `(x_min, b0)` and `(x_max, b1)`
//!
//! Numerical notes:
//! - No guard on `w`. A width at or near zero gives a huge (or NaN when exactly
//!   zero and `x != c`) value, and callers see that value unchanged.
//! - The background is written as an interpolation `b0·(1-u) + b1·u` so that it
//!   reproduces `b0` and `b1` exactly at the range ends.

use std::f64::consts::PI;

/// Unit-area Lorentzian evaluated at `x`.
pub fn lorentzian(x: f64, center: f64, width: f64) -> f64 {
    let z = (x - center) / width;
    (1.0 / (PI * width)) / (1.0 + z * z)
}

/// Linear background pinned to `b0` at `x_min` and `b1` at `x_max`.
///
/// Requires `x_max > x_min`; the caller checks this once per x-sequence.
pub fn pinned_background(x: f64, x_min: f64, x_max: f64, b0: f64, b1: f64) -> f64 {
    let u = background_weight(x, x_min, x_max);
    b0 * (1.0 - u) + b1 * u
}

/// Interpolation weight of `b1` at `x` (0 at `x_min`, 1 at `x_max`).
pub fn background_weight(x: f64, x_min: f64, x_max: f64) -> f64 {
    (x - x_min) / (x_max - x_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lorentzian_peaks_at_center() {
        let at = lorentzian(422.0, 422.0, 2.0);
        assert!((at - 1.0 / (PI * 2.0)).abs() < 1e-15);
        assert!(lorentzian(421.0, 422.0, 2.0) < at);
        assert!(lorentzian(423.0, 422.0, 2.0) < at);
    }

    #[test]
    fn lorentzian_area_is_close_to_one() {
        // Trapezoid over a wide window; tails beyond ±5000w carry ~1e-4 of the mass.
        let (c, w) = (0.0, 1.5);
        let n = 2_000_000;
        let (lo, hi) = (-7500.0, 7500.0);
        let h = (hi - lo) / n as f64;
        let mut area = 0.5 * (lorentzian(lo, c, w) + lorentzian(hi, c, w));
        for i in 1..n {
            area += lorentzian(lo + h * i as f64, c, w);
        }
        area *= h;
        assert!((area - 1.0).abs() < 1e-3, "area={area}");
    }

    #[test]
    fn background_hits_both_ends_exactly() {
        let (x0, x1) = (410.0, 440.0);
        assert_eq!(pinned_background(x0, x0, x1, 35.0, 25.0), 35.0);
        assert_eq!(pinned_background(x1, x0, x1, 35.0, 25.0), 25.0);
        let mid = pinned_background(425.0, x0, x1, 35.0, 25.0);
        assert!((mid - 30.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_width_stays_finite_off_center() {
        let v = lorentzian(430.0, 422.0, 1e-9);
        assert!(v.is_finite());
        assert!(v > 0.0);
    }
}
