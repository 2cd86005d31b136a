//! Forward model for the two-line spectrum.
//!
//! `y(x) = A1·L(x; c1, w1) + A2·L(x; c2, w2) + background(x)`
//!
//! where `L` is the unit-area Lorentzian and the background is a straight line
//! pinned to `b0` at `min(x)` and `b1` at `max(x)` of the *evaluated* sequence.
//!
//! The fitter and the posterior rely on two primitive operations:
//! - predict `y` for a whole x-sequence given `θ` (likelihood, envelopes, exports)
//! - build a design row for the linear parameters at fixed widths (start-point fit)

use crate::domain::{LineCenters, Theta};
use crate::error::AppError;
use crate::math::{background_weight, lorentzian, min_max, pinned_background};

/// Number of parameters that enter the model linearly: `A1, A2, b0, b1`.
pub const LINEAR_PARAMS: usize = 4;

/// Range used to pin the background.
///
/// Fails when `x` has fewer than two distinct values, because the background
/// slope is undefined there.
pub fn background_range(x: &[f64]) -> Result<(f64, f64), AppError> {
    let Some((x_min, x_max)) = min_max(x) else {
        return Err(AppError::domain("Forward model needs at least two distinct x values, got none."));
    };
    if !(x_min.is_finite() && x_max.is_finite()) {
        return Err(AppError::domain("Forward model x values must be finite."));
    }
    if x_max <= x_min {
        return Err(AppError::domain(format!(
            "Forward model needs at least two distinct x values (all x = {x_min})."
        )));
    }
    Ok((x_min, x_max))
}

/// Predict `y(x)` for every x in the sequence.
pub fn forward_model(x: &[f64], theta: &Theta, centers: &LineCenters) -> Result<Vec<f64>, AppError> {
    let (x_min, x_max) = background_range(x)?;
    Ok(x.iter()
        .map(|&xi| predict(xi, theta, centers, x_min, x_max))
        .collect())
}

/// Predict `y(x)` at a single point given an already validated background range.
pub fn predict(x: f64, theta: &Theta, centers: &LineCenters, x_min: f64, x_max: f64) -> f64 {
    let [a1, w1, a2, w2, b0, b1] = theta.0;
    let peak_1 = a1 * lorentzian(x, centers.c1, w1);
    let peak_2 = a2 * lorentzian(x, centers.c2, w2);
    peak_1 + peak_2 + pinned_background(x, x_min, x_max, b0, b1)
}

/// Fill a design row for the linear parameters `[A1, A2, b0, b1]` at fixed widths.
pub fn fill_design_row(
    x: f64,
    w1: f64,
    w2: f64,
    centers: &LineCenters,
    x_min: f64,
    x_max: f64,
    out: &mut [f64; LINEAR_PARAMS],
) {
    let u = background_weight(x, x_min, x_max);
    out[0] = lorentzian(x, centers.c1, w1);
    out[1] = lorentzian(x, centers.c2, w2);
    out[2] = 1.0 - u;
    out[3] = u;
}

/// Reassemble a full parameter vector from widths and linear coefficients.
pub fn theta_from_linear(w1: f64, w2: f64, linear: &[f64; LINEAR_PARAMS]) -> Theta {
    Theta::new(linear[0], w1, linear[1], w2, linear[2], linear[3])
}
