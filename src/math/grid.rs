//! Evaluation-grid helpers.

use crate::error::AppError;

/// `n` evenly spaced points between `start` and `end` (both included).
///
/// The last point is set to `end` exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::config(format!(
            "Invalid log-space range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::config("Log-space steps must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    Ok((0..steps).map(|i| (ln_min + step * i as f64).exp()).collect())
}

/// `(min, max)` of a slice, or `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
