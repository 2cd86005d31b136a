//! Least-squares starting point for the chain.
//!
//! Given:
//! - wavelengths `x_i`, intensities `y_i`, errors `σ_i`
//! - a list of candidate `(w1, w2)` pairs
//!
//! we solve, for each pair:
//! - an inverse-variance weighted OLS problem for `(A1, A2, b0, b1)`
//! - the resulting χ²
//!
//! and return the best (lowest χ²) candidate.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::debug;

use crate::domain::{LineCenters, ObservationSet, Theta};
use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::{LINEAR_PARAMS, background_range, fill_design_row, predict, theta_from_linear};

/// Best least-squares fit over the width grid.
#[derive(Debug, Clone)]
pub struct StartFit {
    pub theta: Theta,
    pub chi2: f64,
    /// χ² per degree of freedom (`n - 6`); `NaN` when `n <= 6`.
    pub reduced_chi2: f64,
    pub candidates: usize,
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    theta: Theta,
    chi2: f64,
}

/// Fit the linear parameters at every grid node and keep the best.
pub fn fit_start(
    observations: &ObservationSet,
    centers: &LineCenters,
    grid: &[(f64, f64)],
) -> Result<StartFit, AppError> {
    if observations.is_empty() {
        return Err(AppError::domain("No observations to fit."));
    }
    if grid.is_empty() {
        return Err(AppError::config("Width grid is empty."));
    }

    let x_range = background_range(observations.x())?;

    // Evaluate each width pair independently (parallel).
    let candidates: Vec<Candidate> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &(w1, w2))| {
            evaluate_candidate(observations, centers, x_range, w1, w2)
                .map(|(theta, chi2)| Candidate { idx, theta, chi2 })
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::domain("No valid least-squares candidates on the width grid."));
    }

    // Deterministic selection: pick the minimum χ²; break ties by original grid index.
    let mut best = &candidates[0];
    for c in &candidates[1..] {
        if c.chi2 < best.chi2 || (c.chi2 == best.chi2 && c.idx < best.idx) {
            best = c;
        }
    }

    let n = observations.len();
    let dof = n as f64 - 6.0;
    let reduced_chi2 = if dof > 0.0 { best.chi2 / dof } else { f64::NAN };
    debug!(
        candidates = candidates.len(),
        chi2 = best.chi2,
        theta = %best.theta,
        "least-squares start selected"
    );

    Ok(StartFit {
        theta: best.theta,
        chi2: best.chi2,
        reduced_chi2,
        candidates: candidates.len(),
    })
}

fn evaluate_candidate(
    observations: &ObservationSet,
    centers: &LineCenters,
    (x_min, x_max): (f64, f64),
    w1: f64,
    w2: f64,
) -> Option<(Theta, f64)> {
    if !(w1.is_finite() && w2.is_finite() && w1 > 0.0 && w2 > 0.0) {
        return None;
    }

    let n = observations.len();
    let mut xw = DMatrix::<f64>::zeros(n, LINEAR_PARAMS);
    let mut yw = DVector::<f64>::zeros(n);
    let mut row = [0.0; LINEAR_PARAMS];

    for (i, (x, y, sigma)) in observations.rows().enumerate() {
        fill_design_row(x, w1, w2, centers, x_min, x_max, &mut row);
        let inv = 1.0 / sigma;
        for j in 0..LINEAR_PARAMS {
            xw[(i, j)] = row[j] * inv;
        }
        yw[i] = y * inv;
    }

    let beta = solve_least_squares(&xw, &yw)?;
    let linear = [beta[0], beta[1], beta[2], beta[3]];
    let theta = theta_from_linear(w1, w2, &linear);

    let chi2: f64 = observations
        .rows()
        .map(|(x, y, sigma)| {
            let r = (y - predict(x, &theta, centers, x_min, x_max)) / sigma;
            r * r
        })
        .sum();

    chi2.is_finite().then_some((theta, chi2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::width_grid;
    use crate::math::linspace;
    use crate::models::forward_model;

    #[test]
    fn recovers_truth_on_noiseless_data_when_widths_on_grid() {
        let truth = Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0);
        let centers = LineCenters::default();
        let x = linspace(410.0, 440.0, 35);
        let y = forward_model(&x, &truth, &centers).unwrap();
        let sigma = vec![1.0; x.len()];
        let obs = ObservationSet::new(x, y, sigma).unwrap();

        let grid = vec![(1.0, 1.0), (2.0, 1.5), (1.5, 2.0), (3.0, 3.0)];
        let fit = fit_start(&obs, &centers, &grid).unwrap();
        for (got, want) in fit.theta.0.iter().zip(truth.0) {
            assert!((got - want).abs() < 1e-6, "got {got} want {want}");
        }
        assert!(fit.chi2 < 1e-12);
        assert_eq!(fit.candidates, 4);
    }

    #[test]
    fn finds_a_sensible_start_on_a_log_grid() {
        let truth = Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0);
        let centers = LineCenters::default();
        let x = linspace(410.0, 440.0, 35);
        let y = forward_model(&x, &truth, &centers).unwrap();
        let obs = ObservationSet::new(x, y, vec![5.0; 35]).unwrap();

        let grid = width_grid(0.2, 10.0, 40).unwrap();
        let fit = fit_start(&obs, &centers, &grid).unwrap();
        assert!((fit.theta.0[1] - 2.0).abs() < 0.25, "w1={}", fit.theta.0[1]);
        assert!((fit.theta.0[3] - 1.5).abs() < 0.25, "w2={}", fit.theta.0[3]);
        assert!(fit.reduced_chi2.is_finite());
    }

    #[test]
    fn empty_grid_is_an_error() {
        let obs = ObservationSet::new(vec![1.0, 2.0], vec![1.0, 1.0], vec![1.0, 1.0]).unwrap();
        assert!(fit_start(&obs, &LineCenters::default(), &[]).is_err());
    }
}
