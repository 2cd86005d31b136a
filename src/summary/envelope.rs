//! Prediction-space summaries.
//!
//! The credible envelope is pointwise: at each grid x it spans the min and max
//! prediction over the supplied draws. It bounds the marginal spread of `ŷ(x)`
//! at every x separately and is not a simultaneous band.

use crate::domain::{EnvelopeGrid, Theta};
use crate::error::AppError;
use crate::posterior::PosteriorModel;

/// Pointwise lower/upper bounds on a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Envelope {
    /// Whether `curve` lies inside the envelope at every grid point.
    pub fn contains(&self, curve: &[f64]) -> bool {
        curve.len() == self.lower.len()
            && curve
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&y, (&lo, &hi))| lo <= y && y <= hi)
    }

    /// Pair with the grid and mode curve for export.
    pub fn into_grid(self, x: Vec<f64>, mode: Vec<f64>) -> EnvelopeGrid {
        EnvelopeGrid {
            x,
            lower: self.lower,
            upper: self.upper,
            mode,
        }
    }
}

/// Min/max of `model.forward_model(grid, θ)` over every `θ` in `subset`.
///
/// A `NaN` prediction (e.g. from a zero width) makes both bounds `NaN` at that
/// grid point, so a degenerate draw is never hidden by the others.
pub fn credible_envelope(
    model: &PosteriorModel,
    subset: &[Theta],
    grid: &[f64],
) -> Result<Envelope, AppError> {
    let Some((first, rest)) = subset.split_first() else {
        return Err(AppError::sampling("Credible envelope needs at least one draw."));
    };

    let curve = model.forward_model(grid, first)?;
    let mut lower = curve.clone();
    let mut upper = curve;

    for theta in rest {
        let curve = model.forward_model(grid, theta)?;
        for ((lo, hi), y) in lower.iter_mut().zip(upper.iter_mut()).zip(curve) {
            if y.is_nan() || lo.is_nan() {
                *lo = f64::NAN;
            } else {
                *lo = lo.min(y);
            }
            if y.is_nan() || hi.is_nan() {
                *hi = f64::NAN;
            } else {
                *hi = hi.max(y);
            }
        }
    }

    Ok(Envelope { lower, upper })
}

/// Prediction of the single most probable draw.
pub fn mode_curve(model: &PosteriorModel, mode_theta: &Theta, grid: &[f64]) -> Result<Vec<f64>, AppError> {
    model.forward_model(grid, mode_theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::linspace;

    fn model() -> PosteriorModel {
        PosteriorModel::unbound(linspace(410.0, 440.0, 35)).unwrap()
    }

    fn draws() -> Vec<Theta> {
        vec![
            Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0),
            Theta::new(900.0, 2.2, 450.0, 1.4, 33.0, 27.0),
            Theta::new(1100.0, 1.8, 380.0, 1.6, 36.0, 24.0),
        ]
    }

    #[test]
    fn bounds_are_ordered() {
        let grid = linspace(410.0, 440.0, 500);
        let env = credible_envelope(&model(), &draws(), &grid).unwrap();
        assert_eq!(env.lower.len(), 500);
        assert!(env.lower.iter().zip(&env.upper).all(|(lo, hi)| lo <= hi));
    }

    #[test]
    fn every_member_curve_is_inside() {
        let m = model();
        let grid = linspace(410.0, 440.0, 200);
        let env = credible_envelope(&m, &draws(), &grid).unwrap();
        for theta in draws() {
            assert!(env.contains(&mode_curve(&m, &theta, &grid).unwrap()));
        }
    }

    #[test]
    fn mode_outside_subset_may_escape() {
        let m = model();
        let grid = linspace(410.0, 440.0, 200);
        let env = credible_envelope(&m, &draws(), &grid).unwrap();
        let outsider = Theta::new(5000.0, 2.0, 400.0, 1.5, 35.0, 25.0);
        assert!(!env.contains(&mode_curve(&m, &outsider, &grid).unwrap()));
    }

    #[test]
    fn single_draw_collapses_envelope() {
        let grid = linspace(410.0, 440.0, 50);
        let env = credible_envelope(&model(), &draws()[..1], &grid).unwrap();
        assert_eq!(env.lower, env.upper);
    }

    #[test]
    fn zero_width_draw_poisons_the_bounds() {
        let grid = linspace(410.0, 440.0, 5);
        let mut degenerate = draws()[0];
        degenerate.0[1] = 0.0;
        let curve = mode_curve(&model(), &degenerate, &grid).unwrap();
        assert!(curve.iter().all(|v| v.is_nan()));

        for subset in [vec![draws()[0], degenerate], vec![degenerate, draws()[0]]] {
            let env = credible_envelope(&model(), &subset, &grid).unwrap();
            assert!(env.lower.iter().all(|v| v.is_nan()), "lower={:?}", env.lower);
            assert!(env.upper.iter().all(|v| v.is_nan()), "upper={:?}", env.upper);
        }
    }

    #[test]
    fn empty_subset_is_an_error() {
        let err = credible_envelope(&model(), &[], &[410.0, 440.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Sampling);
    }

    #[test]
    fn degenerate_grid_is_an_error() {
        let err = credible_envelope(&model(), &draws(), &[422.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomainInput);
    }
}
