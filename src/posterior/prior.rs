//! Log-prior capability.
//!
//! A `PosteriorModel` holds one `Prior` behind an `Arc`, so a different prior can
//! be plugged in without touching the likelihood or the sampler. Plain closures
//! `Fn(&Theta) -> f64` are priors too.

use crate::domain::{ParamIndex, PriorKind, Theta};

/// Log prior density, up to an additive constant.
///
/// Returning `f64::NEG_INFINITY` marks `θ` as impossible.
pub trait Prior: Send + Sync {
    fn log_prior(&self, theta: &Theta) -> f64;
}

impl<F> Prior for F
where
    F: Fn(&Theta) -> f64 + Send + Sync,
{
    fn log_prior(&self, theta: &Theta) -> f64 {
        self(theta)
    }
}

/// Improper flat prior: log-prior is 0 everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPrior;

impl Prior for FlatPrior {
    fn log_prior(&self, _theta: &Theta) -> f64 {
        0.0
    }
}

/// Flat prior restricted to strictly positive peak widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveWidths;

impl Prior for PositiveWidths {
    fn log_prior(&self, theta: &Theta) -> f64 {
        if theta[ParamIndex::W1] > 0.0 && theta[ParamIndex::W2] > 0.0 {
            0.0
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Build the prior selected on the command line.
pub fn prior_for(kind: PriorKind) -> std::sync::Arc<dyn Prior> {
    match kind {
        PriorKind::Flat => std::sync::Arc::new(FlatPrior),
        PriorKind::PositiveWidths => std::sync::Arc::new(PositiveWidths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_prior_is_zero_everywhere() {
        let t = Theta::new(-5.0, 0.0, 1e9, -1.0, 0.0, 0.0);
        assert_eq!(FlatPrior.log_prior(&t), 0.0);
    }

    #[test]
    fn positive_widths_rejects_zero_width() {
        let ok = Theta::new(1.0, 0.5, 1.0, 0.5, 0.0, 0.0);
        let zero = Theta::new(1.0, 0.0, 1.0, 0.5, 0.0, 0.0);
        let neg = Theta::new(1.0, 0.5, 1.0, -0.5, 0.0, 0.0);
        assert_eq!(PositiveWidths.log_prior(&ok), 0.0);
        assert_eq!(PositiveWidths.log_prior(&zero), f64::NEG_INFINITY);
        assert_eq!(PositiveWidths.log_prior(&neg), f64::NEG_INFINITY);
    }

    #[test]
    fn closures_are_priors() {
        let gaussian_on_a1 = |t: &Theta| -0.5 * (t[ParamIndex::A1] / 100.0).powi(2);
        let t = Theta::new(100.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert!((gaussian_on_a1.log_prior(&t) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn prior_for_kind() {
        let t = Theta::new(1.0, -1.0, 1.0, 1.0, 0.0, 0.0);
        assert_eq!(prior_for(PriorKind::Flat).log_prior(&t), 0.0);
        assert_eq!(prior_for(PriorKind::PositiveWidths).log_prior(&t), f64::NEG_INFINITY);
    }
}
