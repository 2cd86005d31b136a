//! Gaussian kernel density estimate for one-dimensional marginals.
//!
//! Bandwidth rules:
//! - Silverman: `0.9 · min(sd, IQR/1.34) · n^(-1/5)` (general use)
//! - Terrell oversmoothed: `1.144 · sd · n^(-1/5)`, the widest bandwidth consistent
//!   with the data's spread; used when the marginal is known to be unimodal

use std::f64::consts::PI;

use crate::error::AppError;
use crate::math::{quantile_sorted, sorted_copy, std_dev};
use crate::sampler::DensityEstimator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bandwidth {
    Silverman,
    Oversmoothed,
}

#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    pub fn new(samples: Vec<f64>, rule: Bandwidth) -> Result<Self, AppError> {
        if samples.len() < 2 {
            return Err(AppError::sampling("Density estimate needs at least 2 samples."));
        }
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(AppError::sampling("Density estimate samples must be finite."));
        }

        let n = samples.len() as f64;
        let sd = std_dev(&samples);
        let raw = match rule {
            Bandwidth::Silverman => {
                let sorted = sorted_copy(&samples);
                let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
                let spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };
                0.9 * spread * n.powf(-0.2)
            }
            Bandwidth::Oversmoothed => 1.144 * sd * n.powf(-0.2),
        };
        // Constant samples: fall back to a narrow kernel around the value.
        let bandwidth = if raw > 0.0 {
            raw
        } else {
            1e-6 * samples[0].abs().max(1.0)
        };

        Ok(Self { samples, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

impl DensityEstimator for GaussianKde {
    fn density(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.samples.len() as f64 * h * (2.0 * PI).sqrt());
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let z = (x - s) / h;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * sum
    }
}
