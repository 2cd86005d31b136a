//! Sampler-side contracts.
//!
//! The summaries only ever talk to a sampler through `Sampler` and to a density
//! estimate through `DensityEstimator`. `MetropolisChain` and `GaussianKde` are
//! small reference implementations so the pipeline runs end to end; any other
//! engine can be dropped in behind the same traits.

pub mod kde;
pub mod metropolis;

pub use kde::*;
pub use metropolis::*;

use crate::domain::{ParamIndex, Theta};
use crate::error::AppError;

/// A probability density estimated from samples.
pub trait DensityEstimator: Send + Sync {
    /// Density at a single point.
    fn density(&self, x: f64) -> f64;

    /// Density at every point of `grid`.
    fn evaluate(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&x| self.density(x)).collect()
    }
}

/// Parameter draws with their log-probabilities, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosteriorSample {
    pub thetas: Vec<Theta>,
    pub log_probs: Vec<f64>,
}

impl PosteriorSample {
    pub fn new(thetas: Vec<Theta>, log_probs: Vec<f64>) -> Result<Self, AppError> {
        if thetas.len() != log_probs.len() {
            return Err(AppError::sampling(format!(
                "Sample has {} draws but {} log-probabilities.",
                thetas.len(),
                log_probs.len()
            )));
        }
        Ok(Self { thetas, log_probs })
    }

    /// Draws without log-probabilities (filled with `NaN`).
    pub fn from_thetas(thetas: Vec<Theta>) -> Self {
        let log_probs = vec![f64::NAN; thetas.len()];
        Self { thetas, log_probs }
    }

    pub fn len(&self) -> usize {
        self.thetas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thetas.is_empty()
    }

    /// All values of one parameter, in draw order.
    pub fn parameter(&self, param: ParamIndex) -> Vec<f64> {
        self.thetas.iter().map(|t| t.get(param)).collect()
    }

    /// Highest log-probability draw; ties keep the earliest.
    pub fn mode(&self) -> Option<(Theta, f64)> {
        let mut best: Option<(Theta, f64)> = None;
        for (theta, &lp) in self.thetas.iter().zip(&self.log_probs) {
            if lp.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, b)| lp > b) {
                best = Some((*theta, lp));
            }
        }
        best
    }
}

/// What the summaries need from a sampling engine.
pub trait Sampler {
    /// Run `n_steps` more iterations, appending to the stored chain.
    fn advance(&mut self, n_steps: usize) -> Result<(), AppError>;

    /// All retained values of one parameter, in draw order.
    fn get_parameter(&self, param: ParamIndex) -> Vec<f64>;

    /// The highest-probability `mass_fraction` of retained draws, thinned to
    /// `target_count` draws when there are more.
    fn get_interval(&self, mass_fraction: f64, target_count: usize) -> Result<PosteriorSample, AppError>;

    /// Single highest-probability draw.
    fn mode(&self) -> Result<Theta, AppError>;

    /// Density estimate of one parameter's marginal.
    fn get_marginal(&self, param: ParamIndex, unimodal: bool) -> Result<Box<dyn DensityEstimator>, AppError>;
}
