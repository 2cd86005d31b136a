//! Unnormalized log-posterior for the two-line spectrum.
//!
//! `log p(θ | y) = likelihood(θ) + prior(θ)` with a Gaussian noise model of known
//! per-point standard deviation:
//!
//! ```text
//! likelihood(θ) = -0.5 · Σ ((y_i - ŷ_i(θ)) / σ_i)^2
//! ```
//!
//! A `PosteriorModel` is immutable after construction, so `evaluate` is safe to
//! call concurrently from any number of proposal branches.

use std::fmt;
use std::sync::Arc;

use crate::domain::{LineCenters, ObservationSet, Theta};
use crate::error::{AppError, ErrorKind};
use crate::models::{background_range, forward_model, predict};
use crate::posterior::prior::{FlatPrior, Prior};

/// The single entry point a sampler needs.
pub trait LogPosterior: Send + Sync {
    /// Unnormalized log-posterior at `θ`.
    fn evaluate(&self, theta: &Theta) -> Result<f64, AppError>;
}

/// Observed intensities bound to the model's x values.
#[derive(Debug, Clone)]
struct BoundData {
    y: Vec<f64>,
    sigma: Vec<f64>,
}

/// Forward model + likelihood + prior over a fixed set of observations.
#[derive(Clone)]
pub struct PosteriorModel {
    x: Vec<f64>,
    x_range: (f64, f64),
    data: Option<BoundData>,
    centers: LineCenters,
    prior: Arc<dyn Prior>,
}

impl PosteriorModel {
    /// Bind observations and use the flat prior.
    pub fn new(observations: ObservationSet) -> Result<Self, AppError> {
        let (x, y, sigma) = observations.into_parts();
        let x_range = background_range(&x)?;
        Ok(Self {
            x,
            x_range,
            data: Some(BoundData { y, sigma }),
            centers: LineCenters::default(),
            prior: Arc::new(FlatPrior),
        })
    }

    /// A model with x values only.
    ///
    /// Useful for evaluating the forward model (e.g. to synthesize data). Any
    /// call to `likelihood` or `evaluate` fails with `UnboundObservations`.
    pub fn unbound(x: Vec<f64>) -> Result<Self, AppError> {
        let x_range = background_range(&x)?;
        Ok(Self {
            x,
            x_range,
            data: None,
            centers: LineCenters::default(),
            prior: Arc::new(FlatPrior),
        })
    }

    pub fn with_prior(mut self, prior: impl Prior + 'static) -> Self {
        self.prior = Arc::new(prior);
        self
    }

    pub fn with_shared_prior(mut self, prior: Arc<dyn Prior>) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_centers(mut self, centers: LineCenters) -> Self {
        self.centers = centers;
        self
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn centers(&self) -> &LineCenters {
        &self.centers
    }

    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Observed `(y, sigma)`, or `UnboundObservations`.
    pub fn observed(&self) -> Result<(&[f64], &[f64]), AppError> {
        let data = self.data.as_ref().ok_or_else(|| {
            AppError::new(
                ErrorKind::UnboundObservations,
                "Likelihood requested but no intensities/errors are bound to the model.",
            )
        })?;
        Ok((&data.y, &data.sigma))
    }

    /// Model prediction on any x-sequence (not only the bound one).
    pub fn forward_model(&self, x: &[f64], theta: &Theta) -> Result<Vec<f64>, AppError> {
        forward_model(x, theta, &self.centers)
    }

    /// Gaussian log-likelihood (up to a constant).
    pub fn likelihood(&self, theta: &Theta) -> Result<f64, AppError> {
        let (y, sigma) = self.observed()?;
        let (x_min, x_max) = self.x_range;
        let chi2: f64 = self
            .x
            .iter()
            .zip(y)
            .zip(sigma)
            .map(|((&xi, &yi), &si)| {
                let r = (yi - predict(xi, theta, &self.centers, x_min, x_max)) / si;
                r * r
            })
            .sum();
        Ok(-0.5 * chi2)
    }

    pub fn prior(&self, theta: &Theta) -> f64 {
        self.prior.log_prior(theta)
    }

    pub fn evaluate(&self, theta: &Theta) -> Result<f64, AppError> {
        Ok(self.likelihood(theta)? + self.prior(theta))
    }
}

impl LogPosterior for PosteriorModel {
    fn evaluate(&self, theta: &Theta) -> Result<f64, AppError> {
        PosteriorModel::evaluate(self, theta)
    }
}

impl fmt::Debug for PosteriorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosteriorModel")
            .field("n", &self.x.len())
            .field("x_range", &self.x_range)
            .field("bound", &self.data.is_some())
            .field("centers", &self.centers)
            .finish_non_exhaustive()
    }
}
