//! Reference random-walk Metropolis chain.
//!
//! Scope:
//! - one joint Gaussian proposal per step, fixed per-parameter scales (no adaptation)
//! - a fixed burn-in count instead of automatic burn/thin selection
//! - seeded `StdRng`, so a chain is reproducible for the same posterior, start
//!   and config
//!
//! Proposals with a non-finite log-probability are rejected. Errors returned by
//! the posterior abort `advance` and are passed to the caller unchanged.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use tracing::{debug, info};

use crate::domain::{N_PARAMS, ParamIndex, Theta};
use crate::error::AppError;
use crate::posterior::LogPosterior;
use crate::sampler::{Bandwidth, DensityEstimator, GaussianKde, PosteriorSample, Sampler};

/// Chain settings.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub seed: u64,
    /// Proposal standard deviation per parameter.
    pub scales: [f64; N_PARAMS],
    /// Leading draws ignored by `get_parameter`, `get_interval` and `get_marginal`.
    pub burn: usize,
}

impl ChainConfig {
    /// Proposal scales proportional to the start vector, floored at `fraction`.
    pub fn relative_to(start: &Theta, fraction: f64, seed: u64, burn: usize) -> Self {
        let mut scales = [0.0; N_PARAMS];
        for (s, v) in scales.iter_mut().zip(start.0) {
            *s = (v.abs() * fraction).max(fraction);
        }
        Self { seed, scales, burn }
    }
}

pub struct MetropolisChain<P: LogPosterior> {
    posterior: P,
    config: ChainConfig,
    rng: StdRng,
    draws: Vec<Theta>,
    log_probs: Vec<f64>,
    current: Theta,
    current_lp: f64,
    proposed: usize,
    accepted: usize,
}

impl<P: LogPosterior> MetropolisChain<P> {
    /// Start a chain; the start vector is stored as the first draw.
    pub fn new(posterior: P, start: Theta, config: ChainConfig) -> Result<Self, AppError> {
        if config.scales.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(AppError::config("Proposal scales must be finite and > 0."));
        }
        let start_lp = posterior.evaluate(&start)?;
        if !start_lp.is_finite() {
            return Err(AppError::sampling(format!(
                "Chain start {start} has non-finite log-probability ({start_lp})."
            )));
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            posterior,
            config,
            rng,
            draws: vec![start],
            log_probs: vec![start_lp],
            current: start,
            current_lp: start_lp,
            proposed: 0,
            accepted: 0,
        })
    }

    pub fn posterior(&self) -> &P {
        &self.posterior
    }

    /// Total stored draws, burn-in included.
    pub fn n_draws(&self) -> usize {
        self.draws.len()
    }

    /// Fraction of proposals accepted so far (`NaN` before the first step).
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            return f64::NAN;
        }
        self.accepted as f64 / self.proposed as f64
    }

    /// Draws after burn-in.
    pub fn retained(&self) -> PosteriorSample {
        let start = self.config.burn.min(self.draws.len());
        PosteriorSample {
            thetas: self.draws[start..].to_vec(),
            log_probs: self.log_probs[start..].to_vec(),
        }
    }

    fn step(&mut self) -> Result<(), AppError> {
        let mut proposal = self.current;
        for (v, scale) in proposal.0.iter_mut().zip(self.config.scales) {
            let z: f64 = StandardNormal.sample(&mut self.rng);
            *v += scale * z;
        }
        self.proposed += 1;

        let lp = self.posterior.evaluate(&proposal)?;
        if lp.is_finite() {
            let log_ratio = lp - self.current_lp;
            let u: f64 = self.rng.r#gen();
            if log_ratio >= 0.0 || u.ln() < log_ratio {
                self.current = proposal;
                self.current_lp = lp;
                self.accepted += 1;
            }
        }

        self.draws.push(self.current);
        self.log_probs.push(self.current_lp);
        Ok(())
    }
}

impl<P: LogPosterior> Sampler for MetropolisChain<P> {
    fn advance(&mut self, n_steps: usize) -> Result<(), AppError> {
        self.draws.reserve(n_steps);
        self.log_probs.reserve(n_steps);
        for _ in 0..n_steps {
            self.step()?;
        }
        info!(
            steps = n_steps,
            draws = self.draws.len(),
            acceptance = self.acceptance_rate(),
            "chain advanced"
        );
        Ok(())
    }

    fn get_parameter(&self, param: ParamIndex) -> Vec<f64> {
        let start = self.config.burn.min(self.draws.len());
        self.draws[start..].iter().map(|t| t.get(param)).collect()
    }

    fn get_interval(&self, mass_fraction: f64, target_count: usize) -> Result<PosteriorSample, AppError> {
        highest_mass_subset(&self.retained(), mass_fraction, target_count)
    }

    fn mode(&self) -> Result<Theta, AppError> {
        let all = PosteriorSample {
            thetas: self.draws.clone(),
            log_probs: self.log_probs.clone(),
        };
        all.mode()
            .map(|(theta, _)| theta)
            .ok_or_else(|| AppError::sampling("Chain has no draws with a finite log-probability."))
    }

    fn get_marginal(&self, param: ParamIndex, unimodal: bool) -> Result<Box<dyn DensityEstimator>, AppError> {
        let rule = if unimodal {
            Bandwidth::Oversmoothed
        } else {
            Bandwidth::Silverman
        };
        let kde = GaussianKde::new(self.get_parameter(param), rule)?;
        Ok(Box::new(kde))
    }
}

/// Keep the top `floor(mass_fraction · n)` draws by log-probability (at least one),
/// then thin them evenly to `target_count` when there are more.
///
/// Draws with a `NaN` log-probability are left out and do not count towards `n`.
///
/// The result is ordered from most to least probable.
pub fn highest_mass_subset(
    sample: &PosteriorSample,
    mass_fraction: f64,
    target_count: usize,
) -> Result<PosteriorSample, AppError> {
    if !(mass_fraction > 0.0 && mass_fraction <= 1.0) {
        return Err(AppError::sampling(format!(
            "Interval mass fraction must be in (0, 1], got {mass_fraction}."
        )));
    }
    if target_count == 0 {
        return Err(AppError::sampling("Interval target count must be > 0."));
    }
    if sample.is_empty() {
        return Err(AppError::sampling("Cannot take an interval of an empty sample."));
    }

    // Draws without a log-probability cannot be ranked.
    let mut order: Vec<usize> = (0..sample.len()).filter(|&i| !sample.log_probs[i].is_nan()).collect();
    if order.is_empty() {
        return Err(AppError::sampling("Cannot rank draws: every log-probability is NaN."));
    }
    order.sort_by(|&a, &b| sample.log_probs[b].total_cmp(&sample.log_probs[a]).then(a.cmp(&b)));

    let n_ranked = order.len();
    let n_keep = ((n_ranked as f64 * mass_fraction).floor() as usize).clamp(1, n_ranked);
    order.truncate(n_keep);

    let picked: Vec<usize> = if target_count < n_keep {
        (0..target_count).map(|i| order[i * n_keep / target_count]).collect()
    } else {
        order
    };
    debug!(kept = n_keep, returned = picked.len(), "interval subset");

    Ok(PosteriorSample {
        thetas: picked.iter().map(|&i| sample.thetas[i]).collect(),
        log_probs: picked.iter().map(|&i| sample.log_probs[i]).collect(),
    })
}
