//! Shared analysis pipeline.
//!
//! Keeping this in one place keeps the CLI to presentation only:
//! observations -> start point -> chain -> parameter summaries -> envelope

use chrono::Utc;
use tracing::info;

use crate::data::SyntheticDataGenerator;
use crate::domain::{
    AnalysisConfig, DensityGrid, EnvelopeGrid, MarginalSummary, ObservationSet, ParamIndex, SummaryFile,
    Theta,
};
use crate::error::AppError;
use crate::fit::{StartFit, fit_start, width_grid};
use crate::math::{linspace, min_max};
use crate::posterior::{PosteriorModel, prior_for};
use crate::report::{RunReport, format_run_summary};
use crate::sampler::{Bandwidth, ChainConfig, DensityEstimator, GaussianKde, MetropolisChain, Sampler};
use crate::summary::{credible_envelope, derived_ratio, mode_curve, summarize};

/// All computed outputs of a single `spectro analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub observations: ObservationSet,
    pub start_fit: Option<StartFit>,
    pub start: Theta,
    pub acceptance_rate: f64,
    pub retained_draws: usize,
    pub interval_draws: usize,
    pub mode: Theta,
    pub mode_log_prob: f64,
    pub marginals: Vec<MarginalSummary>,
    pub width_ratio: MarginalSummary,
    pub densities: Vec<DensityGrid>,
    pub envelope: EnvelopeGrid,
}

/// Generate or load observations per config.
pub fn load_observations(config: &AnalysisConfig) -> Result<ObservationSet, AppError> {
    match &config.data_path {
        Some(path) => crate::io::read_observations_csv(path),
        None => Ok(SyntheticDataGenerator::from_config(config).generate()?.observations),
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let observations = load_observations(config)?;
    info!(n = observations.len(), "observations ready");
    run_analysis_with_observations(config, observations)
}

/// Execute the pipeline on already loaded observations.
pub fn run_analysis_with_observations(
    config: &AnalysisConfig,
    observations: ObservationSet,
) -> Result<RunOutput, AppError> {
    config.validate()?;

    // 1) Bind the posterior.
    let posterior = PosteriorModel::new(observations.clone())?
        .with_centers(config.centers)
        .with_shared_prior(prior_for(config.prior));

    // 2) Chain start: explicit, or least squares over the width grid.
    let (start, start_fit) = match config.start {
        Some(start) => (start, None),
        None => {
            let grid = width_grid(config.width_min, config.width_max, config.width_steps)?;
            let fit = fit_start(&observations, &config.centers, &grid)?;
            info!(chi2 = fit.chi2, start = %fit.theta, "least-squares start");
            (fit.theta, Some(fit))
        }
    };

    // 3) Sample.
    let chain_config = ChainConfig::relative_to(
        &start,
        config.proposal_scale,
        config.seed.wrapping_add(1),
        config.burn,
    );
    let mut chain = MetropolisChain::new(posterior, start, chain_config)?;
    chain.advance(config.steps)?;

    // 4) Parameter-space summaries.
    let marginals: Vec<MarginalSummary> = ParamIndex::ALL
        .iter()
        .map(|&p| summarize(p.label(), &chain.get_parameter(p)))
        .collect();
    let retained = chain.retained();
    let ratio = derived_ratio(&retained, ParamIndex::W1, ParamIndex::W2);
    let width_ratio = summarize("w1/w2", &ratio);

    let mut densities = Vec::with_capacity(3);
    for p in [ParamIndex::W1, ParamIndex::W2] {
        let pdf = chain.get_marginal(p, true)?;
        densities.push(density_grid(p.label(), &chain.get_parameter(p), pdf.as_ref(), config.density_points));
    }
    let ratio_pdf = GaussianKde::new(ratio.clone(), Bandwidth::Oversmoothed)?;
    densities.push(density_grid("w1/w2", &ratio, &ratio_pdf, config.density_points));

    // 5) Prediction-space summaries.
    let interval = chain.get_interval(config.interval_mass, config.interval_draws)?;
    let mode = chain.mode()?;
    let mode_log_prob = chain.posterior().evaluate(&mode)?;

    let (x_lo, x_hi) = min_max(observations.x())
        .ok_or_else(|| AppError::domain("No observations to summarize."))?;
    let grid = linspace(x_lo, x_hi, config.grid_points);
    let envelope = credible_envelope(chain.posterior(), &interval.thetas, &grid)?;
    let mode_line = mode_curve(chain.posterior(), &mode, &grid)?;
    info!(draws = interval.len(), points = grid.len(), "credible envelope built");

    Ok(RunOutput {
        observations,
        start_fit,
        start,
        acceptance_rate: chain.acceptance_rate(),
        retained_draws: retained.len(),
        interval_draws: interval.len(),
        mode,
        mode_log_prob,
        marginals,
        width_ratio,
        densities,
        envelope: envelope.into_grid(grid, mode_line),
    })
}

/// Evaluate a density over the central range of its samples, padded by 10% per side.
fn density_grid(name: &str, samples: &[f64], pdf: &dyn DensityEstimator, points: usize) -> DensityGrid {
    let (lo, hi) = min_max(samples).unwrap_or((0.0, 1.0));
    let pad = 0.1 * (hi - lo).max(1e-9);
    let x = linspace(lo - pad, hi + pad, points);
    let density = pdf.evaluate(&x);
    DensityGrid {
        name: name.to_string(),
        x,
        density,
    }
}

/// Largest envelope width and where it occurs.
pub fn widest_band(envelope: &EnvelopeGrid) -> Option<(f64, f64)> {
    envelope
        .x
        .iter()
        .zip(envelope.lower.iter().zip(&envelope.upper))
        .map(|(&x, (&lo, &hi))| (x, hi - lo))
        .filter(|(_, w)| w.is_finite())
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

/// Terminal report for a finished run.
pub fn format_report(config: &AnalysisConfig, run: &RunOutput) -> String {
    format_run_summary(&RunReport {
        config,
        n_observations: run.observations.len(),
        start_fit: run.start_fit.as_ref(),
        start: &run.start,
        acceptance_rate: run.acceptance_rate,
        retained_draws: run.retained_draws,
        interval_draws: run.interval_draws,
        mode: &run.mode,
        mode_log_prob: run.mode_log_prob,
        marginals: &run.marginals,
        width_ratio: &run.width_ratio,
        widest_band: widest_band(&run.envelope),
    })
}

/// Portable JSON summary of a run.
pub fn summary_file(config: &AnalysisConfig, run: &RunOutput) -> SummaryFile {
    SummaryFile {
        tool: "spectro".to_string(),
        generated_at: Utc::now(),
        n_observations: run.observations.len(),
        centers: config.centers,
        prior: config.prior,
        start: run.start,
        mode: run.mode,
        mode_log_prob: run.mode_log_prob,
        acceptance_rate: run.acceptance_rate,
        interval_mass: config.interval_mass,
        interval_draws: run.interval_draws,
        marginals: run.marginals.clone(),
        width_ratio: run.width_ratio.clone(),
        densities: run.densities.clone(),
        envelope: run.envelope.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ratio_comes_from_retained_draws() {
        let start = Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0);
        let config = AnalysisConfig {
            start: Some(start),
            steps: 300,
            burn: 50,
            interval_draws: 20,
            grid_points: 10,
            density_points: 10,
            ..AnalysisConfig::default()
        };
        let run = run_analysis(&config).unwrap();

        let posterior = PosteriorModel::new(run.observations.clone()).unwrap();
        let chain_config =
            ChainConfig::relative_to(&start, config.proposal_scale, config.seed.wrapping_add(1), config.burn);
        let mut chain = MetropolisChain::new(posterior, start, chain_config).unwrap();
        chain.advance(config.steps).unwrap();
        let expected = summarize("w1/w2", &derived_ratio(&chain.retained(), ParamIndex::W1, ParamIndex::W2));

        assert_eq!(run.retained_draws, chain.retained().len());
        assert_eq!(run.width_ratio, expected);
    }

    #[test]
    fn widest_band_finds_peak() {
        let env = EnvelopeGrid {
            x: vec![410.0, 422.0, 440.0],
            lower: vec![1.0, 1.0, 1.0],
            upper: vec![2.0, 9.0, f64::NAN],
            mode: vec![1.5, 5.0, 1.5],
        };
        assert_eq!(widest_band(&env), Some((422.0, 8.0)));
    }
}
