//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - generates or loads observations
//! - runs the start-point fit, the chain and the summaries
//! - prints the report and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{AnalyzeArgs, Cli, Command, DataArgs, GenerateArgs};
use crate::data::SyntheticDataGenerator;
use crate::domain::{AnalysisConfig, LineCenters};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `spectro` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Generate(args) => handle_generate(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(args);
    config.validate()?;

    let run = pipeline::run_analysis(&config)?;
    println!("{}", pipeline::format_report(&config, &run));

    if let Some(path) = &config.export_envelope {
        crate::io::write_envelope_csv(path, &run.envelope)?;
        info!(path = %path.display(), "envelope exported");
    }
    if let Some(path) = &config.export_summary {
        crate::io::write_summary_json(path, &pipeline::summary_file(&config, &run))?;
        info!(path = %path.display(), "summary exported");
    }

    Ok(())
}

fn handle_generate(args: &GenerateArgs) -> Result<(), AppError> {
    let generator = generator_from_args(&args.synthetic);
    let sample = generator.generate()?;
    crate::io::write_observations_csv(&args.out, &sample.observations)?;
    println!(
        "Wrote {} observations to {}",
        sample.observations.len(),
        args.out.display()
    );
    Ok(())
}

fn generator_from_args(args: &DataArgs) -> SyntheticDataGenerator {
    SyntheticDataGenerator {
        seed: args.seed,
        n_points: args.n_points,
        x_min: args.x_min,
        x_max: args.x_max,
        truth: args.truth,
        noise_floor: args.noise_floor,
        centers: LineCenters::default(),
    }
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        seed: args.synthetic.seed,
        n_points: args.synthetic.n_points,
        x_min: args.synthetic.x_min,
        x_max: args.synthetic.x_max,
        truth: args.synthetic.truth,
        noise_floor: args.synthetic.noise_floor,
        data_path: args.data.clone(),
        centers: LineCenters::default(),
        prior: args.prior,
        start: args.start,
        steps: args.steps,
        burn: args.burn,
        proposal_scale: args.proposal_scale,
        width_min: args.width_min,
        width_max: args.width_max,
        width_steps: args.width_steps,
        interval_mass: args.interval_mass,
        interval_draws: args.interval_draws,
        grid_points: args.grid_points,
        density_points: args.density_points,
        export_envelope: args.export_envelope.clone(),
        export_summary: args.export_summary.clone(),
    }
}
