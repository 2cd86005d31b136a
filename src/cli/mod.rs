//! Command-line parsing for the spectrum posterior tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code. Every flag can also be set through a
//! `SPECTRO_*` environment variable (a `.env` file is loaded first).

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{PriorKind, Theta};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "spectro",
    version,
    about = "Bayesian two-line spectrum fit with pointwise credible envelopes"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample the posterior, print marginal summaries and optionally export the envelope.
    Analyze(AnalyzeArgs),
    /// Write a synthetic spectrum to CSV.
    Generate(GenerateArgs),
}

/// Synthetic spectrum options.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Random seed for the synthetic noise.
    #[arg(long, env = "SPECTRO_SEED", default_value_t = 9)]
    pub seed: u64,

    /// Number of evenly spaced wavelengths.
    #[arg(short = 'n', long, env = "SPECTRO_N_POINTS", default_value_t = 35)]
    pub n_points: usize,

    /// Lowest wavelength.
    #[arg(long, default_value_t = 410.0)]
    pub x_min: f64,

    /// Highest wavelength.
    #[arg(long, default_value_t = 440.0)]
    pub x_max: f64,

    /// True parameters `A1,w1,A2,w2,b0,b1` used to synthesize the spectrum.
    #[arg(long, value_name = "A1,w1,A2,w2,b0,b1", default_value = "1000,2,400,1.5,35,25")]
    pub truth: Theta,

    /// Additive floor on the per-point noise standard deviation.
    #[arg(long, default_value_t = 5.0)]
    pub noise_floor: f64,
}

/// Options for a full analysis run.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub synthetic: DataArgs,

    /// Read observations (`x,y,sigma`) from CSV instead of generating them.
    #[arg(long, env = "SPECTRO_DATA", value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Prior on the parameters.
    #[arg(long, value_enum, env = "SPECTRO_PRIOR", default_value_t = PriorKind::Flat)]
    pub prior: PriorKind,

    /// Chain start `A1,w1,A2,w2,b0,b1` (default: least-squares fit).
    #[arg(long, value_name = "A1,w1,A2,w2,b0,b1")]
    pub start: Option<Theta>,

    /// Number of chain steps.
    #[arg(long, env = "SPECTRO_STEPS", default_value_t = 20_000)]
    pub steps: usize,

    /// Leading draws discarded before summarizing.
    #[arg(long, default_value_t = 2_000)]
    pub burn: usize,

    /// Proposal std-dev as a fraction of each start value.
    #[arg(long, default_value_t = 0.02)]
    pub proposal_scale: f64,

    /// Smallest width tried by the least-squares start.
    #[arg(long, default_value_t = 0.2)]
    pub width_min: f64,

    /// Largest width tried by the least-squares start.
    #[arg(long, default_value_t = 10.0)]
    pub width_max: f64,

    /// Width grid steps per peak.
    #[arg(long, default_value_t = 40)]
    pub width_steps: usize,

    /// Credible mass of the envelope subset.
    #[arg(long, default_value_t = 0.95)]
    pub interval_mass: f64,

    /// Number of draws used to build the envelope.
    #[arg(long, default_value_t = 1500)]
    pub interval_draws: usize,

    /// Envelope grid points.
    #[arg(long, default_value_t = 500)]
    pub grid_points: usize,

    /// Grid points for marginal densities.
    #[arg(long, default_value_t = 200)]
    pub density_points: usize,

    /// Export the envelope (`x,lower,upper,mode`) to CSV.
    #[arg(long = "export-envelope", value_name = "CSV")]
    pub export_envelope: Option<PathBuf>,

    /// Export the run summary to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

/// Options for writing a synthetic spectrum.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub synthetic: DataArgs,

    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_defaults() {
        let cli = Cli::try_parse_from(["spectro", "analyze"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.synthetic.n_points, 35);
        assert_eq!(args.synthetic.truth, Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0));
        assert_eq!(args.prior, PriorKind::Flat);
        assert!(args.start.is_none());
    }

    #[test]
    fn analyze_overrides() {
        let cli = Cli::try_parse_from([
            "spectro",
            "-vv",
            "analyze",
            "--prior",
            "positive-widths",
            "--start",
            "1000,1,1000,1,30,30",
            "--steps",
            "500",
            "--burn",
            "100",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.prior, PriorKind::PositiveWidths);
        assert_eq!(args.start, Some(Theta::new(1000.0, 1.0, 1000.0, 1.0, 30.0, 30.0)));
        assert_eq!(args.steps, 500);
    }

    #[test]
    fn bad_theta_is_rejected() {
        assert!(Cli::try_parse_from(["spectro", "analyze", "--start", "1,2,3"]).is_err());
    }

    #[test]
    fn generate_requires_out() {
        assert!(Cli::try_parse_from(["spectro", "generate"]).is_err());
        assert!(Cli::try_parse_from(["spectro", "generate", "--out", "a.csv"]).is_ok());
    }
}
