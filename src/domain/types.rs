//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during sampling and summarization
//! - exported to JSON/CSV for an external renderer
//! - reloaded later for comparisons

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of model parameters.
pub const N_PARAMS: usize = 6;

/// Named slot in the parameter vector `[A1, w1, A2, w2, b0, b1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParamIndex {
    /// Area of peak 1.
    A1,
    /// Half-width of peak 1.
    W1,
    /// Area of peak 2.
    A2,
    /// Half-width of peak 2.
    W2,
    /// Background level at the lowest x.
    B0,
    /// Background level at the highest x.
    B1,
}

impl ParamIndex {
    pub const ALL: [ParamIndex; N_PARAMS] = [
        ParamIndex::A1,
        ParamIndex::W1,
        ParamIndex::A2,
        ParamIndex::W2,
        ParamIndex::B0,
        ParamIndex::B1,
    ];

    /// Position in the parameter vector.
    pub fn index(self) -> usize {
        match self {
            ParamIndex::A1 => 0,
            ParamIndex::W1 => 1,
            ParamIndex::A2 => 2,
            ParamIndex::W2 => 3,
            ParamIndex::B0 => 4,
            ParamIndex::B1 => 5,
        }
    }

    /// Short label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            ParamIndex::A1 => "A1",
            ParamIndex::W1 => "w1",
            ParamIndex::A2 => "A2",
            ParamIndex::W2 => "w2",
            ParamIndex::B0 => "b0",
            ParamIndex::B1 => "b1",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Parameter vector `[A1, w1, A2, w2, b0, b1]`.
///
/// Widths are expected to be positive but nothing here enforces it; a zero width
/// flows through the forward model as whatever the arithmetic produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theta(pub [f64; N_PARAMS]);

impl Theta {
    pub fn new(a1: f64, w1: f64, a2: f64, w2: f64, b0: f64, b1: f64) -> Self {
        Self([a1, w1, a2, w2, b0, b1])
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, AppError> {
        let arr: [f64; N_PARAMS] = values.try_into().map_err(|_| {
            AppError::config(format!(
                "Parameter vector must have {N_PARAMS} values, got {}.",
                values.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn get(&self, param: ParamIndex) -> f64 {
        self.0[param.index()]
    }

    pub fn as_array(&self) -> &[f64; N_PARAMS] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl std::ops::Index<ParamIndex> for Theta {
    type Output = f64;

    fn index(&self, param: ParamIndex) -> &f64 {
        &self.0[param.index()]
    }
}

impl fmt::Display for Theta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format!("{v:.4}")).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Parse `"1000,2,400,1.5,35,25"` (used by the CLI).
impl FromStr for Theta {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|tok| {
                tok.trim()
                    .parse::<f64>()
                    .map_err(|e| AppError::config(format!("Invalid parameter value '{tok}': {e}")))
            })
            .collect::<Result<Vec<f64>, AppError>>()?;
        Self::from_slice(&values)
    }
}

/// Known line centres (nm). Domain constants, not fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCenters {
    pub c1: f64,
    pub c2: f64,
}

impl Default for LineCenters {
    fn default() -> Self {
        Self { c1: 422.0, c2: 428.0 }
    }
}

/// Observed spectrum: wavelength, intensity and per-point standard deviation.
///
/// Columns always have equal length, all values are finite and every sigma is
/// strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    x: Vec<f64>,
    y: Vec<f64>,
    sigma: Vec<f64>,
}

impl ObservationSet {
    pub fn new(x: Vec<f64>, y: Vec<f64>, sigma: Vec<f64>) -> Result<Self, AppError> {
        if x.len() != y.len() || x.len() != sigma.len() {
            return Err(AppError::domain(format!(
                "Observation columns differ in length: x={}, y={}, sigma={}.",
                x.len(),
                y.len(),
                sigma.len()
            )));
        }
        if let Some(i) = (0..x.len()).find(|&i| !(x[i].is_finite() && y[i].is_finite())) {
            return Err(AppError::domain(format!("Non-finite observation at row {i}.")));
        }
        if let Some(i) = sigma.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(AppError::domain(format!(
                "Observation sigma must be finite and > 0 (row {i}: {}).",
                sigma[i]
            )));
        }
        Ok(Self { x, y, sigma })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    /// Iterate `(x, y, sigma)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.sigma)
            .map(|((&x, &y), &s)| (x, y, s))
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.x, self.y, self.sigma)
    }
}

/// Which prior the posterior uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PriorKind {
    /// Improper flat prior (log-prior 0 everywhere).
    Flat,
    /// Flat for `w1, w2 > 0`, zero probability otherwise.
    PositiveWidths,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). `Default` reproduces the
/// two-line demo spectrum.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Synthetic data seed (also seeds the sampler, offset by one).
    pub seed: u64,
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub truth: Theta,
    /// Additive sigma floor used by the synthetic generator.
    pub noise_floor: f64,
    /// Read observations from CSV instead of generating them.
    pub data_path: Option<PathBuf>,

    pub centers: LineCenters,
    pub prior: PriorKind,

    /// Explicit chain start; the least-squares start is used when `None`.
    pub start: Option<Theta>,
    pub steps: usize,
    pub burn: usize,
    /// Proposal std-dev as a fraction of |start| (floored per parameter).
    pub proposal_scale: f64,

    pub width_min: f64,
    pub width_max: f64,
    pub width_steps: usize,

    pub interval_mass: f64,
    pub interval_draws: usize,
    pub grid_points: usize,
    pub density_points: usize,

    pub export_envelope: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: 9,
            n_points: 35,
            x_min: 410.0,
            x_max: 440.0,
            truth: Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0),
            noise_floor: 5.0,
            data_path: None,
            centers: LineCenters::default(),
            prior: PriorKind::Flat,
            start: None,
            steps: 20_000,
            burn: 2_000,
            proposal_scale: 0.02,
            width_min: 0.2,
            width_max: 10.0,
            width_steps: 40,
            interval_mass: 0.95,
            interval_draws: 1500,
            grid_points: 500,
            density_points: 200,
            export_envelope: None,
            export_summary: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.data_path.is_none() {
            if self.n_points < 2 {
                return Err(AppError::config("Number of points must be >= 2."));
            }
            if !(self.x_min.is_finite() && self.x_max.is_finite() && self.x_max > self.x_min) {
                return Err(AppError::config(format!(
                    "Invalid x range: [{}, {}] (must be finite with max > min).",
                    self.x_min, self.x_max
                )));
            }
            if !self.truth.is_finite() {
                return Err(AppError::config("True parameter vector must be finite."));
            }
            if !(self.noise_floor.is_finite() && self.noise_floor > 0.0) {
                return Err(AppError::config("Noise floor must be finite and > 0."));
            }
        }
        if self.steps == 0 {
            return Err(AppError::config("Chain steps must be > 0."));
        }
        if self.burn >= self.steps {
            return Err(AppError::config(format!(
                "Burn-in ({}) must be smaller than the number of steps ({}).",
                self.burn, self.steps
            )));
        }
        if !(self.proposal_scale.is_finite() && self.proposal_scale > 0.0) {
            return Err(AppError::config("Proposal scale must be finite and > 0."));
        }
        if !(self.interval_mass > 0.0 && self.interval_mass <= 1.0) {
            return Err(AppError::config("Interval mass must be in (0, 1]."));
        }
        if self.interval_draws == 0 {
            return Err(AppError::config("Interval draws must be > 0."));
        }
        if self.grid_points < 2 || self.density_points < 2 {
            return Err(AppError::config("Evaluation grids need at least 2 points."));
        }
        if let Some(start) = &self.start {
            if !start.is_finite() {
                return Err(AppError::config("Start vector must be finite."));
            }
        }
        Ok(())
    }
}

/// Summary statistics for one marginal (a parameter or a derived quantity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalSummary {
    pub name: String,
    pub mean: f64,
    pub sd: f64,
    pub q025: f64,
    pub q50: f64,
    pub q975: f64,
}

/// Pointwise credible envelope plus the mode curve on a shared grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeGrid {
    pub x: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub mode: Vec<f64>,
}

/// Density values of a named marginal on a grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityGrid {
    pub name: String,
    pub x: Vec<f64>,
    pub density: Vec<f64>,
}

/// A saved run summary (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub n_observations: usize,
    pub centers: LineCenters,
    pub prior: PriorKind,
    pub start: Theta,
    pub mode: Theta,
    pub mode_log_prob: f64,
    pub acceptance_rate: f64,
    pub interval_mass: f64,
    pub interval_draws: usize,
    pub marginals: Vec<MarginalSummary>,
    pub width_ratio: MarginalSummary,
    /// Marginal densities of `w1`, `w2` and `w1/w2`.
    pub densities: Vec<DensityGrid>,
    pub envelope: EnvelopeGrid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn theta_parses_from_csv_string() {
        let t: Theta = "1000, 2, 400, 1.5, 35, 25".parse().unwrap();
        assert_eq!(t, Theta::new(1000.0, 2.0, 400.0, 1.5, 35.0, 25.0));
        assert_eq!(t[ParamIndex::W2], 1.5);
    }

    #[test]
    fn theta_rejects_wrong_length() {
        let err = "1,2,3".parse::<Theta>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn param_index_round_trips() {
        for p in ParamIndex::ALL {
            assert_eq!(ParamIndex::from_index(p.index()), Some(p));
        }
        assert_eq!(ParamIndex::from_index(6), None);
    }

    #[test]
    fn observation_set_rejects_non_positive_sigma() {
        let err = ObservationSet::new(vec![1.0, 2.0], vec![0.0, 0.0], vec![1.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomainInput);
    }

    #[test]
    fn observation_set_rejects_length_mismatch() {
        assert!(ObservationSet::new(vec![1.0, 2.0], vec![0.0], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn config_rejects_burn_beyond_steps() {
        let cfg = AnalysisConfig {
            steps: 100,
            burn: 100,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
