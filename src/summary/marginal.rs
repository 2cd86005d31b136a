//! Parameter-space summaries.

use crate::domain::{MarginalSummary, ParamIndex};
use crate::math::{mean, quantile_sorted, sorted_copy, std_dev};
use crate::sampler::PosteriorSample;

/// `value(a) / value(b)` for every draw.
///
/// A zero denominator yields `±inf` or `NaN` for that draw; nothing is filtered.
pub fn derived_ratio(sample: &PosteriorSample, a: ParamIndex, b: ParamIndex) -> Vec<f64> {
    sample.thetas.iter().map(|t| t.get(a) / t.get(b)).collect()
}


/// Mean, sd and central 95% quantiles of a series.
pub fn summarize(name: impl Into<String>, values: &[f64]) -> MarginalSummary {
    let sorted = sorted_copy(values);
    MarginalSummary {
        name: name.into(),
        mean: mean(values),
        sd: std_dev(values),
        q025: quantile_sorted(&sorted, 0.025),
        q50: quantile_sorted(&sorted, 0.5),
        q975: quantile_sorted(&sorted, 0.975),
    }
}
