//! Formatted terminal output.
//!
//! Formatting lives here so the numerical code stays clean and output changes
//! stay localized.

use crate::domain::{AnalysisConfig, MarginalSummary, Theta};
use crate::fit::StartFit;

/// Everything the run summary prints.
#[derive(Debug, Clone)]
pub struct RunReport<'a> {
    pub config: &'a AnalysisConfig,
    pub n_observations: usize,
    pub start_fit: Option<&'a StartFit>,
    pub start: &'a Theta,
    pub acceptance_rate: f64,
    pub retained_draws: usize,
    pub interval_draws: usize,
    pub mode: &'a Theta,
    pub mode_log_prob: f64,
    pub marginals: &'a [MarginalSummary],
    pub width_ratio: &'a MarginalSummary,
    /// Largest `upper - lower` over the envelope grid, with its x.
    pub widest_band: Option<(f64, f64)>,
}

/// Format the full run summary.
pub fn format_run_summary(report: &RunReport<'_>) -> String {
    let mut out = String::new();
    let cfg = report.config;

    out.push_str("=== spectro - two-line spectrum posterior ===\n");
    match &cfg.data_path {
        Some(path) => out.push_str(&format!("Data: {} (n={})\n", path.display(), report.n_observations)),
        None => out.push_str(&format!(
            "Data: synthetic seed={} n={} x=[{:.1}, {:.1}] truth={}\n",
            cfg.seed, report.n_observations, cfg.x_min, cfg.x_max, cfg.truth
        )),
    }
    out.push_str(&format!(
        "Lines: c1={:.1} c2={:.1} | prior={:?}\n",
        cfg.centers.c1, cfg.centers.c2, cfg.prior
    ));

    out.push_str("\nStart:\n");
    if let Some(fit) = report.start_fit {
        out.push_str(&format!(
            "- least squares over {} width pairs: chi2={:.3} (reduced {:.3})\n",
            fit.candidates, fit.chi2, fit.reduced_chi2
        ));
    } else {
        out.push_str("- user supplied\n");
    }
    out.push_str(&format!("- theta: {}\n", report.start));

    out.push_str("\nChain:\n");
    out.push_str(&format!(
        "- steps={} burn={} retained={} acceptance={:.3}\n",
        cfg.steps, cfg.burn, report.retained_draws, report.acceptance_rate
    ));
    out.push_str(&format!(
        "- mode: {} (log p = {:.3})\n",
        report.mode, report.mode_log_prob
    ));

    out.push_str("\nMarginals:\n");
    out.push_str(&format_marginal_table(report.marginals, report.width_ratio));

    out.push_str(&format!(
        "\nEnvelope: {:.0}% mass, {} draws",
        cfg.interval_mass * 100.0,
        report.interval_draws
    ));
    if let Some((x, width)) = report.widest_band {
        out.push_str(&format!(", widest at x={x:.2} (upper-lower={width:.3})"));
    }
    out.push('\n');

    out
}

/// Format marginal statistics as an aligned table.
pub fn format_marginal_table(marginals: &[MarginalSummary], extra: &MarginalSummary) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            "param", "mean", "sd", "q2.5", "q50", "q97.5"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<8} {:-<12} {:-<12} {:-<12} {:-<12} {:-<12}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for m in marginals.iter().chain(std::iter::once(extra)) {
        out.push_str(&format!(
            "{:<8} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            m.name, m.mean, m.sd, m.q025, m.q50, m.q975
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;

    #[test]
    fn table_has_header_separator_and_rows() {
        let a = summarize("w1", &[1.0, 2.0, 3.0]);
        let r = summarize("w1/w2", &[0.5, 1.0, 1.5]);
        let table = format_marginal_table(&[a], &r);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("param"));
        assert!(lines[1].starts_with("--------"));
        assert!(lines[2].starts_with("w1 "));
        assert!(lines[3].starts_with("w1/w2"));
    }

    #[test]
    fn summary_mentions_synthetic_source() {
        let cfg = AnalysisConfig::default();
        let theta = cfg.truth;
        let m = summarize("A1", &[1.0, 2.0]);
        let report = RunReport {
            config: &cfg,
            n_observations: 35,
            start_fit: None,
            start: &theta,
            acceptance_rate: 0.3,
            retained_draws: 100,
            interval_draws: 50,
            mode: &theta,
            mode_log_prob: -12.0,
            marginals: std::slice::from_ref(&m),
            width_ratio: &m,
            widest_band: Some((422.0, 10.0)),
        };
        let text = format_run_summary(&report);
        assert!(text.contains("synthetic seed=9 n=35"));
        assert!(text.contains("user supplied"));
        assert!(text.contains("widest at x=422.00"));
    }
}
