//! Text and JSON reports.

use std::fmt::Write;

use serde::Serialize;

use crate::harness::StrategyReport;
use crate::patterns::Pattern;
use crate::EvalError;

/// Serializable summary of one evaluation run.
#[derive(Clone, Debug, Serialize)]
pub struct EvalReport {
    /// Image source, e.g. `gradient` or a raw file path.
    pub source: String,
    pub runs: Vec<StrategyReport>,
}

impl EvalReport {
    pub fn new(source: impl Into<String>, runs: Vec<StrategyReport>) -> Self {
        Self {
            source: source.into(),
            runs,
        }
    }

    pub fn from_pattern(pattern: &Pattern, runs: Vec<StrategyReport>) -> Self {
        Self::new(pattern.describe(), runs)
    }
}

/// One block per strategy: label, threshold, best time, PSNR (2 decimals)
/// and SSIM (4 decimals).
pub fn format_text(runs: &[StrategyReport]) -> String {
    let mut out = String::new();
    for run in runs {
        let _ = writeln!(out, "[{}]", run.label);
        let _ = writeln!(out, "Threshold: {}", run.threshold);
        let _ = writeln!(out, "Execution Time (us): {:.0}", run.best_us);
        let _ = writeln!(out, "PSNR: {:.2}", run.metrics.psnr);
        let _ = writeln!(out, "SSIM: {:.4}", run.metrics.ssim);
    }
    out
}

/// [`format_text`] followed by an ASCII rendering of each binarization.
pub fn format_text_with_preview(runs: &[StrategyReport]) -> String {
    let mut out = format_text(runs);
    for run in runs {
        let _ = writeln!(out, "\n[{}] preview", run.label);
        out.push_str(&run.binarized.render_ascii());
    }
    out
}

pub fn format_json(report: &EvalReport) -> Result<String, EvalError> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{compare, default_strategies};

    fn gradient_runs() -> Vec<StrategyReport> {
        compare(&Pattern::Gradient.render(), &default_strategies(), 1).unwrap()
    }

    #[test]
    fn text_report_lists_every_strategy() {
        let text = format_text(&gradient_runs());
        assert!(text.starts_with("[OPTIMIZED]\nThreshold: 124\n"));
        assert!(text.contains("[UNOPTIMIZED]"));
        assert!(text.contains("[FIXED-128]\nThreshold: 128\n"));
        let ssim_line = text.lines().find(|l| l.starts_with("SSIM: ")).unwrap();
        let decimals = ssim_line.rsplit('.').next().unwrap();
        assert_eq!(decimals.len(), 4);
    }

    #[test]
    fn preview_has_a_grid_per_strategy() {
        let runs = gradient_runs();
        let text = format_text_with_preview(&runs);
        assert_eq!(text.matches(" preview").count(), runs.len());
        // gradient cut at 124: columns 0..32 stay background
        let row = format!("{}{}", ".".repeat(32), "#".repeat(32));
        assert!(text.contains(&row));
    }

    #[test]
    fn json_report_round_trips_through_value() {
        let report = EvalReport::from_pattern(&Pattern::Gradient, gradient_runs());
        let json = format_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "gradient");
        assert_eq!(value["runs"][0]["threshold"], 124);
        assert_eq!(value["runs"][2]["pipeline"]["threshold"]["kind"], "fixed");
        assert!(value["runs"][0].get("binarized").is_none());
    }
}
