//! Runs several pipeline strategies on one image and times the segmentation.
//!
//! Only [`Pipeline::segment`] (histogram, threshold, binarization) is timed;
//! metrics are computed once afterwards, outside the measured window. Every
//! strategy gets its own [`Pipeline`], so no buffer is shared between them.

use std::time::{Duration, Instant};

use log::{debug, info};
use otsu_eval_core::{
    BinarizedImage, Image, Metrics, Outcome, Pipeline, PipelineConfig, ThresholdStrategy,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::EvalError;

/// A named pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    pub label: String,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl StrategySpec {
    pub fn new(label: impl Into<String>, pipeline: PipelineConfig) -> Self {
        Self {
            label: label.into(),
            pipeline,
        }
    }
}

/// Result of one strategy on one image.
#[derive(Clone, Debug, Serialize)]
pub struct StrategyReport {
    pub label: String,
    pub pipeline: PipelineConfig,
    pub threshold: u8,
    pub repeats: usize,
    /// Fastest segmentation, microseconds.
    pub best_us: f64,
    /// Mean segmentation time, microseconds.
    pub mean_us: f64,
    pub metrics: Metrics,
    #[serde(skip)]
    pub binarized: BinarizedImage,
}

/// Optimized and baseline Otsu, plus a fixed mid-grey cut for reference.
pub fn default_strategies() -> Vec<StrategySpec> {
    vec![
        StrategySpec::new("OPTIMIZED", PipelineConfig::optimized()),
        StrategySpec::new("UNOPTIMIZED", PipelineConfig::baseline()),
        StrategySpec::new(
            "FIXED-128",
            PipelineConfig {
                threshold: ThresholdStrategy::Fixed { level: 128 },
                ..PipelineConfig::baseline()
            },
        ),
    ]
}

/// Run one strategy `repeats` times and evaluate the final binarization.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(image, spec), fields(label = %spec.label))
)]
pub fn run_strategy(
    image: &Image,
    spec: &StrategySpec,
    repeats: usize,
) -> Result<StrategyReport, EvalError> {
    if repeats == 0 {
        return Err(EvalError::InvalidRepeats);
    }

    let mut pipeline = Pipeline::new(spec.pipeline);
    let mut best = Duration::MAX;
    let mut total = Duration::ZERO;
    let mut threshold = 0u8;
    for _ in 0..repeats {
        let start = Instant::now();
        threshold = pipeline.segment(image);
        let elapsed = start.elapsed();
        best = best.min(elapsed);
        total += elapsed;
    }
    debug!("{}: {repeats} runs in {:?}", spec.label, total);

    // untimed pass that also scores the result
    let Outcome { metrics, .. } = pipeline.run(image);
    let report = StrategyReport {
        label: spec.label.clone(),
        pipeline: spec.pipeline,
        threshold,
        repeats,
        best_us: best.as_secs_f64() * 1e6,
        mean_us: total.as_secs_f64() * 1e6 / repeats as f64,
        metrics,
        binarized: pipeline.binarized().clone(),
    };
    info!(
        "{}: threshold {} psnr {:.2} ssim {:.4}",
        report.label, report.threshold, report.metrics.psnr, report.metrics.ssim
    );
    Ok(report)
}

/// Run every strategy on `image`, in order.
pub fn compare(
    image: &Image,
    specs: &[StrategySpec],
    repeats: usize,
) -> Result<Vec<StrategyReport>, EvalError> {
    if specs.is_empty() {
        return Err(EvalError::NoStrategies);
    }
    specs
        .iter()
        .map(|spec| run_strategy(image, spec, repeats))
        .collect()
}
