//! Histogram → threshold → binarization → metrics, over owned buffers.

use crate::binarize::binarize_into;
use crate::histogram::{Histogram, HistogramBuilder, HistogramStrategy};
use crate::image::{BinarizedImage, Image};
use crate::metrics::{MetricEvaluator, Metrics};
use crate::reduce::ReductionStrategy;
use crate::threshold::{ThresholdSelector, ThresholdStrategy};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Strategy selection for one [`Pipeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub histogram: HistogramStrategy,
    pub threshold: ThresholdStrategy,
    pub reduction: ReductionStrategy,
}

impl PipelineConfig {
    /// One sample per step, sequential reductions.
    pub fn baseline() -> Self {
        Self {
            histogram: HistogramStrategy::Scalar,
            threshold: ThresholdStrategy::Otsu,
            reduction: ReductionStrategy::Scalar,
        }
    }

    /// Word-wise histogram, lane-parallel reductions.
    pub fn optimized() -> Self {
        Self {
            histogram: HistogramStrategy::Word,
            threshold: ThresholdStrategy::Otsu,
            reduction: ReductionStrategy::Simd,
        }
    }
}

/// Threshold and metrics of one run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub threshold: u8,
    pub metrics: Metrics,
}

/// Self-contained result of [`compute`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Computation {
    pub threshold: u8,
    pub metrics: Metrics,
    pub binarized: BinarizedImage,
}

/// Owns every buffer a binarization run needs.
///
/// Buffers are allocated once in [`Pipeline::new`] and reused. The histogram
/// is cleared at the start of every [`Pipeline::segment`], so consecutive runs
/// on different images never share counts.
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    histogram: Histogram,
    binarized: BinarizedImage,
    evaluator: MetricEvaluator<ReductionStrategy>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            histogram: Histogram::new(),
            binarized: BinarizedImage::new(),
            evaluator: MetricEvaluator::new(config.reduction),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Histogram of the last segmented image.
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Binarization of the last segmented image.
    pub fn binarized(&self) -> &BinarizedImage {
        &self.binarized
    }

    /// Build the histogram, select a threshold and binarize `image`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn segment(&mut self, image: &Image) -> u8 {
        self.config.histogram.build(image, &mut self.histogram);
        let threshold = self.config.threshold.select(&self.histogram);
        binarize_into(image, threshold, &mut self.binarized);

        if self.histogram.occupied_levels() < 2 {
            warn!("single-level image, threshold left at {threshold}");
        }
        debug!(
            "threshold {threshold}, foreground {} px",
            self.binarized.count_ones()
        );
        threshold
    }

    /// Only reachable through [`Pipeline::run`], which segments `image` first.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    fn evaluate(&mut self, image: &Image) -> Metrics {
        let metrics = self.evaluator.evaluate(image, &self.binarized);
        debug!("psnr {:.2} dB, ssim {:.4}", metrics.psnr, metrics.ssim);
        metrics
    }

    /// Segment `image` and score the binarization against it.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn run(&mut self, image: &Image) -> Outcome {
        let threshold = self.segment(image);
        let metrics = self.evaluate(image);
        Outcome { threshold, metrics }
    }
}

/// One-shot evaluation of `image` with the default strategies.
pub fn compute(image: &Image) -> Computation {
    let mut pipeline = Pipeline::default();
    let Outcome { threshold, metrics } = pipeline.run(image);
    Computation {
        threshold,
        metrics,
        binarized: pipeline.binarized,
    }
}
