//! Otsu binarization and quality evaluation for small fixed-size grayscale images.
//!
//! The crate is a pure computation library. Data flows strictly forward:
//!
//! ```text
//! Image -> Histogram -> threshold -> BinarizedImage -> Metrics
//! ```
//!
//! Image dimensions are compile-time constants ([`SIDE`] × [`SIDE`], 8-bit
//! samples). All working buffers are owned by a [`Pipeline`]; there is no
//! process-wide state, so independent pipelines never observe each other.
//!
//! The histogram builder, threshold selector and numeric reducer are traits
//! with interchangeable implementations, so a baseline and an optimized
//! strategy can be compared on the same image.
//!
//! ## Quickstart
//!
//! ```
//! use otsu_eval_core::{compute, Image, SIDE};
//!
//! let image = Image::from_fn(|x, _| if x < SIDE / 2 { 50 } else { 200 });
//! let result = compute(&image);
//! assert_eq!(result.threshold, 50);
//! assert_eq!(result.binarized.count_ones(), image.samples().len() / 2);
//! ```

mod binarize;
mod histogram;
mod image;
mod logger;
mod metrics;
mod pipeline;
mod reduce;
mod threshold;

pub use binarize::{binarize, binarize_into};
pub use histogram::{
    Histogram, HistogramBuilder, HistogramStrategy, ScalarHistogram, WordHistogram,
};
pub use image::{BinarizedImage, Image, ImageError, LEVELS, PIXELS, SIDE};
pub use metrics::{
    MetricEvaluator, Metrics, MAX_LEVEL, PSNR_IDENTICAL, SSIM_C1, SSIM_C2,
};
pub use pipeline::{compute, Computation, Outcome, Pipeline, PipelineConfig};
pub use reduce::{Reducer, ReductionStrategy, ScalarReducer, SimdReducer};
pub use threshold::{FixedThreshold, Otsu, ThresholdSelector, ThresholdStrategy};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
