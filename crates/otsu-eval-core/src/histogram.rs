//! Intensity histograms and the strategies that fill them.

use crate::image::{Image, LEVELS};
use serde::{Deserialize, Serialize};

/// Occurrence count per 8-bit intensity level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; LEVELS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self { bins: [0; LEVELS] }
    }

    /// Reset every bin to zero.
    pub fn clear(&mut self) {
        self.bins.fill(0);
    }

    #[inline]
    pub fn count(&self, level: u8) -> u32 {
        self.bins[level as usize]
    }

    #[inline]
    pub fn bins(&self) -> &[u32; LEVELS] {
        &self.bins
    }

    /// Sum of all bins.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Number of levels with a non-zero count.
    pub fn occupied_levels(&self) -> usize {
        self.bins.iter().filter(|&&c| c > 0).count()
    }

    #[inline]
    fn bump(&mut self, level: u8) {
        self.bins[level as usize] += 1;
    }
}

/// Fills a [`Histogram`] from image samples.
pub trait HistogramBuilder {
    /// Add the counts of `samples` to `hist` without clearing it.
    fn accumulate(&self, samples: &[u8], hist: &mut Histogram);

    /// Replace the contents of `hist` with the counts of `image`.
    fn build(&self, image: &Image, hist: &mut Histogram) {
        hist.clear();
        self.accumulate(image.samples(), hist);
    }
}

/// One sample per step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarHistogram;

impl HistogramBuilder for ScalarHistogram {
    fn accumulate(&self, samples: &[u8], hist: &mut Histogram) {
        for &v in samples {
            hist.bump(v);
        }
    }
}

/// Reads four samples per little-endian `u32` load, then the 0..=3 leftovers.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordHistogram;

impl HistogramBuilder for WordHistogram {
    fn accumulate(&self, samples: &[u8], hist: &mut Histogram) {
        let mut words = samples.chunks_exact(4);
        for w in &mut words {
            let p = u32::from_le_bytes([w[0], w[1], w[2], w[3]]);
            hist.bump((p & 0xFF) as u8);
            hist.bump(((p >> 8) & 0xFF) as u8);
            hist.bump(((p >> 16) & 0xFF) as u8);
            hist.bump((p >> 24) as u8);
        }
        for &v in words.remainder() {
            hist.bump(v);
        }
    }
}

/// Histogram builder selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramStrategy {
    Scalar,
    #[default]
    Word,
}

impl HistogramBuilder for HistogramStrategy {
    fn accumulate(&self, samples: &[u8], hist: &mut Histogram) {
        match self {
            Self::Scalar => ScalarHistogram.accumulate(samples, hist),
            Self::Word => WordHistogram.accumulate(samples, hist),
        }
    }
}
