//! Global threshold selection from an intensity histogram.

use crate::histogram::Histogram;
use serde::{Deserialize, Serialize};

/// Picks a binarization cut point from a histogram.
pub trait ThresholdSelector {
    fn select(&self, hist: &Histogram) -> u8;
}

/// Otsu's method: the level maximizing between-class variance.
///
/// Single forward pass in `f32` with running class weight and weighted sum.
/// Levels with an empty background class are skipped and the scan stops as
/// soon as the foreground class becomes empty. The first maximum wins, so a
/// histogram with a single occupied level yields `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Otsu;

impl ThresholdSelector for Otsu {
    fn select(&self, hist: &Histogram) -> u8 {
        let total = hist.total() as f32;
        let mut sum_total = 0f32;
        for (t, &h) in hist.bins().iter().enumerate() {
            sum_total += (t as f32) * (h as f32);
        }

        let mut sum_b = 0f32;
        let mut w_b = 0f32;
        let mut best_var = 0f32;
        let mut best_t = 0u8;

        for (t, &h) in hist.bins().iter().enumerate() {
            w_b += h as f32;
            if w_b == 0.0 {
                continue;
            }
            let w_f = total - w_b;
            if w_f == 0.0 {
                break;
            }

            sum_b += (t as f32) * (h as f32);
            let m_b = sum_b / w_b;
            let m_f = (sum_total - sum_b) / w_f;

            let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
            if var_between > best_var {
                best_var = var_between;
                best_t = t as u8;
            }
        }

        best_t
    }
}

/// Constant cut point, independent of the histogram.
///
/// Useful as a reference binarization (mid-grey `128`) to compare Otsu against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedThreshold(pub u8);

impl Default for FixedThreshold {
    fn default() -> Self {
        Self(128)
    }
}

impl ThresholdSelector for FixedThreshold {
    fn select(&self, _hist: &Histogram) -> u8 {
        self.0
    }
}

/// Threshold selector selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdStrategy {
    #[default]
    Otsu,
    Fixed {
        level: u8,
    },
}

impl ThresholdSelector for ThresholdStrategy {
    fn select(&self, hist: &Histogram) -> u8 {
        match *self {
            Self::Otsu => Otsu.select(hist),
            Self::Fixed { level } => FixedThreshold(level).select(hist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{HistogramBuilder, ScalarHistogram};
    use crate::image::{Image, PIXELS, SIDE};
    use proptest::prelude::*;

    fn hist_of(image: &Image) -> Histogram {
        let mut hist = Histogram::new();
        ScalarHistogram.build(image, &mut hist);
        hist
    }

    #[test]
    fn split_image_picks_lower_mode() {
        let image = Image::from_fn(|x, _| if x < SIDE / 2 { 50 } else { 200 });
        assert_eq!(Otsu.select(&hist_of(&image)), 50);
    }

    #[test]
    fn gradient_splits_levels_in_half() {
        let image = Image::from_fn(|x, _| (x * 4) as u8);
        assert_eq!(Otsu.select(&hist_of(&image)), 124);
    }

    #[test]
    fn constant_image_keeps_initial_threshold() {
        for v in [0u8, 1, 128, 255] {
            assert_eq!(Otsu.select(&hist_of(&Image::filled(v))), 0, "value {v}");
        }
    }

    #[test]
    fn empty_histogram_yields_zero() {
        assert_eq!(Otsu.select(&Histogram::new()), 0);
    }

    #[test]
    fn fixed_threshold_ignores_histogram() {
        let image = Image::from_fn(|x, _| (x * 4) as u8);
        assert_eq!(FixedThreshold::default().select(&hist_of(&image)), 128);
        let strategy = ThresholdStrategy::Fixed { level: 17 };
        assert_eq!(strategy.select(&hist_of(&image)), 17);
    }

    #[test]
    fn strategy_deserializes_from_tagged_json() {
        let s: ThresholdStrategy = serde_json::from_str(r#"{"kind":"fixed","level":90}"#).unwrap();
        assert_eq!(s, ThresholdStrategy::Fixed { level: 90 });
        let s: ThresholdStrategy = serde_json::from_str(r#"{"kind":"otsu"}"#).unwrap();
        assert_eq!(s, ThresholdStrategy::Otsu);
    }

    proptest! {
        #[test]
        fn bimodal_threshold_lies_between_modes(
            a in 0u8..255,
            gap in 1u8..=255,
            count_a in 1usize..PIXELS,
        ) {
            let b = a.saturating_add(gap);
            prop_assume!(b > a);
            let mut samples = vec![b; PIXELS];
            samples[..count_a].fill(a);
            let image = Image::from_slice(&samples).unwrap();
            let t = Otsu.select(&hist_of(&image));
            prop_assert!(a <= t && t < b, "a={} b={} t={}", a, b, t);
        }

        #[test]
        fn selection_is_deterministic(samples in prop::collection::vec(any::<u8>(), PIXELS)) {
            let hist = hist_of(&Image::from_slice(&samples).unwrap());
            prop_assert_eq!(Otsu.select(&hist), Otsu.select(&hist.clone()));
        }
    }
}
