//! Synthetic test images.

use otsu_eval_core::{Image, ImageError, SIDE};
use serde::{Deserialize, Serialize};

/// Deterministic test image recipe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// Horizontal ramp: sample `i` is `(i mod 64) * 4`, levels `0, 4, ..., 252`.
    #[default]
    Gradient,
    /// Left half (`x < 32`) at `low`, right half at `high`.
    Split { low: u8, high: u8 },
    /// Every sample equal to `value`.
    Constant { value: u8 },
}

impl Pattern {
    pub fn render(&self) -> Image {
        match *self {
            Self::Gradient => Image::from_fn(|x, _| (x * 4) as u8),
            Self::Split { low, high } => {
                Image::from_fn(|x, _| if x < SIDE / 2 { low } else { high })
            }
            Self::Constant { value } => Image::filled(value),
        }
    }

    /// Short label for reports.
    pub fn describe(&self) -> String {
        match *self {
            Self::Gradient => "gradient".to_string(),
            Self::Split { low, high } => format!("split {low}/{high}"),
            Self::Constant { value } => format!("constant {value}"),
        }
    }
}

/// Headerless row-major samples, exactly one image worth.
pub fn image_from_raw(bytes: &[u8]) -> Result<Image, ImageError> {
    Image::from_slice(bytes)
}
