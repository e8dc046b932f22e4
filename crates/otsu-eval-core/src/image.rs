//! Fixed-size grayscale and binarized image buffers.

use serde::Serialize;

/// Image side length in pixels.
pub const SIDE: usize = 64;
/// Number of samples in one image.
pub const PIXELS: usize = SIDE * SIDE;
/// Number of distinct 8-bit intensity levels.
pub const LEVELS: usize = 256;

/// Errors raised when external bytes are turned into an [`Image`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid grayscale buffer length (expected {expected} samples, got {got})")]
    InvalidLength { expected: usize, got: usize },
}

/// Fixed-size 8-bit grayscale image, row-major, [`SIDE`] × [`SIDE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>, // len = PIXELS
}

impl Image {
    /// Wrap a row-major buffer of exactly [`PIXELS`] samples.
    pub fn from_slice(samples: &[u8]) -> Result<Self, ImageError> {
        if samples.len() != PIXELS {
            return Err(ImageError::InvalidLength {
                expected: PIXELS,
                got: samples.len(),
            });
        }
        Ok(Self {
            data: samples.to_vec(),
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(PIXELS);
        for y in 0..SIDE {
            for x in 0..SIDE {
                data.push(f(x, y));
            }
        }
        Self { data }
    }

    /// Image with every sample equal to `value`.
    pub fn filled(value: u8) -> Self {
        Self {
            data: vec![value; PIXELS],
        }
    }

    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < SIDE && y < SIDE, "pixel ({x}, {y}) outside {SIDE}x{SIDE}");
        self.data[y * SIDE + x]
    }
}

/// Two-level image produced by the binarizer.
///
/// Every sample is exactly `0` or `1`, not `0`/`255`. Comparisons against the
/// source image go through [`BinarizedImage::rescaled`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BinarizedImage {
    data: Vec<u8>, // len = PIXELS, values in {0, 1}
}

impl Default for BinarizedImage {
    fn default() -> Self {
        Self::new()
    }
}

impl BinarizedImage {
    /// All-zero binarized buffer.
    pub fn new() -> Self {
        Self {
            data: vec![0; PIXELS],
        }
    }

    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < SIDE && y < SIDE, "pixel ({x}, {y}) outside {SIDE}x{SIDE}");
        self.data[y * SIDE + x]
    }

    /// Sample `i` on the 0–255 scale of the source image.
    #[inline]
    pub fn rescaled(&self, i: usize) -> f32 {
        (self.data[i] as u32 * 255) as f32
    }

    /// Number of foreground (`1`) samples.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Text preview, `#` for foreground and `.` for background, one line per row.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(PIXELS + SIDE);
        for row in self.data.chunks_exact(SIDE) {
            out.extend(row.iter().map(|&v| if v == 1 { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = Image::from_slice(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            ImageError::InvalidLength {
                expected: PIXELS,
                got: 10
            }
        );
    }

    #[test]
    fn from_fn_is_row_major() {
        let img = Image::from_fn(|x, y| (x + 2 * y) as u8);
        assert_eq!(img.get(3, 0), 3);
        assert_eq!(img.get(0, 1), 2);
        assert_eq!(img.samples()[SIDE + 5], 7);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside")]
    fn get_rejects_column_past_the_edge() {
        Image::filled(0).get(SIDE, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside")]
    fn binarized_get_rejects_row_past_the_edge() {
        BinarizedImage::new().get(0, SIDE);
    }

    #[test]
    fn render_ascii_has_one_line_per_row() {
        let mut bin = BinarizedImage::new();
        bin.samples_mut()[1] = 1;
        let text = bin.render_ascii();
        assert_eq!(text.lines().count(), SIDE);
        assert!(text.starts_with(".#.."));
        assert_eq!(bin.rescaled(1), 255.0);
        assert_eq!(bin.count_ones(), 1);
    }
}
