//! Fixed-threshold binarization into a reusable 0/1 buffer.

use crate::image::{BinarizedImage, Image};

/// Write `1` where the sample is strictly above `threshold`, `0` elsewhere.
pub fn binarize_into(image: &Image, threshold: u8, out: &mut BinarizedImage) {
    for (dst, &src) in out.samples_mut().iter_mut().zip(image.samples()) {
        *dst = u8::from(src > threshold);
    }
}

/// Allocating variant of [`binarize_into`].
pub fn binarize(image: &Image, threshold: u8) -> BinarizedImage {
    let mut out = BinarizedImage::new();
    binarize_into(image, threshold, &mut out);
    out
}
