//! PSNR and global SSIM between a source image and its binarization.
//!
//! Both metrics compare the source samples against the binarized samples
//! rescaled to `0`/`255`. SSIM is computed from statistics of the whole image
//! taken as one population, not from sliding windows.

use crate::image::{BinarizedImage, Image, PIXELS};
use crate::reduce::{Reducer, ReductionStrategy};
use serde::{Deserialize, Serialize};

/// Peak intensity of an 8-bit sample.
pub const MAX_LEVEL: f32 = 255.0;
/// PSNR reported when the two images are identical.
pub const PSNR_IDENTICAL: f32 = 100.0;
/// `(0.01 * 255)^2`
pub const SSIM_C1: f32 = 6.5025;
/// `(0.03 * 255)^2`
pub const SSIM_C2: f32 = 58.5225;

/// Fidelity of one binarization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Peak signal-to-noise ratio in dB.
    pub psnr: f32,
    /// Global structural similarity.
    pub ssim: f32,
}

/// Computes [`Metrics`] with a pluggable [`Reducer`].
///
/// Owns its float scratch buffers; they are sized once at construction and
/// overwritten on every call.
#[derive(Clone, Debug)]
pub struct MetricEvaluator<R = ReductionStrategy> {
    reducer: R,
    original: Vec<f32>,
    rescaled: Vec<f32>,
    work: Vec<f32>,
}

impl<R: Reducer> MetricEvaluator<R> {
    pub fn new(reducer: R) -> Self {
        Self {
            reducer,
            original: vec![0.0; PIXELS],
            rescaled: vec![0.0; PIXELS],
            work: vec![0.0; PIXELS],
        }
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    pub fn evaluate(&mut self, image: &Image, binarized: &BinarizedImage) -> Metrics {
        self.load(image, binarized);
        Metrics {
            psnr: self.psnr_loaded(),
            ssim: self.ssim_loaded(),
        }
    }

    pub fn psnr(&mut self, image: &Image, binarized: &BinarizedImage) -> f32 {
        self.load(image, binarized);
        self.psnr_loaded()
    }

    pub fn ssim(&mut self, image: &Image, binarized: &BinarizedImage) -> f32 {
        self.load(image, binarized);
        self.ssim_loaded()
    }

    fn load(&mut self, image: &Image, binarized: &BinarizedImage) {
        for (i, (o, b)) in self
            .original
            .iter_mut()
            .zip(self.rescaled.iter_mut())
            .enumerate()
        {
            *o = image.samples()[i] as f32;
            *b = binarized.rescaled(i);
        }
    }

    fn psnr_loaded(&mut self) -> f32 {
        for ((d, &o), &b) in self
            .work
            .iter_mut()
            .zip(&self.original)
            .zip(&self.rescaled)
        {
            *d = o - b;
        }
        let mse = self.reducer.sum_of_squares(&self.work) / PIXELS as f32;
        if mse == 0.0 {
            return PSNR_IDENTICAL;
        }
        10.0 * (MAX_LEVEL * MAX_LEVEL / mse).log10()
    }

    fn ssim_loaded(&mut self) -> f32 {
        let mean_o = self.reducer.mean(&self.original);
        let mean_b = self.reducer.mean(&self.rescaled);
        let var_o = self.reducer.variance(&self.original);
        let var_b = self.reducer.variance(&self.rescaled);

        for ((p, &o), &b) in self
            .work
            .iter_mut()
            .zip(&self.original)
            .zip(&self.rescaled)
        {
            *p = (o - mean_o) * (b - mean_b);
        }
        let covar = self.reducer.mean(&self.work);

        let num = (2.0 * mean_o * mean_b + SSIM_C1) * (2.0 * covar + SSIM_C2);
        let den = (mean_o * mean_o + mean_b * mean_b + SSIM_C1) * (var_o + var_b + SSIM_C2);
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binarize::binarize;
    use crate::image::SIDE;
    use crate::reduce::{ScalarReducer, SimdReducer};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn gradient() -> Image {
        Image::from_fn(|x, _| (x * 4) as u8)
    }

    #[test]
    fn exact_reproduction_gives_sentinel_psnr() {
        let image = Image::from_fn(|x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
        let bin = binarize(&image, 0);
        let mut eval = MetricEvaluator::new(ScalarReducer);
        let m = eval.evaluate(&image, &bin);
        assert_eq!(m.psnr, PSNR_IDENTICAL);
        assert_relative_eq!(m.ssim, 1.0, max_relative = 1e-5);
    }

    #[test]
    fn constant_image_psnr_is_finite() {
        let image = Image::filled(100);
        let bin = binarize(&image, 0);
        let mut eval = MetricEvaluator::new(ScalarReducer);
        let m = eval.evaluate(&image, &bin);
        // every sample is off by 155
        let expected = 10.0 * (255.0f32 * 255.0 / (155.0 * 155.0)).log10();
        assert!(m.psnr.is_finite());
        assert_relative_eq!(m.psnr, expected, max_relative = 1e-3);
        assert!(m.ssim.is_finite());
    }

    #[test]
    fn psnr_matches_direct_mse() {
        let image = gradient();
        let bin = binarize(&image, 124);
        let mut mse = 0f64;
        for (i, &v) in image.samples().iter().enumerate() {
            let d = v as f64 - bin.rescaled(i) as f64;
            mse += d * d;
        }
        mse /= (SIDE * SIDE) as f64;
        let expected = 10.0 * (255.0f64 * 255.0 / mse).log10();
        let mut eval = MetricEvaluator::new(ScalarReducer);
        assert_relative_eq!(eval.psnr(&image, &bin) as f64, expected, max_relative = 1e-5);
    }

    #[test]
    fn ssim_matches_global_formula() {
        let image = gradient();
        let bin = binarize(&image, 124);
        let n = (SIDE * SIDE) as f64;
        let o: Vec<f64> = image.samples().iter().map(|&v| v as f64).collect();
        let b: Vec<f64> = (0..SIDE * SIDE).map(|i| bin.rescaled(i) as f64).collect();
        let mo = o.iter().sum::<f64>() / n;
        let mb = b.iter().sum::<f64>() / n;
        let vo = o.iter().map(|v| (v - mo) * (v - mo)).sum::<f64>() / n;
        let vb = b.iter().map(|v| (v - mb) * (v - mb)).sum::<f64>() / n;
        let cov = o.iter().zip(&b).map(|(x, y)| (x - mo) * (y - mb)).sum::<f64>() / n;
        let (c1, c2) = (SSIM_C1 as f64, SSIM_C2 as f64);
        let expected =
            (2.0 * mo * mb + c1) * (2.0 * cov + c2) / ((mo * mo + mb * mb + c1) * (vo + vb + c2));

        let mut eval = MetricEvaluator::new(ScalarReducer);
        assert_relative_eq!(eval.ssim(&image, &bin) as f64, expected, max_relative = 1e-5);
    }

    #[test]
    fn scalar_and_simd_paths_agree() {
        let image = gradient();
        let bin = binarize(&image, 124);
        let a = MetricEvaluator::new(ScalarReducer).evaluate(&image, &bin);
        let b = MetricEvaluator::new(SimdReducer).evaluate(&image, &bin);
        assert_relative_eq!(a.psnr, b.psnr, max_relative = 5e-6);
        assert_relative_eq!(a.ssim, b.ssim, max_relative = 5e-6);
    }

    #[test]
    fn scratch_reuse_does_not_leak_between_calls() {
        let mut eval = MetricEvaluator::new(ReductionStrategy::Simd);
        let noisy = gradient();
        let _ = eval.evaluate(&noisy, &binarize(&noisy, 200));
        let black = Image::filled(0);
        let m = eval.evaluate(&black, &binarize(&black, 0));
        assert_eq!(m.psnr, PSNR_IDENTICAL);
    }

    proptest! {
        #[test]
        fn reducers_agree_on_random_images(
            samples in prop::collection::vec(any::<u8>(), PIXELS),
            threshold in any::<u8>(),
        ) {
            let image = Image::from_slice(&samples).unwrap();
            let bin = binarize(&image, threshold);
            let a = MetricEvaluator::new(ScalarReducer).evaluate(&image, &bin);
            let b = MetricEvaluator::new(SimdReducer).evaluate(&image, &bin);
            prop_assert!(approx::relative_eq!(a.psnr, b.psnr, max_relative = 5e-6));
            prop_assert!(approx::relative_eq!(a.ssim, b.ssim, max_relative = 5e-6));
        }
    }
}
