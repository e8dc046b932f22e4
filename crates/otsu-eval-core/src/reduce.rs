//! Numeric reductions over `f32` sample buffers.
//!
//! The metric code only talks to the [`Reducer`] trait, so the portable
//! scalar path and the lane-parallel path can be swapped per pipeline. Both
//! accumulate in `f64` and round once to `f32`, so summation order moves the
//! result by at most an ulp or two rather than tens of ppm.

use multiversion::multiversion;
use serde::{Deserialize, Serialize};

/// Reductions used by the quality metrics.
pub trait Reducer {
    fn sum(&self, xs: &[f32]) -> f32;

    /// Sum of `x * x`.
    fn sum_of_squares(&self, xs: &[f32]) -> f32;

    /// Arithmetic mean; `0.0` for an empty slice.
    fn mean(&self, xs: &[f32]) -> f32 {
        if xs.is_empty() {
            return 0.0;
        }
        self.sum(xs) / xs.len() as f32
    }

    /// Population variance (divides by `n`); `0.0` for an empty slice.
    fn variance(&self, xs: &[f32]) -> f32;
}

/// Sequential left-to-right accumulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarReducer;

fn seq_sum_sq_dev(xs: &[f32], center: f32) -> f64 {
    let center = f64::from(center);
    let mut acc = 0f64;
    for &x in xs {
        let d = f64::from(x) - center;
        acc += d * d;
    }
    acc
}

impl Reducer for ScalarReducer {
    fn sum(&self, xs: &[f32]) -> f32 {
        let mut acc = 0f64;
        for &x in xs {
            acc += f64::from(x);
        }
        acc as f32
    }

    fn sum_of_squares(&self, xs: &[f32]) -> f32 {
        seq_sum_sq_dev(xs, 0.0) as f32
    }

    fn variance(&self, xs: &[f32]) -> f32 {
        if xs.is_empty() {
            return 0.0;
        }
        let mean = self.mean(xs);
        (seq_sum_sq_dev(xs, mean) / xs.len() as f64) as f32
    }
}

/// Eight independent `f64` lane accumulators, dispatched to the best available
/// vector ISA at runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimdReducer;

const LANES: usize = 8;

#[multiversion(targets(
    "x86_64+avx2+fma",
    "x86_64+avx",
    "x86_64+sse4.1",
    "aarch64+neon"
))]
fn lane_sum(xs: &[f32]) -> f64 {
    let mut acc = [0f64; LANES];
    let mut chunks = xs.chunks_exact(LANES);
    for chunk in &mut chunks {
        for (a, &x) in acc.iter_mut().zip(chunk) {
            *a += f64::from(x);
        }
    }
    let mut total = fold_lanes(&acc);
    for &x in chunks.remainder() {
        total += f64::from(x);
    }
    total
}

#[multiversion(targets(
    "x86_64+avx2+fma",
    "x86_64+avx",
    "x86_64+sse4.1",
    "aarch64+neon"
))]
fn lane_sum_sq_dev(xs: &[f32], center: f32) -> f64 {
    let center = f64::from(center);
    let mut acc = [0f64; LANES];
    let mut chunks = xs.chunks_exact(LANES);
    for chunk in &mut chunks {
        for (a, &x) in acc.iter_mut().zip(chunk) {
            let d = f64::from(x) - center;
            *a += d * d;
        }
    }
    let mut total = fold_lanes(&acc);
    for &x in chunks.remainder() {
        let d = f64::from(x) - center;
        total += d * d;
    }
    total
}

#[inline]
fn fold_lanes(acc: &[f64; LANES]) -> f64 {
    // pairwise, mirrors a horizontal vector add
    let a = [acc[0] + acc[4], acc[1] + acc[5], acc[2] + acc[6], acc[3] + acc[7]];
    (a[0] + a[2]) + (a[1] + a[3])
}

impl Reducer for SimdReducer {
    fn sum(&self, xs: &[f32]) -> f32 {
        lane_sum(xs) as f32
    }

    fn sum_of_squares(&self, xs: &[f32]) -> f32 {
        lane_sum_sq_dev(xs, 0.0) as f32
    }

    fn variance(&self, xs: &[f32]) -> f32 {
        if xs.is_empty() {
            return 0.0;
        }
        let mean = self.mean(xs);
        (lane_sum_sq_dev(xs, mean) / xs.len() as f64) as f32
    }
}

/// Reducer selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionStrategy {
    #[default]
    Scalar,
    Simd,
}

impl Reducer for ReductionStrategy {
    fn sum(&self, xs: &[f32]) -> f32 {
        match self {
            Self::Scalar => ScalarReducer.sum(xs),
            Self::Simd => SimdReducer.sum(xs),
        }
    }

    fn sum_of_squares(&self, xs: &[f32]) -> f32 {
        match self {
            Self::Scalar => ScalarReducer.sum_of_squares(xs),
            Self::Simd => SimdReducer.sum_of_squares(xs),
        }
    }

    fn variance(&self, xs: &[f32]) -> f32 {
        match self {
            Self::Scalar => ScalarReducer.variance(xs),
            Self::Simd => SimdReducer.variance(xs),
        }
    }
}
