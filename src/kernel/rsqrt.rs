//! Reciprocal square root for the pair loop.
//!
//! The hardware estimate is refined by Newton-Raphson steps,
//! `y' = y * (1.5 - 0.5 * x * y * y)`, each of which roughly doubles the
//! number of correct bits. On x86 the `rsqrtps` estimate carries about 12
//! bits and one step suffices; other targets start from a coarser estimate
//! and take two. For normal positive inputs the relative error of the result
//! is below `1e-6`, i.e. within a few ulp of the correctly rounded
//! single-precision value.
//!
//! Zero and negative inputs give non-finite results; callers mask such lanes.

use wide::f32x4;

/// Documented relative error bound of [`invsqrt`] for normal positive inputs.
pub const INVSQRT_MAX_REL_ERROR: f32 = 1e-6;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const REFINEMENT_STEPS: usize = 1;
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
const REFINEMENT_STEPS: usize = 2;

/// Four-wide `1 / sqrt(x)`.
#[inline(always)]
pub fn invsqrt(x: f32x4) -> f32x4 {
    let mut y = x.recip_sqrt();
    for _ in 0..REFINEMENT_STEPS {
        y = refine(x, y);
    }
    y
}

/// One Newton-Raphson step for `1 / sqrt(x)` starting at `y`.
#[inline(always)]
fn refine(x: f32x4, y: f32x4) -> f32x4 {
    let half = f32x4::splat(0.5);
    let three_halves = f32x4::splat(1.5);
    y * (three_halves - half * x * y * y)
}

/// Scalar convenience wrapper around [`invsqrt`].
#[inline]
pub fn invsqrt_scalar(x: f32) -> f32 {
    invsqrt(f32x4::splat(x)).to_array()[0]
}
