//! Coarse depth sampling along rays.
//!
//! Produces evenly spaced depth values between a ray's near and far bounds,
//! in linear depth or in disparity (inverse depth), with optional stratified
//! jitter.

use rand::RngCore;

use lume_math::Interval;

use crate::gen_f32;

/// How coarse depth samples are spaced between near and far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthSpacing {
    /// Even steps in depth: `z = near (1 - s) + far s`
    #[default]
    Linear,
    /// Even steps in inverse depth: `z = 1 / (1/near (1 - s) + 1/far s)`.
    /// Concentrates samples close to the camera; the usual choice for
    /// forward-facing scenes.
    Disparity,
}

/// Produce `count` depth values spanning `bounds`, ascending.
///
/// The first sample is exactly `bounds.min` and the last exactly
/// `bounds.max` (in disparity mode, exact in 1/z).
pub fn sample_depths(bounds: Interval, count: usize, spacing: DepthSpacing) -> Vec<f32> {
    let mut z_vals = Vec::with_capacity(count);

    for k in 0..count {
        let s = if count > 1 {
            k as f32 / (count - 1) as f32
        } else {
            0.0
        };
        z_vals.push(match spacing {
            DepthSpacing::Linear => bounds.lerp(s),
            DepthSpacing::Disparity => {
                1.0 / (1.0 / bounds.min * (1.0 - s) + 1.0 / bounds.max * s)
            }
        });
    }

    z_vals
}

/// Stratified jitter of depth samples, in place.
///
/// Each sample moves within its own sub-interval: the fences are the
/// midpoints between neighbors, with the first and last slots clamped to the
/// outer edges. `strength` in [0, 1] scales the uniform draw per slot, so
/// the sequence stays ascending and full coverage is preserved.
pub fn perturb_depths(z_vals: &mut [f32], strength: f32, rng: &mut dyn RngCore) {
    if z_vals.len() < 2 || strength <= 0.0 {
        return;
    }

    let mids: Vec<f32> = z_vals.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    let last = z_vals.len() - 1;

    for k in 0..z_vals.len() {
        let lower = if k == 0 { z_vals[0] } else { mids[k - 1] };
        let upper = if k == last { z_vals[last] } else { mids[k] };
        z_vals[k] = lower + (upper - lower) * strength * gen_f32(rng);
    }
}
