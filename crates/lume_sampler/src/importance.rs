//! Inverse-CDF importance resampling of depth values.
//!
//! Given per-interval weights over a ray's coarse depth bins, draws extra
//! depth samples concentrated where weight is high by inverting the
//! piecewise-linear CDF of the normalized weights.

use rand::RngCore;

use crate::error::{SamplerError, SamplerResult};
use crate::gen_f32;

/// Padding added to every weight so no bin is numerically unreachable.
const WEIGHT_EPS: f32 = 1e-5;

/// CDF spans narrower than this invert with a unit denominator instead of
/// dividing; t then degenerates to `u - cdf_below`, still bounded.
const CDF_SPAN_EPS: f32 = 1e-5;

/// Draw `count` depth samples from the distribution implied by `weights`.
///
/// `bins` holds the ordered interval boundaries, one more than `weights`;
/// weight k covers `[bins[k], bins[k + 1]]`. Weights may be any non-negative
/// values, including all zeros: the epsilon padding turns a zero row into a
/// near-uniform distribution rather than a division by zero.
///
/// Deterministic mode spaces the target probabilities evenly over [0, 1]
/// and is bit-reproducible; otherwise each target is an independent uniform
/// draw from `rng`. Output is not sorted; callers merging with the coarse
/// depths sort afterwards.
pub fn sample_pdf(
    bins: &[f32],
    weights: &[f32],
    count: usize,
    deterministic: bool,
    rng: &mut dyn RngCore,
) -> SamplerResult<Vec<f32>> {
    if bins.len() != weights.len() + 1 {
        return Err(SamplerError::BinWeightMismatch {
            boundaries: bins.len(),
            weights: weights.len(),
        });
    }

    let total: f32 = weights.iter().map(|w| w + WEIGHT_EPS).sum();

    // CDF prefixed with 0: non-decreasing from 0 to 1, same length as bins
    let mut cdf = Vec::with_capacity(bins.len());
    cdf.push(0.0);
    let mut acc = 0.0;
    for &w in weights {
        acc += (w + WEIGHT_EPS) / total;
        cdf.push(acc);
    }

    let mut samples = Vec::with_capacity(count);
    for k in 0..count {
        let u = if deterministic {
            if count > 1 {
                k as f32 / (count - 1) as f32
            } else {
                0.0
            }
        } else {
            gen_f32(rng)
        };
        samples.push(invert_cdf(&cdf, bins, u));
    }

    Ok(samples)
}

/// Invert the CDF at target probability `u`.
///
/// Right-inclusive search: a `u` equal to a CDF boundary selects the
/// interval above it. The located interval is inverted linearly.
fn invert_cdf(cdf: &[f32], bins: &[f32], u: f32) -> f32 {
    // Count of CDF entries <= u; cdf[0] = 0 keeps this >= 1
    let idx = cdf.partition_point(|&c| c <= u);
    let below = idx.saturating_sub(1).min(cdf.len() - 1);
    let above = idx.min(cdf.len() - 1);

    let span = cdf[above] - cdf[below];
    let denom = if span < CDF_SPAN_EPS { 1.0 } else { span };
    let t = (u - cdf[below]) / denom;

    bins[below] + t * (bins[above] - bins[below])
}
