//! Camera ray generation and depth sampling for volumetric rendering.
//!
//! The pipeline: per-pixel rays from camera intrinsics and pose, an optional
//! bounded-volume (NDC) remap for unbounded scenes, coarse depth sampling,
//! density-guided importance resampling, and finally world-space sample
//! positions. The density/color network and the compositor that consume
//! these samples live elsewhere; this crate only decides where to sample.

mod batch;
mod camera;
mod density;
mod depth;
mod error;
mod importance;
mod marcher;
mod ndc;

pub use batch::{rays_from_records, rays_to_records};
pub use camera::{generate_rays, ray_directions, Intrinsics, Pose};
pub use density::{DensityField, ProceduralField, VoxelGrid};
pub use depth::{perturb_depths, sample_depths, DepthSpacing};
pub use error::{SamplerError, SamplerResult};
pub use importance::sample_pdf;
pub use marcher::{march_batch, march_ray, DensityGuide, MarchConfig, RaySamples};
pub use ndc::{ndc_ray, ndc_rays};

/// Re-export math types from lume_math
pub use lume_math::{Aabb, Interval, Mat3, Mat4, Ray, RayRecord, Vec2, Vec3};

use rand::RngCore;

/// Uniform f32 in [0, 1) from a type-erased RNG.
///
/// 24 high bits of a draw, so every representable value is equally likely.
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(123);
        for _ in 0..1000 {
            let v = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_end_to_end_coarse_pipeline() {
        // Generate a tiny camera's rays and march them coarse-only
        let intrinsics = Intrinsics::new(2, 2, Vec2::splat(1.0));
        let rays = generate_rays(&intrinsics, &Pose::IDENTITY, Interval::new(1.0, 2.0));

        let config = MarchConfig {
            coarse_samples: 2,
            ..MarchConfig::default()
        };
        let batch = march_batch(&rays, &config, None, 0).unwrap();

        assert_eq!(batch.len(), 4);
        for samples in &batch {
            assert_eq!(samples.z_vals, vec![1.0, 2.0]);
        }
    }
}
