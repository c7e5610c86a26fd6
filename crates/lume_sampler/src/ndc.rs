//! Bounded-volume reparameterization of camera rays.
//!
//! Folds an unbounded forward depth range into a finite cuboid so that
//! evenly spaced depth samples cover the whole scene: the near plane lands
//! at remapped z = -1 and infinite depth at z = +1. Worth applying only to
//! forward-facing captures with large depth extent; bounded scenes skip the
//! remap entirely, and that choice belongs to the caller.

use lume_math::{Interval, Ray, Vec3};

use crate::camera::Intrinsics;

/// Divisors this close to zero are nudged away from it, preserving sign.
const DIV_EPS: f32 = 1e-6;

#[inline]
fn stable(v: f32) -> f32 {
    if v.abs() < DIV_EPS {
        DIV_EPS.copysign(v)
    } else {
        v
    }
}

/// Remap a single world-space ray into the bounded cuboid space.
///
/// The origin is first advanced along the ray onto the `z = -near` plane,
/// then a perspective-style remap is applied to x/y and depth is folded as
/// `1 + 2 near / o.z`. The direction remap is the closed-form derivative of
/// the position remap with respect to depth. The returned ray carries [0, 1]
/// depth bounds, the sampling convention of the remapped space.
pub fn ndc_ray(intrinsics: &Intrinsics, near: f32, ray: &Ray) -> Ray {
    let d = ray.direction;
    let dz = stable(d.z);

    // Shift the origin onto the near plane
    let t = -(near + ray.origin.z) / dz;
    let o = ray.origin + t * d;
    let oz = stable(o.z);

    let sx = -(2.0 * intrinsics.focal.x) / intrinsics.width as f32;
    let sy = -(2.0 * intrinsics.focal.y) / intrinsics.height as f32;

    let ox_oz = o.x / oz;
    let oy_oz = o.y / oz;

    let origin = Vec3::new(sx * ox_oz, sy * oy_oz, 1.0 + 2.0 * near / oz);
    let direction = Vec3::new(
        sx * (d.x / dz - ox_oz),
        sy * (d.y / dz - oy_oz),
        1.0 - origin.z,
    );

    Ray {
        origin,
        direction,
        bounds: Interval::new(0.0, 1.0),
    }
}

/// Remap a whole batch of rays.
pub fn ndc_rays(intrinsics: &Intrinsics, near: f32, rays: &[Ray]) -> Vec<Ray> {
    rays.iter().map(|ray| ndc_ray(intrinsics, near, ray)).collect()
}
