//! Ray type for volumetric sampling.
//!
//! A ray is defined by a world-space origin, a direction vector, and the
//! depth interval over which samples may be placed.

use bytemuck::{Pod, Zeroable};

use crate::{Interval, Vec3};

/// A ray with origin, direction, and valid depth bounds.
///
/// The direction is deliberately not normalized: depth values are parametric
/// distances along `direction`, so consumers that need Euclidean distance
/// must scale by the direction's length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Near/far depth range in which samples are valid.
    pub bounds: Interval,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, near: f32, far: f32) -> Self {
        Self {
            origin,
            direction,
            bounds: Interval::new(near, far),
        }
    }

    /// Near depth bound.
    #[inline]
    pub fn near(&self) -> f32 {
        self.bounds.min
    }

    /// Far depth bound.
    #[inline]
    pub fn far(&self) -> f32 {
        self.bounds.max
    }

    /// Compute the point along the ray at depth z.
    /// P(z) = origin + z * direction
    #[inline]
    pub fn at(&self, z: f32) -> Vec3 {
        self.origin + z * self.direction
    }

    /// Convert to the flat wire record.
    #[inline]
    pub fn to_record(&self) -> RayRecord {
        RayRecord {
            origin: self.origin.to_array(),
            direction: self.direction.to_array(),
            near: self.bounds.min,
            far: self.bounds.max,
        }
    }

    /// Build a ray from the flat wire record.
    #[inline]
    pub fn from_record(record: RayRecord) -> Self {
        Self {
            origin: Vec3::from_array(record.origin),
            direction: Vec3::from_array(record.direction),
            bounds: Interval::new(record.near, record.far),
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            bounds: Interval::new(0.0, 1.0),
        }
    }
}

/// Flat 8-float ray record: `[ox, oy, oz, dx, dy, dz, near, far]`.
///
/// The batch wire format is a sequence of these, one per pixel in pixel
/// order. `Pod` so flat `f32` buffers cast directly without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RayRecord {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl RayRecord {
    /// Number of f32 components per record.
    pub const WIDTH: usize = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0, 10.0);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_ray_at_unnormalized_direction() {
        // Depth is parametric: doubling the direction doubles the step.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.0, 1.0);
        assert_eq!(ray.at(1.0), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_bounds() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.5, 4.0);
        assert_eq!(ray.near(), 0.5);
        assert_eq!(ray.far(), 4.0);
        assert!(ray.bounds.contains(2.0));
    }

    #[test]
    fn test_record_round_trip() {
        let ray = Ray::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.1, -0.2, -1.0),
            0.5,
            6.0,
        );

        let record = ray.to_record();
        assert_eq!(record.origin, [1.0, 2.0, 3.0]);
        assert_eq!(record.near, 0.5);
        assert_eq!(Ray::from_record(record), ray);
    }

    #[test]
    fn test_record_layout() {
        // The wire format is exactly 8 tightly packed floats.
        assert_eq!(
            std::mem::size_of::<RayRecord>(),
            RayRecord::WIDTH * std::mem::size_of::<f32>()
        );
    }
}
