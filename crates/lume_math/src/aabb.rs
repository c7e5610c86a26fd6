use crate::{Interval, Vec3};

/// Axis-Aligned Bounding Box, one interval per axis.
///
/// Bounds the world-space region covered by a density volume; sample points
/// are normalized against it before lookup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Minimum corner.
    pub fn min_point(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max_point(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Per-axis extent (max - min).
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.x.size(), self.y.size(), self.z.size())
    }

    /// Returns true if the point lies inside the box (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Map a world-space point into the box-relative [0,1]^3 cube.
    ///
    /// Points outside the box map outside [0,1]^3; degenerate axes are
    /// widened so the division stays finite.
    pub fn normalize_point(&self, p: Vec3) -> Vec3 {
        let delta = p - self.min_point();
        let extent = self.extent().max(Vec3::splat(1e-6));
        delta / extent
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min_point() + self.max_point()) * 0.5
    }
}
