//! Camera ray generation.
//!
//! Builds per-pixel view-space directions from pinhole intrinsics, then
//! rotates them into world space with a camera-to-world pose.

use lume_math::{Interval, Mat3, Mat4, Ray, Vec2, Vec3};

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Per-axis focal length (fx, fy) in pixels
    pub focal: Vec2,
    /// Principal point; defaults to the image center when absent
    pub principal: Option<Vec2>,
}

impl Intrinsics {
    /// Create intrinsics with the principal point at the image center.
    pub fn new(width: u32, height: u32, focal: Vec2) -> Self {
        Self {
            width,
            height,
            focal,
            principal: None,
        }
    }

    /// Set an explicit principal point (cx, cy).
    pub fn with_principal(mut self, principal: Vec2) -> Self {
        self.principal = Some(principal);
        self
    }

    /// The effective principal point.
    pub fn principal_point(&self) -> Vec2 {
        self.principal
            .unwrap_or_else(|| Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0))
    }

    /// Total pixel count.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Rigid camera-to-world transform: rotation and translation.
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    pub rotation: Mat3,
    pub translation: Vec3,
}

impl Pose {
    /// Create a pose from rotation and translation.
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Extract the 3x4 rigid part of a 4x4 transform.
    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            rotation: Mat3::from_mat4(m),
            translation: m.w_axis.truncate(),
        }
    }

    pub const IDENTITY: Pose = Pose {
        rotation: Mat3::IDENTITY,
        translation: Vec3::ZERO,
    };
}

/// Per-pixel view-space ray directions for the whole image.
///
/// `dir(i, j) = ((i - cx) / fx, (j - cy) / fy, 1)` for column i and row j,
/// flattened row-major (rows outer, columns inner). Pixel coordinates are
/// used without the +0.5 center offset: real captures rarely have
/// calibration accurate to half a pixel, so the offset buys nothing.
/// Directions are not unit length.
pub fn ray_directions(intrinsics: &Intrinsics) -> Vec<Vec3> {
    let c = intrinsics.principal_point();
    let mut directions = Vec::with_capacity(intrinsics.pixel_count());

    for j in 0..intrinsics.height {
        for i in 0..intrinsics.width {
            directions.push(Vec3::new(
                (i as f32 - c.x) / intrinsics.focal.x,
                (j as f32 - c.y) / intrinsics.focal.y,
                1.0,
            ));
        }
    }

    directions
}

/// Generate world-space rays for every pixel of a posed camera.
///
/// Directions are rotated only (no translation); every ray's origin is the
/// pose translation. Direction lengths are preserved, so depth values along
/// these rays stay parametric rather than Euclidean.
pub fn generate_rays(intrinsics: &Intrinsics, pose: &Pose, bounds: Interval) -> Vec<Ray> {
    log::debug!(
        "generating {}x{} rays, depth {}..{}",
        intrinsics.width,
        intrinsics.height,
        bounds.min,
        bounds.max
    );

    ray_directions(intrinsics)
        .into_iter()
        .map(|dir| Ray {
            origin: pose.translation,
            direction: pose.rotation * dir,
            bounds,
        })
        .collect()
}
