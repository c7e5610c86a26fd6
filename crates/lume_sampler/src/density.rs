//! Density field capability and a voxel-grid reference backend.
//!
//! The sampling core never interprets densities itself; it only queries a
//! scalar field at normalized coordinates to weight its depth samples. Any
//! backend satisfies the same contract: a learned model, a baked voxel grid,
//! or a procedural closure.

use lume_math::Vec3;

use crate::error::{SamplerError, SamplerResult};

/// A queryable scalar density over the normalized unit cube.
///
/// Coordinates are box-relative in [0,1]^3; how the backend interpolates is
/// its own concern. Implementations must be thread-safe: batch marching
/// queries the field from multiple rayon workers at once.
pub trait DensityField: Send + Sync {
    /// Density at a normalized position. Out-of-cube queries are allowed
    /// and should return something finite (typically an edge clamp or 0).
    fn density(&self, p: Vec3) -> f32;
}

/// Adapter exposing a thread-safe closure as a density field.
///
/// Handy for procedural fields and test doubles:
/// `ProceduralField(|p| (-p.length_squared()).exp())`.
pub struct ProceduralField<F>(pub F);

impl<F> DensityField for ProceduralField<F>
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    fn density(&self, p: Vec3) -> f32 {
        (self.0)(p)
    }
}

/// Dense scalar voxel grid with trilinear filtering.
///
/// Values are stored x-fastest, then y, then z. Queries clamp to the edge
/// voxels, so out-of-cube positions return the nearest boundary value.
#[derive(Debug)]
pub struct VoxelGrid {
    nx: usize,
    ny: usize,
    nz: usize,
    data: Vec<f32>,
}

impl VoxelGrid {
    /// Create a grid from dimensions and x-fastest cell data.
    pub fn new(nx: usize, ny: usize, nz: usize, data: Vec<f32>) -> SamplerResult<Self> {
        if data.len() != nx * ny * nz || nx == 0 || ny == 0 || nz == 0 {
            return Err(SamplerError::GridSizeMismatch {
                nx,
                ny,
                nz,
                got: data.len(),
            });
        }
        Ok(Self { nx, ny, nz, data })
    }

    /// Grid dimensions (nx, ny, nz).
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    #[inline]
    fn at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[(z * self.ny + y) * self.nx + x]
    }

    /// Split a normalized coordinate into clamped cell indices and the
    /// fractional offset between them.
    #[inline]
    fn cell(t: f32, n: usize) -> (usize, usize, f32) {
        let g = (t.clamp(0.0, 1.0) * (n - 1) as f32).min((n - 1) as f32);
        let i0 = g.floor() as usize;
        let i1 = (i0 + 1).min(n - 1);
        (i0, i1, g - i0 as f32)
    }
}

impl DensityField for VoxelGrid {
    fn density(&self, p: Vec3) -> f32 {
        let (x0, x1, fx) = Self::cell(p.x, self.nx);
        let (y0, y1, fy) = Self::cell(p.y, self.ny);
        let (z0, z1, fz) = Self::cell(p.z, self.nz);

        // Blend along x, then y, then z
        let c00 = self.at(x0, y0, z0) * (1.0 - fx) + self.at(x1, y0, z0) * fx;
        let c10 = self.at(x0, y1, z0) * (1.0 - fx) + self.at(x1, y1, z0) * fx;
        let c01 = self.at(x0, y0, z1) * (1.0 - fx) + self.at(x1, y0, z1) * fx;
        let c11 = self.at(x0, y1, z1) * (1.0 - fx) + self.at(x1, y1, z1) * fx;

        let c0 = c00 * (1.0 - fy) + c10 * fy;
        let c1 = c01 * (1.0 - fy) + c11 * fy;

        c0 * (1.0 - fz) + c1 * fz
    }
}
