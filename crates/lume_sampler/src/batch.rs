//! Flat wire-format parsing for ray batches.
//!
//! A batch arrives as a flat float buffer, 8 floats per ray:
//! `[ox, oy, oz, dx, dy, dz, near, far]`. Order is pixel order.

use lume_math::{Ray, RayRecord};

use crate::error::{SamplerError, SamplerResult};

/// Parse a flat float buffer into rays.
///
/// Fails fast if the buffer does not divide into 8-float records; no rays
/// are produced on error.
pub fn rays_from_records(data: &[f32]) -> SamplerResult<Vec<Ray>> {
    if data.len() % RayRecord::WIDTH != 0 {
        return Err(SamplerError::RaggedBatch { len: data.len() });
    }

    let records: &[RayRecord] = bytemuck::cast_slice(data);
    Ok(records.iter().map(|&r| Ray::from_record(r)).collect())
}

/// Flatten rays back into the wire format.
pub fn rays_to_records(rays: &[Ray]) -> Vec<f32> {
    let records: Vec<RayRecord> = rays.iter().map(|r| r.to_record()).collect();
    bytemuck::cast_slice(&records).to_vec()
}
