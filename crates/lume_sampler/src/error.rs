//! Error types for ray batch parsing and sampling.

use thiserror::Error;

/// Errors that can occur while parsing ray batches or drawing samples.
///
/// These are shape/contract violations raised before any work is done;
/// degenerate numeric inputs are epsilon-guarded and never error.
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("ray batch of {len} floats does not divide into 8-float records")]
    RaggedBatch { len: usize },

    #[error("bins must hold one boundary more than weights: got {boundaries} boundaries for {weights} weights")]
    BinWeightMismatch { boundaries: usize, weights: usize },

    #[error("voxel grid of {got} cells does not match {nx}x{ny}x{nz} dimensions")]
    GridSizeMismatch {
        nx: usize,
        ny: usize,
        nz: usize,
        got: usize,
    },
}

pub type SamplerResult<T> = Result<T, SamplerError>;
