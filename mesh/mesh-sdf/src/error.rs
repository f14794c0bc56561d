//! Error types for SDF voxelization.

use mesh_bvh::BvhError;
use thiserror::Error;

/// Result type for SDF operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur during SDF voxelization.
#[derive(Debug, Error)]
pub enum SdfError {
    /// The spatial index could not be built.
    #[error(transparent)]
    Bvh(#[from] BvhError),

    /// Grid exponent is zero or too large.
    #[error("invalid resolution exponent {exponent} (must be 1..={max})")]
    InvalidResolution {
        /// Requested exponent.
        exponent: u32,
        /// Largest supported exponent.
        max: u32,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The voxel buffers would not fit in the memory budget.
    #[error("cannot allocate {bytes} bytes for voxel data (limit {limit})")]
    AllocationFailed {
        /// Bytes requested.
        bytes: usize,
        /// Budget that was exceeded, or the requested size if the allocator refused.
        limit: usize,
    },

    /// A layer index past the last layer was requested.
    #[error("layer {layer} out of range (grid has {layers} layers)")]
    LayerOutOfRange {
        /// Requested layer.
        layer: usize,
        /// Number of layers in the grid.
        layers: usize,
    },

    /// The worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// A worker panicked; its partition produced no output.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the failed partition.
        worker: usize,
    },
}
