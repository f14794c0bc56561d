//! Error types for BVH construction.

use thiserror::Error;

/// Errors that can occur while building a BVH.
#[derive(Debug, Error)]
pub enum BvhError {
    /// The hierarchy cannot be built in the requested state.
    #[error("invalid BVH state: {reason}")]
    InvalidState {
        /// Why the hierarchy could not be built.
        reason: String,
    },
}

/// Result type for BVH operations.
pub type BvhResult<T> = Result<T, BvhError>;
