//! Error types for matrix multiplication.

use thiserror::Error;

/// Errors that can occur while setting up or running a multiply.
///
/// Every error is raised before the output is handed back, so a caller
/// never sees a partially computed product.
#[derive(Debug, Error)]
pub enum MatmulError {
    /// Dimension, block size or thread count preconditions failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The product matrix could not be allocated.
    #[error("Out of memory: could not allocate {elements} matrix elements")]
    OutOfMemory { elements: usize },

    /// The worker pool for the parallel path could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl MatmulError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MatmulError::InvalidConfiguration(msg.into())
    }
}

/// Result type for matrix operations.
pub type Result<T> = std::result::Result<T, MatmulError>;
