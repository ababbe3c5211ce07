//! Error types for Burstlink Core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Result type for Burstlink Core operations
pub type Result<T> = std::result::Result<T, CoreError>;
