//! Error types for Burstlink Frame

use thiserror::Error;

/// Frame processing error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Unknown code rate: {value}")]
    UnknownCodeRate { value: String },

    #[error("Core error: {0}")]
    Core(#[from] burstlink_core::CoreError),
}

/// Result type for Burstlink Frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
