//! Error types for Burstlink Session

use thiserror::Error;

/// Session error types
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session configuration: {msg}")]
    InvalidConfig { msg: String },

    #[error("Device error: {0}")]
    Device(#[from] crate::device::DeviceError),

    #[error("Frame error: {0}")]
    Frame(#[from] burstlink_frame::FrameError),

    #[error("Modem error: {0}")]
    Modem(#[from] burstlink_modem::ModemError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        SessionError::InvalidConfig { msg: msg.into() }
    }
}

/// Result type for Burstlink Session operations
pub type Result<T> = std::result::Result<T, SessionError>;
