//! Error types for Burstlink Modem

use thiserror::Error;

/// Modem error types
#[derive(Error, Debug)]
pub enum ModemError {
    #[error("Invalid samples-per-symbol: {sps} (minimum 2)")]
    InvalidSamplesPerSymbol { sps: usize },
}

/// Result type for Burstlink Modem operations
pub type Result<T> = std::result::Result<T, ModemError>;
