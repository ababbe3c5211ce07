//! Abstract radio transceiver
//!
//! The session controller drives the radio only through this trait.
//! Concrete drivers (PlutoSDR, loopback simulators, test stubs) live
//! outside the protocol core.

use burstlink_core::buffer::Complex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a radio device implementation.
#[derive(Error, Debug)]
#[error("{msg}")]
pub struct DeviceError {
    msg: String,
}

impl DeviceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Radio front-end settings applied once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioConfig {
    /// Device address, e.g. `ip:192.168.2.14`
    pub uri: String,
    /// Transmit carrier frequency in Hz
    pub tx_freq_hz: u64,
    /// Receive carrier frequency in Hz
    pub rx_freq_hz: u64,
    /// Baseband sample rate in Hz
    pub sample_rate_hz: u32,
    /// Transmit hardware gain in dB
    pub tx_gain_db: i32,
    /// Receive hardware gain in dB
    pub rx_gain_db: i32,
    /// Repeat the transmit buffer autonomously until released
    pub cyclic_tx: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            uri: "ip:192.168.2.14".to_string(),
            tx_freq_hz: 2_400_000_000,
            rx_freq_hz: 2_400_000_000,
            sample_rate_hz: 2_000_000,
            tx_gain_db: -30,
            rx_gain_db: 40,
            cyclic_tx: true,
        }
    }
}

/// Contract between the session controller and a transceiver driver.
///
/// `receive` blocks until one buffer of the configured size is
/// available. The release methods must be idempotent and safe to call
/// even if the corresponding buffer was never armed; releasing the
/// transmit buffer is what actually stops a cyclic transmission.
pub trait RadioDevice: Send {
    fn configure(&mut self, config: &RadioConfig) -> Result<(), DeviceError>;

    fn set_receive_buffer_size(&mut self, samples: usize) -> Result<(), DeviceError>;

    /// Arm playback of `samples`; returns once the buffer is handed to
    /// the device, which repeats it when configured for cyclic TX.
    fn transmit(&mut self, samples: &[Complex]) -> Result<(), DeviceError>;

    /// Blocking read of one receive buffer.
    fn receive(&mut self) -> Result<Vec<Complex>, DeviceError>;

    fn release_transmit_buffer(&mut self);

    fn release_receive_buffer(&mut self);
}
