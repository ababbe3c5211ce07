//! Session configuration

use crate::device::RadioConfig;
use crate::{Result, SessionError};
use burstlink_frame::fec::CodeRate;
use burstlink_modem::waveform::MIN_SPS;
use serde::{Deserialize, Serialize};

/// Parameters for one transmit/receive cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Radio device address
    pub uri: String,
    /// FEC code rate
    pub rate: CodeRate,
    /// Samples per transmitted bit
    pub sps: usize,
    /// Transmit hardware gain in dB
    pub tx_gain_db: i32,
    /// Receive hardware gain in dB
    pub rx_gain_db: i32,
    /// Transmit carrier frequency in Hz
    pub tx_freq_hz: u64,
    /// Receive carrier frequency in Hz
    pub rx_freq_hz: u64,
    /// Baseband sample rate in Hz
    pub sample_rate_hz: u32,
    /// Fail-safe receive read budget
    pub max_reads: usize,
    /// Uncounted receive reads before transmit is armed
    pub warmup_reads: usize,
    /// Delay between arming transmit and the first counted read
    pub settle_millis: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let radio = RadioConfig::default();
        Self {
            uri: radio.uri,
            rate: CodeRate::Half,
            sps: 10,
            tx_gain_db: radio.tx_gain_db,
            rx_gain_db: radio.rx_gain_db,
            tx_freq_hz: radio.tx_freq_hz,
            rx_freq_hz: radio.rx_freq_hz,
            sample_rate_hz: radio.sample_rate_hz,
            max_reads: 4000,
            warmup_reads: 2,
            settle_millis: 150,
        }
    }
}

impl SessionConfig {
    /// Check the parameters before any device interaction.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(SessionError::invalid_config("device URI is empty"));
        }
        if self.sps < MIN_SPS {
            return Err(SessionError::invalid_config(format!(
                "samples-per-symbol must be at least {MIN_SPS}, got {}",
                self.sps
            )));
        }
        if self.max_reads == 0 {
            return Err(SessionError::invalid_config("max reads must be at least 1"));
        }
        if self.sample_rate_hz == 0 {
            return Err(SessionError::invalid_config("sample rate must be nonzero"));
        }
        Ok(())
    }

    /// Front-end settings derived from this session's parameters.
    pub fn radio_config(&self) -> RadioConfig {
        RadioConfig {
            uri: self.uri.clone(),
            tx_freq_hz: self.tx_freq_hz,
            rx_freq_hz: self.rx_freq_hz,
            sample_rate_hz: self.sample_rate_hz,
            tx_gain_db: self.tx_gain_db,
            rx_gain_db: self.rx_gain_db,
            cyclic_tx: true,
        }
    }
}
