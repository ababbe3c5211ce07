//! Loopback session runner
//!
//! A simulated radio that plays the armed waveform back into its own
//! receiver, with optional uniform noise. Drives the complete one-shot
//! session cycle without hardware.

use anyhow::Result;
use burstlink_core::buffer::Complex;
use burstlink_session::config::SessionConfig;
use burstlink_session::device::{DeviceError, RadioConfig, RadioDevice};
use burstlink_session::observer::SessionObserver;
use burstlink_session::session::{SessionHandle, SessionOutcome};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::common::{select_source, ConsoleObserver, ReceivedFileStore};

/// Simulated transceiver: cyclic playback of the armed waveform into
/// the receive path.
pub struct LoopbackRadio {
    buffer_size: usize,
    waveform: Option<Vec<Complex>>,
    position: usize,
    noise_amplitude: f64,
    rng: StdRng,
}

impl LoopbackRadio {
    pub fn new(noise_amplitude: f64) -> Self {
        Self {
            buffer_size: 0,
            waveform: None,
            position: 0,
            noise_amplitude,
            rng: StdRng::seed_from_u64(0x6c6f6f70),
        }
    }

    fn noise(&mut self) -> f64 {
        if self.noise_amplitude > 0.0 {
            (self.rng.gen::<f64>() - 0.5) * 2.0 * self.noise_amplitude
        } else {
            0.0
        }
    }
}

impl RadioDevice for LoopbackRadio {
    fn configure(&mut self, config: &RadioConfig) -> std::result::Result<(), DeviceError> {
        debug!(uri = %config.uri, "loopback configured");
        Ok(())
    }

    fn set_receive_buffer_size(&mut self, samples: usize) -> std::result::Result<(), DeviceError> {
        self.buffer_size = samples;
        Ok(())
    }

    fn transmit(&mut self, samples: &[Complex]) -> std::result::Result<(), DeviceError> {
        if samples.is_empty() {
            return Err(DeviceError::new("empty transmit buffer"));
        }
        // capture begins mid-frame, like a receiver joining a stream
        self.position = samples.len() / 2;
        self.waveform = Some(samples.to_vec());
        Ok(())
    }

    fn receive(&mut self) -> std::result::Result<Vec<Complex>, DeviceError> {
        if self.buffer_size == 0 {
            return Err(DeviceError::new("receive buffer not configured"));
        }
        let mut buffer = Vec::with_capacity(self.buffer_size);
        match self.waveform.is_some() {
            true => {
                let len = self.waveform.as_ref().unwrap().len();
                for i in 0..self.buffer_size {
                    let sample = self.waveform.as_ref().unwrap()[(self.position + i) % len];
                    let noisy =
                        Complex::new(sample.real + self.noise(), sample.imag + self.noise());
                    buffer.push(noisy);
                }
                self.position = (self.position + self.buffer_size) % len;
            }
            false => {
                for _ in 0..self.buffer_size {
                    buffer.push(Complex::new(self.noise(), self.noise()));
                }
            }
        }
        Ok(buffer)
    }

    fn release_transmit_buffer(&mut self) {
        self.waveform = None;
    }

    fn release_receive_buffer(&mut self) {
        self.buffer_size = 0;
    }
}

/// Loopback runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[serde(default)]
#[command(name = "burst-run")]
#[command(about = "Run a full burstlink session against a loopback radio")]
pub struct RunConfig {
    /// Text message payload
    #[arg(short, long)]
    pub text: Option<String>,

    /// Binary file payload
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// WAV payload, decoded to raw PCM bytes
    #[arg(short, long)]
    pub wav: Option<PathBuf>,

    /// FEC code rate: 1/2, 1/3, 2/3 or 3/4
    #[arg(short, long, default_value = "1/2")]
    pub rate: String,

    /// Samples per symbol
    #[arg(long, default_value = "10")]
    pub sps: usize,

    /// Fail-safe receive read budget
    #[arg(long, default_value = "100")]
    pub max_reads: usize,

    /// Uniform channel noise amplitude
    #[arg(long, default_value = "0.0")]
    pub noise: f64,

    /// Load this TOML/JSON config instead of the CLI arguments
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            text: None,
            file: None,
            wav: None,
            rate: "1/2".to_string(),
            sps: 10,
            max_reads: 100,
            noise: 0.0,
            config: None,
            verbose: false,
            debug: false,
        }
    }
}

/// Drive one session over the loopback radio and report the outcome.
pub fn run_loopback(config: &RunConfig) -> Result<SessionOutcome> {
    let rate = config.rate.parse::<burstlink_frame::fec::CodeRate>()?;
    let source = select_source(
        config.text.as_deref(),
        config.file.as_deref(),
        config.wav.as_deref(),
    )?;

    let session_config = SessionConfig {
        uri: "loopback".to_string(),
        rate,
        sps: config.sps,
        max_reads: config.max_reads,
        settle_millis: 1,
        ..SessionConfig::default()
    };

    let store = Arc::new(Mutex::new(ReceivedFileStore::new()));
    let observer: Arc<dyn SessionObserver> = Arc::new(ConsoleObserver::new(Arc::clone(&store)));
    let radio = LoopbackRadio::new(config.noise);

    let handle = SessionHandle::spawn(session_config, radio, source, observer)?;
    let outcome = handle.join();

    if let SessionOutcome::Decoded(payload) = &outcome {
        println!("Decoded {} ({} bytes)", payload.name, payload.len());
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config(text: &str) -> RunConfig {
        RunConfig {
            text: Some(text.to_string()),
            sps: 4,
            max_reads: 20,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_loopback_radio_cycles_waveform() {
        let mut radio = LoopbackRadio::new(0.0);
        let waveform: Vec<Complex> = (0..40).map(|i| Complex::new(f64::from(i), 0.0)).collect();
        radio.set_receive_buffer_size(25).unwrap();
        radio.transmit(&waveform).unwrap();

        let buffer = radio.receive().unwrap();
        assert_eq!(buffer.len(), 25);
        // playback starts mid-waveform and wraps around
        assert_eq!(buffer[0].real, 20.0);
        assert_eq!(buffer[19].real, 39.0);
        assert_eq!(buffer[20].real, 0.0);
    }

    #[test]
    fn test_loopback_radio_idle_is_quiet() {
        let mut radio = LoopbackRadio::new(0.0);
        radio.set_receive_buffer_size(16).unwrap();
        let buffer = radio.receive().unwrap();
        assert!(buffer.iter().all(|s| s.real == 0.0 && s.imag == 0.0));
    }

    #[test]
    fn test_loopback_release_stops_playback() {
        let mut radio = LoopbackRadio::new(0.0);
        radio.set_receive_buffer_size(8).unwrap();
        radio.transmit(&[Complex::new(1.0, 0.0); 8]).unwrap();
        radio.release_transmit_buffer();
        radio.release_transmit_buffer(); // idempotent
        radio.set_receive_buffer_size(8).unwrap();
        let buffer = radio.receive().unwrap();
        assert!(buffer.iter().all(|s| s.real == 0.0));
    }

    #[test]
    fn test_loopback_session_decodes_text() {
        let outcome = run_loopback(&run_config("hello loopback")).unwrap();
        match outcome {
            SessionOutcome::Decoded(payload) => assert_eq!(payload.data, b"hello loopback"),
            other => panic!("expected decode, got {:?}", other),
        }
    }

    #[test]
    fn test_loopback_session_survives_noise() {
        let mut config = run_config("noisy channel");
        config.noise = 500.0;
        config.rate = "1/3".to_string();
        let outcome = run_loopback(&config).unwrap();
        assert!(outcome.is_decoded());
    }

    #[test]
    fn test_loopback_session_rejects_unknown_rate() {
        let mut config = run_config("hi");
        config.rate = "9/9".to_string();
        assert!(run_loopback(&config).is_err());
    }
}
