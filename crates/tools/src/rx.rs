//! Receive tool: IQ sample file to decoded payload

use anyhow::Result;
use burstlink_core::buffer::Complex;
use burstlink_frame::fec::CodeRate;
use burstlink_frame::frame::{decode_frame, PREAMBLE_LEN};
use burstlink_frame::sync::find_preamble;
use burstlink_modem::waveform::detect_symbols;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::common::read_samples;

/// Receiver configuration
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "burst-rx")]
#[command(about = "Burstlink receive tool: blind-decode one frame from an IQ sample file")]
pub struct RxConfig {
    /// Input IQ file (raw interleaved f32 pairs)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file for the decoded payload; stdout preview otherwise
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// FEC code rate: 1/2, 1/3, 2/3 or 3/4
    #[arg(short, long, default_value = "1/2")]
    pub rate: String,

    /// Samples per symbol
    #[arg(long, default_value = "10")]
    pub sps: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Burstlink receiver
pub struct Receiver {
    config: RxConfig,
    rate: CodeRate,
}

impl Receiver {
    /// Create a new receiver with the given configuration
    pub fn new(config: RxConfig) -> Result<Self> {
        let rate: CodeRate = config.rate.parse()?;
        Ok(Self { config, rate })
    }

    /// One blind decode attempt over a sample buffer.
    pub fn receive(&self, samples: &[Complex]) -> Result<Option<Vec<u8>>> {
        let bits = detect_symbols(samples, self.config.sps)?;
        let Some(offset) = find_preamble(&bits) else {
            debug!("no preamble in {} detected bits", bits.len());
            return Ok(None);
        };
        debug!(offset, "preamble candidate");
        Ok(decode_frame(&bits, offset + PREAMBLE_LEN, self.rate))
    }

    /// Read the input file, decode, and deliver the payload.
    pub fn run(&self) -> Result<Option<Vec<u8>>> {
        let samples = read_samples(&self.config.input)?;
        let decoded = self.receive(&samples)?;

        if let Some(data) = &decoded {
            info!("Decoded frame with {} payload bytes", data.len());
            if let Some(output) = &self.config.output {
                std::fs::write(output, data)?;
            } else {
                println!("{}", String::from_utf8_lossy(data));
            }
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{Transmitter, TxConfig};
    use tempfile::tempdir;

    fn tx_config(output: PathBuf, rate: &str) -> TxConfig {
        TxConfig {
            output,
            text: Some("The quick brown fox".to_string()),
            file: None,
            wav: None,
            rate: rate.to_string(),
            sps: 4,
            verbose: false,
        }
    }

    fn rx_config(input: PathBuf, rate: &str) -> RxConfig {
        RxConfig {
            input,
            output: None,
            rate: rate.to_string(),
            sps: 4,
            verbose: false,
        }
    }

    #[test]
    fn test_file_round_trip_all_rates() {
        let dir = tempdir().unwrap();
        for rate in ["1/2", "1/3", "2/3", "3/4"] {
            let path = dir.path().join(format!("frame-{}.iq", rate.replace('/', "_")));
            Transmitter::new(tx_config(path.clone(), rate))
                .unwrap()
                .transmit()
                .unwrap();
            let decoded = Receiver::new(rx_config(path, rate))
                .unwrap()
                .run()
                .unwrap();
            assert_eq!(decoded.as_deref(), Some(&b"The quick brown fox"[..]));
        }
    }

    #[test]
    fn test_rate_mismatch_fails_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.iq");
        Transmitter::new(tx_config(path.clone(), "1/2"))
            .unwrap()
            .transmit()
            .unwrap();
        let decoded = Receiver::new(rx_config(path, "1/3")).unwrap().run().unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_noise_only_file_yields_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.iq");
        let samples: Vec<Complex> = (0..4096)
            .map(|i| Complex::new(if i % 2 == 0 { 100.0 } else { -100.0 }, 0.0))
            .collect();
        crate::common::write_samples(&path, &samples).unwrap();
        let decoded = Receiver::new(rx_config(path, "1/2")).unwrap().run().unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_output_file_receives_payload() {
        let dir = tempdir().unwrap();
        let iq = dir.path().join("frame.iq");
        let out = dir.path().join("decoded.txt");
        Transmitter::new(tx_config(iq.clone(), "1/2"))
            .unwrap()
            .transmit()
            .unwrap();
        let mut config = rx_config(iq, "1/2");
        config.output = Some(out.clone());
        Receiver::new(config).unwrap().run().unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"The quick brown fox");
    }
}
