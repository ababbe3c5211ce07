//! Transmit tool: payload to IQ sample file

use anyhow::Result;
use burstlink_core::buffer::Complex;
use burstlink_frame::fec::CodeRate;
use burstlink_frame::frame::encode_frame;
use burstlink_modem::waveform::modulate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::common::{select_source, write_samples};

/// Extra zero symbols appended after the frame so a file-based
/// detector, which holds back its final window, still sees every
/// frame bit.
const TAIL_PAD_BITS: usize = 64;

/// Transmitter configuration
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "burst-tx")]
#[command(about = "Burstlink transmit tool: frame a payload into an IQ sample file")]
pub struct TxConfig {
    /// Output IQ file (raw interleaved f32 pairs)
    #[arg(short, long)]
    pub output: PathBuf,

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

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Burstlink transmitter
pub struct Transmitter {
    config: TxConfig,
    rate: CodeRate,
}

impl Transmitter {
    /// Create a new transmitter with the given configuration
    pub fn new(config: TxConfig) -> Result<Self> {
        let rate: CodeRate = config.rate.parse()?;
        Ok(Self { config, rate })
    }

    /// Build the frame waveform and write it to the output file.
    pub fn transmit(&self) -> Result<Vec<Complex>> {
        let source = select_source(
            self.config.text.as_deref(),
            self.config.file.as_deref(),
            self.config.wav.as_deref(),
        )?;
        let payload = source.resolve()?;

        let mut bits = encode_frame(&payload.data, self.rate);
        bits.resize(bits.len() + TAIL_PAD_BITS, 0);
        let samples = modulate(&bits, self.config.sps)?;

        info!(
            "Frame: bytes={} | total bits={} | sps={} | samples={}",
            payload.len(),
            bits.len(),
            self.config.sps,
            samples.len()
        );
        write_samples(&self.config.output, &samples)?;
        Ok(samples)
    }
}
