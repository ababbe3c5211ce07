//! Burstlink TX - frame a payload into an IQ sample file

use anyhow::Result;
use burstlink_tools::common::init_logging;
use burstlink_tools::{Transmitter, TxConfig};
use clap::Parser;

fn main() -> Result<()> {
    let config = TxConfig::parse();
    init_logging(config.verbose, false);

    let transmitter = Transmitter::new(config)?;
    let samples = transmitter.transmit()?;
    println!("Transmission ready: {} samples", samples.len());
    Ok(())
}
