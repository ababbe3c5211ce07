//! Burstlink RX - blind-decode one frame from an IQ sample file

use anyhow::Result;
use burstlink_tools::common::init_logging;
use burstlink_tools::{Receiver, RxConfig};
use clap::Parser;

fn main() -> Result<()> {
    let config = RxConfig::parse();
    init_logging(config.verbose, false);

    let receiver = Receiver::new(config)?;
    match receiver.run()? {
        Some(payload) => {
            println!("Decoded {} payload bytes", payload.len());
            Ok(())
        }
        None => {
            println!("No valid frame found");
            std::process::exit(1);
        }
    }
}
