//! Burstlink RUN - full one-shot session over a loopback radio

use anyhow::Result;
use burstlink_session::session::SessionOutcome;
use burstlink_tools::common::{init_logging, load_config};
use burstlink_tools::{run_loopback, RunConfig};
use clap::Parser;

fn main() -> Result<()> {
    let mut config = RunConfig::parse();
    if let Some(path) = &config.config {
        config = load_config(path)?;
    }
    init_logging(config.verbose, config.debug);

    match run_loopback(&config)? {
        SessionOutcome::Decoded(_) => Ok(()),
        SessionOutcome::Failed(reason) => {
            eprintln!("Session failed: {reason}");
            std::process::exit(1);
        }
    }
}
