//! Burstlink Tools - CLI front-ends for the digital link
//!
//! File-based transmit and receive tools plus a loopback runner that
//! drives a full one-shot session against a simulated radio.

pub mod common;
pub mod loopback;
pub mod rx;
pub mod tx;

pub use loopback::{run_loopback, LoopbackRadio, RunConfig};
pub use rx::{Receiver, RxConfig};
pub use tx::{Transmitter, TxConfig};
