//! BPSK waveform generation and symbol detection

use crate::{ModemError, Result};
use burstlink_core::buffer::Complex;

/// Fixed transmit amplitude (2^13), sized for a 12-bit transceiver DAC.
pub const AMPLITUDE: f64 = 8192.0;

/// Minimum supported samples-per-symbol.
pub const MIN_SPS: usize = 2;

/// Map bits to an oversampled BPSK waveform.
///
/// Each bit becomes a ±1 symbol on the real axis, repeated `sps` times
/// and scaled to [`AMPLITUDE`].
pub fn modulate(bits: &[u8], sps: usize) -> Result<Vec<Complex>> {
    if sps < MIN_SPS {
        return Err(ModemError::InvalidSamplesPerSymbol { sps });
    }
    let mut samples = Vec::with_capacity(bits.len() * sps);
    for &bit in bits {
        let symbol = (2.0 * f64::from(bit & 1) - 1.0) * AMPLITUDE;
        for _ in 0..sps {
            samples.push(Complex::new(symbol, 0.0));
        }
    }
    Ok(samples)
}

/// Detect symbols from a received sample buffer.
///
/// Averages the real part over each `sps`-sized window and thresholds
/// at zero. The final partial window is never emitted, so a buffer of
/// N samples yields `N/sps - 1` bits.
pub fn detect_symbols(samples: &[Complex], sps: usize) -> Result<Vec<u8>> {
    if sps < MIN_SPS {
        return Err(ModemError::InvalidSamplesPerSymbol { sps });
    }
    let n_sym = (samples.len() / sps).saturating_sub(1);
    let mut bits = Vec::with_capacity(n_sym);
    for i in 0..n_sym {
        let window = &samples[i * sps..(i + 1) * sps];
        let mean: f64 = window.iter().map(|s| s.real).sum::<f64>() / sps as f64;
        bits.push(u8::from(mean > 0.0));
    }
    Ok(bits)
}

/// Instantaneous SNR estimate over one receive buffer, in dB.
///
/// Signal power is the mean squared magnitude; the noise proxy is the
/// variance of the imaginary component, which carries no BPSK energy.
/// Diagnostic only, never used in decode decisions.
pub fn snr_db(samples: &[Complex]) -> f64 {
    if samples.is_empty() {
        return 10.0 * 1e-10f64.log10();
    }
    let n = samples.len() as f64;
    let power = samples.iter().map(Complex::norm_sqr).sum::<f64>() / n;
    let imag_mean = samples.iter().map(|s| s.imag).sum::<f64>() / n;
    let imag_var = samples
        .iter()
        .map(|s| (s.imag - imag_mean).powi(2))
        .sum::<f64>()
        / n;
    10.0 * (power / (1e-10 + imag_var) + 1e-10).log10()
}
