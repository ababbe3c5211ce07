//! Common utilities for the burstlink tools
//!
//! Logging setup, raw IQ sample file I/O, payload sources for the
//! text/file/WAV data types, the received-artifact store, and the
//! console observer used by the session runner.

use anyhow::{Context, Result};
use burstlink_core::buffer::Complex;
use burstlink_session::observer::{SessionObserver, Severity};
use burstlink_session::payload::{Payload, PayloadKind, PayloadSource};
use burstlink_session::session::FailureReason;
use burstlink_session::state::StatsSnapshot;
use burstlink_session::SessionError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Initialize logging based on verbosity flags.
pub fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Write complex samples as raw interleaved f32 little-endian IQ pairs.
pub fn write_samples(path: &Path, samples: &[Complex]) -> Result<()> {
    let mut bytes = Vec::with_capacity(samples.len() * 8);
    for sample in samples {
        bytes.extend_from_slice(&(sample.real as f32).to_le_bytes());
        bytes.extend_from_slice(&(sample.imag as f32).to_le_bytes());
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write samples: {:?}", path))?;
    tracing::info!("Wrote {} samples to {:?}", samples.len(), path);
    Ok(())
}

/// Read complex samples from a raw interleaved f32 IQ file.
pub fn read_samples(path: &Path) -> Result<Vec<Complex>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read samples: {:?}", path))?;
    let samples = bytes
        .chunks_exact(8)
        .map(|pair| {
            let real = f32::from_le_bytes([pair[0], pair[1], pair[2], pair[3]]);
            let imag = f32::from_le_bytes([pair[4], pair[5], pair[6], pair[7]]);
            Complex::new(f64::from(real), f64::from(imag))
        })
        .collect::<Vec<_>>();
    tracing::info!("Read {} samples from {:?}", samples.len(), path);
    Ok(samples)
}

/// Payload source reading a file as raw bytes.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PayloadSource for FileSource {
    fn resolve(&self) -> burstlink_session::Result<Payload> {
        let data = std::fs::read(&self.path)?;
        if data.is_empty() {
            return Err(SessionError::InvalidConfig {
                msg: format!("file is empty: {:?}", self.path),
            });
        }
        Ok(Payload {
            data,
            name: file_name(&self.path),
            kind: PayloadKind::File,
        })
    }
}

/// Payload source decoding a WAV file to raw 16-bit PCM bytes.
///
/// Audio semantics end here: the session only ever sees the byte
/// buffer.
pub struct WavSource {
    path: PathBuf,
}

impl WavSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PayloadSource for WavSource {
    fn resolve(&self) -> burstlink_session::Result<Payload> {
        let mut reader =
            hound::WavReader::open(&self.path).map_err(|e| SessionError::InvalidConfig {
                msg: format!("cannot open WAV {:?}: {e}", self.path),
            })?;
        let pcm: Vec<i16> = match reader.spec().sample_format {
            hound::SampleFormat::Int => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as i16))
                .collect::<std::result::Result<_, _>>(),
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v * f32::from(i16::MAX)) as i16))
                .collect::<std::result::Result<_, _>>(),
        }
        .map_err(|e| SessionError::InvalidConfig {
            msg: format!("cannot decode WAV {:?}: {e}", self.path),
        })?;

        let mut data = Vec::with_capacity(pcm.len() * 2);
        for sample in pcm {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        if data.is_empty() {
            return Err(SessionError::InvalidConfig {
                msg: format!("WAV has no samples: {:?}", self.path),
            });
        }
        Ok(Payload {
            data,
            name: file_name(&self.path),
            kind: PayloadKind::Wav,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file.bin")
        .to_string()
}

/// Pick the payload source for the text/file/wav options.
pub fn select_source(
    text: Option<&str>,
    file: Option<&Path>,
    wav: Option<&Path>,
) -> Result<Box<dyn PayloadSource>> {
    match (text, file, wav) {
        (Some(message), None, None) => Ok(Box::new(Payload::text(message))),
        (None, Some(path), None) => Ok(Box::new(FileSource::new(path.to_path_buf()))),
        (None, None, Some(path)) => Ok(Box::new(WavSource::new(path.to_path_buf()))),
        _ => anyhow::bail!("Exactly one of --text, --file, or --wav must be given"),
    }
}

/// One decoded artifact kept by the receive side.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub payload: Payload,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

/// In-memory list of decoded payloads, newest last.
#[derive(Debug, Default)]
pub struct ReceivedFileStore {
    files: Vec<ReceivedFile>,
}

impl ReceivedFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, payload: Payload) {
        self.files.push(ReceivedFile {
            payload,
            timestamp: chrono::Local::now(),
        });
    }

    pub fn files(&self) -> &[ReceivedFile] {
        &self.files
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Save one received artifact to disk.
    pub fn save(&self, index: usize, path: &Path) -> Result<()> {
        let file = self
            .files
            .get(index)
            .with_context(|| format!("No received file at index {index}"))?;
        std::fs::write(path, &file.payload.data)
            .with_context(|| format!("Failed to save {:?}", path))?;
        Ok(())
    }
}

/// Observer printing session progress to the console and collecting
/// decoded payloads into a shared store.
pub struct ConsoleObserver {
    store: Arc<Mutex<ReceivedFileStore>>,
}

impl ConsoleObserver {
    pub fn new(store: Arc<Mutex<ReceivedFileStore>>) -> Self {
        Self { store }
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_log(&self, message: &str, severity: Severity) {
        let tag = match severity {
            Severity::Info => "info",
            Severity::Success => " ok ",
            Severity::Warning => "warn",
            Severity::Error => "fail",
        };
        println!(
            "[{}] [{tag}] {message}",
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    fn on_stats(&self, stats: &StatsSnapshot) {
        println!(
            "[{}] [stat] snr {:.1} dB | reads {} | rx buffer {} | frame {} samples",
            chrono::Local::now().format("%H:%M:%S"),
            stats.snr_db,
            stats.reads,
            stats.rx_buffer_size,
            stats.frame_samples
        );
    }

    fn on_decoded(&self, payload: &Payload) {
        if let Ok(mut store) = self.store.lock() {
            store.add(payload.clone());
        }
    }

    fn on_failed(&self, reason: &FailureReason) {
        println!("Session failed: {reason}");
    }
}

/// Load a tool configuration from a JSON or TOML file.
pub fn load_config<T: for<'a> Deserialize<'a>>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    if let Ok(config) = serde_json::from_str(&content) {
        return Ok(config);
    }
    toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))
}

/// Save a tool configuration, format chosen by extension.
pub fn save_config<T: Serialize>(config: &T, path: &Path) -> Result<()> {
    let content = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };
    std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sample_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.iq");
        let samples = vec![
            Complex::new(8192.0, 0.0),
            Complex::new(-8192.0, 0.5),
            Complex::new(0.25, -1.75),
        ];
        write_samples(&path, &samples).unwrap();
        let recovered = read_samples(&path).unwrap();
        assert_eq!(recovered.len(), samples.len());
        for (a, b) in samples.iter().zip(&recovered) {
            assert!((a.real - b.real).abs() < 1e-6);
            assert!((a.imag - b.imag).abs() < 1e-6);
        }
    }

    #[test]
    fn test_file_source_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let payload = FileSource::new(path).resolve().unwrap();
        assert_eq!(payload.data, [1, 2, 3]);
        assert_eq!(payload.name, "blob.bin");
        assert_eq!(payload.kind, PayloadKind::File);
    }

    #[test]
    fn test_wav_source_decodes_pcm() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for value in [0i16, 1000, -1000, i16::MAX] {
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();

        let payload = WavSource::new(path).resolve().unwrap();
        assert_eq!(payload.kind, PayloadKind::Wav);
        let mut expected = Vec::new();
        for value in [0i16, 1000, -1000, i16::MAX] {
            expected.extend_from_slice(&value.to_le_bytes());
        }
        assert_eq!(payload.data, expected);
    }

    #[test]
    fn test_select_source_requires_exactly_one() {
        assert!(select_source(None, None, None).is_err());
        assert!(select_source(Some("hi"), Some(Path::new("x")), None).is_err());
        assert!(select_source(Some("hi"), None, None).is_ok());
    }

    #[test]
    fn test_received_store() {
        let dir = tempdir().unwrap();
        let mut store = ReceivedFileStore::new();
        store.add(Payload::text("decoded"));
        assert_eq!(store.files().len(), 1);

        let out = dir.path().join("out.txt");
        store.save(0, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"decoded");
        assert!(store.save(9, &out).is_err());

        store.clear();
        assert!(store.files().is_empty());
    }
}
