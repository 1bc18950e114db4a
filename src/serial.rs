//! Serial transmit boundary: wire-line formatting and the byte sink.
//!
//! The pipeline emits one ASCII line per steering signal:
//!
//! ```text
//! ANG=<angle %.2f>, OFF=<offset %.1f>, TS=<timestamp_us>\r\n
//! ```
//!
//! Writes are fire-and-forget; a failed write is logged and the pipeline
//! moves on. UART driver installation, baud configuration and pin
//! mapping belong to whatever opens the device node, not to this crate.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::steering::AngleSignal;

/// Errors from the serial write boundary.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("failed to open serial device '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serial write failed: {0}")]
    Write(#[from] io::Error),
}

/// Render a signal as its wire line, CR-LF terminated.
pub fn format_signal(signal: &AngleSignal) -> String {
    format!(
        "ANG={:.2}, OFF={:.1}, TS={}\r\n",
        signal.angle_deg, signal.offset_px, signal.timestamp_us
    )
}

/// Best-effort byte sink at the far end of the pipeline.
pub trait SerialSink: Send {
    /// Attempt to write the bytes. No acknowledgement or retry is
    /// modeled; the caller only learns that the write was attempted.
    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError>;
}

/// [`SerialSink`] over any `io::Write`, flushing per line so signals
/// are not held back by buffering.
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl WriterSink<std::io::Stdout> {
    /// Sink that prints wire lines to stdout (dry-run mode).
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl WriterSink<std::fs::File> {
    /// Open a serial device node (e.g. `/dev/ttyUSB0`) for writing.
    ///
    /// The port is assumed to be configured already (stty or the
    /// platform's equivalent); only the write side is used.
    pub fn open(path: &Path) -> Result<Self, SerialError> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| SerialError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self { writer: file })
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> SerialSink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink that records every byte written.
///
/// Used by the integration tests; the shared handle lets the test read
/// what the transmit worker wrote.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        match self.buffer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SerialSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        match self.buffer.lock() {
            Ok(mut guard) => guard.extend_from_slice(bytes),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(bytes),
        }
        Ok(())
    }
}
