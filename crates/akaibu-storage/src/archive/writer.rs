//! Archive Writer - Appending Records to an Archival Log
//!
//! `ArchiveWriter` writes the 8-byte header once, then frames every record as a
//! size prefix followed by the payload bytes.
//!
//! ## Lifecycle
//!
//! ```text
//! open_* / with_config ──→ Open ──write()*──→ close() ──→ Closed
//!        │                                      ▲   │
//!        └─ header write fails: no writer       └───┘ (idempotent)
//! ```
//!
//! - Construction writes the header through the selected compression layers.
//!   If that fails, no writer is returned.
//! - `write()` encodes the record length, writes the prefix, then the payload.
//!   An empty record is a lone `0x00` prefix.
//! - `close()` flushes every layer and releases the sink exactly once. Later
//!   calls return `Ok(())`.
//!
//! After a failed `write()` the byte position in the sink is undefined; keep
//! writing at your own risk, but `close()` is always safe.
//!
//! ## Example Usage
//!
//! ```ignore
//! use akaibu_storage::ArchiveWriter;
//!
//! let file = File::create("events.akaibu")?;
//! let mut writer = ArchiveWriter::open_snappy(file)?;
//! writer.write(b"first")?;
//! writer.write(b"")?;
//! writer.close()?;
//! ```
//!
//! ## Thread Safety
//!
//! ArchiveWriter is NOT thread-safe. Serialize access externally if a writer
//! must be shared.

use std::io::Write;

use akaibu_core::{encode_size, Compression, Error, Result};
use tracing::{debug, warn};

use crate::compression::EncodingSink;
use crate::config::WriterConfig;

/// Writes records to an archive
pub struct ArchiveWriter<W: Write> {
    compression: Compression,

    /// `None` once closed
    sink: Option<EncodingSink<W>>,

    records_written: u64,

    /// Payload bytes, excluding prefixes
    bytes_written: u64,
}

impl<W: Write> ArchiveWriter<W> {
    /// Create an uncompressed archive
    pub fn open_uncompressed(sink: W) -> Result<Self> {
        Self::with_config(sink, &WriterConfig::new(Compression::None))
    }

    /// Create a zlib-compressed archive.
    ///
    /// `level` ranges from 0 (store) to 9 (best compression).
    pub fn open_zlib(sink: W, level: u32) -> Result<Self> {
        let config = WriterConfig {
            compression: Compression::Zlib,
            zlib_level: level,
            ..Default::default()
        };
        Self::with_config(sink, &config)
    }

    /// Create a Snappy-compressed archive
    pub fn open_snappy(sink: W) -> Result<Self> {
        Self::with_config(sink, &WriterConfig::new(Compression::Snappy))
    }

    /// Create an archive from a full writer configuration
    pub fn with_config(sink: W, config: &WriterConfig) -> Result<Self> {
        let sink = EncodingSink::create(sink, config)?;

        debug!(compression = %config.compression, "Opened archive writer");

        Ok(Self {
            compression: config.compression,
            sink: Some(sink),
            records_written: 0,
            bytes_written: 0,
        })
    }

    /// Append one record
    pub fn write(&mut self, record: &[u8]) -> Result<()> {
        let sink = self.sink.as_mut().ok_or(Error::Closed)?;

        let prefix = encode_size(record.len() as u64)?;
        sink.write_all(prefix.as_bytes())?;

        if !record.is_empty() {
            sink.write_all(record)?;
        }

        self.records_written += 1;
        self.bytes_written += record.len() as u64;

        Ok(())
    }

    /// Append every record from an iterator, stopping at the first failure
    pub fn write_all_records<I, T>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for record in records {
            self.write(record.as_ref())?;
        }
        Ok(())
    }

    /// Flush and release the sink. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        match self.sink.take() {
            Some(sink) => {
                sink.finish()?;
                debug!(
                    compression = %self.compression,
                    records = self.records_written,
                    bytes = self.bytes_written,
                    "Closed archive writer"
                );
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Flush everything and hand back the underlying sink
    pub fn finish(mut self) -> Result<W> {
        let sink = self.sink.take().ok_or(Error::Closed)?;
        Ok(sink.finish()?)
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Payload bytes written so far, excluding size prefixes
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }
}

impl<W: Write> Drop for ArchiveWriter<W> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            warn!(
                records = self.records_written,
                "Archive writer dropped without close, flushing"
            );
            if let Err(e) = sink.finish() {
                warn!(error = %e, "Failed to flush archive writer on drop");
            }
        }
    }
}
