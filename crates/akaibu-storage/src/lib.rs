//! Akaibu Storage Layer
//!
//! Streaming reader and writer for Akaibu archival logs: sequential,
//! append-only streams of opaque byte records behind a small header.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────┐
//! │  Producer   │
//! └──────┬──────┘
//!        │ records
//!        ▼
//! ┌─────────────────┐
//! │ ArchiveWriter   │  header + size prefix + payload
//! └────────┬────────┘
//!          │ bytes
//!          ▼
//! ┌─────────────────┐
//! │ EncodingSink    │  none / zlib / snappy
//! └────────┬────────┘
//!          │
//!     file / socket
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ DecodingSource  │  none / zlib / snappy
//! └────────┬────────┘
//!          │ bytes
//!          ▼
//! ┌─────────────────┐
//! │ ArchiveReader   │  validates header, decodes records lazily
//! └────────┬────────┘
//!          │ records, in write order
//!          ▼
//! ┌─────────────┐
//! │  Consumer   │
//! └─────────────┘
//! ```
//!
//! Readers and writers are synchronous and single-threaded. Each one owns
//! its source or sink and every buffering/compression layer stacked on it;
//! `close()` is the single release point and may be called repeatedly.
//!
//! ## Usage Example
//!
//! ```ignore
//! use akaibu_storage::{ArchiveReader, ArchiveWriter};
//!
//! let mut writer = ArchiveWriter::open_zlib(File::create("log.akaibu")?, 6)?;
//! writer.write(b"hello")?;
//! writer.close()?;
//!
//! let mut reader = ArchiveReader::open(File::open("log.akaibu")?)?;
//! while let Some(record) = reader.read()? {
//!     println!("{} bytes", record.len());
//! }
//! ```

pub mod archive;
pub mod compression;
pub mod config;

pub use archive::{ArchiveReader, ArchiveWriter, Records};
pub use compression::{DecodingSource, EncodingSink};
pub use config::{ReaderConfig, WriterConfig};

pub use akaibu_core::{Compression, Error, Header, Result};
