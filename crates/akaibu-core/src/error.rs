//! Error Types for Akaibu
//!
//! Every fallible operation in the archive format returns [`Result<T>`], aliased
//! to `Result<T, Error>`, so callers can propagate with `?`.
//!
//! ## Error Categories
//!
//! ### Structural Errors
//! - `InvalidArchive`: bad magic, an unknown compression code in the header, or a
//!   size-prefix lead octet that matches none of the five size classes
//! - `UnexpectedEndOfStream`: input ended *inside* a structure (partial header,
//!   partial multi-octet size prefix, partial payload)
//!
//! ### Version/Compatibility Errors
//! - `UnsupportedVersion`: header version byte is not the one this crate reads
//! - `InvalidCompression`: compression code outside `none`/`zlib`/`snappy`
//! - `InvalidCompressionLevel`: zlib level outside `0..=9`
//!
//! ### Range Errors
//! - `OutOfRange`: a record length of 2^35 bytes or more cannot be framed
//!
//! ### State Errors
//! - `Closed`: read or write attempted after `close()`
//!
//! Clean end of stream is *not* an error. Readers report it as `Ok(None)`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u8),

    #[error("Invalid compression: {0}")]
    InvalidCompression(u8),

    #[error("Invalid zlib compression level: {0} (expected 0-9)")]
    InvalidCompressionLevel(u32),

    #[error("Record size out of range: {0}")]
    OutOfRange(u64),

    #[error("Unexpected end of stream")]
    UnexpectedEndOfStream,

    #[error("Archive is closed")]
    Closed,
}

impl Error {
    /// Maps an I/O error raised while filling a fixed-size structure.
    ///
    /// Running dry in the middle of a structure means the stream was truncated,
    /// which is reported as [`Error::UnexpectedEndOfStream`].
    pub fn truncated(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEndOfStream
        } else {
            Error::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
