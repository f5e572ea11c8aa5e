//! Archive Header and Compression Codes
//!
//! Every archive starts with a fixed 8-byte header, written once when the
//! archive is created and never touched again:
//!
//! ```text
//! ┌──────────────┬─────────┬─────────────┬──────────┐
//! │ Magic "AKAI" │ Version │ Compression │ Reserved │
//! │ (4 bytes)    │ (1 byte)│ (1 byte)    │ (2 bytes)│
//! └──────────────┴─────────┴─────────────┴──────────┘
//! ```
//!
//! The header itself is never compressed. The compression code names the
//! transform applied to everything after it.
//!
//! ## Compression Codes
//! - **None (0)**: body stored as-is
//! - **Zlib (1)**: body is a single zlib stream
//! - **Snappy (2)**: body uses the Snappy framing format
//!
//! Reserved bytes are written as zero. Readers keep whatever they find there
//! and do not validate it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Magic bytes opening every archive: "AKAI"
pub const MAGIC: [u8; 4] = *b"AKAI";

/// The only format version this crate reads and writes
pub const FORMAT_VERSION: u8 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Compression variant applied to the archive body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Compression {
    #[default]
    None = 0,
    Zlib = 1,
    Snappy = 2,
}

impl Compression {
    pub const ALL: [Compression; 3] = [Compression::None, Compression::Zlib, Compression::Snappy];

    /// Code persisted in the header
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Zlib => "zlib",
            Compression::Snappy => "snappy",
        }
    }
}

impl TryFrom<u8> for Compression {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Zlib),
            2 => Ok(Compression::Snappy),
            _ => Err(Error::InvalidCompression(value)),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "uncompressed" => Ok(Compression::None),
            "zlib" => Ok(Compression::Zlib),
            "snappy" => Ok(Compression::Snappy),
            other => Err(format!(
                "unknown compression '{other}' (expected none, zlib or snappy)"
            )),
        }
    }
}

/// Decoded archive header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub compression: Compression,
    pub reserved: [u8; 2],
}

impl Header {
    /// Header for a new archive in the current format version
    pub fn new(compression: Compression) -> Self {
        Self {
            version: FORMAT_VERSION,
            compression,
            reserved: [0; 2],
        }
    }

    /// Serialize to the 8-byte on-disk form
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..4].copy_from_slice(&MAGIC);
        buf[4] = self.version;
        buf[5] = self.compression.code();
        buf[6..].copy_from_slice(&self.reserved);
        buf
    }

    /// Parse and validate the 8-byte on-disk form.
    ///
    /// Checks run in order: magic, version, compression code. An unknown
    /// compression code is reported as [`Error::InvalidArchive`].
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        if buf[..4] != MAGIC {
            return Err(Error::InvalidArchive(format!(
                "bad magic bytes {:02X?}",
                &buf[..4]
            )));
        }

        let version = buf[4];
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let compression = Compression::try_from(buf[5]).map_err(|_| {
            Error::InvalidArchive(format!("unknown compression code {}", buf[5]))
        })?;

        Ok(Self {
            version,
            compression,
            reserved: [buf[6], buf[7]],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        assert_eq!(
            Header::new(Compression::None).encode(),
            [b'A', b'K', b'A', b'I', 1, 0, 0, 0]
        );
        assert_eq!(
            Header::new(Compression::Snappy).encode(),
            [b'A', b'K', b'A', b'I', 1, 2, 0, 0]
        );
    }

    #[test]
    fn test_decode_valid() {
        let header = Header::decode(&[b'A', b'K', b'A', b'I', 1, 1, 0, 0]).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.compression, Compression::Zlib);
    }

    #[test]
    fn test_decode_bad_magic() {
        let result = Header::decode(&[b'A', b'K', b'A', b'X', 1, 0, 0, 0]);
        assert!(matches!(result, Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_decode_unsupported_version() {
        for version in [0u8, 2, 255] {
            let result = Header::decode(&[b'A', b'K', b'A', b'I', version, 0, 0, 0]);
            match result {
                Err(Error::UnsupportedVersion(v)) => assert_eq!(v, version),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_unknown_compression_is_invalid_archive() {
        let result = Header::decode(&[b'A', b'K', b'A', b'I', 1, 3, 0, 0]);
        assert!(matches!(result, Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_magic_checked_before_version() {
        let result = Header::decode(&[b'X', b'K', b'A', b'I', 9, 9, 0, 0]);
        assert!(matches!(result, Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_reserved_bytes_not_validated() {
        let header = Header::decode(&[b'A', b'K', b'A', b'I', 1, 0, 0xAB, 0xCD]).unwrap();
        assert_eq!(header.reserved, [0xAB, 0xCD]);
    }

    #[test]
    fn test_compression_try_from() {
        for compression in Compression::ALL {
            assert_eq!(Compression::try_from(compression.code()).unwrap(), compression);
        }
        assert!(matches!(
            Compression::try_from(3u8),
            Err(Error::InvalidCompression(3))
        ));
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!("zlib".parse::<Compression>().unwrap(), Compression::Zlib);
        assert_eq!("Snappy".parse::<Compression>().unwrap(), Compression::Snappy);
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
        assert!("lz4".parse::<Compression>().is_err());
    }
}
