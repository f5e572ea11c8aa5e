//! Reader and Writer Configuration
//!
//! ## WriterConfig
//!
//! Controls how an archive is written:
//!
//! - **compression**: body transform recorded in the header (default: none)
//! - **zlib_level**: zlib compression level 0-9, used only for zlib (default: 6)
//! - **buffer_capacity**: buffer around the raw sink for the uncompressed and
//!   Snappy variants (default: 4KB)
//! - **snappy_input_buffer**: buffer in front of the Snappy compressor so small
//!   records are batched into larger frames (default: 64KB)
//!
//! ## ReaderConfig
//!
//! - **buffer_capacity**: buffer added around an unbuffered source (default: 8KB)
//!
//! ## Usage
//!
//! ```ignore
//! use akaibu_storage::{ArchiveWriter, WriterConfig};
//! use akaibu_core::Compression;
//!
//! let config = WriterConfig {
//!     compression: Compression::Zlib,
//!     zlib_level: 9,
//!     ..Default::default()
//! };
//! let writer = ArchiveWriter::with_config(file, &config)?;
//! ```

use akaibu_core::Compression;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Compression variant for the archive body
    #[serde(default)]
    pub compression: Compression,

    /// zlib level (0 = store, 9 = best)
    #[serde(default = "default_zlib_level")]
    pub zlib_level: u32,

    /// Buffer around the raw sink in bytes
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Buffer in front of the Snappy compressor in bytes
    #[serde(default = "default_snappy_input_buffer")]
    pub snappy_input_buffer: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            zlib_level: default_zlib_level(),
            buffer_capacity: default_buffer_capacity(),
            snappy_input_buffer: default_snappy_input_buffer(),
        }
    }
}

impl WriterConfig {
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            ..Default::default()
        }
    }
}

fn default_zlib_level() -> u32 {
    6
}

fn default_buffer_capacity() -> usize {
    4 * 1024 // 4KB
}

fn default_snappy_input_buffer() -> usize {
    64 * 1024 // 64KB
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Buffer added around an unbuffered source in bytes
    #[serde(default = "default_read_buffer_capacity")]
    pub buffer_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_read_buffer_capacity(),
        }
    }
}

fn default_read_buffer_capacity() -> usize {
    8 * 1024 // 8KB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_config_defaults() {
        let config = WriterConfig::default();
        assert_eq!(config.compression, Compression::None);
        assert_eq!(config.zlib_level, 6);
        assert_eq!(config.buffer_capacity, 4096);
        assert_eq!(config.snappy_input_buffer, 65536);
    }

    #[test]
    fn test_writer_config_partial_json() {
        let config: WriterConfig =
            serde_json::from_str(r#"{"compression": "snappy"}"#).unwrap();
        assert_eq!(config.compression, Compression::Snappy);
        assert_eq!(config.zlib_level, 6);
        assert_eq!(config.snappy_input_buffer, 65536);
    }

    #[test]
    fn test_writer_config_roundtrip_json() {
        let config = WriterConfig {
            compression: Compression::Zlib,
            zlib_level: 9,
            buffer_capacity: 128,
            snappy_input_buffer: 256,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""compression":"zlib""#));
        let decoded: WriterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_reader_config_defaults() {
        let config: ReaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.buffer_capacity, 8192);
    }
}
