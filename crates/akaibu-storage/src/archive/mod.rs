//! Archive File Format
//!
//! An archive is a header followed by a stream of length-prefixed records.
//!
//! ## Archive File Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (8 bytes, never compressed)                          │
//! │ - Magic bytes: "AKAI" (4 bytes)                             │
//! │ - Version: 1 (1 byte)                                       │
//! │ - Compression: None/Zlib/Snappy (1 byte)                    │
//! │ - Reserved: 0x00 0x00 (2 bytes)                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Body (passed through the compression variant)               │
//! │ Record 1:                                                   │
//! │   - Size prefix (1-5 octets)                                │
//! │   - Payload (size bytes, absent when size is 0)             │
//! │ Record 2:                                                   │
//! │   ...                                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! No trailer, no checksum, no index. The body ends wherever the stream ends,
//! which must be on a record boundary.
//!
//! Records are opaque bytes. Integrity checks, typing and seeking are left to
//! whatever is layered on top.

mod reader;
mod writer;

pub use reader::{ArchiveReader, Records};
pub use writer::ArchiveWriter;
