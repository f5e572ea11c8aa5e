//! Akaibu Core
//!
//! Wire-level building blocks of the Akaibu archival log format: the size-prefix
//! codec, the 8-byte archive header with its compression code, and the shared
//! error type. Readers and writers built on these live in `akaibu-storage`.

pub mod error;
pub mod header;
pub mod size;

pub use error::{Error, Result};
pub use header::{Compression, Header, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use size::{decode_size, encode_size, put_size, read_size, SizeClass, SizePrefix, MAX_RECORD_SIZE};
