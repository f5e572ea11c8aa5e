//! Command handlers for akaibu
//!
//! - info: header and record statistics
//! - dump: print records as text, hex or JSON
//! - pack: build an archive from lines of input
//! - samples: write fixture archives for every compression variant

pub mod dump;
pub mod info;
pub mod pack;
pub mod samples;
