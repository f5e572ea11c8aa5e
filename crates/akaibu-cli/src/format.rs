//! Output formatting for record dumps
//!
//! Supports three renderings of a record:
//! - Text: lossy UTF-8, one record per line
//! - Hex: offset-annotated hex rows of 16 bytes
//! - JSON: one object per line with index, size and lossy UTF-8 data

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

/// How `dump` renders each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Lossy UTF-8, one record per line
    Text,
    /// Offset-annotated hex dump
    Hex,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
struct RecordLine<'a> {
    index: u64,
    size: usize,
    data: &'a str,
}

/// Renders records in one output format
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write record number `index`
    pub fn write_record(&self, out: &mut impl Write, index: u64, record: &[u8]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(out, "{}", String::from_utf8_lossy(record)),
            OutputFormat::Hex => {
                writeln!(out, "record {index} ({} bytes)", record.len())?;
                write_hex(out, record)
            }
            OutputFormat::Json => {
                let data = String::from_utf8_lossy(record);
                let line = RecordLine {
                    index,
                    size: record.len(),
                    data: &data,
                };
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)
            }
        }
    }
}

fn write_hex(out: &mut impl Write, data: &[u8]) -> io::Result<()> {
    for (row, chunk) in data.chunks(16).enumerate() {
        write!(out, "  {:08x}:", row * 16)?;
        for byte in chunk {
            write!(out, " {byte:02x}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
