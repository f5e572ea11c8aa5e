//! Building archives from line-oriented input

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use akaibu_core::Compression;
use akaibu_storage::{ArchiveWriter, WriterConfig};
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// What `pack` wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackStats {
    pub records: u64,
    /// Payload bytes, before compression
    pub bytes: u64,
}

/// Write every line of `inputs` (stdin when empty) as one record of a new
/// archive at `output`. Line terminators are not part of the record.
pub fn handle_pack(
    output: &str,
    compression: Compression,
    level: Option<u32>,
    inputs: &[String],
) -> Result<PackStats> {
    validate_level(level)?;

    let mut config = WriterConfig::new(compression);
    if let Some(level) = level {
        if compression != Compression::Zlib {
            warn!(%compression, level, "--level only applies to zlib, ignoring");
        }
        config.zlib_level = level;
    }

    let file = File::create(output).with_context(|| format!("Failed to create {output}"))?;
    let mut writer = ArchiveWriter::with_config(file, &config)
        .with_context(|| format!("Failed to start archive {output}"))?;

    if inputs.is_empty() {
        let stdin = io::stdin();
        pack_lines(&mut writer, stdin.lock()).context("Failed packing stdin")?;
    } else {
        for input in inputs {
            let file = File::open(input).with_context(|| format!("Failed to open {input}"))?;
            pack_lines(&mut writer, BufReader::new(file))
                .with_context(|| format!("Failed packing {input}"))?;
        }
    }

    writer.close().context("Failed to finish archive")?;

    let stats = PackStats {
        records: writer.records_written(),
        bytes: writer.bytes_written(),
    };
    info!(output, records = stats.records, %compression, "Packed archive");
    Ok(stats)
}

fn pack_lines<W: io::Write, R: BufRead>(writer: &mut ArchiveWriter<W>, mut input: R) -> Result<()> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        writer.write(&line)?;
    }
}

/// Reject a level outside 0-9 before touching the filesystem.
pub fn validate_level(level: Option<u32>) -> Result<()> {
    match level {
        Some(level) if level > 9 => bail!("zlib level {level} is outside 0-9"),
        _ => Ok(()),
    }
}
