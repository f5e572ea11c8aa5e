//! Record printing

use std::fs::File;
use std::io::Write;

use akaibu_storage::ArchiveReader;
use anyhow::{Context, Result};

use crate::format::{Formatter, OutputFormat};

/// Print up to `limit` records of the archive at `path`. Returns the count printed.
pub fn handle_dump(
    path: &str,
    limit: Option<u64>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<u64> {
    let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
    let mut reader =
        ArchiveReader::open(file).with_context(|| format!("{path} is not a valid archive"))?;

    let formatter = Formatter::new(format);
    let mut printed = 0u64;
    while limit.map_or(true, |l| printed < l) {
        let record = match reader
            .read()
            .with_context(|| format!("Failed reading record {printed} of {path}"))?
        {
            Some(record) => record,
            None => break,
        };

        formatter.write_record(out, printed, &record)?;
        printed += 1;
    }

    reader.close()?;
    Ok(printed)
}
