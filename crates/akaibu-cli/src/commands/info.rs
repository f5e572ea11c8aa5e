//! Archive inspection

use std::fs::File;
use std::io::Write;

use akaibu_storage::ArchiveReader;
use anyhow::{Context, Result};
use serde::Serialize;

/// Header fields and payload statistics of one archive
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ArchiveInfo {
    pub version: u8,
    pub compression: String,
    pub records: u64,
    pub total_bytes: u64,
    pub min_record: Option<u64>,
    pub max_record: Option<u64>,
}

/// Scan the archive at `path` to the end, collecting statistics.
pub fn collect_info(path: &str) -> Result<ArchiveInfo> {
    let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
    let mut reader =
        ArchiveReader::open(file).with_context(|| format!("{path} is not a valid archive"))?;

    let header = *reader.header();
    let mut info = ArchiveInfo {
        version: header.version,
        compression: header.compression.to_string(),
        ..Default::default()
    };

    while let Some(record) = reader
        .read()
        .with_context(|| format!("Failed reading record {} of {path}", info.records))?
    {
        let len = record.len() as u64;
        info.records += 1;
        info.total_bytes += len;
        info.min_record = Some(info.min_record.map_or(len, |m| m.min(len)));
        info.max_record = Some(info.max_record.map_or(len, |m| m.max(len)));
    }

    reader.close()?;
    Ok(info)
}

pub fn handle_info(path: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let info = collect_info(path)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &info)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "File:        {path}")?;
    writeln!(out, "Version:     {}", info.version)?;
    writeln!(out, "Compression: {}", info.compression)?;
    writeln!(out, "Records:     {}", info.records)?;
    writeln!(out, "Total bytes: {}", info.total_bytes)?;
    if let (Some(min), Some(max)) = (info.min_record, info.max_record) {
        writeln!(out, "Record size: {min}..={max}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use akaibu_storage::{ArchiveWriter, Compression, WriterConfig};
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir, compression: Compression, records: &[&[u8]]) -> String {
        let path = dir.path().join(format!("{compression}.akaibu"));
        let file = File::create(&path).unwrap();
        let mut writer = ArchiveWriter::with_config(file, &WriterConfig::new(compression)).unwrap();
        writer.write_all_records(records).unwrap();
        writer.close().unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_collect_info() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, Compression::Zlib, &[b"abc", b"", b"0123456789"]);

        let info = collect_info(&path).unwrap();
        assert_eq!(
            info,
            ArchiveInfo {
                version: 1,
                compression: "zlib".to_string(),
                records: 3,
                total_bytes: 13,
                min_record: Some(0),
                max_record: Some(10),
            }
        );
    }

    #[test]
    fn test_info_empty_archive() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, Compression::Snappy, &[]);

        let mut out = Vec::new();
        handle_info(&path, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Compression: snappy"));
        assert!(text.contains("Records:     0"));
        assert!(!text.contains("Record size"));
    }

    #[test]
    fn test_info_json() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, Compression::None, &[b"x"]);

        let mut out = Vec::new();
        handle_info(&path, true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["records"], 1);
        assert_eq!(value["compression"], "none");
    }

    #[test]
    fn test_info_rejects_non_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, b"just some text").unwrap();

        assert!(collect_info(&path.to_string_lossy()).is_err());
    }
}
