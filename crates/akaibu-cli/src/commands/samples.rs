//! Fixture archive generation

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use akaibu_core::Compression;
use akaibu_storage::{ArchiveWriter, WriterConfig};
use anyhow::{Context, Result};
use tracing::debug;

/// Payload of record `i` (1-based): `i * 100` bytes.
pub fn sample_record(i: u64) -> Vec<u8> {
    let fill = b'a' + (i % 26) as u8;
    vec![fill; (i * 100) as usize]
}

/// Write `sample-<compression>.akaibu` into `dir` for every compression
/// variant, each holding `records` records. Returns the paths written.
pub fn handle_samples(dir: &str, records: u64) -> Result<Vec<PathBuf>> {
    let dir = Path::new(dir);
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut paths = Vec::with_capacity(Compression::ALL.len());
    for compression in Compression::ALL {
        let path = dir.join(format!("sample-{compression}.akaibu"));
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

        let mut writer = ArchiveWriter::with_config(file, &WriterConfig::new(compression))?;
        for i in 1..=records {
            writer.write(&sample_record(i))?;
        }
        writer
            .close()
            .with_context(|| format!("Failed to finish {}", path.display()))?;

        debug!(path = %path.display(), records, "Wrote sample archive");
        paths.push(path);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use akaibu_storage::ArchiveReader;
    use tempfile::TempDir;

    #[test]
    fn test_samples_fixture_layout() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("fixtures");

        let paths = handle_samples(&target.to_string_lossy(), 12).unwrap();
        assert_eq!(paths.len(), 3);

        for (path, compression) in paths.iter().zip(Compression::ALL) {
            let mut reader = ArchiveReader::open(File::open(path).unwrap()).unwrap();
            assert_eq!(reader.compression(), compression);

            let mut i = 1u64;
            while let Some(record) = reader.read().unwrap() {
                assert_eq!(record.len() as u64, i * 100);
                assert_eq!(record.as_ref(), sample_record(i).as_slice());
                i += 1;
            }
            assert_eq!(i, 13);
        }
    }

    #[test]
    fn test_samples_zero_records() {
        let dir = TempDir::new().unwrap();
        let paths = handle_samples(&dir.path().to_string_lossy(), 0).unwrap();

        for path in paths {
            assert!(std::fs::metadata(&path).unwrap().len() >= 8);
            let mut reader = ArchiveReader::open(File::open(&path).unwrap()).unwrap();
            assert!(reader.read().unwrap().is_none());
        }
    }
}
