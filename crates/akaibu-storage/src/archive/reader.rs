//! Archive Reader - Replaying Records from an Archival Log
//!
//! `ArchiveReader` validates the header, stacks the matching decompression
//! layer over the source and then decodes records lazily, one per `read()`.
//!
//! ## What Does ArchiveReader Do?
//!
//! 1. **Buffers the source** unless the caller hands in a `BufRead` already
//! 2. **Reads exactly 8 header bytes** and validates magic, version and
//!    compression code
//! 3. **Wraps the body** in a zlib or Snappy decoder when needed
//! 4. **Decodes records** on demand: size prefix first, then the payload
//!
//! ## End of Stream vs. Truncation
//!
//! The body may only end on a record boundary:
//!
//! | Where the input ends           | Result                               |
//! |--------------------------------|--------------------------------------|
//! | before a size prefix           | `Ok(None)`, the normal end            |
//! | inside the header              | `Err(UnexpectedEndOfStream)`          |
//! | inside a multi-octet prefix    | `Err(UnexpectedEndOfStream)`          |
//! | inside a payload               | `Err(UnexpectedEndOfStream)`          |
//!
//! Any error halts the replay at that point. There is no resync and no skip.
//!
//! ## Example Usage
//!
//! ```ignore
//! use akaibu_storage::ArchiveReader;
//!
//! let mut reader = ArchiveReader::open(File::open("events.akaibu")?)?;
//! while let Some(record) = reader.read()? {
//!     process(record);
//! }
//! reader.close()?;
//! ```
//!
//! ## Payload Allocation
//!
//! A size prefix can declare up to 32GiB. The payload buffer starts at
//! `PAYLOAD_CHUNK` and grows only as bytes actually arrive, so a corrupt
//! prefix on a short stream fails with `UnexpectedEndOfStream` instead of
//! attempting a huge allocation.

use std::io::{BufRead, BufReader, Read};

use akaibu_core::{read_size, Compression, Error, Header, Result, HEADER_SIZE};
use bytes::Bytes;
use tracing::debug;

use crate::compression::DecodingSource;
use crate::config::ReaderConfig;

/// Initial payload buffer size
const PAYLOAD_CHUNK: usize = 64 * 1024;

/// Reads records from an archive
pub struct ArchiveReader<R: BufRead> {
    header: Header,

    /// `None` once closed
    source: Option<DecodingSource<R>>,

    records_read: u64,
}

impl<R: Read> ArchiveReader<BufReader<R>> {
    /// Open an archive over an unbuffered source
    pub fn open(source: R) -> Result<Self> {
        Self::with_config(source, &ReaderConfig::default())
    }

    /// Open an archive, buffering the source as configured
    pub fn with_config(source: R, config: &ReaderConfig) -> Result<Self> {
        ArchiveReader::from_buffered(BufReader::with_capacity(config.buffer_capacity, source))
    }
}

impl<R: BufRead> ArchiveReader<R> {
    /// Open an archive over a source that is already buffered
    pub fn from_buffered(mut source: R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        source.read_exact(&mut buf).map_err(Error::truncated)?;

        let header = Header::decode(&buf)?;
        let source = DecodingSource::from_code(header.compression.code(), source)?;

        debug!(
            version = header.version,
            compression = %header.compression,
            "Opened archive reader"
        );

        Ok(Self {
            header,
            source: Some(source),
            records_read: 0,
        })
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at the clean end of the archive.
    pub fn read(&mut self) -> Result<Option<Bytes>> {
        let source = self.source.as_mut().ok_or(Error::Closed)?;

        let size = match read_size(source)? {
            Some((size, _)) => size,
            None => return Ok(None),
        };

        if size == 0 {
            self.records_read += 1;
            return Ok(Some(Bytes::new()));
        }

        let len = usize::try_from(size).map_err(|_| Error::OutOfRange(size))?;
        let mut data = Vec::with_capacity(len.min(PAYLOAD_CHUNK));
        source
            .take(size)
            .read_to_end(&mut data)
            .map_err(Error::truncated)?;

        if data.len() < len {
            return Err(Error::UnexpectedEndOfStream);
        }

        self.records_read += 1;
        Ok(Some(Bytes::from(data)))
    }

    /// Read every remaining record
    pub fn read_all(&mut self) -> Result<Vec<Bytes>> {
        let mut records = Vec::new();
        while let Some(record) = self.read()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Iterate over the remaining records.
    ///
    /// Iteration ends after the first error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            failed: false,
        }
    }

    /// Release the source. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        if self.source.take().is_some() {
            debug!(records = self.records_read, "Closed archive reader");
        }
        Ok(())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn compression(&self) -> Compression {
        self.header.compression
    }

    /// Number of records returned so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }
}

/// Iterator over the records of an [`ArchiveReader`]
pub struct Records<'a, R: BufRead> {
    reader: &'a mut ArchiveReader<R>,
    failed: bool,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.reader.read() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNCOMPRESSED_HEADER: [u8; 8] = [b'A', b'K', b'A', b'I', 1, 0, 0, 0];

    fn archive(body: &[u8]) -> Vec<u8> {
        let mut data = UNCOMPRESSED_HEADER.to_vec();
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_short_header() {
        for len in 0..HEADER_SIZE {
            let result = ArchiveReader::open(&UNCOMPRESSED_HEADER[..len]);
            assert!(
                matches!(result, Err(Error::UnexpectedEndOfStream)),
                "header of {len} bytes"
            );
        }
    }

    #[test]
    fn test_empty_archive() {
        let mut reader = ArchiveReader::open(&UNCOMPRESSED_HEADER[..]).unwrap();
        assert_eq!(reader.compression(), Compression::None);
        assert!(reader.read().unwrap().is_none());
        // end of stream is sticky
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_one_byte_record_in_every_prefix_class() {
        let bodies: [&[u8]; 5] = [
            &[1, 127],
            &[128, 1, 127],
            &[192, 0, 1, 127],
            &[224, 0, 0, 1, 127],
            &[240, 0, 0, 0, 1, 127],
        ];
        for (i, body) in bodies.iter().enumerate() {
            let data = archive(body);
            let mut reader = ArchiveReader::open(&data[..]).unwrap();
            let record = reader.read().unwrap().unwrap();
            assert_eq!(record.as_ref(), &[127], "prefix of {} octets", i + 1);
            assert!(reader.read().unwrap().is_none());
        }
    }

    #[test]
    fn test_zero_length_record() {
        let data = archive(&[0, 0, 2, b'h', b'i']);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        assert!(reader.read().unwrap().unwrap().is_empty());
        assert!(reader.read().unwrap().unwrap().is_empty());
        assert_eq!(reader.read().unwrap().unwrap().as_ref(), b"hi");
        assert!(reader.read().unwrap().is_none());
        assert_eq!(reader.records_read(), 3);
    }

    #[test]
    fn test_invalid_prefix_lead() {
        let data = archive(&[0xF8, 0, 0, 0, 0, 0]);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        assert!(matches!(reader.read(), Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_truncated_prefix() {
        let data = archive(&[0xC0, 0x01]);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        assert!(matches!(reader.read(), Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_truncated_payload() {
        let data = archive(&[10, 1, 2, 3]);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        assert!(matches!(reader.read(), Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_huge_declared_size_on_short_stream() {
        // 2^35 - 1 bytes declared, three present
        let data = archive(&[0xF7, 0xFF, 0xFF, 0xFF, 0xFF, 1, 2, 3]);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        assert!(matches!(reader.read(), Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_truncated_compressed_body() {
        for compression in [Compression::Zlib, Compression::Snappy] {
            let mut writer =
                crate::ArchiveWriter::with_config(Vec::new(), &crate::WriterConfig::new(compression))
                    .unwrap();
            writer.write(&[0x42; 5000]).unwrap();
            let data = writer.finish().unwrap();

            // cut halfway through the compressed body
            let cut = HEADER_SIZE + (data.len() - HEADER_SIZE) / 2;
            let mut reader = ArchiveReader::open(&data[..cut]).unwrap();
            let outcome = loop {
                match reader.read() {
                    Ok(Some(record)) => assert_eq!(record.len(), 5000),
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(e),
                }
            };
            assert!(
                matches!(outcome, Err(Error::UnexpectedEndOfStream)),
                "{compression}: {outcome:?}"
            );
        }
    }

    #[test]
    fn test_from_buffered_uses_source_as_is() {
        let data = archive(&[3, b'a', b'b', b'c']);
        let mut reader = ArchiveReader::from_buffered(&data[..]).unwrap();
        assert_eq!(reader.read().unwrap().unwrap().as_ref(), b"abc");
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut reader = ArchiveReader::open(&UNCOMPRESSED_HEADER[..]).unwrap();
        assert!(reader.close().is_ok());
        assert!(reader.is_closed());
        assert!(reader.close().is_ok());
        assert!(matches!(reader.read(), Err(Error::Closed)));
    }

    #[test]
    fn test_records_iterator_stops_after_error() {
        let data = archive(&[1, b'x', 0xFF]);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        let results: Vec<_> = reader.records().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().as_ref(), b"x");
        assert!(matches!(results[1], Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_read_all() {
        let data = archive(&[1, b'a', 0, 1, b'c']);
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records, vec![Bytes::from("a"), Bytes::new(), Bytes::from("c")]);
    }

    #[test]
    fn test_reserved_bytes_ignored() {
        let data = [b'A', b'K', b'A', b'I', 1, 0, 0x12, 0x34, 1, 9];
        let mut reader = ArchiveReader::open(&data[..]).unwrap();
        assert_eq!(reader.header().reserved, [0x12, 0x34]);
        assert_eq!(reader.read().unwrap().unwrap().as_ref(), &[9]);
    }
}
