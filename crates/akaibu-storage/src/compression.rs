//! Compression Layering
//!
//! The archive body (everything after the 8-byte header) passes through one
//! compression transform, chosen once per archive by the header's compression
//! code. This module builds the matching streaming layers around the raw
//! source or sink.
//!
//! ## Write Side
//!
//! ```text
//! None:    records ─→ BufWriter ─→ sink
//! Zlib:    records ─→ ZlibEncoder ─→ sink
//! Snappy:  records ─→ BufWriter(64KB) ─→ FrameEncoder ─→ BufWriter ─→ sink
//! ```
//!
//! The header is always written uncompressed, ahead of the compressor.
//!
//! The Snappy framing format opens with a stream identifier chunk. The frame
//! encoder only emits it together with the first data chunk, so an archive
//! with zero records would end up with an empty body. [`EncodingSink`] writes
//! the identifier itself when the sink is created, so a non-empty body carries
//! it twice in a row. `snap::read::FrameDecoder` accepts a repeated identifier
//! chunk, as the framing format allows for concatenated streams.
//!
//! ## Read Side
//!
//! ```text
//! None:    source ─→ records
//! Zlib:    source ─→ ZlibDecoder ─→ records
//! Snappy:  source ─→ FrameDecoder ─→ records
//! ```
//!
//! ## Closing
//!
//! [`EncodingSink::finish`] flushes layer by layer from the innermost record
//! buffer out to the raw sink, then hands the sink back. If any flush fails
//! the sink is dropped and the error returned; there is no retry.

use std::io::{self, BufRead, BufWriter, IntoInnerError, Read, Write};

use akaibu_core::{Compression, Error, Header, Result};
use flate2::bufread::ZlibDecoder;
use flate2::write::ZlibEncoder;
use snap::read::FrameDecoder;
use snap::write::FrameEncoder;

use crate::config::WriterConfig;

/// Stream identifier chunk opening every Snappy framed stream
pub const SNAPPY_STREAM_IDENTIFIER: [u8; 10] = *b"\xff\x06\x00\x00sNaPpY";

/// Highest zlib level accepted
pub const MAX_ZLIB_LEVEL: u32 = 9;

/// Decompressing view over an archive body
pub enum DecodingSource<R: BufRead> {
    None(R),
    Zlib(ZlibDecoder<R>),
    Snappy(FrameDecoder<R>),
}

impl<R: BufRead> DecodingSource<R> {
    /// Wrap `source` for the given compression variant
    pub fn new(compression: Compression, source: R) -> Self {
        match compression {
            Compression::None => DecodingSource::None(source),
            Compression::Zlib => DecodingSource::Zlib(ZlibDecoder::new(source)),
            Compression::Snappy => DecodingSource::Snappy(FrameDecoder::new(source)),
        }
    }

    /// Wrap `source` for a raw compression code.
    ///
    /// Fails with `InvalidCompression` when the code is not a known variant.
    pub fn from_code(code: u8, source: R) -> Result<Self> {
        let compression = Compression::try_from(code)?;
        Ok(Self::new(compression, source))
    }

    pub fn compression(&self) -> Compression {
        match self {
            DecodingSource::None(_) => Compression::None,
            DecodingSource::Zlib(_) => Compression::Zlib,
            DecodingSource::Snappy(_) => Compression::Snappy,
        }
    }
}

impl<R: BufRead> Read for DecodingSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DecodingSource::None(r) => r.read(buf),
            DecodingSource::Zlib(r) => r.read(buf),
            DecodingSource::Snappy(r) => r.read(buf),
        }
    }
}

/// Compressing sink for an archive body
pub enum EncodingSink<W: Write> {
    None(BufWriter<W>),
    Zlib(ZlibEncoder<W>),
    Snappy(BufWriter<FrameEncoder<BufWriter<W>>>),
}

impl<W: Write> EncodingSink<W> {
    /// Write the archive header to `sink` and build the compression layers.
    ///
    /// The header goes out before any compressor sees a byte. Nothing is
    /// returned if the header cannot be written.
    pub fn create(mut sink: W, config: &WriterConfig) -> Result<Self> {
        let header = Header::new(config.compression).encode();

        match config.compression {
            Compression::None => {
                let mut buffered = BufWriter::with_capacity(config.buffer_capacity, sink);
                buffered.write_all(&header)?;
                Ok(EncodingSink::None(buffered))
            }
            Compression::Zlib => {
                if config.zlib_level > MAX_ZLIB_LEVEL {
                    return Err(Error::InvalidCompressionLevel(config.zlib_level));
                }
                sink.write_all(&header)?;
                let level = flate2::Compression::new(config.zlib_level);
                Ok(EncodingSink::Zlib(ZlibEncoder::new(sink, level)))
            }
            Compression::Snappy => {
                let mut buffered = BufWriter::with_capacity(config.buffer_capacity, sink);
                buffered.write_all(&header)?;
                buffered.write_all(&SNAPPY_STREAM_IDENTIFIER)?;

                let encoder = FrameEncoder::new(buffered);
                Ok(EncodingSink::Snappy(BufWriter::with_capacity(
                    config.snappy_input_buffer,
                    encoder,
                )))
            }
        }
    }

    pub fn compression(&self) -> Compression {
        match self {
            EncodingSink::None(_) => Compression::None,
            EncodingSink::Zlib(_) => Compression::Zlib,
            EncodingSink::Snappy(_) => Compression::Snappy,
        }
    }

    /// Write all of `buf`, retrying short writes until done or failed
    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            EncodingSink::None(w) => w.write_all(buf),
            EncodingSink::Zlib(w) => w.write_all(buf),
            EncodingSink::Snappy(w) => w.write_all(buf),
        }
    }

    /// Flush every layer and release the raw sink
    pub fn finish(self) -> io::Result<W> {
        let mut sink = match self {
            EncodingSink::None(buffered) => {
                buffered.into_inner().map_err(IntoInnerError::into_error)?
            }
            EncodingSink::Zlib(encoder) => encoder.finish()?,
            EncodingSink::Snappy(input) => {
                let encoder = input.into_inner().map_err(IntoInnerError::into_error)?;
                let buffered = encoder.into_inner().map_err(|e| {
                    io::Error::new(e.error().kind(), e.error().to_string())
                })?;
                buffered.into_inner().map_err(IntoInnerError::into_error)?
            }
        };
        sink.flush()?;
        Ok(sink)
    }
}
