//! Size Prefix Encoding
//!
//! Every record in an archive body is preceded by its length, encoded as a
//! canonical variable-length *size prefix* of 1 to 5 octets. The leading bits of
//! the first octet announce how many octets follow; the remaining bits carry the
//! value, most-significant first across the whole prefix.
//!
//! ```text
//! Range                       Octets  Lead pattern  Value bits
//! 0 .. 127                    1       0xxxxxxx      7
//! 128 .. 16383                2       10xxxxxx      14
//! 16384 .. 2097151            3       110xxxxx      21
//! 2097152 .. 268435455        4       1110xxxx      28
//! 268435456 .. 34359738367    5       11110xxx      35
//! ```
//!
//! A lead octet of `11111xxx` matches no class and is rejected.
//!
//! Encoding always picks the smallest class that can hold the value, so every
//! length has exactly one encoding. Decoding accepts any well-formed prefix,
//! including non-minimal ones written by other producers.
//!
//! ## Usage
//! ```ignore
//! let mut buf = BytesMut::new();
//! put_size(&mut buf, 16384)?;                    // [0xC0, 0x40, 0x00]
//! let (value, octets) = decode_size(&mut buf.as_ref())?;
//! assert_eq!((value, octets), (16384, 3));
//! ```

use std::io::{self, Read};

use bytes::{Buf, BufMut};

use crate::{Error, Result};

/// Largest record length the format can frame (2^35 - 1 bytes).
pub const MAX_RECORD_SIZE: u64 = (1 << 35) - 1;

/// Longest size prefix in octets.
pub const MAX_PREFIX_OCTETS: usize = 5;

/// The five size-prefix classes, ordered by octet count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeClass {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl SizeClass {
    /// Smallest class able to carry `value`.
    pub fn for_value(value: u64) -> Result<Self> {
        match value {
            0..=0x7F => Ok(SizeClass::One),
            0x80..=0x3FFF => Ok(SizeClass::Two),
            0x4000..=0x1F_FFFF => Ok(SizeClass::Three),
            0x20_0000..=0xFFF_FFFF => Ok(SizeClass::Four),
            0x1000_0000..=MAX_RECORD_SIZE => Ok(SizeClass::Five),
            _ => Err(Error::OutOfRange(value)),
        }
    }

    /// Class announced by the lead octet of a prefix.
    ///
    /// Patterns are checked from the shortest to the longest.
    pub fn from_lead(lead: u8) -> Result<Self> {
        if lead & 0x80 == 0x00 {
            Ok(SizeClass::One)
        } else if lead & 0xC0 == 0x80 {
            Ok(SizeClass::Two)
        } else if lead & 0xE0 == 0xC0 {
            Ok(SizeClass::Three)
        } else if lead & 0xF0 == 0xE0 {
            Ok(SizeClass::Four)
        } else if lead & 0xF8 == 0xF0 {
            Ok(SizeClass::Five)
        } else {
            Err(Error::InvalidArchive(format!(
                "unrecognized size prefix lead octet 0x{lead:02X}"
            )))
        }
    }

    /// Total octets in a prefix of this class, lead octet included.
    pub fn octets(self) -> usize {
        match self {
            SizeClass::One => 1,
            SizeClass::Two => 2,
            SizeClass::Three => 3,
            SizeClass::Four => 4,
            SizeClass::Five => 5,
        }
    }

    /// Largest value this class can carry.
    pub fn max_value(self) -> u64 {
        (1u64 << (7 * self.octets())) - 1
    }

    /// Prefix bits OR-ed into the lead octet.
    fn marker(self) -> u8 {
        match self {
            SizeClass::One => 0x00,
            SizeClass::Two => 0x80,
            SizeClass::Three => 0xC0,
            SizeClass::Four => 0xE0,
            SizeClass::Five => 0xF0,
        }
    }

    /// Mask selecting the value bits of the lead octet.
    fn value_mask(self) -> u8 {
        match self {
            SizeClass::One => 0x7F,
            SizeClass::Two => 0x3F,
            SizeClass::Three => 0x1F,
            SizeClass::Four => 0x0F,
            SizeClass::Five => 0x07,
        }
    }
}

/// An encoded size prefix held inline, without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePrefix {
    octets: [u8; MAX_PREFIX_OCTETS],
    len: u8,
}

impl SizePrefix {
    /// The encoded octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.octets[..self.len as usize]
    }

    /// Number of encoded octets (1 to 5).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; a prefix has at least one octet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for SizePrefix {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encode a record length as its canonical size prefix.
///
/// Fails with [`Error::OutOfRange`] for values above [`MAX_RECORD_SIZE`].
pub fn encode_size(value: u64) -> Result<SizePrefix> {
    let class = SizeClass::for_value(value)?;
    let len = class.octets();

    let be = value.to_be_bytes();
    let mut octets = [0u8; MAX_PREFIX_OCTETS];
    octets[..len].copy_from_slice(&be[be.len() - len..]);
    octets[0] |= class.marker();

    Ok(SizePrefix {
        octets,
        len: len as u8,
    })
}

/// Append the size prefix for `value` to `buf`, returning the octet count.
pub fn put_size(buf: &mut impl BufMut, value: u64) -> Result<usize> {
    let prefix = encode_size(value)?;
    buf.put_slice(prefix.as_bytes());
    Ok(prefix.len())
}

/// Decode one size prefix from an in-memory buffer.
///
/// Returns the value and the number of octets consumed.
pub fn decode_size(buf: &mut impl Buf) -> Result<(u64, usize)> {
    if !buf.has_remaining() {
        return Err(Error::UnexpectedEndOfStream);
    }

    let lead = buf.get_u8();
    let class = SizeClass::from_lead(lead)?;
    let continuation = class.octets() - 1;

    if buf.remaining() < continuation {
        return Err(Error::UnexpectedEndOfStream);
    }

    let mut value = u64::from(lead & class.value_mask());
    for _ in 0..continuation {
        value = (value << 8) | u64::from(buf.get_u8());
    }

    Ok((value, class.octets()))
}

/// Read one size prefix from a byte stream.
///
/// Returns `Ok(None)` when the stream ends cleanly before the lead octet, the
/// normal end of an archive body. A stream ending after the lead octet but
/// before the continuation octets is [`Error::UnexpectedEndOfStream`], as is
/// an `UnexpectedEof` raised by a decompressor while fetching the lead octet.
pub fn read_size<R: Read + ?Sized>(src: &mut R) -> Result<Option<(u64, usize)>> {
    let mut prefix = [0u8; MAX_PREFIX_OCTETS];

    loop {
        match src.read(&mut prefix[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::truncated(e)),
        }
    }

    let octets = SizeClass::from_lead(prefix[0])?.octets();
    src.read_exact(&mut prefix[1..octets])
        .map_err(Error::truncated)?;

    decode_size(&mut &prefix[..octets]).map(Some)
}
