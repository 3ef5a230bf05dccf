/*!
A bounds-checked reader for the small subset of CBOR (RFC 7049) emitted by
protected-update manifest producers.

Only definite-length items whose argument fits in 32 bits are supported:
unsigned and negative integers, byte strings, arrays and maps. Everything is
read through a [`Cursor`], which never reads past the end of its buffer.
*/

use thiserror::Error;

pub const UNSIGNED_INTEGER: u8 = 0;
pub const NEGATIVE_INTEGER: u8 = 1;
pub const BYTE_STRING: u8 = 2;
pub const ARRAY: u8 = 4;
pub const MAP: u8 = 5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Need {0} more bytes to decode value")]
    NeedMoreData(usize),

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Incorrect type: expected major type {expected}, found major type {found}")]
    IncorrectType { expected: u8, found: u8 },

    #[error("Negative integer -1-{0} does not fit in 32 bits")]
    IntegerOverflow(u32),

    #[error("Byte string of {length} bytes does not fit in a {capacity} byte field")]
    FieldTooLarge { length: usize, capacity: usize },
}

/// The map header and key read by [`Cursor::read_mapped_entry`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    pub count: u32,
    pub key: u32,
}

/// Where [`Cursor::read_mapped_entry`] should store the value of a map entry.
///
/// The variant selects the expected major type of the value. A `None`
/// destination still consumes the value.
#[derive(Debug)]
pub enum Destination<'d> {
    Unsigned(Option<&'d mut u32>),
    Signed(Option<&'d mut i32>),
    /// Copied in reverse byte order, so a big-endian wire field lands in
    /// little-endian order in the destination.
    Bytes(Option<&'d mut [u8]>),
}

/// A read position within a borrowed buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::NeedMoreData(len - remaining));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.take(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.take(1).map(|b| b[0])
    }

    pub fn read_be_u16(&mut self) -> Result<u16, Error> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_be_u32(&mut self) -> Result<u32, Error> {
        self.take(4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads an item header of the given major type and returns its argument.
    ///
    /// Every integer and length read goes through here.
    pub fn decode_length_value(&mut self, major: u8) -> Result<u32, Error> {
        let initial = self.read_u8()?;
        if initial >> 5 != major {
            return Err(Error::IncorrectType {
                expected: major,
                found: initial >> 5,
            });
        }

        match initial & 0x1F {
            minor @ 0..=23 => Ok(minor.into()),
            24 => self.read_u8().map(Into::into),
            25 => self.read_be_u16().map(Into::into),
            26 => self.read_be_u32(),
            // 27 is a 64-bit argument, 31 is indefinite length, the rest are reserved
            minor => Err(Error::InvalidMinorValue(minor)),
        }
    }

    pub fn read_array_count(&mut self) -> Result<u32, Error> {
        self.decode_length_value(ARRAY)
    }

    pub fn read_unsigned(&mut self) -> Result<u32, Error> {
        self.decode_length_value(UNSIGNED_INTEGER)
    }

    /// Reads a negative integer, returning `-1 - n` for the encoded argument `n`.
    pub fn read_signed(&mut self) -> Result<i32, Error> {
        let n = self.decode_length_value(NEGATIVE_INTEGER)?;
        i32::try_from(n)
            .map(|n| !n)
            .map_err(|_| Error::IntegerOverflow(n))
    }

    /// Reads a byte string header only; the content is left for the caller.
    pub fn read_byte_string_length(&mut self) -> Result<usize, Error> {
        let len = self.decode_length_value(BYTE_STRING)?;
        usize::try_from(len).map_err(|_| Error::NeedMoreData(usize::MAX))
    }

    pub fn read_byte_string(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_byte_string_length()?;
        self.take(len)
    }

    /// Reads a map header, an unsigned key, and one value into `value`.
    ///
    /// Byte strings longer than a supplied destination fail with
    /// [`Error::FieldTooLarge`] after their content has been consumed.
    pub fn read_mapped_entry(&mut self, value: Destination<'_>) -> Result<MapEntry, Error> {
        let count = self.decode_length_value(MAP)?;
        let key = self.read_unsigned()?;

        match value {
            Destination::Unsigned(dest) => {
                let v = self.read_unsigned()?;
                if let Some(dest) = dest {
                    *dest = v;
                }
            }
            Destination::Signed(dest) => {
                let v = self.read_signed()?;
                if let Some(dest) = dest {
                    *dest = v;
                }
            }
            Destination::Bytes(dest) => {
                let bytes = self.read_byte_string()?;
                if let Some(dest) = dest {
                    if bytes.len() > dest.len() {
                        return Err(Error::FieldTooLarge {
                            length: bytes.len(),
                            capacity: dest.len(),
                        });
                    }
                    for (d, s) in dest.iter_mut().zip(bytes.iter().rev()) {
                        *d = *s;
                    }
                }
            }
        }
        Ok(MapEntry { count, key })
    }
}
