//! Byte-level CBOR decoder producing a [`CborValue`] tree.
//!
//! Every error carries the byte offset at which it was detected, so callers can
//! point at the exact spot in the submitted input.

use half::f16;

use crate::error::{DecodeError, DecodeErrorKind, Result};
use crate::value::CborValue;

// CBOR major types
const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const MAJOR_SIMPLE: u8 = 7;

// Additional info values
const FALSE: u8 = 20;
const TRUE: u8 = 21;
const NULL: u8 = 22;
const UNDEFINED: u8 = 23;
const SIMPLE_EXTENDED: u8 = 24;
const FLOAT16: u8 = 25;
const FLOAT32: u8 = 26;
const FLOAT64: u8 = 27;
const INDEFINITE: u8 = 31;

const BREAK: u8 = 0xff;

/// Maximum nesting of arrays, maps and tags.
pub const MAX_DEPTH: usize = 256;

pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Decoder {
            input,
            pos: 0,
            depth: 0,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn error(&self, kind: DecodeErrorKind, offset: usize) -> DecodeError {
        DecodeError::new(kind, offset)
    }

    fn eof(&self) -> DecodeError {
        self.error(DecodeErrorKind::UnexpectedEof, self.input.len())
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn peek_u8(&self) -> Result<u8> {
        self.input.get(self.pos).copied().ok_or_else(|| self.eof())
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N as u64)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Borrow `len` bytes without trusting `len` beyond the input that is left.
    fn read_bytes(&mut self, len: u64) -> Result<&'a [u8]> {
        if len > self.remaining() as u64 {
            return Err(self.eof());
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.input[start..self.pos])
    }

    /// Read the argument that follows an initial byte. `start` is the offset of
    /// that initial byte and is used for error reporting.
    fn read_argument(&mut self, info: u8, start: usize) -> Result<u64> {
        Ok(match info {
            0..=23 => info as u64,
            24 => self.read_u8()? as u64,
            25 => self.read_u16()? as u64,
            26 => self.read_u32()? as u64,
            27 => self.read_u64()?,
            _ => return Err(self.error(DecodeErrorKind::ReservedInfo(info), start)),
        })
    }

    /// Decode exactly one data item.
    pub fn decode(&mut self) -> Result<CborValue> {
        let start = self.pos;
        let initial = self.read_u8()?;
        let major = initial >> 5;
        let info = initial & 0x1f;

        if info == INDEFINITE {
            return self.decode_indefinite(major, start);
        }
        if major == MAJOR_SIMPLE {
            return self.decode_simple(info, start);
        }

        let arg = self.read_argument(info, start)?;
        match major {
            MAJOR_UNSIGNED => Ok(CborValue::Unsigned(arg)),
            MAJOR_NEGATIVE => Ok(CborValue::Negative(arg)),
            MAJOR_BYTES => Ok(CborValue::Bytes(self.read_bytes(arg)?.to_vec())),
            MAJOR_TEXT => {
                let bytes = self.read_bytes(arg)?;
                let text = std::str::from_utf8(bytes)
                    .map_err(|_| self.error(DecodeErrorKind::InvalidUtf8, start))?;
                Ok(CborValue::Text(text.to_owned()))
            }
            MAJOR_ARRAY => {
                self.enter(start)?;
                // Every item takes at least one byte.
                let mut items = Vec::with_capacity(arg.min(self.remaining() as u64) as usize);
                for _ in 0..arg {
                    items.push(self.decode()?);
                }
                self.depth -= 1;
                Ok(CborValue::Array(items))
            }
            MAJOR_MAP => {
                self.enter(start)?;
                let mut entries =
                    Vec::with_capacity(arg.min(self.remaining() as u64 / 2) as usize);
                for _ in 0..arg {
                    let key = self.decode()?;
                    let value = self.decode()?;
                    entries.push((key, value));
                }
                self.depth -= 1;
                Ok(CborValue::Map(entries))
            }
            MAJOR_TAG => {
                self.enter(start)?;
                let inner = self.decode()?;
                self.depth -= 1;
                Ok(CborValue::Tag(arg, Box::new(inner)))
            }
            _ => unreachable!("major type is three bits"),
        }
    }

    fn enter(&mut self, start: usize) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(DecodeErrorKind::DepthLimitExceeded, start));
        }
        self.depth += 1;
        Ok(())
    }

    /// Consume a break byte if one is next.
    fn at_break(&mut self) -> Result<bool> {
        if self.peek_u8()? == BREAK {
            self.pos += 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn decode_indefinite(&mut self, major: u8, start: usize) -> Result<CborValue> {
        match major {
            MAJOR_BYTES => Ok(CborValue::Bytes(self.read_chunks(MAJOR_BYTES)?)),
            MAJOR_TEXT => {
                // Chunks are validated one by one, so the concatenation is valid too.
                let bytes = self.read_chunks(MAJOR_TEXT)?;
                String::from_utf8(bytes)
                    .map(CborValue::Text)
                    .map_err(|_| self.error(DecodeErrorKind::InvalidUtf8, start))
            }
            MAJOR_ARRAY => {
                self.enter(start)?;
                let mut items = Vec::new();
                while !self.at_break()? {
                    items.push(self.decode()?);
                }
                self.depth -= 1;
                Ok(CborValue::Array(items))
            }
            MAJOR_MAP => {
                self.enter(start)?;
                let mut entries = Vec::new();
                while !self.at_break()? {
                    let key = self.decode()?;
                    let value = self.decode()?;
                    entries.push((key, value));
                }
                self.depth -= 1;
                Ok(CborValue::Map(entries))
            }
            MAJOR_SIMPLE => Err(self.error(DecodeErrorKind::UnexpectedBreak, start)),
            _ => Err(self.error(DecodeErrorKind::UnexpectedIndefinite(major), start)),
        }
    }

    /// Concatenate the definite-length chunks of an indefinite byte or text string.
    fn read_chunks(&mut self, major: u8) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        while !self.at_break()? {
            let start = self.pos;
            let initial = self.read_u8()?;
            let info = initial & 0x1f;
            if initial >> 5 != major || info == INDEFINITE {
                return Err(self.error(DecodeErrorKind::InvalidChunk, start));
            }
            let len = self.read_argument(info, start)?;
            let chunk = self.read_bytes(len)?;
            if major == MAJOR_TEXT && std::str::from_utf8(chunk).is_err() {
                return Err(self.error(DecodeErrorKind::InvalidUtf8, start));
            }
            buf.extend_from_slice(chunk);
        }
        Ok(buf)
    }

    fn decode_simple(&mut self, info: u8, start: usize) -> Result<CborValue> {
        Ok(match info {
            FALSE => CborValue::Bool(false),
            TRUE => CborValue::Bool(true),
            NULL => CborValue::Null,
            UNDEFINED => CborValue::Undefined,
            0..=19 => CborValue::Simple(info),
            SIMPLE_EXTENDED => {
                let value = self.read_u8()?;
                if value < 32 {
                    return Err(self.error(DecodeErrorKind::InvalidSimple(value), start));
                }
                CborValue::Simple(value)
            }
            FLOAT16 => CborValue::Float(f16::from_bits(self.read_u16()?).to_f64()),
            FLOAT32 => CborValue::Float(f32::from_bits(self.read_u32()?) as f64),
            FLOAT64 => CborValue::Float(f64::from_bits(self.read_u64()?)),
            _ => return Err(self.error(DecodeErrorKind::ReservedInfo(info), start)),
        })
    }
}

/// Decode a buffer holding exactly one CBOR data item.
pub fn from_slice(slice: &[u8]) -> Result<CborValue> {
    let mut decoder = Decoder::new(slice);
    let value = decoder.decode()?;
    if decoder.position() != slice.len() {
        return Err(DecodeError::new(
            DecodeErrorKind::TrailingData,
            decoder.position(),
        ));
    }
    Ok(value)
}
