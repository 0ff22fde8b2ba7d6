//! Integer and byte-string primitives.
//!
//! [`Encoder`] appends fields to a buffer; [`Decoder`] walks a borrowed slice
//! and refuses to read past its end. Both carry the [`WireVersion`] so that
//! "write a length" or "read a tag" means the same thing everywhere in one
//! deployment: u32 little-endian under V1, ULEB128 under V2.
//!
//! Fixed-width integers are always little-endian. Addresses and hashes are
//! written with [`Encoder::fixed`] (no prefix) because their width is a
//! protocol constant.

use super::error::CodecError;
use super::WireVersion;

/// Longest ULEB128 encoding of a u64: ceil(64 / 7).
const MAX_ULEB128_LEN: usize = 10;

/// Encodes `value` as ULEB128: 7 payload bits per byte, least significant
/// group first, high bit set on every byte except the last.
pub fn encode_uleb128(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_ULEB128_LEN);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// Decodes a ULEB128 value from the front of `input`.
///
/// Returns the value and the number of bytes consumed. Rejects encodings
/// longer than necessary, since canonical bytes are what get signed.
pub fn decode_uleb128(input: &[u8]) -> Result<(u64, usize), CodecError> {
    read_uleb128_at(input, "uleb128")
}

fn read_uleb128_at(input: &[u8], field: &'static str) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;
    for (i, &byte) in input.iter().take(MAX_ULEB128_LEN).enumerate() {
        let group = u64::from(byte & 0x7f);
        // The tenth byte may only contribute the single remaining bit.
        if i == MAX_ULEB128_LEN - 1 && byte > 0x01 {
            return Err(CodecError::VarintOverflow { field });
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(CodecError::NonCanonicalVarint { field });
            }
            return Ok((value, i + 1));
        }
    }
    if input.len() >= MAX_ULEB128_LEN {
        Err(CodecError::VarintOverflow { field })
    } else {
        Err(CodecError::UnexpectedEof {
            field,
            needed: input.len() + 1,
            remaining: input.len(),
        })
    }
}

/// `prefix(len) ++ bytes` under the given wire version.
pub fn encode_bytes(version: WireVersion, bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut enc = Encoder::with_capacity(version, bytes.len() + 5);
    enc.bytes(bytes);
    enc.finish()
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Append-only writer for the canonical layout.
///
/// Methods chain. A length that does not fit the wire's prefix range is
/// recorded and reported by [`Encoder::finish`] instead of being truncated.
#[derive(Debug, Clone)]
pub struct Encoder {
    version: WireVersion,
    buf: Vec<u8>,
    overflow: Option<CodecError>,
}

impl Encoder {
    /// A fresh, empty encoder.
    pub fn new(version: WireVersion) -> Self {
        Self::with_capacity(version, 128)
    }

    /// A fresh encoder with a pre-sized buffer.
    pub fn with_capacity(version: WireVersion, capacity: usize) -> Self {
        Self {
            version,
            buf: Vec::with_capacity(capacity),
            overflow: None,
        }
    }

    /// The wire version this encoder writes.
    pub fn version(&self) -> WireVersion {
        self.version
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// A single byte, 0 or 1.
    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(u8::from(value))
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// An unsigned varint, regardless of wire version.
    pub fn uleb128(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&encode_uleb128(value));
        self
    }

    /// An enum discriminant: u32 LE under V1, ULEB128 under V2.
    pub fn tag(&mut self, tag: u32) -> &mut Self {
        if self.version.uses_varint() {
            self.uleb128(u64::from(tag))
        } else {
            self.u32(tag)
        }
    }

    /// A length or element count, in this version's prefix scheme.
    pub fn length(&mut self, len: usize, field: &'static str) -> &mut Self {
        match u32::try_from(len) {
            Ok(len) => self.tag(len),
            Err(_) => {
                if self.overflow.is_none() {
                    self.overflow = Some(CodecError::LengthOverflow {
                        field,
                        value: len as u64,
                    });
                }
                self
            }
        }
    }

    /// `prefix(len) ++ bytes`.
    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.length(bytes.len(), "bytes");
        self.fixed(bytes)
    }

    /// Raw bytes with no prefix. For fields whose width is a protocol
    /// constant (addresses, hashes, trailers).
    pub fn fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the encoder and returns the buffer.
    pub fn finish(self) -> Result<Vec<u8>, CodecError> {
        match self.overflow {
            Some(err) => Err(err),
            None => Ok(self.buf),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Cursor over a borrowed buffer.
///
/// Every read names its field so that failures point at the exact spot in
/// the layout. Call [`Decoder::finish`] once the value is complete to reject
/// trailing garbage.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    version: WireVersion,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(version: WireVersion, buf: &'a [u8]) -> Self {
        Self {
            version,
            buf,
            pos: 0,
        }
    }

    /// The wire version this decoder reads.
    pub fn version(&self) -> WireVersion {
        self.version
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::UnexpectedEof {
                field,
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        Ok(self.take(1, field)?[0])
    }

    /// A single byte that must be exactly 0 or 1.
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool, CodecError> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::InvalidBool { field, byte }),
        }
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array(field)?))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array(field)?))
    }

    pub fn read_u64(&mut self, field: &'static str) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array(field)?))
    }

    pub fn read_i64(&mut self, field: &'static str) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.take_array(field)?))
    }

    /// An unsigned varint, regardless of wire version.
    pub fn read_uleb128(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let (value, used) = read_uleb128_at(&self.buf[self.pos..], field)?;
        self.pos += used;
        Ok(value)
    }

    /// An enum discriminant in this version's scheme.
    pub fn read_tag(&mut self, field: &'static str) -> Result<u32, CodecError> {
        if self.version.uses_varint() {
            let value = self.read_uleb128(field)?;
            u32::try_from(value).map_err(|_| CodecError::LengthOverflow { field, value })
        } else {
            self.read_u32(field)
        }
    }

    /// A count of elements that follow. Unlike [`Decoder::read_length`] this
    /// is not checked against the remaining bytes, because elements may be
    /// wider than one byte.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, CodecError> {
        let count = self.read_tag(field)?;
        Ok(count as usize)
    }

    /// A byte length. It must fit in what is left of the buffer.
    pub fn read_length(&mut self, field: &'static str) -> Result<usize, CodecError> {
        let len = self.read_tag(field)? as usize;
        let remaining = self.remaining();
        if len > remaining {
            return Err(CodecError::UnexpectedEof {
                field,
                needed: len,
                remaining,
            });
        }
        Ok(len)
    }

    /// `prefix(len) ++ bytes`, returned owned.
    pub fn read_bytes(&mut self, field: &'static str) -> Result<Vec<u8>, CodecError> {
        let len = self.read_length(field)?;
        Ok(self.take(len, field)?.to_vec())
    }

    /// A length-prefixed UTF-8 string.
    pub fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let bytes = self.read_bytes(field)?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { field })
    }

    /// `n` raw bytes with no prefix.
    pub fn read_fixed(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        self.take(n, field)
    }

    /// Succeeds only if the whole buffer has been consumed.
    pub fn finish(self, field: &'static str) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(CodecError::TrailingBytes { field, count }),
        }
    }
}
