//! Structural decode failures.
//!
//! Every variant names the field being read when things went wrong. A decode
//! either returns a complete value or one of these; there is no partial
//! result and nothing is ever zero-filled.

use thiserror::Error;

/// The input bytes do not match the wire layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The buffer ended before the field could be read.
    #[error("unexpected end of input reading `{field}`: needed {needed} bytes, {remaining} left")]
    UnexpectedEof {
        /// Field being decoded.
        field: &'static str,
        /// Bytes the field required.
        needed: usize,
        /// Bytes actually left in the buffer.
        remaining: usize,
    },

    /// A value was fully decoded but bytes were left over.
    #[error("{count} trailing bytes after `{field}`")]
    TrailingBytes {
        /// The last field decoded.
        field: &'static str,
        /// Number of unread bytes.
        count: usize,
    },

    /// A ULEB128 value does not fit in 64 bits.
    #[error("varint overflow reading `{field}`")]
    VarintOverflow {
        /// Field being decoded.
        field: &'static str,
    },

    /// A ULEB128 value was encoded with redundant continuation bytes.
    #[error("non-canonical varint reading `{field}`")]
    NonCanonicalVarint {
        /// Field being decoded.
        field: &'static str,
    },

    /// A length, count or tag exceeds the range the wire format allows.
    #[error("value {value} out of range for `{field}`")]
    LengthOverflow {
        /// Field being decoded.
        field: &'static str,
        /// The decoded value.
        value: u64,
    },

    /// An enum discriminant that the layout does not define.
    #[error("unknown tag {tag} for `{field}`")]
    UnknownTag {
        /// Field being decoded.
        field: &'static str,
        /// The discriminant found on the wire.
        tag: u64,
    },

    /// A boolean byte other than 0 or 1.
    #[error("invalid boolean byte {byte:#04x} for `{field}`")]
    InvalidBool {
        /// Field being decoded.
        field: &'static str,
        /// The offending byte.
        byte: u8,
    },

    /// A string argument that is not valid UTF-8.
    #[error("invalid utf-8 in `{field}`")]
    InvalidUtf8 {
        /// Field being decoded.
        field: &'static str,
    },

    /// An address whose width does not match the wire version.
    #[error("address `{field}` is {got} bytes, wire version requires {expected}")]
    AddressWidth {
        /// Field being encoded or decoded.
        field: &'static str,
        /// Width the wire version requires.
        expected: usize,
        /// Width of the address supplied.
        got: usize,
    },

    /// The V1 constant trailer did not match.
    #[error("gas trailer mismatch")]
    TrailerMismatch,
}

impl CodecError {
    /// The field the decoder was reading when it failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnexpectedEof { field, .. }
            | Self::TrailingBytes { field, .. }
            | Self::VarintOverflow { field }
            | Self::NonCanonicalVarint { field }
            | Self::LengthOverflow { field, .. }
            | Self::UnknownTag { field, .. }
            | Self::InvalidBool { field, .. }
            | Self::InvalidUtf8 { field }
            | Self::AddressWidth { field, .. } => field,
            Self::TrailerMismatch => "gas_trailer",
        }
    }
}
