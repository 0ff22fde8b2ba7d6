//! # Canonical Wire Codec
//!
//! The ledger speaks a non-self-describing binary format: no field names, no
//! type markers, just bytes in a fixed order. Every integer width and every
//! length prefix has to match what the validators expect, byte for byte, or
//! the transaction hash changes and the signature is worthless.
//!
//! Two incompatible layouts exist in the network's history. They are modelled
//! as [`WireVersion`] and chosen exactly once, when the client is configured.
//! Nothing in this crate ever guesses the version from the shape of the data.
//!
//! ```text
//!                 V1 (legacy)            V2 (current)
//! address         32 bytes               16 bytes
//! length prefix   u32 little-endian      ULEB128
//! enum tag        u32 little-endian      ULEB128
//! raw-txn prefix  none                   ULEB128(0)
//! gas trailer     fixed constant         none
//! scheme id       none                   ULEB128(0) before the public key
//! ```
//!
//! ## Layout
//!
//! ```text
//! error.rs      — CodecError, the "malformed input" family
//! primitives.rs — Encoder / Decoder and the ULEB128 helpers
//! serde_hex.rs  — hex rendering for byte fields of decoded records
//! ```

pub mod error;
pub mod primitives;
pub mod serde_hex;

pub use error::CodecError;
pub use primitives::{decode_uleb128, encode_bytes, encode_uleb128, Decoder, Encoder};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config;

/// The binary layout a deployment speaks.
///
/// Threaded through the encoder, signer and decoder as a plain parameter.
/// The two variants are not interoperable at the byte level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireVersion {
    /// 32-byte addresses, fixed-width u32 prefixes and tags, constant gas
    /// trailer before the expiration time.
    V1,
    /// 16-byte addresses (auth-key split), ULEB128 prefixes and tags, a
    /// format discriminant before the sender and a scheme id before the
    /// public key.
    V2,
}

impl WireVersion {
    /// Width of an account address on the wire. No length prefix is written
    /// for addresses, so this must be right.
    pub const fn address_len(self) -> usize {
        match self {
            Self::V1 => config::V1_ADDRESS_LENGTH,
            Self::V2 => config::V2_ADDRESS_LENGTH,
        }
    }

    /// Whether length prefixes, counts and enum tags use ULEB128.
    pub const fn uses_varint(self) -> bool {
        matches!(self, Self::V2)
    }

    /// The constant bytes written between the gas fields and the expiration
    /// time, if this version has them.
    pub const fn gas_trailer(self) -> Option<&'static [u8]> {
        match self {
            Self::V1 => Some(&config::V1_GAS_TRAILER),
            Self::V2 => None,
        }
    }

    /// Whether the raw transaction starts with a format discriminant.
    pub const fn has_raw_txn_prefix(self) -> bool {
        matches!(self, Self::V2)
    }

    /// Whether the signed transaction carries a scheme id before the key.
    pub const fn has_scheme_id(self) -> bool {
        matches!(self, Self::V2)
    }

    /// Default distance between "now" and a transaction's expiration time.
    pub const fn expiration_window_secs(self) -> u64 {
        match self {
            Self::V1 => config::V1_EXPIRATION_WINDOW_SECS,
            Self::V2 => config::V2_EXPIRATION_WINDOW_SECS,
        }
    }
}

impl fmt::Display for WireVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for WireVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "a" => Ok(Self::V1),
            "v2" | "b" => Ok(Self::V2),
            other => Err(format!("unknown wire version '{other}' (expected v1 or v2)")),
        }
    }
}
