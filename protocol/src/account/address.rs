//! # Account Addresses & Authentication Keys
//!
//! An address is derived from the account's Ed25519 public key. How depends
//! on the wire version:
//!
//! ```text
//! V1:  address  = SHA3-256(public_key)                       32 bytes
//!
//! V2:  auth_key = SHA3-256(public_key ++ [scheme_id = 0])    32 bytes
//!      auth_key = prefix (bytes 0..16) ++ address (bytes 16..32)
//! ```
//!
//! Under V2 the prefix matters when the account is first created: the faucet
//! takes the full authentication key, and the prefix travels as a script
//! argument. Afterwards only the 16-byte address is used.
//!
//! Addresses carry no length prefix on the wire, so their width is checked
//! once, when the address is parsed, against the deployment's version.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::codec::WireVersion;
use crate::config::{AUTH_KEY_LENGTH, AUTH_KEY_SPLIT, ED25519_SCHEME_ID, V1_ADDRESS_LENGTH};
use crate::crypto::hash::{sha3_256, sha3_256_multi};
use crate::crypto::keys::PublicKey;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from parsing an address or authentication key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The decoded bytes have the wrong width for this deployment.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Width required by the wire version.
        expected: usize,
        /// Width actually supplied.
        got: usize,
    },

    /// The string is not valid hex.
    #[error("invalid address hex: {0}")]
    InvalidHex(String),
}

fn decode_hex(s: &str) -> Result<Vec<u8>, AddressError> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))
}

// ---------------------------------------------------------------------------
// AccountAddress
// ---------------------------------------------------------------------------

/// An on-chain account address, 32 bytes under V1 or 16 under V2.
///
/// The width is fixed at construction; an `AccountAddress` is always valid
/// for the version it was built for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress {
    bytes: [u8; V1_ADDRESS_LENGTH],
    len: u8,
}

impl AccountAddress {
    /// Wraps raw bytes, checking the width against `version`.
    pub fn from_bytes(version: WireVersion, bytes: &[u8]) -> Result<Self, AddressError> {
        let expected = version.address_len();
        if bytes.len() != expected {
            return Err(AddressError::InvalidLength {
                expected,
                got: bytes.len(),
            });
        }
        let mut buf = [0u8; V1_ADDRESS_LENGTH];
        buf[..expected].copy_from_slice(bytes);
        Ok(Self {
            bytes: buf,
            len: expected as u8,
        })
    }

    /// Parses hex, with or without a `0x` prefix. No padding is applied: the
    /// string must spell out every byte.
    pub fn from_hex(version: WireVersion, s: &str) -> Result<Self, AddressError> {
        Self::from_bytes(version, &decode_hex(s)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_hex())
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// AuthenticationKey
// ---------------------------------------------------------------------------

/// `SHA3-256(public_key ++ [scheme_id])`. Only meaningful under V2.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; AUTH_KEY_LENGTH]);

impl AuthenticationKey {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self(sha3_256_multi(&[public_key.as_bytes(), &[ED25519_SCHEME_ID]]))
    }

    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = decode_hex(s)?;
        let got = bytes.len();
        let arr: [u8; AUTH_KEY_LENGTH] = bytes.try_into().map_err(|_| AddressError::InvalidLength {
            expected: AUTH_KEY_LENGTH,
            got,
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; AUTH_KEY_LENGTH] {
        &self.0
    }

    /// The first 16 bytes, sent alongside the first payment to a new account.
    pub fn prefix(&self) -> &[u8] {
        &self.0[..AUTH_KEY_SPLIT]
    }

    /// The last 16 bytes, which are the V2 account address.
    pub fn derived_address(&self) -> AccountAddress {
        let mut bytes = [0u8; V1_ADDRESS_LENGTH];
        bytes[..AUTH_KEY_LENGTH - AUTH_KEY_SPLIT].copy_from_slice(&self.0[AUTH_KEY_SPLIT..]);
        AccountAddress {
            bytes,
            len: (AUTH_KEY_LENGTH - AUTH_KEY_SPLIT) as u8,
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self.to_hex())
    }
}

impl Serialize for AuthenticationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// The address `public_key` owns under `version`.
pub fn derive_address(public_key: &PublicKey, version: WireVersion) -> AccountAddress {
    match version {
        WireVersion::V1 => {
            let digest = sha3_256(public_key.as_bytes());
            AccountAddress {
                bytes: digest,
                len: V1_ADDRESS_LENGTH as u8,
            }
        }
        WireVersion::V2 => AuthenticationKey::from_public_key(public_key).derived_address(),
    }
}
