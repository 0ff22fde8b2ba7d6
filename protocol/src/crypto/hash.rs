//! # Hashing Utilities
//!
//! The ledger hashes everything with the SHA-3 family, so that is all we
//! offer:
//!
//! - **SHA3-256** — addresses, authentication keys, and the
//!   domain-separated signing hash of a raw transaction.
//! - **SHA3-512** — stretching a salted mnemonic into Ed25519 seed material.
//!
//! [`HashValue`] is the 32-byte digest type that shows up throughout decoded
//! ledger responses (transaction hashes, state roots, Merkle siblings).

use serde::{Serialize, Serializer};
use sha3::{Digest, Sha3_256, Sha3_512};
use std::fmt;

use crate::config::HASH_LENGTH;

/// SHA3-256 of `data`.
///
/// # Example
///
/// ```
/// use meridian_protocol::crypto::sha3_256;
///
/// let digest = sha3_256(b"");
/// assert_eq!(
///     hex::encode(digest),
///     "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
/// );
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    sha3_256_multi(&[data])
}

/// SHA3-256 over the concatenation of `parts`, without building the
/// concatenation. Used for `salt ++ message` style hashes.
pub fn sha3_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA3-512 over the concatenation of `parts`.
pub fn sha3_512_multi(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

// ---------------------------------------------------------------------------
// HashValue
// ---------------------------------------------------------------------------

/// A 32-byte digest as returned by the ledger.
///
/// Serializes as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    pub const LENGTH: usize = HASH_LENGTH;

    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// `None` unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; HASH_LENGTH] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", &self.to_hex()[..16])
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
