//! Transaction signing and the signed-transaction envelope.
//!
//! ```text
//! signing_hash = SHA3-256(domain_salt ++ raw_bytes)
//! signature    = Ed25519(private_key, signing_hash)
//!
//! signed bytes = raw_bytes
//!             ++ [V2: ULEB128(scheme_id = 0)]
//!             ++ bytes(public_key)
//!             ++ bytes(signature)
//! ```
//!
//! The domain salt is SHA3-256 of a fixed seed string. It keeps a
//! raw-transaction signature from being valid for any other kind of hashed
//! message. It is passed in, never looked up.
//!
//! The private key is borrowed for the duration of one call and is never
//! logged.

use serde::Serialize;
use tracing::debug;

use super::types::RawTransaction;
use crate::account::AccountAddress;
use crate::codec::{serde_hex, CodecError, Decoder, Encoder, WireVersion};
use crate::config::{ED25519_SCHEME_ID, RAW_TRANSACTION_HASH_SEED};
use crate::crypto::hash::{sha3_256, sha3_256_multi};
use crate::crypto::keys::{AccountKeypair, PublicKey, Signature};
use crate::crypto::signatures::{verify_raw, SignatureError};

// ---------------------------------------------------------------------------
// DomainSalt
// ---------------------------------------------------------------------------

/// Prefix hashed in front of the raw bytes before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSalt(Vec<u8>);

impl DomainSalt {
    pub fn new(salt: impl Into<Vec<u8>>) -> Self {
        Self(salt.into())
    }

    /// The network's raw-transaction domain:
    /// `SHA3-256("RawTransaction@@$$LIBRA$$@@")`.
    pub fn raw_transaction() -> Self {
        Self(sha3_256(RAW_TRANSACTION_HASH_SEED).to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// TransactionSigner
// ---------------------------------------------------------------------------

/// Hashes, signs and assembles transactions for one wire version.
///
/// Stateless apart from its configuration; share it freely between
/// concurrent submissions.
#[derive(Debug, Clone)]
pub struct TransactionSigner {
    version: WireVersion,
    domain_salt: DomainSalt,
}

impl TransactionSigner {
    pub fn new(version: WireVersion, domain_salt: DomainSalt) -> Self {
        Self {
            version,
            domain_salt,
        }
    }

    pub fn version(&self) -> WireVersion {
        self.version
    }

    /// `SHA3-256(domain_salt ++ raw_bytes)`.
    pub fn signing_hash(&self, raw_bytes: &[u8]) -> [u8; 32] {
        sha3_256_multi(&[self.domain_salt.as_bytes(), raw_bytes])
    }

    /// Signs already-encoded raw transaction bytes.
    pub fn sign(&self, raw_bytes: &[u8], keypair: &AccountKeypair) -> (PublicKey, Signature) {
        let hash = self.signing_hash(raw_bytes);
        (keypair.public_key(), keypair.sign(&hash))
    }

    /// Encodes, signs and assembles `txn`.
    pub fn sign_transaction(
        &self,
        txn: RawTransaction,
        keypair: &AccountKeypair,
    ) -> Result<SignedTransaction, CodecError> {
        let raw_bytes = txn.encode(self.version)?;
        let (public_key, signature) = self.sign(&raw_bytes, keypair);

        debug!(
            sender = %txn.sender,
            sequence_number = txn.sequence_number,
            raw_len = raw_bytes.len(),
            "signed raw transaction"
        );

        Ok(SignedTransaction {
            version: self.version,
            raw_txn: txn,
            raw_bytes,
            scheme_id: self.version.has_scheme_id().then_some(ED25519_SCHEME_ID),
            public_key: public_key.as_bytes().to_vec(),
            signature: signature.as_bytes().to_vec(),
        })
    }

    /// Checks a signed transaction's signature under this signer's domain.
    pub fn verify(&self, signed: &SignedTransaction) -> Result<(), SignatureError> {
        let hash = self.signing_hash(&signed.raw_bytes);
        verify_raw(&signed.public_key, &hash, &signed.signature)
    }
}

/// `raw_bytes ++ [scheme_id] ++ bytes(public_key) ++ bytes(signature)`.
pub fn assemble_signed_transaction(
    version: WireVersion,
    raw_bytes: &[u8],
    scheme_id: Option<u8>,
    public_key: &[u8],
    signature: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let mut enc = Encoder::with_capacity(version, raw_bytes.len() + 110);
    enc.fixed(raw_bytes);
    if let Some(id) = scheme_id {
        enc.uleb128(u64::from(id));
    }
    enc.bytes(public_key).bytes(signature);
    enc.finish()
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A raw transaction with its authenticator. The only thing that may be
/// submitted.
///
/// Key and signature are kept as the bytes found on the wire: a transaction
/// decoded from a ledger response is structurally valid even if its key is
/// not a curve point. [`TransactionSigner::verify`] checks the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    #[serde(skip)]
    version: WireVersion,
    pub raw_txn: RawTransaction,
    #[serde(skip)]
    pub raw_bytes: Vec<u8>,
    /// Present under V2 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<u8>,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub public_key: Vec<u8>,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    pub fn version(&self) -> WireVersion {
        self.version
    }

    /// The complete submission bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        assemble_signed_transaction(
            self.version,
            &self.raw_bytes,
            self.scheme_id,
            &self.public_key,
            &self.signature,
        )
    }

    /// Parses a complete signed transaction. Trailing bytes are an error.
    pub fn decode(version: WireVersion, bytes: &[u8]) -> Result<Self, CodecError> {
        let mut dec = Decoder::new(version, bytes);
        let start = dec.position();
        let raw_txn = RawTransaction::decode_from(&mut dec)?;
        let raw_bytes = bytes[start..dec.position()].to_vec();

        let scheme_id = if version.has_scheme_id() {
            let id = dec.read_uleb128("scheme_id")?;
            if id != u64::from(ED25519_SCHEME_ID) {
                return Err(CodecError::UnknownTag {
                    field: "scheme_id",
                    tag: id,
                });
            }
            Some(ED25519_SCHEME_ID)
        } else {
            None
        };
        let public_key = dec.read_bytes("public_key")?;
        let signature = dec.read_bytes("signature")?;
        dec.finish("signature")?;

        Ok(Self {
            version,
            raw_txn,
            raw_bytes,
            scheme_id,
            public_key,
            signature,
        })
    }

    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }

    /// `(receiver, amount)` for a payment script.
    pub fn peer_to_peer(&self) -> Option<(AccountAddress, u64)> {
        self.raw_txn.peer_to_peer()
    }
}
