//! # Detached Signatures
//!
//! Free-function wrappers over [`AccountKeypair::sign`] and
//! [`PublicKey::verify`], plus [`verify_raw`] for the "these bytes came off
//! the wire" case: a decoded signed transaction carries its public key and
//! signature as plain byte strings, and they have to be parsed before they
//! can be checked.
//!
//! Verification uses `ed25519-dalek`'s default rules. The validator network
//! does the same, so a signature accepted here is accepted there.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{AccountKeypair, PublicKey, Signature};

/// Errors from [`verify_raw`].
///
/// Does not distinguish a bad signature from a signature by someone else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignatureBytes,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Signs `message` with `keypair`.
///
/// # Example
///
/// ```
/// use meridian_protocol::crypto::{sign, verify, AccountKeypair};
///
/// let keypair = AccountKeypair::from_seed(&[7u8; 32]);
/// let signature = sign(&keypair, b"pay 10 to bob");
///
/// assert!(verify(&keypair.public_key(), b"pay 10 to bob", &signature));
/// ```
pub fn sign(keypair: &AccountKeypair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature)
}

/// Verifies a signature given as raw byte strings of any length.
pub fn verify_raw(
    public_key_bytes: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<(), SignatureError> {
    let pk: [u8; 32] = public_key_bytes
        .try_into()
        .map_err(|_| SignatureError::InvalidPublicKey)?;
    let sig: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| SignatureError::InvalidSignatureBytes)?;

    let verifying_key =
        VerifyingKey::from_bytes(&pk).map_err(|_| SignatureError::InvalidPublicKey)?;
    verifying_key
        .verify(message, &DalekSignature::from_bytes(&sig))
        .map_err(|_| SignatureError::VerificationFailed)
}
