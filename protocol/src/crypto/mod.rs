//! # Cryptographic Primitives
//!
//! Thin wrappers over audited implementations. Nothing here is novel:
//!
//! - **SHA3-256** for addresses, authentication keys and signing hashes.
//! - **SHA3-512** for stretching a salted mnemonic into seed material.
//! - **Ed25519** for transaction signatures.
//!
//! The validator network hashes and verifies with the same primitives, so
//! any deviation here shows up as a rejected transaction, not a crash.

pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod signatures;

pub use hash::{sha3_256, sha3_256_multi, sha3_512_multi, HashValue};
pub use keys::{AccountKeypair, KeyError, PublicKey, Signature};
pub use mnemonic::{
    derive_keypair, derive_seed, generate_mnemonic, KeyDerivationSalts, Mnemonic, MnemonicError,
};
pub use signatures::{sign, verify, verify_raw, SignatureError};
