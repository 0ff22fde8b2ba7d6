//! # Mnemonic Key Derivation
//!
//! An account's key pair is a pure function of its mnemonic and two salts:
//!
//! ```text
//! digest = SHA3-512(salt_prefix ++ utf8(words joined by " ") ++ salt_suffix)
//! seed   = digest[0..32]
//! key    = Ed25519 key pair from seed
//! ```
//!
//! Same words and same salts give the same key pair, every time. That is the
//! whole recovery story: the user writes the words down and nothing else.
//!
//! Phrases are generated from 128 bits of OS entropy with the BIP-39 English
//! wordlist. The BIP-39 PBKDF2 seed is *not* used; only the words are.

use bip39::Language;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use thiserror::Error;

use super::hash::sha3_512_multi;
use super::keys::AccountKeypair;
use crate::config::DEFAULT_MNEMONIC_SALT;

/// Entropy bytes behind a 12-word phrase.
const MNEMONIC_ENTROPY_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MnemonicError {
    /// Wrong word count, a word outside the list, or a bad checksum.
    #[error("invalid mnemonic phrase: {0}")]
    InvalidPhrase(String),

    #[error("failed to generate mnemonic: {0}")]
    Generation(String),
}

/// An ordered list of mnemonic words.
///
/// `Debug` prints only the word count.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<String>,
}

impl Mnemonic {
    /// Generates a fresh 12-word phrase.
    pub fn generate() -> Result<Self, MnemonicError> {
        let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut entropy);
        let mnemonic = bip39::Mnemonic::from_entropy_in(Language::English, &entropy)
            .map_err(|e| MnemonicError::Generation(e.to_string()))?;
        Ok(Self::from_bip39(&mnemonic))
    }

    /// Parses and validates a phrase. Extra whitespace between words is
    /// ignored; case is not.
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let mnemonic = bip39::Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| MnemonicError::InvalidPhrase(e.to_string()))?;
        Ok(Self::from_bip39(&mnemonic))
    }

    fn from_bip39(mnemonic: &bip39::Mnemonic) -> Self {
        Self {
            words: mnemonic
                .to_string()
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The words joined by single spaces. This exact string is what gets
    /// hashed.
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.words.len())
    }
}

/// Shorthand for [`Mnemonic::generate`].
pub fn generate_mnemonic() -> Result<Mnemonic, MnemonicError> {
    Mnemonic::generate()
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Bytes hashed before and after the phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDerivationSalts {
    pub prefix: Vec<u8>,
    pub suffix: Vec<u8>,
}

impl KeyDerivationSalts {
    pub fn new(prefix: impl Into<Vec<u8>>, suffix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl Default for KeyDerivationSalts {
    fn default() -> Self {
        Self::new(DEFAULT_MNEMONIC_SALT, Vec::<u8>::new())
    }
}

/// The 32-byte Ed25519 seed for `mnemonic` under `salts`.
pub fn derive_seed(mnemonic: &Mnemonic, salts: &KeyDerivationSalts) -> [u8; 32] {
    let phrase = mnemonic.phrase();
    let digest = sha3_512_multi(&[&salts.prefix, phrase.as_bytes(), &salts.suffix]);
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest[..32]);
    seed
}

/// Derives the account key pair for `mnemonic` under `salts`.
pub fn derive_keypair(mnemonic: &Mnemonic, salts: &KeyDerivationSalts) -> AccountKeypair {
    AccountKeypair::from_seed(&derive_seed(mnemonic, salts))
}
