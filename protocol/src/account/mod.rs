//! # Accounts
//!
//! An [`Account`] bundles everything derived from one mnemonic: the key pair,
//! the on-chain address and (under V2) the authentication key. It is built
//! once and never mutated.
//!
//! ```text
//! mnemonic ──salts──▶ SHA3-512 ──▶ Ed25519 key pair ──▶ public key
//!                                                          │
//!                          V1: SHA3-256(pk) ◀──────────────┤
//!             V2: SHA3-256(pk ++ 0) = prefix ++ address ◀──┘
//! ```
//!
//! ## Layout
//!
//! ```text
//! address.rs — AccountAddress, AuthenticationKey, derive_address
//! ```

pub mod address;

pub use address::{derive_address, AccountAddress, AddressError, AuthenticationKey};

use std::fmt;

use crate::codec::WireVersion;
use crate::config::ClientConfig;
use crate::crypto::keys::{AccountKeypair, PublicKey};
use crate::crypto::mnemonic::{derive_keypair, Mnemonic, MnemonicError};

/// A ledger account the client holds keys for.
///
/// The private key stays inside; [`Account::keypair`] hands out a borrow for
/// the signer and nothing else.
pub struct Account {
    address: AccountAddress,
    public_key: PublicKey,
    keypair: AccountKeypair,
    mnemonic: Mnemonic,
    auth_key: Option<AuthenticationKey>,
}

impl Account {
    /// Creates a brand new account from a freshly generated mnemonic.
    pub fn generate(config: &ClientConfig) -> Result<Self, MnemonicError> {
        Ok(Self::from_mnemonic(Mnemonic::generate()?, config))
    }

    /// Recreates an account from its words. Deterministic.
    pub fn from_mnemonic(mnemonic: Mnemonic, config: &ClientConfig) -> Self {
        let keypair = derive_keypair(&mnemonic, &config.key_salts);
        let public_key = keypair.public_key();
        let address = derive_address(&public_key, config.wire_version);
        let auth_key = match config.wire_version {
            WireVersion::V1 => None,
            WireVersion::V2 => Some(AuthenticationKey::from_public_key(&public_key)),
        };

        tracing::debug!(
            address = %address,
            wire_version = %config.wire_version,
            "derived account"
        );

        Self {
            address,
            public_key,
            keypair,
            mnemonic,
            auth_key,
        }
    }

    /// Parses `phrase` and recreates the account.
    pub fn recover(phrase: &str, config: &ClientConfig) -> Result<Self, MnemonicError> {
        Ok(Self::from_mnemonic(Mnemonic::parse(phrase)?, config))
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    /// `None` under V1, where the address itself is the full key hash.
    pub fn auth_key(&self) -> Option<&AuthenticationKey> {
        self.auth_key.as_ref()
    }

    pub fn keypair(&self) -> &AccountKeypair {
        &self.keypair
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("auth_key", &self.auth_key)
            .finish_non_exhaustive()
    }
}
