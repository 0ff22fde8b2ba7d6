//! # Protocol Configuration & Constants
//!
//! Every magic number the client shares with the validator network lives
//! here. Most of these are not tunables: change one and the network will
//! quietly reject everything you send.
//!
//! The handful of real choices (wire version, salts, gas, poll budget) are
//! bundled into [`ClientConfig`], built once at startup and threaded into the
//! components that need them.

use std::time::Duration;

use crate::codec::WireVersion;
use crate::confirm::PollConfig;
use crate::crypto::mnemonic::KeyDerivationSalts;
use crate::transaction::signing::DomainSalt;

// ---------------------------------------------------------------------------
// Addresses & Keys
// ---------------------------------------------------------------------------

/// V1 addresses are the full SHA3-256 of the public key.
pub const V1_ADDRESS_LENGTH: usize = 32;

/// V2 addresses are the last 16 bytes of the authentication key.
pub const V2_ADDRESS_LENGTH: usize = 16;

/// Authentication keys are a full SHA3-256 digest.
pub const AUTH_KEY_LENGTH: usize = 32;

/// Where the authentication key splits into prefix and address (V2).
pub const AUTH_KEY_SPLIT: usize = 16;

/// Signature scheme byte appended to the public key before hashing it into
/// an authentication key, and written before the public key in V2 signed
/// transactions. 0 = single-signature Ed25519.
pub const ED25519_SCHEME_ID: u8 = 0;

/// Ed25519 public key length.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Hash output length for every hash the ledger returns.
pub const HASH_LENGTH: usize = 32;

/// Words in a freshly generated mnemonic (128 bits of entropy).
pub const MNEMONIC_WORD_COUNT: usize = 12;

/// Default salt hashed in front of the mnemonic phrase.
pub const DEFAULT_MNEMONIC_SALT: &[u8] = b"LIBRA WALLET: mnemonic salt prefix$";

/// Seed string whose SHA3-256 is the raw-transaction signing domain.
pub const RAW_TRANSACTION_HASH_SEED: &[u8] = b"RawTransaction@@$$LIBRA$$@@";

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// Format discriminant written before the sender in V2 raw transactions.
pub const V2_RAW_TXN_PREFIX: u64 = 0;

/// Constant written between gas price and expiration time in V1. Carries the
/// gas currency identifier ("LBR") and its type tag.
pub const V1_GAS_TRAILER: [u8; 24] = [
    0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x03, 0x4c, 0x42, 0x52, 0x01, 0x54, 0x00,
];

/// Default gas ceiling per transaction.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 1_000_000;

/// Default price per gas unit. Testnet gas is free.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 0;

/// V1 transactions expire two minutes after construction.
pub const V1_EXPIRATION_WINDOW_SECS: u64 = 120;

/// V2 transactions expire four minutes after construction.
pub const V2_EXPIRATION_WINDOW_SECS: u64 = 240;

/// Largest transfer amount. Event amounts are signed 64-bit on the wire, so
/// anything above `i64::MAX` could not be reported back faithfully.
pub const MAX_TRANSFER_AMOUNT: u64 = i64::MAX as u64;

/// Micro-units per whole coin.
pub const MICROS_PER_COIN: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Ledger Queries
// ---------------------------------------------------------------------------

/// Access path of the account resource inside an account's state.
pub const ACCOUNT_RESOURCE_PATH: [u8; 33] = [
    0x01, 0x21, 0x7d, 0xa6, 0xc6, 0xb3, 0xe1, 0x9f, 0x18, 0x25, 0xcf, 0xb2, 0x67, 0x6d, 0xae,
    0xcc, 0xe3, 0xbf, 0x3d, 0xe0, 0x3c, 0xf2, 0x66, 0x47, 0xc7, 0x8d, 0xf0, 0x0b, 0x37, 0x1b,
    0x25, 0xcc, 0x97,
];

/// Suffix selecting the sent-payments event stream.
pub const SENT_EVENTS_SUFFIX: &[u8] = b"/sent_events_count/";

/// Suffix selecting the received-payments event stream.
pub const RECEIVED_EVENTS_SUFFIX: &[u8] = b"/received_events_count/";

/// Default first event sequence number for event queries.
pub const DEFAULT_EVENTS_START: u64 = 0;

/// Default event page size.
pub const DEFAULT_EVENTS_LIMIT: u64 = 100;

/// Transaction-list queries fetch this many and display at most
/// [`TRANSACTION_DISPLAY_WINDOW`].
pub const RECENT_TRANSACTIONS_LIMIT: u64 = 1000;

/// At most this many transactions of a returned batch are decoded for
/// display. A presentation policy, not a protocol limit.
pub const TRANSACTION_DISPLAY_WINDOW: usize = 20;

// ---------------------------------------------------------------------------
// Confirmation Polling
// ---------------------------------------------------------------------------

/// Pause between confirmation queries.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Queries issued before giving up on a confirmation.
pub const POLL_MAX_ATTEMPTS: u32 = 60;

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Gas parameters stamped onto every transaction the client builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSchedule {
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
        }
    }
}

/// Startup-time choices for one deployment.
///
/// Built once and handed to the key derivation, signer, encoder, decoder and
/// poller. Nothing downstream reads the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Binary layout spoken by the network.
    pub wire_version: WireVersion,
    /// Salts around the mnemonic before seed hashing.
    pub key_salts: KeyDerivationSalts,
    /// Domain-separation prefix for raw-transaction signing hashes.
    pub domain_salt: DomainSalt,
    /// Gas stamped onto new transactions.
    pub gas: GasSchedule,
    /// Seconds between construction and expiration.
    pub expiration_window_secs: u64,
    /// Confirmation polling budget.
    pub poll: PollConfig,
}

impl ClientConfig {
    /// Protocol defaults for the given wire version.
    pub fn for_version(wire_version: WireVersion) -> Self {
        Self {
            wire_version,
            key_salts: KeyDerivationSalts::default(),
            domain_salt: DomainSalt::raw_transaction(),
            gas: GasSchedule::default(),
            expiration_window_secs: wire_version.expiration_window_secs(),
            poll: PollConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_version(WireVersion::V2)
    }
}
