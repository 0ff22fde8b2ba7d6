//! Raw transaction construction via the builder pattern.
//!
//! [`RawTransactionBuilder`] takes its gas schedule, wire version and
//! expiration window from the [`ClientConfig`], so a caller normally sets
//! only the sender, the sequence number and the payload. Everything is
//! validated in [`RawTransactionBuilder::build`], before any bytes exist.
//!
//! The builder does not sign. That happens in [`super::signing`], which
//! keeps construction testable without key material.

use chrono::Utc;
use thiserror::Error;

use super::types::{RawTransaction, TransactionArgument, TransactionPayload};
use crate::account::{AccountAddress, AddressError, AuthenticationKey};
use crate::codec::WireVersion;
use crate::config::{ClientConfig, GasSchedule, MAX_TRANSFER_AMOUNT};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A transaction was rejected before it left the client.
///
/// Never retried: fixing it needs different input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An address has the wrong width for the wire version or is not hex.
    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    /// A required builder field was never set.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Transfer amounts must be positive and fit in a signed 64-bit event
    /// amount.
    #[error("amount {amount} out of range (1..={max})")]
    AmountOutOfRange {
        /// The rejected amount, in micro-units.
        amount: u64,
        /// The largest accepted amount.
        max: u64,
    },
}

fn check_address(version: WireVersion, address: &AccountAddress) -> Result<(), ValidationError> {
    let expected = version.address_len();
    if address.len() != expected {
        return Err(AddressError::InvalidLength {
            expected,
            got: address.len(),
        }
        .into());
    }
    Ok(())
}

fn check_amount(amount: u64) -> Result<(), ValidationError> {
    if amount == 0 || amount > MAX_TRANSFER_AMOUNT {
        return Err(ValidationError::AmountOutOfRange {
            amount,
            max: MAX_TRANSFER_AMOUNT,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Payment payloads
// ---------------------------------------------------------------------------

impl TransactionPayload {
    /// A payment script: `[Address(receiver), U64(amount)]`.
    ///
    /// The receiver must come first; that is the payment script's calling
    /// signature.
    pub fn peer_to_peer(
        code: Vec<u8>,
        receiver: AccountAddress,
        amount: u64,
    ) -> Result<Self, ValidationError> {
        check_amount(amount)?;
        Ok(Self::Script {
            code,
            args: vec![
                TransactionArgument::Address(receiver),
                TransactionArgument::U64(amount),
            ],
        })
    }

    /// A payment that may create the receiving account:
    /// `[Address(receiver), ByteArray(auth-key prefix), U64(amount)]`.
    pub fn peer_to_peer_with_auth_key(
        code: Vec<u8>,
        receiver_auth_key: &AuthenticationKey,
        amount: u64,
    ) -> Result<Self, ValidationError> {
        check_amount(amount)?;
        Ok(Self::Script {
            code,
            args: vec![
                TransactionArgument::Address(receiver_auth_key.derived_address()),
                TransactionArgument::auth_key_prefix(receiver_auth_key),
                TransactionArgument::U64(amount),
            ],
        })
    }
}

// ---------------------------------------------------------------------------
// RawTransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawTransaction`].
///
/// # Usage
///
/// ```
/// use meridian_protocol::account::AccountAddress;
/// use meridian_protocol::codec::WireVersion;
/// use meridian_protocol::config::ClientConfig;
/// use meridian_protocol::transaction::{RawTransactionBuilder, TransactionPayload};
///
/// let config = ClientConfig::for_version(WireVersion::V2);
/// let sender = AccountAddress::from_hex(WireVersion::V2, &"00".repeat(16)).unwrap();
/// let receiver = AccountAddress::from_hex(WireVersion::V2, &"11".repeat(16)).unwrap();
///
/// let txn = RawTransactionBuilder::new(&config)
///     .sender(sender)
///     .sequence_number(5)
///     .payload(TransactionPayload::peer_to_peer(vec![0xca, 0xfe], receiver, 1_000_000).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(txn.sequence_number, 5);
/// ```
#[derive(Debug, Clone)]
pub struct RawTransactionBuilder {
    wire_version: WireVersion,
    expiration_window_secs: u64,
    gas: GasSchedule,
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    expiration_time: Option<u64>,
}

impl RawTransactionBuilder {
    /// Starts a builder with the deployment's gas schedule and window.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            wire_version: config.wire_version,
            expiration_window_secs: config.expiration_window_secs,
            gas: config.gas,
            sender: None,
            sequence_number: None,
            payload: None,
            expiration_time: None,
        }
    }

    pub fn sender(mut self, address: AccountAddress) -> Self {
        self.sender = Some(address);
        self
    }

    /// The sender's next sequence number. Never reuse one.
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn payload(mut self, payload: TransactionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.gas.max_gas_amount = max_gas_amount;
        self
    }

    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas.gas_unit_price = gas_unit_price;
        self
    }

    /// Sets the expiration explicitly (unix seconds).
    ///
    /// If not called, `build()` uses now plus the configured window.
    pub fn expiration_time(mut self, expiration_time: u64) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    /// Validates and produces the unsigned transaction.
    pub fn build(self) -> Result<RawTransaction, ValidationError> {
        let sender = self.sender.ok_or(ValidationError::MissingField("sender"))?;
        let sequence_number = self
            .sequence_number
            .ok_or(ValidationError::MissingField("sequence_number"))?;
        let payload = self
            .payload
            .ok_or(ValidationError::MissingField("payload"))?;

        check_address(self.wire_version, &sender)?;
        for arg in payload.args() {
            if let TransactionArgument::Address(address) = arg {
                check_address(self.wire_version, address)?;
            }
        }

        let expiration_time = self.expiration_time.unwrap_or_else(|| {
            let now = Utc::now().timestamp().max(0) as u64;
            now.saturating_add(self.expiration_window_secs)
        });

        Ok(RawTransaction {
            sender,
            sequence_number,
            payload,
            max_gas_amount: self.gas.max_gas_amount,
            gas_unit_price: self.gas.gas_unit_price,
            expiration_time,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
