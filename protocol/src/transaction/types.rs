//! Core transaction types.
//!
//! These mirror the canonical layout field for field. Their
//! wire form lives in [`super::encode`]; here they are plain values.

use serde::Serialize;
use std::fmt;

use crate::account::{AccountAddress, AuthenticationKey};
use crate::codec::serde_hex;

// ---------------------------------------------------------------------------
// TransactionArgument
// ---------------------------------------------------------------------------

/// One argument passed to a transaction script.
///
/// Wire discriminants are fixed: `0` = U64, `1` = Address, `2` = String,
/// `3` = ByteArray. The ledger matches arguments by position, so order
/// matters as much as type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TransactionArgument {
    U64(u64),
    Address(AccountAddress),
    String(String),
    ByteArray(#[serde(serialize_with = "serde_hex::serialize")] Vec<u8>),
}

impl TransactionArgument {
    pub const U64_TAG: u32 = 0;
    pub const ADDRESS_TAG: u32 = 1;
    pub const STRING_TAG: u32 = 2;
    pub const BYTE_ARRAY_TAG: u32 = 3;

    /// The first half of an authentication key, as the byte-array argument
    /// account-creating payments carry.
    pub fn auth_key_prefix(auth_key: &AuthenticationKey) -> Self {
        Self::ByteArray(auth_key.prefix().to_vec())
    }

    pub const fn tag(&self) -> u32 {
        match self {
            Self::U64(_) => Self::U64_TAG,
            Self::Address(_) => Self::ADDRESS_TAG,
            Self::String(_) => Self::STRING_TAG,
            Self::ByteArray(_) => Self::BYTE_ARRAY_TAG,
        }
    }
}

impl fmt::Display for TransactionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U64(v) => write!(f, "{{U64: {v}}}"),
            Self::Address(a) => write!(f, "{{ADDRESS: {a}}}"),
            Self::String(s) => write!(f, "{{STRING: {s}}}"),
            Self::ByteArray(b) => write!(f, "{{BYTEARRAY: 0x{}}}", hex::encode(b)),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionPayload
// ---------------------------------------------------------------------------

/// What the transaction executes.
///
/// Kind discriminants on the wire: `2` = Script, `3` = Module. Values 0 and 1
/// belong to payload kinds this client never sends or accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPayload {
    /// Bytecode plus positional arguments.
    Script {
        #[serde(serialize_with = "serde_hex::serialize")]
        code: Vec<u8>,
        args: Vec<TransactionArgument>,
    },
    /// One or more modules to publish.
    Module(#[serde(serialize_with = "serde_hex::list")] Vec<Vec<u8>>),
}

impl TransactionPayload {
    pub const SCRIPT_TAG: u32 = 2;
    pub const MODULE_TAG: u32 = 3;

    pub const fn tag(&self) -> u32 {
        match self {
            Self::Script { .. } => Self::SCRIPT_TAG,
            Self::Module(_) => Self::MODULE_TAG,
        }
    }

    /// The script arguments, empty for modules.
    pub fn args(&self) -> &[TransactionArgument] {
        match self {
            Self::Script { args, .. } => args,
            Self::Module(_) => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// RawTransaction
// ---------------------------------------------------------------------------

/// An unsigned transaction.
///
/// Built per submission by [`super::RawTransactionBuilder`]. The sequence
/// number must be fresh for every submission from the same sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    /// Unix seconds after which validators drop the transaction.
    pub expiration_time: u64,
}

impl RawTransaction {
    /// `(receiver, amount)` if the payload follows the payment convention:
    /// `[Address, U64]`, or `[Address, ByteArray, U64]` when the receiver's
    /// auth-key prefix rides along.
    pub fn peer_to_peer(&self) -> Option<(AccountAddress, u64)> {
        match self.payload.args() {
            [TransactionArgument::Address(receiver), TransactionArgument::U64(amount)]
            | [TransactionArgument::Address(receiver), TransactionArgument::ByteArray(_), TransactionArgument::U64(amount)] => {
                Some((*receiver, *amount))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireVersion;

    fn addr(last: u8) -> AccountAddress {
        let mut bytes = [0u8; 16];
        bytes[15] = last;
        AccountAddress::from_bytes(WireVersion::V2, &bytes).unwrap()
    }

    fn script(args: Vec<TransactionArgument>) -> RawTransaction {
        RawTransaction {
            sender: addr(1),
            sequence_number: 0,
            payload: TransactionPayload::Script {
                code: vec![0xca, 0xfe],
                args,
            },
            max_gas_amount: 1_000_000,
            gas_unit_price: 0,
            expiration_time: 0,
        }
    }

    #[test]
    fn argument_tags_are_fixed() {
        assert_eq!(TransactionArgument::U64(1).tag(), 0);
        assert_eq!(TransactionArgument::Address(addr(1)).tag(), 1);
        assert_eq!(TransactionArgument::String("x".into()).tag(), 2);
        assert_eq!(TransactionArgument::ByteArray(vec![]).tag(), 3);
    }

    #[test]
    fn peer_to_peer_recognizes_both_shapes() {
        let plain = script(vec![
            TransactionArgument::Address(addr(2)),
            TransactionArgument::U64(10),
        ]);
        assert_eq!(plain.peer_to_peer(), Some((addr(2), 10)));

        let with_prefix = script(vec![
            TransactionArgument::Address(addr(2)),
            TransactionArgument::ByteArray(vec![0xaa; 16]),
            TransactionArgument::U64(10),
        ]);
        assert_eq!(with_prefix.peer_to_peer(), Some((addr(2), 10)));
    }

    #[test]
    fn peer_to_peer_requires_address_first() {
        let swapped = script(vec![
            TransactionArgument::U64(10),
            TransactionArgument::Address(addr(2)),
        ]);
        assert_eq!(swapped.peer_to_peer(), None);
    }

    #[test]
    fn argument_serializes_tagged() {
        let json = serde_json::to_value(TransactionArgument::ByteArray(vec![0xab])).unwrap();
        assert_eq!(json["type"], "byte_array");
        assert_eq!(json["value"], "ab");
    }
}
