//! Decoded ledger records.
//!
//! These are what callers see after [`super::decode`] has validated a raw
//! response. Hashes are [`HashValue`]s, byte strings render as hex when
//! serialized, and embedded transactions are fully parsed.

use serde::Serialize;

use super::request::RequestKind;
use crate::account::AccountAddress;
use crate::codec::serde_hex;
use crate::crypto::HashValue;
use crate::transaction::SignedTransaction;

// ---------------------------------------------------------------------------
// Account state
// ---------------------------------------------------------------------------

/// The account resource stored under the account's first access path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResource {
    #[serde(serialize_with = "serde_hex::serialize")]
    pub authentication_key: Vec<u8>,
    /// Micro-units.
    pub balance: u64,
    pub delegated_key_rotation_capability: bool,
    pub delegated_withdrawal_capability: bool,
    pub received_events_count: u64,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub received_events_key: Vec<u8>,
    pub sent_events_count: u64,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub sent_events_key: Vec<u8>,
    pub sequence_number: u64,
}

/// A resource other than the account resource, kept undecoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResource {
    #[serde(serialize_with = "serde_hex::serialize")]
    pub path: Vec<u8>,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub value: Vec<u8>,
}

/// An account-state blob: the account resource plus whatever else the
/// account stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBlob {
    #[serde(serialize_with = "serde_hex::serialize")]
    pub path: Vec<u8>,
    pub account: AccountResource,
    pub other_resources: Vec<RawResource>,
}

// ---------------------------------------------------------------------------
// Ledger info
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerInfo {
    pub version: u64,
    pub transaction_accumulator_hash: HashValue,
    pub consensus_data_hash: HashValue,
    pub consensus_block_id: HashValue,
    pub epoch_num: u64,
    pub timestamp_usecs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorSignature {
    #[serde(serialize_with = "serde_hex::serialize")]
    pub validator_id: Vec<u8>,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerInfoWithSignatures {
    pub ledger_info: LedgerInfo,
    pub signatures: Vec<ValidatorSignature>,
}

// ---------------------------------------------------------------------------
// Proofs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInfo {
    pub transaction_hash: HashValue,
    pub state_root_hash: HashValue,
    pub event_root_hash: HashValue,
    pub gas_used: u64,
    pub major_status: u64,
}

/// Accumulator siblings, in wire order. Never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatorProof {
    pub siblings: Vec<HashValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SparseMerkleLeaf {
    pub key: HashValue,
    pub value_hash: HashValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SparseMerkleProof {
    /// `None` proves the key is absent from the tree.
    pub leaf: Option<SparseMerkleLeaf>,
    pub siblings: Vec<HashValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOrEventProof {
    Account(SparseMerkleProof),
    Event(AccumulatorProof),
    Absent,
}

/// Inclusion proof from the signed ledger info down to a transaction and,
/// when present, further to an account state or event.
///
/// Decoded only. Verification belongs to whoever holds the trusted
/// validator set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proof {
    pub ledger_info_to_transaction_info_proof: AccumulatorProof,
    pub transaction_info: TransactionInfo,
    pub account_or_event_proof: AccountOrEventProof,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Direction of a payment event relative to the account being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventData {
    pub amount: i64,
    /// The counterparty.
    pub address: AccountAddress,
    /// Never on the wire. Filled in by [`super::classify`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    #[serde(serialize_with = "serde_hex::serialize")]
    pub key: Vec<u8>,
    pub sequence_number: u64,
    pub event_data: EventData,
    #[serde(serialize_with = "serde_hex::option")]
    pub type_tag: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventWithProof {
    pub transaction_version: u64,
    pub event_index: u64,
    pub event: Event,
    pub proof: Proof,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountStateWithProof {
    pub version: u64,
    /// `None` if the account does not exist at `version`.
    pub blob: Option<AccountBlob>,
    pub proof: Proof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionWithProof {
    pub version: u64,
    pub transaction: SignedTransaction,
    pub proof: Proof,
    pub events: Option<Vec<Event>>,
}

/// Result of looking up a transaction by sender and sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionBySequenceNumber {
    /// The transaction is on the ledger.
    Transaction(TransactionWithProof),
    /// Not there; the ledger proved the account's current sequence number
    /// instead.
    CurrentSequenceNumber(AccountStateWithProof),
    NotFound,
}

impl TransactionBySequenceNumber {
    pub fn transaction(&self) -> Option<&TransactionWithProof> {
        match self {
            Self::Transaction(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsByAccessPath {
    /// Most recent first.
    pub events_with_proof: Vec<EventWithProof>,
    pub proof_of_latest_event: Option<AccountStateWithProof>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionListEntry {
    pub transaction: SignedTransaction,
    pub info: TransactionInfo,
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionListWithProof {
    /// At most the display window's worth, in wire order.
    pub transactions: Vec<TransactionListEntry>,
    /// How many transactions the ledger actually returned.
    pub total_returned: usize,
    pub first_transaction_version: Option<u64>,
    pub proof_of_first_transaction: Option<AccumulatorProof>,
    pub proof_of_last_transaction: Option<AccumulatorProof>,
}

/// One decoded response item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LedgerResponse {
    AccountState(Option<AccountStateWithProof>),
    AccountTransactionBySequenceNumber(TransactionBySequenceNumber),
    EventsByAccessPath(EventsByAccessPath),
    Transactions(Option<TransactionListWithProof>),
}

impl LedgerResponse {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::AccountState(_) => RequestKind::AccountState,
            Self::AccountTransactionBySequenceNumber(_) => {
                RequestKind::AccountTransactionBySequenceNumber
            }
            Self::EventsByAccessPath(_) => RequestKind::EventsByAccessPath,
            Self::Transactions(_) => RequestKind::Transactions,
        }
    }
}

/// A fully decoded `UpdateToLatestLedger` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedLedgerResponse {
    pub items: Vec<LedgerResponse>,
    pub ledger_info_with_sigs: Option<LedgerInfoWithSignatures>,
    #[serde(serialize_with = "serde_hex::list")]
    pub validator_change_events: Vec<Vec<u8>>,
    /// Subtree hashes proving consistency with the client's known version.
    pub ledger_consistency_proof: Option<Vec<HashValue>>,
}
