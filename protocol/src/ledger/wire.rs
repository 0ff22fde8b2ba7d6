//! Raw response envelope, as the transport hands it over.
//!
//! The outer structure arrives already framed by the RPC layer: messages,
//! optional sub-messages and repeated fields. What it does *not* interpret
//! are the canonical-encoded byte strings inside it (account blobs, signed
//! transactions, event payloads) and the hash fields, whose widths it never
//! checks. Those stay as `Vec<u8>` here and are validated by
//! [`super::decode`].
//!
//! Every type is `Default` so transports and tests can fill in only what a
//! given response carries.

use super::request::RequestKind;

/// Top-level reply to an `UpdateToLatestLedger` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateToLatestLedgerResponse {
    /// One item per requested item, in request order.
    pub response_items: Vec<ResponseItem>,
    pub ledger_info_with_sigs: Option<RawLedgerInfoWithSignatures>,
    /// Validator-set change events since the client's known version. Opaque.
    pub validator_change_events: Vec<Vec<u8>>,
    pub ledger_consistency_proof: Option<RawAccumulatorConsistencyProof>,
}

/// One response item. The variant is the envelope's discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseItem {
    GetAccountState {
        account_state_with_proof: Option<RawAccountStateWithProof>,
    },
    GetAccountTransactionBySequenceNumber {
        transaction_with_proof: Option<RawTransactionWithProof>,
        proof_of_current_sequence_number: Option<RawAccountStateWithProof>,
    },
    GetEventsByEventAccessPath {
        events_with_proof: Vec<RawEventWithProof>,
        proof_of_latest_event: Option<RawAccountStateWithProof>,
    },
    GetTransactions {
        txn_list_with_proof: Option<RawTransactionListWithProof>,
    },
}

impl ResponseItem {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::GetAccountState { .. } => RequestKind::AccountState,
            Self::GetAccountTransactionBySequenceNumber { .. } => {
                RequestKind::AccountTransactionBySequenceNumber
            }
            Self::GetEventsByEventAccessPath { .. } => RequestKind::EventsByAccessPath,
            Self::GetTransactions { .. } => RequestKind::Transactions,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger info
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLedgerInfoWithSignatures {
    pub signatures: Vec<RawValidatorSignature>,
    pub ledger_info: Option<RawLedgerInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValidatorSignature {
    pub validator_id: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLedgerInfo {
    pub version: u64,
    pub transaction_accumulator_hash: Vec<u8>,
    pub consensus_data_hash: Vec<u8>,
    pub consensus_block_id: Vec<u8>,
    pub epoch_num: u64,
    pub timestamp_usecs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAccumulatorConsistencyProof {
    pub subtrees: Vec<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Proofs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransactionInfo {
    pub transaction_hash: Vec<u8>,
    pub state_root_hash: Vec<u8>,
    pub event_root_hash: Vec<u8>,
    pub gas_used: u64,
    pub major_status: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAccumulatorProof {
    pub siblings: Vec<Vec<u8>>,
}

/// `leaf` is empty when the proven key is absent, otherwise 64 bytes:
/// key hash followed by value hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSparseMerkleProof {
    pub leaf: Vec<u8>,
    pub siblings: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAccountStateProof {
    pub ledger_info_to_transaction_info_proof: Option<RawAccumulatorProof>,
    pub transaction_info: Option<RawTransactionInfo>,
    pub transaction_info_to_account_proof: Option<RawSparseMerkleProof>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransactionProof {
    pub ledger_info_to_transaction_info_proof: Option<RawAccumulatorProof>,
    pub transaction_info: Option<RawTransactionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEventProof {
    pub ledger_info_to_transaction_info_proof: Option<RawAccumulatorProof>,
    pub transaction_info: Option<RawTransactionInfo>,
    pub transaction_info_to_event_proof: Option<RawAccumulatorProof>,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAccountStateWithProof {
    pub version: u64,
    /// Canonical-encoded account resource map. `None` if the account does
    /// not exist at this version.
    pub blob: Option<Vec<u8>>,
    pub proof: Option<RawAccountStateProof>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    pub key: Vec<u8>,
    pub sequence_number: u64,
    /// Canonical-encoded `amount: i64 ++ address`.
    pub event_data: Vec<u8>,
    /// Empty when the ledger did not attach one.
    pub type_tag: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEventWithProof {
    pub transaction_version: u64,
    pub event_index: u64,
    pub event: Option<RawEvent>,
    pub proof: Option<RawEventProof>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransactionWithProof {
    pub version: u64,
    /// Canonical-encoded signed transaction.
    pub signed_transaction: Option<Vec<u8>>,
    pub proof: Option<RawTransactionProof>,
    /// Present when the request asked for events.
    pub events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransactionListWithProof {
    /// Canonical-encoded signed transactions.
    pub transactions: Vec<Vec<u8>>,
    /// One per transaction.
    pub infos: Vec<RawTransactionInfo>,
    /// One list per transaction, when events were requested.
    pub events_for_versions: Option<Vec<Vec<RawEvent>>>,
    pub first_transaction_version: Option<u64>,
    pub proof_of_first_transaction: Option<RawAccumulatorProof>,
    pub proof_of_last_transaction: Option<RawAccumulatorProof>,
}
