//! Response decoding.
//!
//! One pure function per response shape, dispatched on the item's
//! discriminant. A decode either yields a complete record or a
//! [`DecodeError`] naming the field that broke; nothing is partially filled
//! in and nothing is retried.

use thiserror::Error;
use tracing::warn;

use super::blob::{decode_account_blob, decode_event_data};
use super::request::RequestKind;
use super::types::{
    AccountOrEventProof, AccountStateWithProof, AccumulatorProof, DecodedLedgerResponse, Event,
    EventWithProof, EventsByAccessPath, LedgerInfo, LedgerInfoWithSignatures, LedgerResponse,
    Proof, SparseMerkleLeaf, SparseMerkleProof, TransactionBySequenceNumber, TransactionInfo,
    TransactionListEntry, TransactionListWithProof, TransactionWithProof, ValidatorSignature,
};
use super::wire::{
    RawAccountStateProof, RawAccountStateWithProof, RawAccumulatorProof, RawEvent, RawEventProof,
    RawEventWithProof, RawLedgerInfoWithSignatures, RawSparseMerkleProof, RawTransactionInfo,
    RawTransactionListWithProof, RawTransactionProof, RawTransactionWithProof, ResponseItem,
    UpdateToLatestLedgerResponse,
};
use crate::codec::{CodecError, WireVersion};
use crate::config::{HASH_LENGTH, TRANSACTION_DISPLAY_WINDOW};
use crate::crypto::HashValue;
use crate::transaction::SignedTransaction;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A ledger response that cannot be turned into typed records.
///
/// Always fatal: it means a wire-version mismatch or a corrupted transport,
/// and asking again will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The envelope is structurally wrong (missing sub-message, bad hash
    /// width, inconsistent counts).
    #[error("malformed ledger response at `{field}`: {reason}")]
    MalformedLedgerResponse { field: &'static str, reason: String },

    /// An embedded canonical-encoded payload failed to decode.
    #[error("malformed ledger response at `{field}`: {source}")]
    Codec {
        field: &'static str,
        #[source]
        source: CodecError,
    },

    /// The ledger answered a different question than the one asked.
    #[error("expected a {expected} response, got {got}")]
    UnexpectedResponseKind {
        expected: RequestKind,
        got: RequestKind,
    },
}

impl DecodeError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedLedgerResponse {
            field,
            reason: reason.into(),
        }
    }

    fn missing(field: &'static str) -> Self {
        Self::malformed(field, "missing")
    }

    /// The field being decoded when the failure occurred.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MalformedLedgerResponse { field, .. } | Self::Codec { field, .. } => field,
            Self::UnexpectedResponseKind { .. } => "response_items",
        }
    }
}

impl From<CodecError> for DecodeError {
    fn from(source: CodecError) -> Self {
        Self::Codec {
            field: source.field(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decodes every item of a response plus its ledger metadata.
pub fn decode_response(
    version: WireVersion,
    response: &UpdateToLatestLedgerResponse,
) -> Result<DecodedLedgerResponse, DecodeError> {
    match decode_envelope(version, response) {
        Ok(decoded) => Ok(decoded),
        Err(err) => {
            warn!(field = err.field(), error = %err, "rejected ledger response");
            Err(err)
        }
    }
}

/// Decodes the first item of a single-item response, checking that it
/// answers `expected`.
pub fn decode_single(
    version: WireVersion,
    expected: RequestKind,
    response: &UpdateToLatestLedgerResponse,
) -> Result<LedgerResponse, DecodeError> {
    let item = response
        .response_items
        .first()
        .ok_or_else(|| DecodeError::malformed("response_items", "empty"))?;
    let got = item.kind();
    if got != expected {
        return Err(DecodeError::UnexpectedResponseKind { expected, got });
    }
    decode_item(version, item).map_err(|err| {
        warn!(kind = %expected, field = err.field(), error = %err, "rejected ledger response");
        err
    })
}

fn decode_envelope(
    version: WireVersion,
    response: &UpdateToLatestLedgerResponse,
) -> Result<DecodedLedgerResponse, DecodeError> {
    let items = response
        .response_items
        .iter()
        .map(|item| decode_item(version, item))
        .collect::<Result<Vec<_>, _>>()?;
    let ledger_info_with_sigs = response
        .ledger_info_with_sigs
        .as_ref()
        .map(decode_ledger_info_with_sigs)
        .transpose()?;
    let ledger_consistency_proof = response
        .ledger_consistency_proof
        .as_ref()
        .map(|proof| hashes("ledger_consistency_subtree", &proof.subtrees))
        .transpose()?;

    Ok(DecodedLedgerResponse {
        items,
        ledger_info_with_sigs,
        validator_change_events: response.validator_change_events.clone(),
        ledger_consistency_proof,
    })
}

/// Dispatches one item on its discriminant.
pub fn decode_item(version: WireVersion, item: &ResponseItem) -> Result<LedgerResponse, DecodeError> {
    match item {
        ResponseItem::GetAccountState {
            account_state_with_proof,
        } => Ok(LedgerResponse::AccountState(
            account_state_with_proof
                .as_ref()
                .map(|raw| decode_account_state_with_proof(version, raw))
                .transpose()?,
        )),
        ResponseItem::GetAccountTransactionBySequenceNumber {
            transaction_with_proof,
            proof_of_current_sequence_number,
        } => Ok(LedgerResponse::AccountTransactionBySequenceNumber(
            decode_transaction_by_sequence_number(
                version,
                transaction_with_proof.as_ref(),
                proof_of_current_sequence_number.as_ref(),
            )?,
        )),
        ResponseItem::GetEventsByEventAccessPath {
            events_with_proof,
            proof_of_latest_event,
        } => Ok(LedgerResponse::EventsByAccessPath(decode_events_by_access_path(
            version,
            events_with_proof,
            proof_of_latest_event.as_ref(),
        )?)),
        ResponseItem::GetTransactions {
            txn_list_with_proof,
        } => Ok(LedgerResponse::Transactions(
            txn_list_with_proof
                .as_ref()
                .map(|raw| decode_transaction_list(version, raw))
                .transpose()?,
        )),
    }
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

pub fn decode_account_state_with_proof(
    version: WireVersion,
    raw: &RawAccountStateWithProof,
) -> Result<AccountStateWithProof, DecodeError> {
    let blob = raw
        .blob
        .as_deref()
        .map(|bytes| decode_account_blob(version, bytes))
        .transpose()?;
    let proof = raw
        .proof
        .as_ref()
        .ok_or_else(|| DecodeError::missing("account_state_proof"))?;
    Ok(AccountStateWithProof {
        version: raw.version,
        blob,
        proof: decode_account_state_proof(proof)?,
    })
}

/// Exactly one of the two may be present; neither means not found.
pub fn decode_transaction_by_sequence_number(
    version: WireVersion,
    transaction_with_proof: Option<&RawTransactionWithProof>,
    proof_of_current_sequence_number: Option<&RawAccountStateWithProof>,
) -> Result<TransactionBySequenceNumber, DecodeError> {
    match (transaction_with_proof, proof_of_current_sequence_number) {
        (Some(_), Some(_)) => Err(DecodeError::malformed(
            "proof_of_current_sequence_number",
            "present alongside transaction_with_proof",
        )),
        (Some(raw), None) => Ok(TransactionBySequenceNumber::Transaction(
            decode_transaction_with_proof(version, raw)?,
        )),
        (None, Some(raw)) => Ok(TransactionBySequenceNumber::CurrentSequenceNumber(
            decode_account_state_with_proof(version, raw)?,
        )),
        (None, None) => Ok(TransactionBySequenceNumber::NotFound),
    }
}

pub fn decode_transaction_with_proof(
    version: WireVersion,
    raw: &RawTransactionWithProof,
) -> Result<TransactionWithProof, DecodeError> {
    let bytes = raw
        .signed_transaction
        .as_deref()
        .ok_or_else(|| DecodeError::missing("signed_transaction"))?;
    let transaction = SignedTransaction::decode(version, bytes)?;
    let proof = raw
        .proof
        .as_ref()
        .ok_or_else(|| DecodeError::missing("transaction_proof"))?;
    let events = raw
        .events
        .as_deref()
        .map(|events| decode_events(version, events))
        .transpose()?;
    Ok(TransactionWithProof {
        version: raw.version,
        transaction,
        proof: decode_transaction_proof(proof)?,
        events,
    })
}

/// Returned most recent first: the wire order is reversed after decoding.
pub fn decode_events_by_access_path(
    version: WireVersion,
    events_with_proof: &[RawEventWithProof],
    proof_of_latest_event: Option<&RawAccountStateWithProof>,
) -> Result<EventsByAccessPath, DecodeError> {
    let mut decoded = events_with_proof
        .iter()
        .map(|raw| decode_event_with_proof(version, raw))
        .collect::<Result<Vec<_>, _>>()?;
    decoded.reverse();
    Ok(EventsByAccessPath {
        events_with_proof: decoded,
        proof_of_latest_event: proof_of_latest_event
            .map(|raw| decode_account_state_with_proof(version, raw))
            .transpose()?,
    })
}

/// Checks that every transaction has its info (and event list, when
/// events were fetched), then decodes the display window.
pub fn decode_transaction_list(
    version: WireVersion,
    raw: &RawTransactionListWithProof,
) -> Result<TransactionListWithProof, DecodeError> {
    let total = raw.transactions.len();
    if raw.infos.len() != total {
        return Err(DecodeError::malformed(
            "transaction_infos",
            format!("{} infos for {total} transactions", raw.infos.len()),
        ));
    }
    if let Some(events) = &raw.events_for_versions {
        if events.len() != total {
            return Err(DecodeError::malformed(
                "events_for_versions",
                format!("{} event lists for {total} transactions", events.len()),
            ));
        }
    }

    let mut transactions = Vec::with_capacity(total.min(TRANSACTION_DISPLAY_WINDOW));
    for (i, bytes) in raw
        .transactions
        .iter()
        .take(TRANSACTION_DISPLAY_WINDOW)
        .enumerate()
    {
        let events = match &raw.events_for_versions {
            Some(all) => Some(decode_events(version, &all[i])?),
            None => None,
        };
        transactions.push(TransactionListEntry {
            transaction: SignedTransaction::decode(version, bytes)?,
            info: decode_transaction_info(&raw.infos[i])?,
            events,
        });
    }

    Ok(TransactionListWithProof {
        transactions,
        total_returned: total,
        first_transaction_version: raw.first_transaction_version,
        proof_of_first_transaction: raw
            .proof_of_first_transaction
            .as_ref()
            .map(decode_accumulator_proof)
            .transpose()?,
        proof_of_last_transaction: raw
            .proof_of_last_transaction
            .as_ref()
            .map(decode_accumulator_proof)
            .transpose()?,
    })
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

fn decode_event_with_proof(
    version: WireVersion,
    raw: &RawEventWithProof,
) -> Result<EventWithProof, DecodeError> {
    let event = raw.event.as_ref().ok_or_else(|| DecodeError::missing("event"))?;
    let proof = raw
        .proof
        .as_ref()
        .ok_or_else(|| DecodeError::missing("event_proof"))?;
    Ok(EventWithProof {
        transaction_version: raw.transaction_version,
        event_index: raw.event_index,
        event: decode_event(version, event)?,
        proof: decode_event_proof(proof)?,
    })
}

fn decode_events(version: WireVersion, events: &[RawEvent]) -> Result<Vec<Event>, DecodeError> {
    events.iter().map(|raw| decode_event(version, raw)).collect()
}

pub fn decode_event(version: WireVersion, raw: &RawEvent) -> Result<Event, DecodeError> {
    Ok(Event {
        key: raw.key.clone(),
        sequence_number: raw.sequence_number,
        event_data: decode_event_data(version, &raw.event_data)?,
        type_tag: (!raw.type_tag.is_empty()).then(|| raw.type_tag.clone()),
    })
}

// ---------------------------------------------------------------------------
// Proofs and ledger info
// ---------------------------------------------------------------------------

fn hash(field: &'static str, bytes: &[u8]) -> Result<HashValue, DecodeError> {
    HashValue::from_slice(bytes).ok_or_else(|| {
        DecodeError::malformed(
            field,
            format!("expected {HASH_LENGTH} bytes, got {}", bytes.len()),
        )
    })
}

fn hashes(field: &'static str, items: &[Vec<u8>]) -> Result<Vec<HashValue>, DecodeError> {
    items.iter().map(|bytes| hash(field, bytes)).collect()
}

fn decode_accumulator_proof(raw: &RawAccumulatorProof) -> Result<AccumulatorProof, DecodeError> {
    Ok(AccumulatorProof {
        siblings: hashes("accumulator_sibling", &raw.siblings)?,
    })
}

/// An absent accumulator proof is an empty one.
fn decode_ledger_to_info(raw: Option<&RawAccumulatorProof>) -> Result<AccumulatorProof, DecodeError> {
    raw.map(decode_accumulator_proof)
        .transpose()
        .map(Option::unwrap_or_default)
}

fn decode_sparse_merkle_proof(raw: &RawSparseMerkleProof) -> Result<SparseMerkleProof, DecodeError> {
    let leaf = match raw.leaf.len() {
        0 => None,
        n if n == 2 * HASH_LENGTH => Some(SparseMerkleLeaf {
            key: hash("sparse_merkle_leaf", &raw.leaf[..HASH_LENGTH])?,
            value_hash: hash("sparse_merkle_leaf", &raw.leaf[HASH_LENGTH..])?,
        }),
        n => {
            return Err(DecodeError::malformed(
                "sparse_merkle_leaf",
                format!("expected 0 or {} bytes, got {n}", 2 * HASH_LENGTH),
            ))
        }
    };
    Ok(SparseMerkleProof {
        leaf,
        siblings: hashes("sparse_merkle_sibling", &raw.siblings)?,
    })
}

pub fn decode_transaction_info(raw: &RawTransactionInfo) -> Result<TransactionInfo, DecodeError> {
    Ok(TransactionInfo {
        transaction_hash: hash("transaction_hash", &raw.transaction_hash)?,
        state_root_hash: hash("state_root_hash", &raw.state_root_hash)?,
        event_root_hash: hash("event_root_hash", &raw.event_root_hash)?,
        gas_used: raw.gas_used,
        major_status: raw.major_status,
    })
}

fn required_info(raw: Option<&RawTransactionInfo>) -> Result<TransactionInfo, DecodeError> {
    decode_transaction_info(raw.ok_or_else(|| DecodeError::missing("transaction_info"))?)
}

fn decode_account_state_proof(raw: &RawAccountStateProof) -> Result<Proof, DecodeError> {
    Ok(Proof {
        ledger_info_to_transaction_info_proof: decode_ledger_to_info(
            raw.ledger_info_to_transaction_info_proof.as_ref(),
        )?,
        transaction_info: required_info(raw.transaction_info.as_ref())?,
        account_or_event_proof: match &raw.transaction_info_to_account_proof {
            Some(proof) => AccountOrEventProof::Account(decode_sparse_merkle_proof(proof)?),
            None => AccountOrEventProof::Absent,
        },
    })
}

fn decode_transaction_proof(raw: &RawTransactionProof) -> Result<Proof, DecodeError> {
    Ok(Proof {
        ledger_info_to_transaction_info_proof: decode_ledger_to_info(
            raw.ledger_info_to_transaction_info_proof.as_ref(),
        )?,
        transaction_info: required_info(raw.transaction_info.as_ref())?,
        account_or_event_proof: AccountOrEventProof::Absent,
    })
}

fn decode_event_proof(raw: &RawEventProof) -> Result<Proof, DecodeError> {
    Ok(Proof {
        ledger_info_to_transaction_info_proof: decode_ledger_to_info(
            raw.ledger_info_to_transaction_info_proof.as_ref(),
        )?,
        transaction_info: required_info(raw.transaction_info.as_ref())?,
        account_or_event_proof: match &raw.transaction_info_to_event_proof {
            Some(proof) => AccountOrEventProof::Event(decode_accumulator_proof(proof)?),
            None => AccountOrEventProof::Absent,
        },
    })
}

fn decode_ledger_info_with_sigs(
    raw: &RawLedgerInfoWithSignatures,
) -> Result<LedgerInfoWithSignatures, DecodeError> {
    let info = raw
        .ledger_info
        .as_ref()
        .ok_or_else(|| DecodeError::missing("ledger_info"))?;
    Ok(LedgerInfoWithSignatures {
        ledger_info: LedgerInfo {
            version: info.version,
            transaction_accumulator_hash: hash(
                "transaction_accumulator_hash",
                &info.transaction_accumulator_hash,
            )?,
            consensus_data_hash: hash("consensus_data_hash", &info.consensus_data_hash)?,
            consensus_block_id: hash("consensus_block_id", &info.consensus_block_id)?,
            epoch_num: info.epoch_num,
            timestamp_usecs: info.timestamp_usecs,
        },
        signatures: raw
            .signatures
            .iter()
            .map(|sig| ValidatorSignature {
                validator_id: sig.validator_id.clone(),
                signature: sig.signature.clone(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountAddress;
    use crate::config::ACCOUNT_RESOURCE_PATH;
    use crate::crypto::AccountKeypair;
    use crate::ledger::types::{AccountBlob, AccountResource, EventData};
    use crate::ledger::wire::{RawAccumulatorConsistencyProof, RawLedgerInfo};
    use crate::transaction::{DomainSalt, RawTransaction, TransactionPayload, TransactionSigner};

    const V: WireVersion = WireVersion::V2;

    fn addr(last: u8) -> AccountAddress {
        let mut bytes = [0u8; 16];
        bytes[15] = last;
        AccountAddress::from_bytes(V, &bytes).unwrap()
    }

    fn info() -> RawTransactionInfo {
        RawTransactionInfo {
            transaction_hash: vec![1; 32],
            state_root_hash: vec![2; 32],
            event_root_hash: vec![3; 32],
            gas_used: 0,
            major_status: 4001,
        }
    }

    fn account_proof() -> RawAccountStateProof {
        RawAccountStateProof {
            ledger_info_to_transaction_info_proof: Some(RawAccumulatorProof {
                siblings: vec![vec![0xaa; 32], vec![0xbb; 32]],
            }),
            transaction_info: Some(info()),
            transaction_info_to_account_proof: Some(RawSparseMerkleProof {
                leaf: vec![0xcc; 64],
                siblings: vec![vec![0xdd; 32]],
            }),
        }
    }

    fn blob_bytes(sequence_number: u64) -> Vec<u8> {
        AccountBlob {
            path: ACCOUNT_RESOURCE_PATH.to_vec(),
            account: AccountResource {
                authentication_key: vec![0x5a; 32],
                balance: 42,
                delegated_key_rotation_capability: false,
                delegated_withdrawal_capability: false,
                received_events_count: 0,
                received_events_key: vec![0x01; 32],
                sent_events_count: 1,
                sent_events_key: vec![0x02; 32],
                sequence_number,
            },
            other_resources: vec![],
        }
        .encode(V)
        .unwrap()
    }

    fn account_state(sequence_number: u64) -> RawAccountStateWithProof {
        RawAccountStateWithProof {
            version: 77,
            blob: Some(blob_bytes(sequence_number)),
            proof: Some(account_proof()),
        }
    }

    fn raw_event(amount: i64, seq: u64) -> RawEvent {
        RawEvent {
            key: vec![0x02; 32],
            sequence_number: seq,
            event_data: EventData {
                amount,
                address: addr(2),
                event_type: None,
            }
            .encode(V)
            .unwrap(),
            type_tag: vec![],
        }
    }

    fn signed_txn_bytes(seq: u64) -> Vec<u8> {
        let raw = RawTransaction {
            sender: addr(1),
            sequence_number: seq,
            payload: TransactionPayload::peer_to_peer(vec![0xca, 0xfe], addr(2), 10).unwrap(),
            max_gas_amount: 1_000_000,
            gas_unit_price: 0,
            expiration_time: 1_700_000_000,
        };
        TransactionSigner::new(V, DomainSalt::raw_transaction())
            .sign_transaction(raw, &AccountKeypair::from_seed(&[7; 32]))
            .unwrap()
            .to_bytes()
            .unwrap()
    }

    #[test]
    fn account_state_response_decodes_blob_and_proof() {
        let response = UpdateToLatestLedgerResponse {
            response_items: vec![ResponseItem::GetAccountState {
                account_state_with_proof: Some(account_state(3)),
            }],
            ..Default::default()
        };
        let decoded = decode_single(V, RequestKind::AccountState, &response).unwrap();
        let LedgerResponse::AccountState(Some(state)) = decoded else {
            panic!("expected account state, got {decoded:?}");
        };
        assert_eq!(state.version, 77);
        let account = &state.blob.as_ref().unwrap().account;
        assert_eq!(account.balance, 42);
        assert_eq!(account.sequence_number, 3);
        assert_eq!(state.proof.ledger_info_to_transaction_info_proof.siblings.len(), 2);
        assert_eq!(
            state.proof.ledger_info_to_transaction_info_proof.siblings[0],
            HashValue::new([0xaa; 32])
        );
        let AccountOrEventProof::Account(smt) = &state.proof.account_or_event_proof else {
            panic!("expected account proof");
        };
        assert_eq!(smt.leaf.as_ref().unwrap().value_hash, HashValue::new([0xcc; 32]));
    }

    #[test]
    fn missing_blob_means_no_account() {
        let mut raw = account_state(0);
        raw.blob = None;
        let state = decode_account_state_with_proof(V, &raw).unwrap();
        assert!(state.blob.is_none());
    }

    #[test]
    fn short_hash_is_malformed() {
        let mut raw = account_state(0);
        raw.proof.as_mut().unwrap().transaction_info.as_mut().unwrap().state_root_hash = vec![0; 31];
        let err = decode_account_state_with_proof(V, &raw).unwrap_err();
        assert_eq!(err.field(), "state_root_hash");
        assert!(matches!(err, DecodeError::MalformedLedgerResponse { .. }));
    }

    #[test]
    fn odd_sparse_merkle_leaf_is_malformed() {
        let mut raw = account_state(0);
        raw.proof
            .as_mut()
            .unwrap()
            .transaction_info_to_account_proof
            .as_mut()
            .unwrap()
            .leaf = vec![0; 40];
        assert_eq!(
            decode_account_state_with_proof(V, &raw).unwrap_err().field(),
            "sparse_merkle_leaf"
        );
    }

    #[test]
    fn truncated_blob_surfaces_codec_field() {
        let mut raw = account_state(0);
        let blob = raw.blob.as_mut().unwrap();
        blob.truncate(blob.len() - 1);
        let err = decode_account_state_with_proof(V, &raw).unwrap_err();
        assert!(matches!(err, DecodeError::Codec { .. }));
    }

    #[test]
    fn transaction_by_sequence_number_shapes() {
        let txn = RawTransactionWithProof {
            version: 9,
            signed_transaction: Some(signed_txn_bytes(4)),
            proof: Some(RawTransactionProof {
                ledger_info_to_transaction_info_proof: None,
                transaction_info: Some(info()),
            }),
            events: Some(vec![raw_event(10, 0)]),
        };

        let found = decode_transaction_by_sequence_number(V, Some(&txn), None).unwrap();
        let t = found.transaction().unwrap();
        assert_eq!(t.transaction.sequence_number(), 4);
        assert_eq!(t.events.as_ref().unwrap()[0].event_data.amount, 10);
        assert!(t.proof.ledger_info_to_transaction_info_proof.siblings.is_empty());

        let current = account_state(4);
        assert!(matches!(
            decode_transaction_by_sequence_number(V, None, Some(&current)).unwrap(),
            TransactionBySequenceNumber::CurrentSequenceNumber(_)
        ));
        assert_eq!(
            decode_transaction_by_sequence_number(V, None, None).unwrap(),
            TransactionBySequenceNumber::NotFound
        );
        assert!(decode_transaction_by_sequence_number(V, Some(&txn), Some(&current)).is_err());
    }

    #[test]
    fn events_come_back_most_recent_first() {
        let events: Vec<_> = (0..3)
            .map(|i| RawEventWithProof {
                transaction_version: 100 + i,
                event_index: 0,
                event: Some(raw_event(1, i)),
                proof: Some(RawEventProof {
                    ledger_info_to_transaction_info_proof: None,
                    transaction_info: Some(info()),
                    transaction_info_to_event_proof: Some(RawAccumulatorProof::default()),
                }),
            })
            .collect();
        let decoded = decode_events_by_access_path(V, &events, Some(&account_state(1))).unwrap();
        let versions: Vec<_> = decoded
            .events_with_proof
            .iter()
            .map(|e| e.transaction_version)
            .collect();
        assert_eq!(versions, vec![102, 101, 100]);
        assert!(decoded.events_with_proof[0].event.type_tag.is_none());
    }

    #[test]
    fn transaction_list_is_windowed_after_count_check() {
        let n = 25;
        let raw = RawTransactionListWithProof {
            transactions: (0..n).map(signed_txn_bytes).collect(),
            infos: vec![info(); n as usize],
            events_for_versions: Some(vec![vec![]; n as usize]),
            first_transaction_version: Some(1),
            proof_of_first_transaction: Some(RawAccumulatorProof {
                siblings: vec![vec![0; 32]],
            }),
            proof_of_last_transaction: None,
        };
        let list = decode_transaction_list(V, &raw).unwrap();
        assert_eq!(list.transactions.len(), TRANSACTION_DISPLAY_WINDOW);
        assert_eq!(list.total_returned, 25);
        assert_eq!(list.transactions[19].transaction.sequence_number(), 19);

        let mut short = raw.clone();
        short.infos.pop();
        assert_eq!(
            decode_transaction_list(V, &short).unwrap_err().field(),
            "transaction_infos"
        );
        let mut short = raw;
        short.events_for_versions.as_mut().unwrap().pop();
        assert_eq!(
            decode_transaction_list(V, &short).unwrap_err().field(),
            "events_for_versions"
        );
    }

    #[test]
    fn wrong_kind_is_reported() {
        let response = UpdateToLatestLedgerResponse {
            response_items: vec![ResponseItem::GetTransactions {
                txn_list_with_proof: None,
            }],
            ..Default::default()
        };
        assert_eq!(
            decode_single(V, RequestKind::AccountState, &response),
            Err(DecodeError::UnexpectedResponseKind {
                expected: RequestKind::AccountState,
                got: RequestKind::Transactions
            })
        );
        assert!(decode_single(V, RequestKind::AccountState, &Default::default()).is_err());
    }

    #[test]
    fn envelope_metadata_is_decoded() {
        let response = UpdateToLatestLedgerResponse {
            response_items: vec![],
            ledger_info_with_sigs: Some(RawLedgerInfoWithSignatures {
                signatures: vec![crate::ledger::wire::RawValidatorSignature {
                    validator_id: vec![1; 32],
                    signature: vec![2; 64],
                }],
                ledger_info: Some(RawLedgerInfo {
                    version: 500,
                    transaction_accumulator_hash: vec![3; 32],
                    consensus_data_hash: vec![4; 32],
                    consensus_block_id: vec![5; 32],
                    epoch_num: 1,
                    timestamp_usecs: 1_600_000_000_000_000,
                }),
            }),
            validator_change_events: vec![vec![0xfe]],
            ledger_consistency_proof: Some(RawAccumulatorConsistencyProof {
                subtrees: vec![vec![6; 32]],
            }),
        };
        let decoded = decode_response(V, &response).unwrap();
        let info = decoded.ledger_info_with_sigs.unwrap();
        assert_eq!(info.ledger_info.version, 500);
        assert_eq!(info.signatures.len(), 1);
        assert_eq!(decoded.validator_change_events, vec![vec![0xfe]]);
        assert_eq!(decoded.ledger_consistency_proof.unwrap(), vec![HashValue::new([6; 32])]);
    }
}
