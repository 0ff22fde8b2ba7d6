//! Post-decode event enrichment.
//!
//! The ledger never says whether a payment event was outgoing or incoming;
//! that depends on who is looking. These functions derive
//! [`EventType`] from context and return new values. The decoder itself
//! never sets it.

use super::types::{Event, EventType, TransactionWithProof};
use crate::account::AccountAddress;

/// Tags each event by comparing its counterparty address against the
/// transaction's sender and receiver. An address matching the receiver is
/// `Received` even if it also matches the sender. Events matching neither
/// are left untagged.
pub fn classify_events(
    events: &[Event],
    sender: &AccountAddress,
    receiver: &AccountAddress,
) -> Vec<Event> {
    events
        .iter()
        .map(|event| {
            let mut event = event.clone();
            let address = &event.event_data.address;
            if address == receiver {
                event.event_data.event_type = Some(EventType::Received);
            } else if address == sender {
                event.event_data.event_type = Some(EventType::Sent);
            }
            event
        })
        .collect()
}

/// Tags every event of a stream query with the stream's direction.
pub fn classify_stream(events: &[Event], event_type: EventType) -> Vec<Event> {
    events
        .iter()
        .map(|event| {
            let mut event = event.clone();
            event.event_data.event_type = Some(event_type);
            event
        })
        .collect()
}

/// Classifies a looked-up payment's events against its own sender and
/// receiver. Transactions that are not payments come back unchanged.
pub fn classify_transaction(txn: &TransactionWithProof) -> TransactionWithProof {
    let mut out = txn.clone();
    if let (Some(events), Some((receiver, _))) = (&txn.events, txn.transaction.peer_to_peer()) {
        out.events = Some(classify_events(
            events,
            &txn.transaction.sender(),
            &receiver,
        ));
    }
    out
}
