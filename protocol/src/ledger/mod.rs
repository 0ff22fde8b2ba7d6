//! # Ledger Module
//!
//! Talking to the ledger is query-response: the client sends an
//! `UpdateToLatestLedger` request holding one or more items, and gets back
//! one response item per request item plus the signed ledger info those
//! answers were read at.
//!
//! The transport hands over responses as [`wire`] structs. Those are framed
//! but not trusted: account blobs, signed transactions and event payloads
//! inside them are still canonical-encoded bytes, and hash widths are
//! unchecked. [`decode`] turns them into the typed records in [`types`], or
//! fails with a [`DecodeError`] that names the field.
//!
//! ## Layout
//!
//! ```text
//! request.rs  — UpdateToLatestLedgerRequest, RequestItem, AccessPath
//! wire.rs     — raw response envelope as delivered by the transport
//! types.rs    — decoded records (account blob, proofs, events, lists)
//! blob.rs     — canonical payloads: account blob, account resource, event data
//! decode.rs   — per-shape decoders and DecodeError
//! classify.rs — sent/received event tagging
//! ```

pub mod blob;
pub mod classify;
pub mod decode;
pub mod request;
pub mod types;
pub mod wire;

pub use blob::{decode_account_blob, decode_account_resource, decode_event_data};
pub use classify::{classify_events, classify_stream, classify_transaction};
pub use decode::{decode_item, decode_response, decode_single, DecodeError};
pub use request::{AccessPath, RequestItem, RequestKind, UpdateToLatestLedgerRequest};
pub use types::{
    AccountBlob, AccountOrEventProof, AccountResource, AccountStateWithProof, AccumulatorProof,
    DecodedLedgerResponse, Event, EventData, EventType, EventWithProof, EventsByAccessPath,
    LedgerInfo, LedgerInfoWithSignatures, LedgerResponse, Proof, RawResource, SparseMerkleLeaf,
    SparseMerkleProof, TransactionBySequenceNumber, TransactionInfo, TransactionListEntry,
    TransactionListWithProof, TransactionWithProof, ValidatorSignature,
};
pub use wire::{ResponseItem, UpdateToLatestLedgerResponse};
