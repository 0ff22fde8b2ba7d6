//! # Transaction Module
//!
//! Construction, canonical encoding and signing of ledger transactions.
//! Everything here is pure: no I/O, no clocks except the builder's default
//! expiration, no retries.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    — RawTransaction, TransactionPayload, TransactionArgument
//! builder.rs  — RawTransactionBuilder, payment payloads, ValidationError
//! encode.rs   — canonical byte layout (both wire versions), decode
//! signing.rs  — DomainSalt, TransactionSigner, SignedTransaction
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** — [`RawTransactionBuilder`] validates the fields.
//! 2. **Encode** — [`RawTransaction::encode`] produces the signed-over bytes.
//! 3. **Sign** — [`TransactionSigner::sign_transaction`] hashes with the
//!    domain salt, signs, and wraps the result in a [`SignedTransaction`].
//! 4. **Submit** — [`SignedTransaction::to_bytes`] goes to the transport;
//!    see [`crate::confirm`] for what happens next.

pub mod builder;
pub mod encode;
pub mod signing;
pub mod types;

pub use builder::{RawTransactionBuilder, ValidationError};
pub use signing::{assemble_signed_transaction, DomainSalt, SignedTransaction, TransactionSigner};
pub use types::{RawTransaction, TransactionArgument, TransactionPayload};
