// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Meridian Protocol — Client Core
//!
//! Everything a client needs to speak to a Meridian validator network without
//! being one: derive keys from a mnemonic, build and sign transactions in the
//! exact byte layout validators expect, decode the proof-carrying answers the
//! ledger sends back, and wait until a submission is actually on the ledger.
//!
//! The wire format is unforgiving. It is not self-describing, field order and
//! integer widths are fixed, and two incompatible versions exist. Get one
//! byte wrong and the network silently rejects the transaction, or worse,
//! reads it as a different one. So the version is chosen once, in
//! [`config::ClientConfig`], and passed explicitly to everything that reads
//! or writes bytes.
//!
//! ## Architecture
//!
//! - **codec** — Integer and length-prefix primitives for both wire versions.
//! - **config** — Protocol constants and the once-at-startup client config.
//! - **crypto** — SHA-3 hashing, Ed25519 keys, mnemonic seed derivation.
//! - **account** — Addresses, authentication keys, accounts from mnemonics.
//! - **transaction** — Building, encoding and signing transactions.
//! - **ledger** — Query envelopes and response decoding.
//! - **confirm** — The bounded poll loop that confirms submissions.
//!
//! ## Data Flow
//!
//! ```text
//! mnemonic ─▶ account ─▶ transaction builder ─▶ encode ─▶ sign
//!                                                          │
//!                                   (transport submits) ◀──┘
//!                                            │
//!           confirm poller ─▶ (transport queries) ─▶ ledger decode ─▶ caller
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Pure where possible. Only the poller waits, and only the poller retries.
//! 2. Every decode returns a whole value or an error naming the field.
//! 3. Secrets never reach a log line or a `Debug` string.

pub mod account;
pub mod codec;
pub mod config;
pub mod confirm;
pub mod crypto;
pub mod ledger;
pub mod transaction;
