//! # Confirmation
//!
//! Submitting a transaction only gets it into a mempool. Whether it made it
//! onto the ledger is learned by asking, repeatedly, until the ledger can
//! prove it or the budget runs out. This module is the only place in the
//! crate that retries anything.
//!
//! ## Layout
//!
//! ```text
//! client.rs — LedgerClient / Faucet traits, SubmissionStatus, FaucetRequest
//! poller.rs — ConfirmationPoller (transfer and mint confirmation)
//! ```

pub mod client;
pub mod poller;

pub use client::{
    Faucet, FaucetRecipient, FaucetRequest, LedgerClient, RejectionStatus, SubmissionStatus,
    TransportError,
};
pub use poller::ConfirmationPoller;

use std::time::Duration;
use thiserror::Error;

use crate::codec::CodecError;
use crate::config::{POLL_INTERVAL, POLL_MAX_ATTEMPTS};
use crate::ledger::DecodeError;

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before each query.
    pub interval: Duration,
    /// Queries issued before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: POLL_MAX_ATTEMPTS,
        }
    }
}

/// Result of one poll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState<T> {
    Confirmed(T),
    /// Not visible yet. Drives the retry loop and never leaves it.
    Pending,
}

/// Why a confirmation did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    /// The ledger refused the submission. Resubmitting the same bytes will
    /// not help.
    #[error("submission rejected: {0}")]
    SubmissionRejected(RejectionStatus),

    /// The ledger returned a transaction for this sender with a different
    /// sequence number than the one asked for.
    #[error("ledger returned sequence number {got}, expected {expected}")]
    SequenceMismatch { expected: u64, got: u64 },

    /// The attempt budget ran out. The transaction may still land.
    #[error("not confirmed after {attempts} attempts. Please try querying again.")]
    Timeout { attempts: u32 },

    /// The caller signalled shutdown.
    #[error("confirmation cancelled")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The transaction could not be serialized for submission.
    #[error("cannot encode transaction: {0}")]
    Encode(#[from] CodecError),
}

impl ConfirmationError {
    /// Whether asking again later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }
}
