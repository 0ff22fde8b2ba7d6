//! Seams to the outside world: the ledger RPC service and the faucet.
//!
//! Both are traits so the poller can be driven by an in-memory stub in
//! tests and by whatever RPC stack the embedding application uses in
//! production.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::account::{AccountAddress, AuthenticationKey};
use crate::ledger::{UpdateToLatestLedgerRequest, UpdateToLatestLedgerResponse};

/// The call did not reach the service or got no usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission status
// ---------------------------------------------------------------------------

/// Why the ledger refused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum RejectionStatus {
    /// Admission control turned it away before validation.
    AdmissionControl { code: u64 },
    /// The VM's validation failed (bad signature, sequence number, gas...).
    Vm { major_status: u64 },
    /// The mempool would not hold it.
    Mempool { code: u64 },
}

impl fmt::Display for RejectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdmissionControl { code } => write!(f, "admission control status {code}"),
            Self::Vm { major_status } => write!(f, "vm status {major_status}"),
            Self::Mempool { code } => write!(f, "mempool status {code}"),
        }
    }
}

/// Outcome of a submission. Anything but `Accepted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Accepted,
    Rejected(RejectionStatus),
}

// ---------------------------------------------------------------------------
// Ledger client
// ---------------------------------------------------------------------------

/// The ledger's RPC surface, as far as this crate needs it.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submits complete signed-transaction bytes.
    async fn submit_transaction(&self, signed_txn: &[u8])
        -> Result<SubmissionStatus, TransportError>;

    async fn update_to_latest_ledger(
        &self,
        request: UpdateToLatestLedgerRequest,
    ) -> Result<UpdateToLatestLedgerResponse, TransportError>;
}

// ---------------------------------------------------------------------------
// Faucet
// ---------------------------------------------------------------------------

/// Who a faucet mint pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaucetRecipient {
    Address(AccountAddress),
    /// V2 faucets take the full authentication key so they can create the
    /// account.
    AuthKey(AuthenticationKey),
}

impl FaucetRecipient {
    /// The account whose state will show the mint.
    pub fn address(&self) -> AccountAddress {
        match self {
            Self::Address(address) => *address,
            Self::AuthKey(auth_key) => auth_key.derived_address(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaucetRequest {
    /// Micro-units.
    pub amount: u64,
    pub recipient: FaucetRecipient,
}

impl FaucetRequest {
    pub fn new(amount: u64, recipient: FaucetRecipient) -> Self {
        Self { amount, recipient }
    }

    /// `amount=..&address=..` or `amount=..&auth_key=..`, ready to append
    /// to the faucet URL.
    pub fn query_string(&self) -> String {
        match &self.recipient {
            FaucetRecipient::Address(address) => {
                format!("amount={}&address={}", self.amount, address.to_hex())
            }
            FaucetRecipient::AuthKey(auth_key) => {
                format!("amount={}&auth_key={}", self.amount, auth_key.to_hex())
            }
        }
    }
}

/// Funds accounts on test networks. Fire-and-forget: success only means the
/// faucet accepted the request, so callers poll for the result.
#[async_trait]
pub trait Faucet: Send + Sync {
    async fn mint(&self, request: &FaucetRequest) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireVersion;

    #[test]
    fn faucet_query_by_address() {
        let address = AccountAddress::from_hex(WireVersion::V2, &"0f".repeat(16)).unwrap();
        let req = FaucetRequest::new(5_000_000, FaucetRecipient::Address(address));
        assert_eq!(
            req.query_string(),
            format!("amount=5000000&address={}", "0f".repeat(16))
        );
    }

    #[test]
    fn faucet_query_by_auth_key_polls_derived_address() {
        let auth = AuthenticationKey::from_hex(&format!("{}{}", "aa".repeat(16), "bb".repeat(16)))
            .unwrap();
        let req = FaucetRequest::new(1, FaucetRecipient::AuthKey(auth));
        assert!(req.query_string().starts_with("amount=1&auth_key=aaaa"));
        assert_eq!(req.recipient.address().to_hex(), "bb".repeat(16));
    }

    #[test]
    fn rejection_display_names_stage() {
        assert_eq!(
            RejectionStatus::Vm { major_status: 4001 }.to_string(),
            "vm status 4001"
        );
    }
}
