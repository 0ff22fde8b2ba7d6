//! The confirmation loop.
//!
//! ```text
//! SUBMITTED ──rejected──▶ FAILED
//!     │
//!  accepted
//!     ▼
//!  POLLING ──proof found──▶ CONFIRMED
//!     │  ╲──decode error / sequence mismatch──▶ FAILED
//!     └── attempts exhausted ──▶ TIMED_OUT
//! ```
//!
//! Each attempt waits one interval and then issues a single read-only
//! query. Nothing is written, so abandoning the loop (shutdown signal or
//! dropping the future) needs no cleanup.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::client::{Faucet, FaucetRequest, LedgerClient, SubmissionStatus};
use super::{ConfirmationError, PollConfig, PollState};
use crate::account::AccountAddress;
use crate::codec::WireVersion;
use crate::ledger::{
    decode_single, AccountStateWithProof, LedgerResponse, RequestKind,
    TransactionBySequenceNumber, TransactionWithProof, UpdateToLatestLedgerRequest,
};
use crate::transaction::SignedTransaction;

/// Turns an asynchronous submission into a synchronous answer.
///
/// Stateless between calls: one poller can serve any number of concurrent
/// confirmations.
pub struct ConfirmationPoller<C> {
    client: C,
    version: WireVersion,
    config: PollConfig,
}

impl<C: LedgerClient> ConfirmationPoller<C> {
    pub fn new(client: C, version: WireVersion, config: PollConfig) -> Self {
        Self {
            client,
            version,
            config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Submits `signed` and waits until the ledger shows it.
    ///
    /// A rejected submission fails at once without polling.
    pub async fn transfer_and_confirm(
        &self,
        signed: &SignedTransaction,
        shutdown: watch::Receiver<bool>,
    ) -> Result<TransactionWithProof, ConfirmationError> {
        let bytes = signed.to_bytes()?;
        match self.client.submit_transaction(&bytes).await? {
            SubmissionStatus::Accepted => {
                info!(
                    sender = %signed.sender(),
                    sequence_number = signed.sequence_number(),
                    "submission accepted"
                );
            }
            SubmissionStatus::Rejected(status) => {
                warn!(
                    sender = %signed.sender(),
                    sequence_number = signed.sequence_number(),
                    %status,
                    "submission rejected"
                );
                return Err(ConfirmationError::SubmissionRejected(status));
            }
        }
        self.confirm_transaction(signed.sender(), signed.sequence_number(), shutdown)
            .await
    }

    /// Asks the faucet for funds, then waits for the account to appear.
    pub async fn mint_and_confirm<F: Faucet + ?Sized>(
        &self,
        faucet: &F,
        request: &FaucetRequest,
        shutdown: watch::Receiver<bool>,
    ) -> Result<AccountStateWithProof, ConfirmationError> {
        faucet.mint(request).await?;
        let address = request.recipient.address();
        info!(%address, amount = request.amount, "faucet mint requested");
        self.confirm_mint(address, shutdown).await
    }

    /// Polls until the ledger holds the transaction `sender` signed with
    /// `sequence_number`.
    pub async fn confirm_transaction(
        &self,
        sender: AccountAddress,
        sequence_number: u64,
        shutdown: watch::Receiver<bool>,
    ) -> Result<TransactionWithProof, ConfirmationError> {
        self.poll("transaction", shutdown, move || {
            self.query_transaction(sender, sequence_number)
        })
        .await
    }

    /// Polls until the account's state blob exists.
    pub async fn confirm_mint(
        &self,
        address: AccountAddress,
        shutdown: watch::Receiver<bool>,
    ) -> Result<AccountStateWithProof, ConfirmationError> {
        self.poll("mint", shutdown, move || self.query_account(address))
            .await
    }

    async fn query_transaction(
        &self,
        sender: AccountAddress,
        sequence_number: u64,
    ) -> Result<PollState<TransactionWithProof>, ConfirmationError> {
        let request = UpdateToLatestLedgerRequest::account_transaction(sender, sequence_number);
        let response = self.client.update_to_latest_ledger(request).await?;
        let kind = RequestKind::AccountTransactionBySequenceNumber;
        match decode_single(self.version, kind, &response)? {
            LedgerResponse::AccountTransactionBySequenceNumber(
                TransactionBySequenceNumber::Transaction(txn),
            ) => {
                let got = txn.transaction.sequence_number();
                if got != sequence_number {
                    return Err(ConfirmationError::SequenceMismatch {
                        expected: sequence_number,
                        got,
                    });
                }
                Ok(PollState::Confirmed(txn))
            }
            _ => Ok(PollState::Pending),
        }
    }

    async fn query_account(
        &self,
        address: AccountAddress,
    ) -> Result<PollState<AccountStateWithProof>, ConfirmationError> {
        let request = UpdateToLatestLedgerRequest::account_state(address);
        let response = self.client.update_to_latest_ledger(request).await?;
        match decode_single(self.version, RequestKind::AccountState, &response)? {
            LedgerResponse::AccountState(Some(state)) if state.blob.is_some() => {
                Ok(PollState::Confirmed(state))
            }
            _ => Ok(PollState::Pending),
        }
    }

    async fn poll<T, F, Fut>(
        &self,
        what: &'static str,
        mut shutdown: watch::Receiver<bool>,
        mut query: F,
    ) -> Result<T, ConfirmationError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<PollState<T>, ConfirmationError>>,
    {
        for attempt in 1..=self.config.max_attempts {
            if self.wait_interval(&mut shutdown).await {
                info!(what, attempt, "confirmation cancelled");
                return Err(ConfirmationError::Cancelled);
            }

            match query().await {
                Ok(PollState::Confirmed(value)) => {
                    info!(what, attempt, "confirmed");
                    return Ok(value);
                }
                Ok(PollState::Pending) => {
                    debug!(what, attempt, "not yet confirmed");
                }
                Err(ConfirmationError::Transport(err)) => {
                    warn!(what, attempt, error = %err, "query failed, will retry");
                }
                Err(err) => {
                    warn!(what, attempt, error = %err, "confirmation failed");
                    return Err(err);
                }
            }
        }

        warn!(what, attempts = self.config.max_attempts, "confirmation timed out");
        Err(ConfirmationError::Timeout {
            attempts: self.config.max_attempts,
        })
    }

    /// Sleeps one interval. Returns `true` if shutdown was signalled first.
    async fn wait_interval(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        if *shutdown.borrow() {
            return true;
        }
        let sleep = tokio::time::sleep(self.config.interval);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                Ok(()) = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::client::{FaucetRecipient, RejectionStatus, TransportError};
    use crate::crypto::AccountKeypair;
    use crate::ledger::wire::{
        RawAccountStateProof, RawAccountStateWithProof, RawTransactionInfo,
        RawTransactionProof, RawTransactionWithProof, ResponseItem,
    };
    use crate::ledger::{AccountBlob, AccountResource, UpdateToLatestLedgerResponse};
    use crate::transaction::{DomainSalt, RawTransaction, TransactionPayload, TransactionSigner};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

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
            ..Default::default()
        }
    }

    fn signed(seq: u64) -> SignedTransaction {
        let raw = RawTransaction {
            sender: addr(1),
            sequence_number: seq,
            payload: TransactionPayload::peer_to_peer(vec![0xab], addr(2), 100).unwrap(),
            max_gas_amount: 1_000_000,
            gas_unit_price: 0,
            expiration_time: 1_700_000_000,
        };
        TransactionSigner::new(V, DomainSalt::raw_transaction())
            .sign_transaction(raw, &AccountKeypair::from_seed(&[3; 32]))
            .unwrap()
    }

    fn found(seq: u64) -> UpdateToLatestLedgerResponse {
        UpdateToLatestLedgerResponse {
            response_items: vec![ResponseItem::GetAccountTransactionBySequenceNumber {
                transaction_with_proof: Some(RawTransactionWithProof {
                    version: 10,
                    signed_transaction: Some(signed(seq).to_bytes().unwrap()),
                    proof: Some(RawTransactionProof {
                        ledger_info_to_transaction_info_proof: None,
                        transaction_info: Some(info()),
                    }),
                    events: Some(vec![]),
                }),
                proof_of_current_sequence_number: None,
            }],
            ..Default::default()
        }
    }

    fn not_found() -> UpdateToLatestLedgerResponse {
        UpdateToLatestLedgerResponse {
            response_items: vec![ResponseItem::GetAccountTransactionBySequenceNumber {
                transaction_with_proof: None,
                proof_of_current_sequence_number: None,
            }],
            ..Default::default()
        }
    }

    fn account(blob: bool) -> UpdateToLatestLedgerResponse {
        let blob = blob.then(|| {
            AccountBlob {
                path: vec![1],
                account: AccountResource {
                    authentication_key: vec![0; 32],
                    balance: 5_000_000,
                    delegated_key_rotation_capability: false,
                    delegated_withdrawal_capability: false,
                    received_events_count: 1,
                    received_events_key: vec![1; 32],
                    sent_events_count: 0,
                    sent_events_key: vec![2; 32],
                    sequence_number: 0,
                },
                other_resources: vec![],
            }
            .encode(V)
            .unwrap()
        });
        UpdateToLatestLedgerResponse {
            response_items: vec![ResponseItem::GetAccountState {
                account_state_with_proof: Some(RawAccountStateWithProof {
                    version: 3,
                    blob,
                    proof: Some(RawAccountStateProof {
                        transaction_info: Some(info()),
                        ..Default::default()
                    }),
                }),
            }],
            ..Default::default()
        }
    }

    /// Replays scripted responses, then repeats `fallback` forever.
    struct ScriptedLedger {
        submit: SubmissionStatus,
        script: Mutex<VecDeque<Result<UpdateToLatestLedgerResponse, TransportError>>>,
        fallback: UpdateToLatestLedgerResponse,
        queries: AtomicU32,
    }

    impl ScriptedLedger {
        fn new(
            script: Vec<Result<UpdateToLatestLedgerResponse, TransportError>>,
            fallback: UpdateToLatestLedgerResponse,
        ) -> Self {
            Self {
                submit: SubmissionStatus::Accepted,
                script: Mutex::new(script.into()),
                fallback,
                queries: AtomicU32::new(0),
            }
        }

        fn queries(&self) -> u32 {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LedgerClient for ScriptedLedger {
        async fn submit_transaction(&self, _: &[u8]) -> Result<SubmissionStatus, TransportError> {
            Ok(self.submit)
        }

        async fn update_to_latest_ledger(
            &self,
            _: UpdateToLatestLedgerRequest,
        ) -> Result<UpdateToLatestLedgerResponse, TransportError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(self.fallback.clone()))
        }
    }

    struct NoopFaucet;

    #[async_trait]
    impl Faucet for NoopFaucet {
        async fn mint(&self, _: &FaucetRequest) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn poller(ledger: ScriptedLedger) -> ConfirmationPoller<ScriptedLedger> {
        ConfirmationPoller::new(ledger, V, PollConfig::default())
    }

    /// A shutdown channel whose sender is already gone.
    fn no_shutdown() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    #[tokio::test(start_paused = true)]
    async fn confirms_on_fourth_attempt() {
        let ledger = ScriptedLedger::new(
            vec![Ok(not_found()), Ok(not_found()), Ok(not_found())],
            found(5),
        );
        let poller = poller(ledger);
        let start = tokio::time::Instant::now();

        let txn = poller
            .confirm_transaction(addr(1), 5, no_shutdown())
            .await
            .unwrap();

        assert_eq!(txn.transaction.sequence_number(), 5);
        assert_eq!(poller.client().queries(), 4);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_exactly_max_attempts() {
        let poller = poller(ScriptedLedger::new(vec![], not_found()));
        let err = poller
            .confirm_transaction(addr(1), 5, no_shutdown())
            .await
            .unwrap_err();
        assert_eq!(err, ConfirmationError::Timeout { attempts: 60 });
        assert_eq!(poller.client().queries(), 60);
        assert!(err.to_string().contains("try querying again"));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_submission_never_polls() {
        let mut ledger = ScriptedLedger::new(vec![], found(5));
        ledger.submit = SubmissionStatus::Rejected(RejectionStatus::Mempool { code: 3 });
        let poller = poller(ledger);

        let err = poller
            .transfer_and_confirm(&signed(5), no_shutdown())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConfirmationError::SubmissionRejected(RejectionStatus::Mempool { code: 3 })
        );
        assert_eq!(poller.client().queries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_transfer_is_confirmed() {
        let poller = poller(ScriptedLedger::new(vec![Ok(not_found())], found(5)));
        let txn = poller
            .transfer_and_confirm(&signed(5), no_shutdown())
            .await
            .unwrap();
        assert_eq!(txn.version, 10);
        assert_eq!(poller.client().queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_mismatch_is_fatal() {
        let poller = poller(ScriptedLedger::new(vec![], found(6)));
        let err = poller
            .confirm_transaction(addr(1), 5, no_shutdown())
            .await
            .unwrap_err();
        assert_eq!(err, ConfirmationError::SequenceMismatch { expected: 5, got: 6 });
        assert_eq!(poller.client().queries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_count_as_attempts() {
        let ledger = ScriptedLedger::new(
            vec![Err(TransportError::new("unavailable")), Ok(not_found())],
            found(5),
        );
        let poller = poller(ledger);
        poller
            .confirm_transaction(addr(1), 5, no_shutdown())
            .await
            .unwrap();
        assert_eq!(poller.client().queries(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn decode_errors_are_fatal() {
        let mut bad = found(5);
        if let ResponseItem::GetAccountTransactionBySequenceNumber {
            transaction_with_proof: Some(txn),
            ..
        } = &mut bad.response_items[0]
        {
            txn.signed_transaction.as_mut().unwrap().pop();
        }
        let poller = poller(ScriptedLedger::new(vec![Ok(bad)], found(5)));
        let err = poller
            .confirm_transaction(addr(1), 5, no_shutdown())
            .await
            .unwrap_err();
        assert!(matches!(err, ConfirmationError::Decode(_)));
        assert_eq!(poller.client().queries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_polling() {
        let poller = poller(ScriptedLedger::new(vec![], not_found()));
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            let _ = tx.send(true);
        });

        let err = poller.confirm_transaction(addr(1), 5, rx).await.unwrap_err();
        assert_eq!(err, ConfirmationError::Cancelled);
        assert_eq!(poller.client().queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn mint_waits_for_blob() {
        let poller = poller(ScriptedLedger::new(
            vec![Ok(account(false)), Ok(account(false))],
            account(true),
        ));
        let request = FaucetRequest::new(5_000_000, FaucetRecipient::Address(addr(9)));
        let state = poller
            .mint_and_confirm(&NoopFaucet, &request, no_shutdown())
            .await
            .unwrap();
        assert_eq!(state.blob.unwrap().account.balance, 5_000_000);
        assert_eq!(poller.client().queries(), 3);
    }
}
