//! End-to-end integration tests for the Meridian client core.
//!
//! These run the whole client-side lifecycle: mnemonic to account, build,
//! encode, sign, submit to an in-memory ledger, poll until it shows up, and
//! decode what comes back. Byte layouts are pinned with recorded vectors
//! for both wire versions.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use meridian_protocol::account::{Account, AccountAddress};
use meridian_protocol::codec::WireVersion;
use meridian_protocol::config::{ClientConfig, ACCOUNT_RESOURCE_PATH};
use meridian_protocol::confirm::{
    ConfirmationError, ConfirmationPoller, LedgerClient, PollConfig, SubmissionStatus,
    TransportError,
};
use meridian_protocol::ledger::wire::{
    RawEvent, RawTransactionInfo, RawTransactionProof, RawTransactionWithProof,
};
use meridian_protocol::ledger::{
    classify_transaction, decode_account_blob, EventData, EventType, RequestItem, ResponseItem,
    UpdateToLatestLedgerRequest, UpdateToLatestLedgerResponse,
};
use meridian_protocol::transaction::{
    RawTransaction, RawTransactionBuilder, SignedTransaction, TransactionPayload,
    TransactionSigner,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon about";

/// Stand-in payment script. Only its bytes matter here.
const SCRIPT: [u8; 6] = [0xa1, 0x1c, 0xeb, 0x0b, 0x01, 0x00];

const EXPIRATION: u64 = 1_600_000_000;

fn addr(version: WireVersion, last: u8) -> AccountAddress {
    let mut bytes = vec![0u8; version.address_len()];
    bytes[version.address_len() - 1] = last;
    AccountAddress::from_bytes(version, &bytes).unwrap()
}

/// The recorded payment: 0x..01 pays 0x..02 one coin at sequence 5.
fn golden_payment(config: &ClientConfig) -> RawTransaction {
    let version = config.wire_version;
    RawTransactionBuilder::new(config)
        .sender(addr(version, 1))
        .sequence_number(5)
        .payload(
            TransactionPayload::peer_to_peer(SCRIPT.to_vec(), addr(version, 2), 1_000_000).unwrap(),
        )
        .max_gas_amount(1_000_000)
        .gas_unit_price(0)
        .expiration_time(EXPIRATION)
        .build()
        .unwrap()
}

fn sign(config: &ClientConfig, raw: RawTransaction) -> SignedTransaction {
    let account = Account::recover(PHRASE, config).unwrap();
    TransactionSigner::new(config.wire_version, config.domain_salt.clone())
        .sign_transaction(raw, account.keypair())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Golden vectors
// ---------------------------------------------------------------------------

const V1_RAW: &str = "0000000000000000000000000000000000000000000000000000000000000001\
                      0500000000000000\
                      02000000\
                      06000000a11ceb0b0100\
                      02000000\
                      010000000000000000000000000000000000000000000000000000000000000000000002\
                      0000000040420f0000000000\
                      40420f0000000000\
                      0000000000000000\
                      0600000000000000000000000000000000034c4252015400\
                      00105e5f00000000";

const V1_SIGNED_TAIL: &str = "20000000\
                              c43ad3b5bfe6d440e1522708abd4ab75cdeb0fa3d442d437cc0c0d42399d3f98\
                              40000000\
                              c6cb5d518c5e0e142a06b71f28bbcebaeaaf38e8554ba503f663ebdac680903d\
                              a35b1b2ad5acf5c959c18838ca0213ff77d75d1655ded7dc478e15dc1f66170a";

const V2_RAW: &str = "00\
                      00000000000000000000000000000001\
                      0500000000000000\
                      02\
                      06a11ceb0b0100\
                      02\
                      0100000000000000000000000000000002\
                      0040420f0000000000\
                      40420f0000000000\
                      0000000000000000\
                      00105e5f00000000";

const V2_SIGNED_TAIL: &str = "00\
                              20c43ad3b5bfe6d440e1522708abd4ab75cdeb0fa3d442d437cc0c0d42399d3f98\
                              40d1694f0fc56b3d276e824a7bbbc733dbeeab19783078b5934a7d8963b69e56a9\
                              2c098ce4379d2c3e07648a20e191ac094010e7074f171cc752950007d440b401";

#[test]
fn v1_payment_matches_recorded_bytes() {
    let config = ClientConfig::for_version(WireVersion::V1);
    let raw = golden_payment(&config);
    assert_eq!(hex::encode(raw.encode(WireVersion::V1).unwrap()), V1_RAW);

    let signed = sign(&config, raw).to_bytes().unwrap();
    assert_eq!(hex::encode(signed), format!("{V1_RAW}{V1_SIGNED_TAIL}"));
}

#[test]
fn v2_payment_matches_recorded_bytes() {
    let config = ClientConfig::for_version(WireVersion::V2);
    let raw = golden_payment(&config);
    assert_eq!(hex::encode(raw.encode(WireVersion::V2).unwrap()), V2_RAW);

    let signed = sign(&config, raw).to_bytes().unwrap();
    assert_eq!(hex::encode(signed), format!("{V2_RAW}{V2_SIGNED_TAIL}"));
}

#[test]
fn signing_hash_matches_recorded_digest() {
    let config = ClientConfig::for_version(WireVersion::V2);
    let raw = golden_payment(&config).encode(WireVersion::V2).unwrap();
    let signer = TransactionSigner::new(WireVersion::V2, config.domain_salt.clone());
    assert_eq!(
        hex::encode(signer.signing_hash(&raw)),
        "d4c0354ecde98b6b1bef011bc75b46cd766c58536a59248dd7d525e86376e89d"
    );
}

// ---------------------------------------------------------------------------
// Sign → decode → verify
// ---------------------------------------------------------------------------

#[test]
fn signed_transaction_survives_decode_and_verifies() {
    for version in [WireVersion::V1, WireVersion::V2] {
        let config = ClientConfig::for_version(version);
        let signed = sign(&config, golden_payment(&config));
        let bytes = signed.to_bytes().unwrap();

        let decoded = SignedTransaction::decode(version, &bytes).unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(decoded.peer_to_peer(), Some((addr(version, 2), 1_000_000)));

        let signer = TransactionSigner::new(version, config.domain_salt.clone());
        signer.verify(&decoded).unwrap();

        // One flipped bit anywhere in the signature breaks it.
        let mut tampered = decoded.clone();
        tampered.signature[10] ^= 0x01;
        assert!(signer.verify(&tampered).is_err());

        for cut in 0..bytes.len() {
            assert!(SignedTransaction::decode(version, &bytes[..cut]).is_err());
        }
    }
}

// ---------------------------------------------------------------------------
// Recorded account state
// ---------------------------------------------------------------------------

/// A V1 account-state blob: balance 12.345678 coins, sequence number 2,
/// three received and two sent events.
const V1_ACCOUNT_BLOB: &str = "01000000\
    21000000\
    01217da6c6b3e19f1825cfb2676daecce3bf3de03cf26647c78df00b371b25cc97\
    8e000000\
    20000000\
    2f149619510515dac10201fd79cf5d08f0d8294440ff9243c280c2e02b79ce69\
    4e61bc0000000000\
    0000\
    0300000000000000\
    20000000\
    00000000000000002f149619510515dac10201fd79cf5d08f0d8294440ff9243\
    0200000000000000\
    20000000\
    01000000000000002f149619510515dac10201fd79cf5d08f0d8294440ff9243\
    0200000000000000";

#[test]
fn recorded_account_blob_decodes() {
    let bytes = hex::decode(V1_ACCOUNT_BLOB).unwrap();
    let blob = decode_account_blob(WireVersion::V1, &bytes).unwrap();

    assert_eq!(blob.path, ACCOUNT_RESOURCE_PATH.to_vec());
    assert!(blob.other_resources.is_empty());

    let account = &blob.account;
    assert_eq!(account.balance, 12_345_678);
    assert_eq!(account.sequence_number, 2);
    assert_eq!(account.received_events_count, 3);
    assert_eq!(account.sent_events_count, 2);
    assert_eq!(
        hex::encode(&account.received_events_key),
        "00000000000000002f149619510515dac10201fd79cf5d08f0d8294440ff9243"
    );
    assert_eq!(
        hex::encode(&account.sent_events_key),
        "01000000000000002f149619510515dac10201fd79cf5d08f0d8294440ff9243"
    );

    // The authentication key is the V1 address of the recorded mnemonic.
    let owner = Account::recover(PHRASE, &ClientConfig::for_version(WireVersion::V1)).unwrap();
    assert_eq!(account.authentication_key, owner.address().as_bytes());

    for cut in 0..bytes.len() {
        assert!(decode_account_blob(WireVersion::V1, &bytes[..cut]).is_err());
    }
}

// ---------------------------------------------------------------------------
// Submit → poll → decode against an in-memory ledger
// ---------------------------------------------------------------------------

/// Accepts submissions and makes each one visible after a fixed number of
/// sequence-number queries.
struct InMemoryLedger {
    version: WireVersion,
    visible_after: u32,
    submitted: Mutex<Option<Vec<u8>>>,
    queries: AtomicU32,
}

impl InMemoryLedger {
    fn new(version: WireVersion, visible_after: u32) -> Self {
        Self {
            version,
            visible_after,
            submitted: Mutex::new(None),
            queries: AtomicU32::new(0),
        }
    }

    fn payment_events(&self, signed: &SignedTransaction) -> Vec<RawEvent> {
        let (receiver, amount) = signed.peer_to_peer().unwrap();
        [(signed.sender(), 0u8), (receiver, 1u8)]
            .into_iter()
            .map(|(counterparty, key)| RawEvent {
                key: vec![key; 32],
                sequence_number: 0,
                event_data: EventData {
                    amount: amount as i64,
                    address: counterparty,
                    event_type: None,
                }
                .encode(self.version)
                .unwrap(),
                type_tag: vec![],
            })
            .collect()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit_transaction(&self, signed_txn: &[u8]) -> Result<SubmissionStatus, TransportError> {
        *self.submitted.lock().unwrap() = Some(signed_txn.to_vec());
        Ok(SubmissionStatus::Accepted)
    }

    async fn update_to_latest_ledger(
        &self,
        request: UpdateToLatestLedgerRequest,
    ) -> Result<UpdateToLatestLedgerResponse, TransportError> {
        assert!(matches!(
            request.requested_items[0],
            RequestItem::GetAccountTransactionBySequenceNumber { fetch_events: true, .. }
        ));
        let seen = self.queries.fetch_add(1, Ordering::SeqCst) + 1;

        let transaction_with_proof = match self.submitted.lock().unwrap().clone() {
            Some(bytes) if seen >= self.visible_after => {
                let signed = SignedTransaction::decode(self.version, &bytes).unwrap();
                Some(RawTransactionWithProof {
                    version: 4_242,
                    events: Some(self.payment_events(&signed)),
                    signed_transaction: Some(bytes),
                    proof: Some(RawTransactionProof {
                        ledger_info_to_transaction_info_proof: None,
                        transaction_info: Some(RawTransactionInfo {
                            transaction_hash: vec![0x11; 32],
                            state_root_hash: vec![0x22; 32],
                            event_root_hash: vec![0x33; 32],
                            gas_used: 0,
                            major_status: 4001,
                        }),
                    }),
                })
            }
            _ => None,
        };

        Ok(UpdateToLatestLedgerResponse {
            response_items: vec![ResponseItem::GetAccountTransactionBySequenceNumber {
                transaction_with_proof,
                proof_of_current_sequence_number: None,
            }],
            ..Default::default()
        })
    }
}

#[tokio::test(start_paused = true)]
async fn transfer_is_confirmed_on_fourth_query() {
    for version in [WireVersion::V1, WireVersion::V2] {
        let config = ClientConfig::for_version(version);
        let signed = sign(&config, golden_payment(&config));
        let poller = ConfirmationPoller::new(InMemoryLedger::new(version, 4), version, config.poll);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let confirmed = poller.transfer_and_confirm(&signed, shutdown_rx).await.unwrap();

        assert_eq!(poller.client().queries.load(Ordering::SeqCst), 4);
        assert_eq!(confirmed.version, 4_242);
        assert_eq!(confirmed.transaction, signed);

        let classified = classify_transaction(&confirmed);
        let types: Vec<_> = classified
            .events
            .unwrap()
            .iter()
            .map(|e| e.event_data.event_type)
            .collect();
        assert_eq!(types, vec![Some(EventType::Sent), Some(EventType::Received)]);
    }
}

#[tokio::test(start_paused = true)]
async fn transfer_times_out_when_never_visible() {
    let version = WireVersion::V2;
    let config = ClientConfig::for_version(version);
    let signed = sign(&config, golden_payment(&config));
    let poll = PollConfig {
        max_attempts: 5,
        ..PollConfig::default()
    };
    let poller = ConfirmationPoller::new(InMemoryLedger::new(version, u32::MAX), version, poll);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let err = poller.transfer_and_confirm(&signed, shutdown_rx).await.unwrap_err();

    assert_eq!(err, ConfirmationError::Timeout { attempts: 5 });
    assert_eq!(poller.client().queries.load(Ordering::SeqCst), 5);
}
