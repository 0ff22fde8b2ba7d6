//! Outbound query envelope.
//!
//! A request wraps one or more [`RequestItem`]s plus the version the client
//! already knows about. The transport serializes it; nothing here touches
//! the canonical codec.

use serde::Serialize;
use std::fmt;

use crate::account::AccountAddress;
use crate::codec::serde_hex;
use crate::config::{
    ACCOUNT_RESOURCE_PATH, DEFAULT_EVENTS_LIMIT, DEFAULT_EVENTS_START, RECEIVED_EVENTS_SUFFIX,
    RECENT_TRANSACTIONS_LIMIT, SENT_EVENTS_SUFFIX,
};

/// The four query shapes. Requests and responses share the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    AccountState,
    AccountTransactionBySequenceNumber,
    EventsByAccessPath,
    Transactions,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AccountState => "get_account_state",
            Self::AccountTransactionBySequenceNumber => {
                "get_account_transaction_by_sequence_number"
            }
            Self::EventsByAccessPath => "get_events_by_event_access_path",
            Self::Transactions => "get_transactions",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// AccessPath
// ---------------------------------------------------------------------------

/// Locates a resource (here: an event stream) inside an account's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPath {
    pub address: AccountAddress,
    #[serde(serialize_with = "serde_hex::serialize")]
    pub path: Vec<u8>,
}

impl AccessPath {
    fn event_stream(address: AccountAddress, suffix: &[u8]) -> Self {
        let mut path = Vec::with_capacity(ACCOUNT_RESOURCE_PATH.len() + suffix.len());
        path.extend_from_slice(&ACCOUNT_RESOURCE_PATH);
        path.extend_from_slice(suffix);
        Self { address, path }
    }

    /// The account's outgoing payment events.
    pub fn sent_events(address: AccountAddress) -> Self {
        Self::event_stream(address, SENT_EVENTS_SUFFIX)
    }

    /// The account's incoming payment events.
    pub fn received_events(address: AccountAddress) -> Self {
        Self::event_stream(address, RECEIVED_EVENTS_SUFFIX)
    }
}

// ---------------------------------------------------------------------------
// RequestItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestItem {
    GetAccountState {
        address: AccountAddress,
    },
    GetAccountTransactionBySequenceNumber {
        account: AccountAddress,
        sequence_number: u64,
        fetch_events: bool,
    },
    GetEventsByEventAccessPath {
        access_path: AccessPath,
        start_event_seq_num: u64,
        ascending: bool,
        limit: u64,
    },
    GetTransactions {
        start_version: u64,
        limit: u64,
        fetch_events: bool,
    },
}

impl RequestItem {
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

    /// Events from the start of the stream, oldest first, default page size.
    pub fn events(access_path: AccessPath) -> Self {
        Self::GetEventsByEventAccessPath {
            access_path,
            start_event_seq_num: DEFAULT_EVENTS_START,
            ascending: true,
            limit: DEFAULT_EVENTS_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateToLatestLedgerRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateToLatestLedgerRequest {
    /// The newest version the client has verified. Only validator-set
    /// changes after it are returned.
    pub client_known_version: u64,
    pub requested_items: Vec<RequestItem>,
}

impl UpdateToLatestLedgerRequest {
    pub fn new(client_known_version: u64, requested_items: Vec<RequestItem>) -> Self {
        Self {
            client_known_version,
            requested_items,
        }
    }

    fn single(item: RequestItem) -> Self {
        Self::new(0, vec![item])
    }

    /// Current state of one account.
    pub fn account_state(address: AccountAddress) -> Self {
        Self::single(RequestItem::GetAccountState { address })
    }

    /// The transaction `account` sent with `sequence_number`, with events.
    pub fn account_transaction(account: AccountAddress, sequence_number: u64) -> Self {
        Self::single(RequestItem::GetAccountTransactionBySequenceNumber {
            account,
            sequence_number,
            fetch_events: true,
        })
    }

    pub fn sent_events(address: AccountAddress) -> Self {
        Self::single(RequestItem::events(AccessPath::sent_events(address)))
    }

    pub fn received_events(address: AccountAddress) -> Self {
        Self::single(RequestItem::events(AccessPath::received_events(address)))
    }

    /// Exactly the transaction at `version`.
    pub fn transaction_at(version: u64) -> Self {
        Self::new(
            version,
            vec![RequestItem::GetTransactions {
                start_version: version,
                limit: 1,
                fetch_events: true,
            }],
        )
    }

    /// A batch of recent transactions, starting after genesis.
    pub fn recent_transactions() -> Self {
        Self::single(RequestItem::GetTransactions {
            start_version: 1,
            limit: RECENT_TRANSACTIONS_LIMIT,
            fetch_events: true,
        })
    }
}
