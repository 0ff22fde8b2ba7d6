//! # CLI Interface
//!
//! Defines the command-line argument structure for `meridian` using
//! `clap` derive. Three command groups: `account`, `transfer` and
//! `decode`. Nothing here talks to the network; output is meant to be piped
//! into whatever transport the operator uses.

use clap::{Args, Parser, Subcommand, ValueEnum};

use meridian_protocol::codec::WireVersion;

/// Meridian ledger client.
///
/// Derives accounts from mnemonics, signs payment transactions offline and
/// decodes ledger payloads to JSON.
#[derive(Parser, Debug)]
#[command(
    name = "meridian",
    about = "Meridian ledger client",
    version,
    propagate_version = true
)]
pub struct MeridianCli {
    /// Wire format spoken by the target network.
    #[arg(
        long,
        global = true,
        env = "MERIDIAN_WIRE_VERSION",
        default_value = "v2",
        value_parser = parse_wire_version
    )]
    pub wire_version: WireVersion,

    /// Log output format.
    #[arg(long, global = true, env = "MERIDIAN_LOG_FORMAT", value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "MERIDIAN_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

fn parse_wire_version(s: &str) -> Result<WireVersion, String> {
    s.parse()
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or recover an account.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Build and sign transactions.
    #[command(subcommand)]
    Transfer(TransferCommand),
    /// Decode canonical-encoded ledger payloads to JSON.
    #[command(subcommand)]
    Decode(DecodeCommand),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Generate a fresh mnemonic and print the derived account.
    New,
    /// Re-derive an account from its mnemonic.
    Recover(RecoverArgs),
}

#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// The 12-word phrase, quoted.
    #[arg(long, env = "MERIDIAN_MNEMONIC")]
    pub mnemonic: String,
}

#[derive(Subcommand, Debug)]
pub enum TransferCommand {
    /// Sign a peer-to-peer payment and print the submission bytes as hex.
    Sign(SignArgs),
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Sender's mnemonic. Prefer the environment variable over the flag.
    #[arg(long, env = "MERIDIAN_MNEMONIC")]
    pub mnemonic: String,

    /// The sender's next sequence number.
    #[arg(long)]
    pub sequence: u64,

    /// Receiver address, hex. Under V2 a 32-byte authentication key is also
    /// accepted and creates the account if needed.
    #[arg(long)]
    pub receiver: String,

    /// Amount in micro-units.
    #[arg(long)]
    pub amount: u64,

    /// Payment script bytecode, hex.
    #[arg(long)]
    pub script_hex: String,

    /// Expiration as unix seconds. Defaults to now plus the version's window.
    #[arg(long)]
    pub expiration: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum DecodeCommand {
    /// An account-state blob (resource map).
    Blob {
        /// Canonical bytes, hex.
        hex: String,
    },
    /// A signed transaction.
    Txn {
        /// Canonical bytes, hex.
        hex: String,
    },
}
