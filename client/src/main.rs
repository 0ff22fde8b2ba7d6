// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Meridian CLI
//!
//! Entry point for the `meridian` binary. Parses CLI arguments, initializes
//! logging and runs one offline command:
//!
//! - `account new | recover` — derive an account and print it as JSON
//! - `transfer sign`         — sign a payment and print the submission hex
//! - `decode blob | txn`     — decode canonical bytes to JSON
//!
//! Results go to stdout, logs to stderr.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use meridian_protocol::account::{Account, AccountAddress, AuthenticationKey};
use meridian_protocol::codec::WireVersion;
use meridian_protocol::config::{ClientConfig, AUTH_KEY_LENGTH};
use meridian_protocol::ledger::decode_account_blob;
use meridian_protocol::transaction::{
    RawTransactionBuilder, SignedTransaction, TransactionPayload, TransactionSigner,
};

use cli::{AccountCommand, Commands, DecodeCommand, MeridianCli, SignArgs, TransferCommand};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = MeridianCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from(cli.log_format));

    let config = ClientConfig::for_version(cli.wire_version);
    tracing::debug!(wire_version = %config.wire_version, "configuration loaded");

    match cli.command {
        Commands::Account(AccountCommand::New) => {
            let account = Account::generate(&config).context("failed to generate mnemonic")?;
            print_json(&AccountSummary::new(&account, true))
        }
        Commands::Account(AccountCommand::Recover(args)) => {
            let account = Account::recover(&args.mnemonic, &config).context("invalid mnemonic")?;
            print_json(&AccountSummary::new(&account, false))
        }
        Commands::Transfer(TransferCommand::Sign(args)) => sign_transfer(&config, args),
        Commands::Decode(DecodeCommand::Blob { hex }) => {
            let bytes = decode_hex_arg(&hex)?;
            let blob = decode_account_blob(config.wire_version, &bytes)
                .context("failed to decode account blob")?;
            print_json(&blob)
        }
        Commands::Decode(DecodeCommand::Txn { hex }) => {
            let bytes = decode_hex_arg(&hex)?;
            let txn = SignedTransaction::decode(config.wire_version, &bytes)
                .context("failed to decode signed transaction")?;
            print_json(&txn)
        }
    }
}

/// What `account new` / `account recover` print.
#[derive(Serialize)]
struct AccountSummary {
    address: AccountAddress,
    public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_key: Option<AuthenticationKey>,
    /// Only echoed for freshly generated accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    mnemonic: Option<String>,
}

impl AccountSummary {
    fn new(account: &Account, include_mnemonic: bool) -> Self {
        Self {
            address: account.address(),
            public_key: account.public_key().to_hex(),
            auth_key: account.auth_key().copied(),
            mnemonic: include_mnemonic.then(|| account.mnemonic().phrase()),
        }
    }
}

/// Builds, signs and prints a peer-to-peer payment.
fn sign_transfer(config: &ClientConfig, args: SignArgs) -> Result<()> {
    let version = config.wire_version;
    let sender = Account::recover(&args.mnemonic, config).context("invalid mnemonic")?;
    let code = decode_hex_arg(&args.script_hex).context("invalid --script-hex")?;

    let payload = payment_payload(version, code, &args.receiver, args.amount)?;

    let mut builder = RawTransactionBuilder::new(config)
        .sender(sender.address())
        .sequence_number(args.sequence)
        .payload(payload);
    if let Some(expiration) = args.expiration {
        builder = builder.expiration_time(expiration);
    }
    let raw = builder.build().context("invalid transaction")?;

    let expires_at = i64::try_from(raw.expiration_time)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
    tracing::info!(
        sender = %sender.address(),
        sequence_number = raw.sequence_number,
        amount = args.amount,
        expires_at = ?expires_at,
        "signing transfer"
    );

    let signer = TransactionSigner::new(version, config.domain_salt.clone());
    let signed = signer
        .sign_transaction(raw, sender.keypair())
        .context("failed to encode transaction")?;
    let bytes = signed.to_bytes().context("failed to assemble signed transaction")?;

    println!("{}", hex::encode(bytes));
    Ok(())
}

/// A 32-byte receiver under V2 is an authentication key; the payment then
/// carries its prefix so the ledger can create the account.
fn payment_payload(
    version: WireVersion,
    code: Vec<u8>,
    receiver: &str,
    amount: u64,
) -> Result<TransactionPayload> {
    let receiver_len = receiver.trim_start_matches("0x").len() / 2;
    let payload = if version == WireVersion::V2 && receiver_len == AUTH_KEY_LENGTH {
        let auth_key = AuthenticationKey::from_hex(receiver).context("invalid --receiver")?;
        TransactionPayload::peer_to_peer_with_auth_key(code, &auth_key, amount)?
    } else {
        let address = AccountAddress::from_hex(version, receiver).context("invalid --receiver")?;
        TransactionPayload::peer_to_peer(code, address, amount)?
    };
    Ok(payload)
}

fn decode_hex_arg(s: &str) -> Result<Vec<u8>> {
    let s = s.trim().trim_start_matches("0x");
    if s.is_empty() {
        bail!("empty hex input");
    }
    hex::decode(s).context("input is not valid hex")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
