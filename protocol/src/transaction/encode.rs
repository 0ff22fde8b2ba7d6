//! Canonical byte layout of a raw transaction.
//!
//! ```text
//! [V2: ULEB128(0)]                  format discriminant
//! sender                            fixed width, no prefix
//! sequence_number                   u64
//! payload                           tag ++ body (see below)
//! max_gas_amount                    u64
//! gas_unit_price                    u64
//! [V1: 24-byte constant trailer]
//! expiration_time                   u64
//!
//! Script body:  bytes(code) ++ count(args) ++ (tag ++ value)*
//! Module body:  count(modules) ++ bytes(module)*
//! ```
//!
//! Argument values: U64 as u64, Address as fixed bytes, String as prefixed
//! UTF-8, ByteArray as prefixed bytes. "bytes", "count" and "tag" use the
//! version's prefix scheme.

use super::types::{RawTransaction, TransactionArgument, TransactionPayload};
use crate::account::AccountAddress;
use crate::codec::{CodecError, Decoder, Encoder, WireVersion};
use crate::config::V2_RAW_TXN_PREFIX;

impl RawTransaction {
    /// The exact bytes that get hashed and signed.
    pub fn encode(&self, version: WireVersion) -> Result<Vec<u8>, CodecError> {
        let mut enc = Encoder::new(version);
        self.encode_into(&mut enc)?;
        enc.finish()
    }

    pub(crate) fn encode_into(&self, enc: &mut Encoder) -> Result<(), CodecError> {
        let version = enc.version();
        if version.has_raw_txn_prefix() {
            enc.uleb128(V2_RAW_TXN_PREFIX);
        }
        write_address(enc, &self.sender, "sender")?;
        enc.u64(self.sequence_number);
        encode_payload(enc, &self.payload)?;
        enc.u64(self.max_gas_amount).u64(self.gas_unit_price);
        if let Some(trailer) = version.gas_trailer() {
            enc.fixed(trailer);
        }
        enc.u64(self.expiration_time);
        Ok(())
    }

    /// Parses a complete raw transaction. Trailing bytes are an error.
    pub fn decode(version: WireVersion, bytes: &[u8]) -> Result<Self, CodecError> {
        let mut dec = Decoder::new(version, bytes);
        let txn = Self::decode_from(&mut dec)?;
        dec.finish("expiration_time")?;
        Ok(txn)
    }

    /// Reads one raw transaction from the front of `dec`.
    pub(crate) fn decode_from(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let version = dec.version();
        if version.has_raw_txn_prefix() {
            let prefix = dec.read_uleb128("raw_txn_prefix")?;
            if prefix != V2_RAW_TXN_PREFIX {
                return Err(CodecError::UnknownTag {
                    field: "raw_txn_prefix",
                    tag: prefix,
                });
            }
        }
        let sender = read_address(dec, "sender")?;
        let sequence_number = dec.read_u64("sequence_number")?;
        let payload = decode_payload(dec)?;
        let max_gas_amount = dec.read_u64("max_gas_amount")?;
        let gas_unit_price = dec.read_u64("gas_unit_price")?;
        if let Some(trailer) = version.gas_trailer() {
            if dec.read_fixed(trailer.len(), "gas_trailer")? != trailer {
                return Err(CodecError::TrailerMismatch);
            }
        }
        let expiration_time = dec.read_u64("expiration_time")?;

        Ok(Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_time,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn write_address(
    enc: &mut Encoder,
    address: &AccountAddress,
    field: &'static str,
) -> Result<(), CodecError> {
    let expected = enc.version().address_len();
    if address.len() != expected {
        return Err(CodecError::AddressWidth {
            field,
            expected,
            got: address.len(),
        });
    }
    enc.fixed(address.as_bytes());
    Ok(())
}

pub(crate) fn read_address(
    dec: &mut Decoder<'_>,
    field: &'static str,
) -> Result<AccountAddress, CodecError> {
    let version = dec.version();
    let expected = version.address_len();
    let bytes = dec.read_fixed(expected, field)?;
    AccountAddress::from_bytes(version, bytes).map_err(|_| CodecError::AddressWidth {
        field,
        expected,
        got: bytes.len(),
    })
}

fn encode_payload(enc: &mut Encoder, payload: &TransactionPayload) -> Result<(), CodecError> {
    enc.tag(payload.tag());
    match payload {
        TransactionPayload::Script { code, args } => {
            enc.bytes(code).length(args.len(), "args");
            for arg in args {
                enc.tag(arg.tag());
                match arg {
                    TransactionArgument::U64(v) => {
                        enc.u64(*v);
                    }
                    TransactionArgument::Address(a) => write_address(enc, a, "arg_address")?,
                    TransactionArgument::String(s) => {
                        enc.bytes(s.as_bytes());
                    }
                    TransactionArgument::ByteArray(b) => {
                        enc.bytes(b);
                    }
                }
            }
        }
        TransactionPayload::Module(modules) => {
            enc.length(modules.len(), "modules");
            for module in modules {
                enc.bytes(module);
            }
        }
    }
    Ok(())
}

fn decode_payload(dec: &mut Decoder<'_>) -> Result<TransactionPayload, CodecError> {
    match dec.read_tag("payload_kind")? {
        TransactionPayload::SCRIPT_TAG => {
            let code = dec.read_bytes("script_code")?;
            let count = dec.read_count("args")?;
            // Every argument is at least a tag byte, so a count above the
            // remaining length cannot be honest.
            if count > dec.remaining() {
                return Err(CodecError::LengthOverflow {
                    field: "args",
                    value: count as u64,
                });
            }
            let mut args = Vec::with_capacity(count);
            for _ in 0..count {
                args.push(decode_argument(dec)?);
            }
            Ok(TransactionPayload::Script { code, args })
        }
        TransactionPayload::MODULE_TAG => {
            let count = dec.read_count("modules")?;
            if count > dec.remaining() {
                return Err(CodecError::LengthOverflow {
                    field: "modules",
                    value: count as u64,
                });
            }
            let mut modules = Vec::with_capacity(count);
            for _ in 0..count {
                modules.push(dec.read_bytes("module")?);
            }
            Ok(TransactionPayload::Module(modules))
        }
        tag => Err(CodecError::UnknownTag {
            field: "payload_kind",
            tag: u64::from(tag),
        }),
    }
}

fn decode_argument(dec: &mut Decoder<'_>) -> Result<TransactionArgument, CodecError> {
    match dec.read_tag("arg_kind")? {
        TransactionArgument::U64_TAG => Ok(TransactionArgument::U64(dec.read_u64("arg_u64")?)),
        TransactionArgument::ADDRESS_TAG => {
            Ok(TransactionArgument::Address(read_address(dec, "arg_address")?))
        }
        TransactionArgument::STRING_TAG => {
            Ok(TransactionArgument::String(dec.read_string("arg_string")?))
        }
        TransactionArgument::BYTE_ARRAY_TAG => {
            Ok(TransactionArgument::ByteArray(dec.read_bytes("arg_byte_array")?))
        }
        tag => Err(CodecError::UnknownTag {
            field: "arg_kind",
            tag: u64::from(tag),
        }),
    }
}
