//! Canonical-encoded payloads embedded in ledger responses.
//!
//! ```text
//! account blob:      count ++ (bytes(path) ++ bytes(value))*
//! account resource:  bytes(authentication_key) ++ balance u64
//!                    ++ delegated_key_rotation_capability bool
//!                    ++ delegated_withdrawal_capability bool
//!                    ++ received_events_count u64 ++ bytes(received_events_key)
//!                    ++ sent_events_count u64 ++ bytes(sent_events_key)
//!                    ++ sequence_number u64
//! event data:        amount i64 ++ address (fixed)
//! ```
//!
//! The account resource is the value under the blob's first path and must be
//! consumed exactly.

use super::decode::DecodeError;
use super::types::{AccountBlob, AccountResource, EventData, RawResource};
use crate::codec::{CodecError, Decoder, Encoder, WireVersion};
use crate::transaction::encode::{read_address, write_address};

pub fn decode_account_blob(version: WireVersion, bytes: &[u8]) -> Result<AccountBlob, DecodeError> {
    let mut dec = Decoder::new(version, bytes);
    let count = dec.read_count("blob_resource_count")?;
    if count == 0 {
        return Err(DecodeError::malformed(
            "blob_resource_count",
            "account blob holds no resources",
        ));
    }
    // Each pair carries at least two prefixes.
    if count > dec.remaining() {
        return Err(CodecError::LengthOverflow {
            field: "blob_resource_count",
            value: count as u64,
        }
        .into());
    }

    let path = dec.read_bytes("blob_path")?;
    let value = dec.read_bytes("blob_value")?;
    let account = decode_account_resource(version, &value)?;

    let mut other_resources = Vec::with_capacity(count - 1);
    for _ in 1..count {
        let path = dec.read_bytes("blob_path")?;
        let value = dec.read_bytes("blob_value")?;
        other_resources.push(RawResource { path, value });
    }
    dec.finish("blob_value")?;

    Ok(AccountBlob {
        path,
        account,
        other_resources,
    })
}

pub fn decode_account_resource(
    version: WireVersion,
    bytes: &[u8],
) -> Result<AccountResource, CodecError> {
    let mut dec = Decoder::new(version, bytes);
    let resource = AccountResource {
        authentication_key: dec.read_bytes("authentication_key")?,
        balance: dec.read_u64("balance")?,
        delegated_key_rotation_capability: dec.read_bool("delegated_key_rotation_capability")?,
        delegated_withdrawal_capability: dec.read_bool("delegated_withdrawal_capability")?,
        received_events_count: dec.read_u64("received_events_count")?,
        received_events_key: dec.read_bytes("received_events_key")?,
        sent_events_count: dec.read_u64("sent_events_count")?,
        sent_events_key: dec.read_bytes("sent_events_key")?,
        sequence_number: dec.read_u64("sequence_number")?,
    };
    dec.finish("sequence_number")?;
    Ok(resource)
}

/// Payment event payload. `event_type` is left unset.
pub fn decode_event_data(version: WireVersion, bytes: &[u8]) -> Result<EventData, CodecError> {
    let mut dec = Decoder::new(version, bytes);
    let amount = dec.read_i64("event_amount")?;
    let address = read_address(&mut dec, "event_address")?;
    dec.finish("event_address")?;
    Ok(EventData {
        amount,
        address,
        event_type: None,
    })
}

impl AccountResource {
    pub fn encode(&self, version: WireVersion) -> Result<Vec<u8>, CodecError> {
        let mut enc = Encoder::new(version);
        enc.bytes(&self.authentication_key)
            .u64(self.balance)
            .bool(self.delegated_key_rotation_capability)
            .bool(self.delegated_withdrawal_capability)
            .u64(self.received_events_count)
            .bytes(&self.received_events_key)
            .u64(self.sent_events_count)
            .bytes(&self.sent_events_key)
            .u64(self.sequence_number);
        enc.finish()
    }
}

impl AccountBlob {
    /// Re-encodes the resource map, account resource first.
    pub fn encode(&self, version: WireVersion) -> Result<Vec<u8>, CodecError> {
        let account = self.account.encode(version)?;
        let mut enc = Encoder::new(version);
        enc.length(1 + self.other_resources.len(), "blob_resource_count")
            .bytes(&self.path)
            .bytes(&account);
        for resource in &self.other_resources {
            enc.bytes(&resource.path).bytes(&resource.value);
        }
        enc.finish()
    }
}

impl EventData {
    pub fn encode(&self, version: WireVersion) -> Result<Vec<u8>, CodecError> {
        let mut enc = Encoder::new(version);
        enc.i64(self.amount);
        write_address(&mut enc, &self.address, "event_address")?;
        enc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountAddress;
    use crate::config::ACCOUNT_RESOURCE_PATH;

    fn resource() -> AccountResource {
        AccountResource {
            authentication_key: vec![0x5a; 32],
            balance: 100_000_000,
            delegated_key_rotation_capability: false,
            delegated_withdrawal_capability: true,
            received_events_count: 3,
            received_events_key: vec![0x01; 32],
            sent_events_count: 2,
            sent_events_key: vec![0x02; 32],
            sequence_number: 2,
        }
    }

    fn blob() -> AccountBlob {
        AccountBlob {
            path: ACCOUNT_RESOURCE_PATH.to_vec(),
            account: resource(),
            other_resources: vec![RawResource {
                path: vec![0x01, 0xff],
                value: vec![9, 9, 9],
            }],
        }
    }

    #[test]
    fn v1_resource_layout() {
        let bytes = resource().encode(WireVersion::V1).unwrap();
        assert_eq!(&bytes[..4], &32u32.to_le_bytes());
        assert_eq!(&bytes[36..44], &100_000_000u64.to_le_bytes());
        assert_eq!(&bytes[44..46], &[0, 1]);
        assert_eq!(&bytes[bytes.len() - 8..], &2u64.to_le_bytes());
    }

    #[test]
    fn blob_decodes_account_and_keeps_other_resources() {
        for version in [WireVersion::V1, WireVersion::V2] {
            let bytes = blob().encode(version).unwrap();
            let decoded = decode_account_blob(version, &bytes).unwrap();
            assert_eq!(decoded, blob());
            assert_eq!(decoded.other_resources.len(), 1);
        }
    }

    #[test]
    fn blob_truncation_is_rejected() {
        let bytes = blob().encode(WireVersion::V2).unwrap();
        for cut in 0..bytes.len() {
            assert!(decode_account_blob(WireVersion::V2, &bytes[..cut]).is_err());
        }
    }

    #[test]
    fn account_resource_must_be_consumed_exactly() {
        let mut value = resource().encode(WireVersion::V2).unwrap();
        value.push(0);
        assert!(matches!(
            decode_account_resource(WireVersion::V2, &value),
            Err(CodecError::TrailingBytes {
                field: "sequence_number",
                count: 1
            })
        ));
    }

    #[test]
    fn empty_blob_is_malformed() {
        let err = decode_account_blob(WireVersion::V2, &[0x00]).unwrap_err();
        assert_eq!(err.field(), "blob_resource_count");
    }

    #[test]
    fn capability_flag_must_be_boolean() {
        let mut value = resource().encode(WireVersion::V2).unwrap();
        // 1-byte prefix + 32-byte key + 8-byte balance.
        value[41] = 2;
        assert!(matches!(
            decode_account_resource(WireVersion::V2, &value),
            Err(CodecError::InvalidBool { byte: 2, .. })
        ));
    }

    #[test]
    fn event_data_uses_fixed_address() {
        let data = EventData {
            amount: -5,
            address: AccountAddress::from_hex(WireVersion::V1, &"cd".repeat(32)).unwrap(),
            event_type: None,
        };
        let bytes = data.encode(WireVersion::V1).unwrap();
        assert_eq!(bytes.len(), 8 + 32);
        assert_eq!(decode_event_data(WireVersion::V1, &bytes).unwrap(), data);
        assert!(decode_event_data(WireVersion::V2, &bytes).is_err());
    }
}
