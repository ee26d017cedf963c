//! Value types stored in the ledger partitions and their JSON encodings.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utxowallet_primitives::hash::{hash256_from_hex, hash256_to_hex};
use utxowallet_primitives::hex::{hex_decode, hex_encode};
use utxowallet_primitives::{sha256, Hash256, Transaction, TxOut};
use utxowallet_storage::Column;

use crate::error::LedgerError;

/// Address identifier used by the chain indexer: `sha256(script_pubkey)` in reversed hex.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptHashHex(String);

impl ScriptHashHex {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_script(script_pubkey: &[u8]) -> Self {
        Self(hash256_to_hex(&sha256(script_pubkey)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptHashHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of an address history as reported by the indexer.
/// Heights of 0 or below mean unconfirmed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxHistoryEntry {
    #[serde(with = "hash_hex")]
    pub tx_hash: Hash256,
    pub height: i32,
}

pub type TxHistory = Vec<TxHistoryEntry>;

/// Copy of a stored wallet transaction handed to callers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TxInfo {
    pub raw_transaction: Option<Transaction>,
    pub addresses: Vec<ScriptHashHex>,
    pub height: i32,
    /// Unix seconds from the confirming header; set once verified.
    pub header_timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WalletTransactionRecord {
    #[serde(default, with = "raw_tx_hex")]
    pub raw_transaction: Option<Transaction>,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub addresses: BTreeSet<ScriptHashHex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_timestamp: Option<u64>,
}

impl WalletTransactionRecord {
    pub fn is_verified(&self) -> bool {
        self.verified == Some(true)
    }

    pub fn into_info(self) -> TxInfo {
        TxInfo {
            raw_transaction: self.raw_transaction,
            addresses: self.addresses.into_iter().collect(),
            height: self.height,
            header_timestamp: self.header_timestamp,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct OutputRecord {
    value: i64,
    script: String,
}

impl OutputRecord {
    pub fn from_tx_out(output: &TxOut) -> Self {
        Self {
            value: output.value,
            script: hex_encode(&output.script_pubkey),
        }
    }

    pub fn into_tx_out(self) -> Result<TxOut, LedgerError> {
        let script_pubkey = hex_decode(&self.script)
            .ok_or_else(|| LedgerError::corrupt(Column::Outputs, "invalid script hex"))?;
        Ok(TxOut {
            value: self.value,
            script_pubkey,
        })
    }
}

pub(crate) fn encode_json<T: Serialize>(column: Column, value: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(value).map_err(|err| LedgerError::corrupt(column, err))
}

pub(crate) fn decode_json<T: for<'de> Deserialize<'de>>(
    column: Column,
    bytes: &[u8],
) -> Result<T, LedgerError> {
    serde_json::from_slice(bytes).map_err(|err| LedgerError::corrupt(column, err))
}

mod hash_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{hash256_from_hex, hash256_to_hex, Hash256};

    pub fn serialize<S: Serializer>(hash: &Hash256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hash256_to_hex(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hash256_from_hex(&raw).ok_or_else(|| D::Error::custom(format!("invalid tx hash {raw}")))
    }
}

mod raw_tx_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{hex_decode, hex_encode, Transaction};

    pub fn serialize<S: Serializer>(
        tx: &Option<Transaction>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match tx {
            Some(tx) => serializer.serialize_some(&hex_encode(&tx.consensus_encode())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Transaction>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let bytes = hex_decode(&raw).ok_or_else(|| D::Error::custom("invalid raw transaction hex"))?;
        Transaction::consensus_decode(&bytes)
            .map(Some)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_record_json_layout() {
        let mut record = WalletTransactionRecord {
            height: 7,
            ..WalletTransactionRecord::default()
        };
        record.addresses.insert(ScriptHashHex::new("aa"));
        let json: serde_json::Value =
            serde_json::from_slice(&encode_json(Column::Transactions, &record).expect("encode"))
                .expect("json");
        assert_eq!(json["height"], 7);
        assert_eq!(json["addresses"], serde_json::json!(["aa"]));
        assert!(json["rawTransaction"].is_null());
        assert!(json.get("verified").is_none());
    }

    #[test]
    fn corrupt_output_script_is_reported() {
        let record: OutputRecord =
            decode_json(Column::Outputs, br#"{"value":1,"script":"zz"}"#).expect("json");
        assert!(matches!(
            record.into_tx_out(),
            Err(LedgerError::CorruptRecord { partition: "outputs", .. })
        ));
    }

    #[test]
    fn script_hash_is_reversed_sha256() {
        let script = [0x51u8];
        let mut expected = sha256(&script);
        expected.reverse();
        assert_eq!(
            ScriptHashHex::from_script(&script).as_str(),
            hex_encode(&expected)
        );
    }
}
