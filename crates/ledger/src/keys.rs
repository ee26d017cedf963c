//! On-disk key encodings.
//!
//! Transaction hashes are stored as their 32 raw bytes. Outpoints use the
//! text form `<txid hex>:<index>`.

use utxowallet_primitives::{Hash256, OutPoint};
use utxowallet_storage::Column;

use crate::error::LedgerError;

pub fn outpoint_key(outpoint: &OutPoint) -> Vec<u8> {
    outpoint.to_string().into_bytes()
}

pub fn parse_outpoint_key(column: Column, key: &[u8]) -> Result<OutPoint, LedgerError> {
    let text =
        std::str::from_utf8(key).map_err(|err| LedgerError::malformed_key(column, err))?;
    text.parse::<OutPoint>()
        .map_err(|err| LedgerError::malformed_key(column, err))
}

pub fn parse_tx_hash_key(column: Column, key: &[u8]) -> Result<Hash256, LedgerError> {
    key.try_into().map_err(|_| {
        LedgerError::malformed_key(column, format!("expected 32-byte tx hash, got {}", key.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outpoint_key_roundtrip() {
        let outpoint = OutPoint::new([0x3c; 32], 12);
        let key = outpoint_key(&outpoint);
        assert_eq!(
            parse_outpoint_key(Column::Outputs, &key).expect("parse"),
            outpoint
        );
    }

    #[test]
    fn outpoint_key_without_separator_is_malformed() {
        let err = parse_outpoint_key(Column::Outputs, b"abcdef").expect_err("malformed");
        assert!(matches!(err, LedgerError::MalformedKey { partition: "outputs", .. }));
    }

    #[test]
    fn tx_hash_key_requires_32_bytes() {
        assert!(parse_tx_hash_key(Column::Transactions, &[0u8; 31]).is_err());
        assert_eq!(
            parse_tx_hash_key(Column::Transactions, &[7u8; 32]).expect("parse"),
            [7u8; 32]
        );
    }
}
