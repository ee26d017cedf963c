use std::collections::BTreeMap;

use utxowallet_primitives::{Hash256, OutPoint, TxOut};
use utxowallet_storage::{Column, KeyValueStore};

use crate::error::LedgerError;
use crate::keys::{outpoint_key, parse_outpoint_key, parse_tx_hash_key};
use crate::records::{decode_json, encode_json, OutputRecord};
use crate::unit::UnitOfWork;

impl<S: KeyValueStore> UnitOfWork<'_, S> {
    pub fn put_spent_input(
        &mut self,
        outpoint: &OutPoint,
        spending_tx_hash: &Hash256,
    ) -> Result<(), LedgerError> {
        self.put_raw(
            Column::SpentInputs,
            outpoint_key(outpoint),
            spending_tx_hash.to_vec(),
        )
    }

    pub fn get_spent_input(&self, outpoint: &OutPoint) -> Result<Option<Hash256>, LedgerError> {
        self.get_raw(Column::SpentInputs, &outpoint_key(outpoint))?
            .map(|value| {
                value.as_slice().try_into().map_err(|_| {
                    LedgerError::corrupt(
                        Column::SpentInputs,
                        format!("spending tx hash of {outpoint} has {} bytes", value.len()),
                    )
                })
            })
            .transpose()
    }

    pub fn delete_spent_input(&mut self, outpoint: &OutPoint) -> Result<(), LedgerError> {
        self.delete_raw(Column::SpentInputs, outpoint_key(outpoint))
    }

    /// Every spent-input entry as `(spent outpoint, spending tx hash)`.
    pub fn list_spent_inputs(&self) -> Result<Vec<(OutPoint, Hash256)>, LedgerError> {
        self.scan_raw(Column::SpentInputs)?
            .into_iter()
            .map(|(key, value)| {
                let outpoint = parse_outpoint_key(Column::SpentInputs, &key)?;
                let spender = parse_tx_hash_key(Column::SpentInputs, &value)
                    .map_err(|_| LedgerError::corrupt(Column::SpentInputs, "bad spending tx hash"))?;
                Ok((outpoint, spender))
            })
            .collect()
    }

    pub fn put_utxo(&mut self, outpoint: &OutPoint, output: &TxOut) -> Result<(), LedgerError> {
        let bytes = encode_json(Column::Outputs, &OutputRecord::from_tx_out(output))?;
        self.put_raw(Column::Outputs, outpoint_key(outpoint), bytes)
    }

    pub fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<TxOut>, LedgerError> {
        match self.get_raw(Column::Outputs, &outpoint_key(outpoint))? {
            Some(bytes) => decode_json::<OutputRecord>(Column::Outputs, &bytes)?
                .into_tx_out()
                .map(Some),
            None => Ok(None),
        }
    }

    pub fn list_utxos(&self) -> Result<BTreeMap<OutPoint, TxOut>, LedgerError> {
        self.scan_raw(Column::Outputs)?
            .into_iter()
            .map(|(key, value)| {
                let outpoint = parse_outpoint_key(Column::Outputs, &key)?;
                let output = decode_json::<OutputRecord>(Column::Outputs, &value)?.into_tx_out()?;
                Ok((outpoint, output))
            })
            .collect()
    }

    pub fn delete_utxo(&mut self, outpoint: &OutPoint) -> Result<(), LedgerError> {
        self.delete_raw(Column::Outputs, outpoint_key(outpoint))
    }
}
