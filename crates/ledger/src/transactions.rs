use utxowallet_log::log_debug;
use utxowallet_primitives::{Hash256, Transaction};
use utxowallet_storage::{Column, KeyValueStore};

use crate::error::LedgerError;
use crate::keys::parse_tx_hash_key;
use crate::records::{decode_json, encode_json, ScriptHashHex, TxInfo, WalletTransactionRecord};
use crate::unit::UnitOfWork;

impl<S: KeyValueStore> UnitOfWork<'_, S> {
    pub(crate) fn load_record(
        &self,
        tx_hash: &Hash256,
    ) -> Result<Option<WalletTransactionRecord>, LedgerError> {
        match self.get_raw(Column::Transactions, tx_hash)? {
            Some(bytes) => decode_json(Column::Transactions, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn store_record(
        &mut self,
        tx_hash: &Hash256,
        record: &WalletTransactionRecord,
    ) -> Result<(), LedgerError> {
        let bytes = encode_json(Column::Transactions, record)?;
        self.put_raw(Column::Transactions, tx_hash.to_vec(), bytes)
    }

    /// Read-modify-write of one transaction record. A new record is added to
    /// the unverified index.
    fn modify_record<F>(&mut self, tx_hash: &Hash256, modify: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut WalletTransactionRecord),
    {
        let mut record = self.load_record(tx_hash)?.unwrap_or_default();
        modify(&mut record);
        if !record.is_verified() {
            self.put_raw(Column::UnverifiedTransactions, tx_hash.to_vec(), Vec::new())?;
        }
        self.store_record(tx_hash, &record)
    }

    /// Returns the stored transaction, or an empty [`TxInfo`] when unknown.
    pub fn get_transaction(&self, tx_hash: &Hash256) -> Result<TxInfo, LedgerError> {
        Ok(self
            .load_record(tx_hash)?
            .map(WalletTransactionRecord::into_info)
            .unwrap_or_default())
    }

    /// Stores the raw transaction and height, keeping the linked addresses
    /// and verification state of an existing record.
    pub fn put_transaction(
        &mut self,
        tx_hash: &Hash256,
        raw_transaction: &Transaction,
        height: i32,
    ) -> Result<(), LedgerError> {
        self.modify_record(tx_hash, |record| {
            record.raw_transaction = Some(raw_transaction.clone());
            record.height = height;
        })
    }

    pub fn delete_transaction(&mut self, tx_hash: &Hash256) -> Result<(), LedgerError> {
        self.delete_raw(Column::Transactions, tx_hash.to_vec())?;
        self.delete_raw(Column::UnverifiedTransactions, tx_hash.to_vec())?;
        log_debug!("Deleted wallet transaction {}", hash_label(tx_hash));
        Ok(())
    }

    pub fn add_address_to_transaction(
        &mut self,
        tx_hash: &Hash256,
        address: &ScriptHashHex,
    ) -> Result<(), LedgerError> {
        self.modify_record(tx_hash, |record| {
            record.addresses.insert(address.clone());
        })
    }

    /// Unlinks `address` and reports whether no address remains.
    pub fn remove_address_from_transaction(
        &mut self,
        tx_hash: &Hash256,
        address: &ScriptHashHex,
    ) -> Result<bool, LedgerError> {
        let Some(mut record) = self.load_record(tx_hash)? else {
            return Ok(true);
        };
        if record.addresses.remove(address) {
            self.store_record(tx_hash, &record)?;
        }
        Ok(record.addresses.is_empty())
    }

    pub fn list_transactions(&self) -> Result<Vec<Hash256>, LedgerError> {
        self.list_hash_keys(Column::Transactions)
    }

    pub fn list_unverified_transactions(&self) -> Result<Vec<Hash256>, LedgerError> {
        self.list_hash_keys(Column::UnverifiedTransactions)
    }

    fn list_hash_keys(&self, column: Column) -> Result<Vec<Hash256>, LedgerError> {
        self.scan_raw(column)?
            .into_iter()
            .map(|(key, _)| parse_tx_hash_key(column, &key))
            .collect()
    }
}

pub(crate) fn hash_label(tx_hash: &Hash256) -> String {
    utxowallet_primitives::hash::hash256_to_hex(tx_hash)
}
