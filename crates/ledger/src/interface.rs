//! Capability traits for engines that drive the ledger without naming a backend.

use std::collections::BTreeMap;

use utxowallet_primitives::{Hash256, OutPoint, Transaction, TxOut};
use utxowallet_storage::KeyValueStore;

use crate::error::LedgerError;
use crate::ledger::LedgerStore;
use crate::records::{ScriptHashHex, TxHistory, TxInfo};
use crate::unit::UnitOfWork;
use crate::verification::VerificationState;

pub trait LedgerTx {
    fn get_transaction(&self, tx_hash: &Hash256) -> Result<TxInfo, LedgerError>;
    fn put_transaction(
        &mut self,
        tx_hash: &Hash256,
        raw_transaction: &Transaction,
        height: i32,
    ) -> Result<(), LedgerError>;
    fn delete_transaction(&mut self, tx_hash: &Hash256) -> Result<(), LedgerError>;
    fn add_address_to_transaction(
        &mut self,
        tx_hash: &Hash256,
        address: &ScriptHashHex,
    ) -> Result<(), LedgerError>;
    fn remove_address_from_transaction(
        &mut self,
        tx_hash: &Hash256,
        address: &ScriptHashHex,
    ) -> Result<bool, LedgerError>;
    fn list_transactions(&self) -> Result<Vec<Hash256>, LedgerError>;
    fn list_unverified_transactions(&self) -> Result<Vec<Hash256>, LedgerError>;

    fn mark_verified(&mut self, tx_hash: &Hash256, header_timestamp: u64)
        -> Result<(), LedgerError>;
    fn verification_state(&self, tx_hash: &Hash256) -> Result<VerificationState, LedgerError>;

    fn put_spent_input(
        &mut self,
        outpoint: &OutPoint,
        spending_tx_hash: &Hash256,
    ) -> Result<(), LedgerError>;
    fn get_spent_input(&self, outpoint: &OutPoint) -> Result<Option<Hash256>, LedgerError>;
    fn delete_spent_input(&mut self, outpoint: &OutPoint) -> Result<(), LedgerError>;

    fn put_utxo(&mut self, outpoint: &OutPoint, output: &TxOut) -> Result<(), LedgerError>;
    fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<TxOut>, LedgerError>;
    fn list_utxos(&self) -> Result<BTreeMap<OutPoint, TxOut>, LedgerError>;
    fn delete_utxo(&mut self, outpoint: &OutPoint) -> Result<(), LedgerError>;

    fn put_address_history(
        &mut self,
        address: &ScriptHashHex,
        history: &TxHistory,
    ) -> Result<(), LedgerError>;
    fn get_address_history(&self, address: &ScriptHashHex) -> Result<TxHistory, LedgerError>;

    fn commit(&mut self) -> Result<(), LedgerError>;
    fn rollback(&mut self);
}

pub trait LedgerDb {
    type Tx<'a>: LedgerTx
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Tx<'_>, LedgerError>;
}

impl<S: KeyValueStore> LedgerDb for LedgerStore<S> {
    type Tx<'a> = UnitOfWork<'a, S> where Self: 'a;

    fn begin(&self) -> Result<Self::Tx<'_>, LedgerError> {
        LedgerStore::begin(self)
    }
}

impl<S: KeyValueStore> LedgerTx for UnitOfWork<'_, S> {
    fn get_transaction(&self, tx_hash: &Hash256) -> Result<TxInfo, LedgerError> {
        UnitOfWork::get_transaction(self, tx_hash)
    }

    fn put_transaction(
        &mut self,
        tx_hash: &Hash256,
        raw_transaction: &Transaction,
        height: i32,
    ) -> Result<(), LedgerError> {
        UnitOfWork::put_transaction(self, tx_hash, raw_transaction, height)
    }

    fn delete_transaction(&mut self, tx_hash: &Hash256) -> Result<(), LedgerError> {
        UnitOfWork::delete_transaction(self, tx_hash)
    }

    fn add_address_to_transaction(
        &mut self,
        tx_hash: &Hash256,
        address: &ScriptHashHex,
    ) -> Result<(), LedgerError> {
        UnitOfWork::add_address_to_transaction(self, tx_hash, address)
    }

    fn remove_address_from_transaction(
        &mut self,
        tx_hash: &Hash256,
        address: &ScriptHashHex,
    ) -> Result<bool, LedgerError> {
        UnitOfWork::remove_address_from_transaction(self, tx_hash, address)
    }

    fn list_transactions(&self) -> Result<Vec<Hash256>, LedgerError> {
        UnitOfWork::list_transactions(self)
    }

    fn list_unverified_transactions(&self) -> Result<Vec<Hash256>, LedgerError> {
        UnitOfWork::list_unverified_transactions(self)
    }

    fn mark_verified(
        &mut self,
        tx_hash: &Hash256,
        header_timestamp: u64,
    ) -> Result<(), LedgerError> {
        UnitOfWork::mark_verified(self, tx_hash, header_timestamp)
    }

    fn verification_state(&self, tx_hash: &Hash256) -> Result<VerificationState, LedgerError> {
        UnitOfWork::verification_state(self, tx_hash)
    }

    fn put_spent_input(
        &mut self,
        outpoint: &OutPoint,
        spending_tx_hash: &Hash256,
    ) -> Result<(), LedgerError> {
        UnitOfWork::put_spent_input(self, outpoint, spending_tx_hash)
    }

    fn get_spent_input(&self, outpoint: &OutPoint) -> Result<Option<Hash256>, LedgerError> {
        UnitOfWork::get_spent_input(self, outpoint)
    }

    fn delete_spent_input(&mut self, outpoint: &OutPoint) -> Result<(), LedgerError> {
        UnitOfWork::delete_spent_input(self, outpoint)
    }

    fn put_utxo(&mut self, outpoint: &OutPoint, output: &TxOut) -> Result<(), LedgerError> {
        UnitOfWork::put_utxo(self, outpoint, output)
    }

    fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<TxOut>, LedgerError> {
        UnitOfWork::get_utxo(self, outpoint)
    }

    fn list_utxos(&self) -> Result<BTreeMap<OutPoint, TxOut>, LedgerError> {
        UnitOfWork::list_utxos(self)
    }

    fn delete_utxo(&mut self, outpoint: &OutPoint) -> Result<(), LedgerError> {
        UnitOfWork::delete_utxo(self, outpoint)
    }

    fn put_address_history(
        &mut self,
        address: &ScriptHashHex,
        history: &TxHistory,
    ) -> Result<(), LedgerError> {
        UnitOfWork::put_address_history(self, address, history)
    }

    fn get_address_history(&self, address: &ScriptHashHex) -> Result<TxHistory, LedgerError> {
        UnitOfWork::get_address_history(self, address)
    }

    fn commit(&mut self) -> Result<(), LedgerError> {
        UnitOfWork::commit(self)
    }

    fn rollback(&mut self) {
        UnitOfWork::rollback(self)
    }
}
