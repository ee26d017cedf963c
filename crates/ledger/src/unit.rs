//! The exclusive read-write unit of work.
//!
//! Writes are staged in an overlay that reads consult first, then applied to
//! the backend as a single atomic batch on commit.

use std::collections::BTreeMap;
use std::sync::MutexGuard;

use utxowallet_log::{log_debug, log_error, log_warn};
use utxowallet_storage::{Column, KeyValueStore, WriteBatch};

use crate::error::LedgerError;
use crate::ledger::Opened;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum UnitState {
    Open,
    Committed,
    RolledBack,
}

type Overlay = BTreeMap<(Column, Vec<u8>), Option<Vec<u8>>>;

pub struct UnitOfWork<'a, S: KeyValueStore> {
    guard: Option<MutexGuard<'a, Option<Opened<S>>>>,
    pending: Overlay,
    state: UnitState,
}

impl<'a, S: KeyValueStore> UnitOfWork<'a, S> {
    pub(crate) fn new(guard: MutexGuard<'a, Option<Opened<S>>>) -> Self {
        Self {
            guard: Some(guard),
            pending: BTreeMap::new(),
            state: UnitState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == UnitState::Open
    }

    /// Number of staged writes.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    fn store(&self) -> Result<&S, LedgerError> {
        self.guard
            .as_deref()
            .and_then(Option::as_ref)
            .map(|opened| &opened.store)
            .ok_or_else(|| self.finished_error())
    }

    fn finished_error(&self) -> LedgerError {
        let detail = match self.state {
            UnitState::Committed => "unit of work already committed",
            UnitState::RolledBack => "unit of work already rolled back",
            UnitState::Open => "ledger store is closed",
        };
        LedgerError::StoreUnavailable(detail.to_string())
    }

    pub(crate) fn get_raw(&self, column: Column, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError> {
        let store = self.store()?;
        if let Some(staged) = self.pending.get(&(column, key.to_vec())) {
            return Ok(staged.clone());
        }
        Ok(store.get(column, key)?)
    }

    pub(crate) fn put_raw(
        &mut self,
        column: Column,
        key: Vec<u8>,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        self.store()?;
        self.pending.insert((column, key), Some(value));
        Ok(())
    }

    /// Stages a delete. On a finished unit this is an invariant violation:
    /// the caller believes the key is going away and it is not.
    pub(crate) fn delete_raw(&mut self, column: Column, key: Vec<u8>) -> Result<(), LedgerError> {
        if let Err(err) = self.store() {
            log_error!(
                "delete from {} on a finished unit of work: {err}",
                column.as_str()
            );
            return Err(LedgerError::Fatal(format!(
                "delete from {} could not be applied: {err}",
                column.as_str()
            )));
        }
        self.pending.insert((column, key), None);
        Ok(())
    }

    /// Every committed entry of `column` with the staged writes applied, in key order.
    pub(crate) fn scan_raw(&self, column: Column) -> Result<Vec<(Vec<u8>, Vec<u8>)>, LedgerError> {
        let store = self.store()?;
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            store.scan_prefix(column, &[])?.into_iter().collect();
        for ((_, key), staged) in self
            .pending
            .range((column, Vec::new())..)
            .take_while(|((staged_column, _), _)| *staged_column == column)
        {
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }

    /// Applies every staged write atomically and releases the store.
    pub fn commit(&mut self) -> Result<(), LedgerError> {
        let store = self.store()?;
        let mut batch = WriteBatch::new();
        for ((column, key), staged) in &self.pending {
            match staged {
                Some(value) => batch.put(*column, key.as_slice(), value.as_slice()),
                None => batch.delete(*column, key.as_slice()),
            }
        }
        let result = store.write_batch(&batch);
        self.finish(UnitState::Committed);
        match result {
            Ok(()) => {
                log_debug!("Committed ledger unit of work ({} ops)", batch.len());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Discards every staged write and releases the store. Rolling back a
    /// committed unit is logged and otherwise ignored.
    pub fn rollback(&mut self) {
        match self.state {
            UnitState::Open => {
                let discarded = self.pending.len();
                self.finish(UnitState::RolledBack);
                log_debug!("Rolled back ledger unit of work ({discarded} ops discarded)");
            }
            UnitState::Committed => {
                log_warn!("rollback of a ledger unit of work that was already committed");
            }
            UnitState::RolledBack => {}
        }
    }

    fn finish(&mut self, state: UnitState) {
        self.pending.clear();
        self.guard = None;
        self.state = state;
    }
}

impl<S: KeyValueStore> Drop for UnitOfWork<'_, S> {
    fn drop(&mut self) {
        if self.state == UnitState::Open {
            self.rollback();
        }
    }
}
