use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use utxowallet_log::{log_info, log_warn};
use utxowallet_storage::memory::MemoryStore;
use utxowallet_storage::KeyValueStore;

use crate::error::LedgerError;
use crate::store::{lock_data_dir, open_store, Backend, DataDirLock, LedgerOptions, Store};
use crate::unit::UnitOfWork;

pub(crate) struct Opened<S> {
    pub(crate) store: S,
    _dir_lock: Option<DataDirLock>,
}

/// Wallet ledger over a key/value backend.
///
/// At most one [`UnitOfWork`] is open at a time; `begin` blocks while
/// another unit is in flight.
pub struct LedgerStore<S = Store> {
    state: Mutex<Option<Opened<S>>>,
}

impl LedgerStore<Store> {
    /// Opens or creates the ledger under `dir`.
    pub fn open(dir: impl AsRef<Path>, options: LedgerOptions) -> Result<Self, LedgerError> {
        let dir = dir.as_ref();
        let dir_lock = match options.backend {
            Backend::Memory => None,
            Backend::Fjall => Some(lock_data_dir(dir)?),
        };
        let store = open_store(dir, &options)?;
        log_info!(
            "Opened wallet ledger at {} (backend {})",
            dir.display(),
            options.backend.as_str()
        );
        Ok(Self {
            state: Mutex::new(Some(Opened {
                store,
                _dir_lock: dir_lock,
            })),
        })
    }

    pub fn in_memory() -> Self {
        Self::with_store(Store::Memory(MemoryStore::new()))
    }
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            state: Mutex::new(Some(Opened {
                store,
                _dir_lock: None,
            })),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<Opened<S>>> {
        // A panic inside a unit of work never reached the store, so the
        // committed state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the exclusive unit of work, waiting for any open one to finish.
    pub fn begin(&self) -> Result<UnitOfWork<'_, S>, LedgerError> {
        let guard = self.lock_state();
        if guard.is_none() {
            return Err(LedgerError::StoreUnavailable(
                "ledger store is closed".to_string(),
            ));
        }
        Ok(UnitOfWork::new(guard))
    }

    /// Runs `f` in a fresh unit of work, committing on `Ok` and rolling back on `Err`.
    pub fn update<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut UnitOfWork<'_, S>) -> Result<T, LedgerError>,
    {
        let mut unit = self.begin()?;
        match f(&mut unit) {
            Ok(value) => {
                unit.commit()?;
                Ok(value)
            }
            Err(err) => {
                unit.rollback();
                Err(err)
            }
        }
    }

    /// Flushes and releases the backend. Waits for an open unit of work to
    /// finish first; later `begin` calls fail with `StoreUnavailable`.
    pub fn close(&self) -> Result<(), LedgerError> {
        let mut guard = self.lock_state();
        let Some(opened) = guard.take() else {
            return Ok(());
        };
        if let Err(err) = opened.store.flush() {
            log_warn!("Failed to flush wallet ledger on close: {err}");
            return Err(err.into());
        }
        log_info!("Closed wallet ledger");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.lock_state().is_none()
    }
}
