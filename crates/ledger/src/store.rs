//! Backend selection, configuration, and the data directory lock.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;
use utxowallet_storage::fjall::{FjallOptions, FjallStore};
use utxowallet_storage::memory::MemoryStore;
use utxowallet_storage::{Column, KeyValueStore, ScanResult, StoreError, WriteBatch};

use crate::error::LedgerError;

pub const DB_DIR_NAME: &str = "db";
pub const LOCK_FILE_NAME: &str = ".lock";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backend {
    Memory,
    Fjall,
}

impl Backend {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "memory" => Some(Self::Memory),
            "fjall" => Some(Self::Fjall),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Fjall => "fjall",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LedgerOptions {
    pub backend: Backend,
    pub cache_bytes: Option<u64>,
    pub write_buffer_bytes: Option<u64>,
    pub journal_bytes: Option<u64>,
    pub memtable_bytes: Option<u32>,
    pub fsync_ms: Option<u16>,
    pub sync_commits: bool,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            backend: Backend::Fjall,
            cache_bytes: None,
            write_buffer_bytes: None,
            journal_bytes: None,
            memtable_bytes: None,
            fsync_ms: None,
            sync_commits: true,
        }
    }
}

impl LedgerOptions {
    fn fjall_options(&self) -> FjallOptions {
        FjallOptions {
            cache_bytes: self.cache_bytes,
            write_buffer_bytes: self.write_buffer_bytes,
            journal_bytes: self.journal_bytes,
            memtable_bytes: self.memtable_bytes,
            fsync_ms: self.fsync_ms,
            sync_commits: self.sync_commits,
        }
    }
}

pub enum Store {
    Memory(MemoryStore),
    Fjall(FjallStore),
}

/// Opens the backend selected by `options` under `dir`. The fjall keyspace
/// lives in `dir/db`; the caller holds the directory lock.
pub(crate) fn open_store(dir: &Path, options: &LedgerOptions) -> Result<Store, LedgerError> {
    match options.backend {
        Backend::Memory => Ok(Store::Memory(MemoryStore::new())),
        Backend::Fjall => {
            let db_path = dir.join(DB_DIR_NAME);
            let store = FjallStore::open_with_options(&db_path, options.fjall_options())
                .map_err(|err| {
                    LedgerError::StoreUnavailable(format!(
                        "failed to open {}: {err}",
                        db_path.display()
                    ))
                })?;
            Ok(Store::Fjall(store))
        }
    }
}

impl KeyValueStore for Store {
    fn get(&self, column: Column, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self {
            Store::Memory(store) => store.get(column, key),
            Store::Fjall(store) => store.get(column, key),
        }
    }

    fn put(&self, column: Column, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        match self {
            Store::Memory(store) => store.put(column, key, value),
            Store::Fjall(store) => store.put(column, key, value),
        }
    }

    fn delete(&self, column: Column, key: &[u8]) -> Result<(), StoreError> {
        match self {
            Store::Memory(store) => store.delete(column, key),
            Store::Fjall(store) => store.delete(column, key),
        }
    }

    fn scan_prefix(&self, column: Column, prefix: &[u8]) -> Result<ScanResult, StoreError> {
        match self {
            Store::Memory(store) => store.scan_prefix(column, prefix),
            Store::Fjall(store) => store.scan_prefix(column, prefix),
        }
    }

    fn write_batch(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        match self {
            Store::Memory(store) => store.write_batch(batch),
            Store::Fjall(store) => store.write_batch(batch),
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        match self {
            Store::Memory(store) => store.flush(),
            Store::Fjall(store) => store.flush(),
        }
    }
}

/// Exclusive advisory lock on a ledger directory, released on drop.
pub struct DataDirLock {
    _file: File,
}

pub fn lock_data_dir(dir: &Path) -> Result<DataDirLock, LedgerError> {
    fs::create_dir_all(dir).map_err(|err| {
        LedgerError::StoreUnavailable(format!("failed to create {}: {err}", dir.display()))
    })?;
    let lock_path = dir.join(LOCK_FILE_NAME);
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|err| {
            LedgerError::StoreUnavailable(format!(
                "failed to open lock file {}: {err}",
                lock_path.display()
            ))
        })?;

    match file.try_lock_exclusive() {
        Ok(()) => {
            let pid = std::process::id();
            let _ = file.set_len(0);
            let _ = file.seek(SeekFrom::Start(0));
            let _ = writeln!(file, "pid={pid}");
            let _ = file.flush();
            Ok(DataDirLock { _file: file })
        }
        Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
            let mut holder = String::new();
            let _ =
                File::open(&lock_path).and_then(|mut reader| reader.read_to_string(&mut holder));
            let holder = holder.trim();
            let suffix = if holder.is_empty() {
                String::new()
            } else {
                format!(" ({holder})")
            };
            Err(LedgerError::StoreUnavailable(format!(
                "ledger dir {} is already locked by another instance; lock file {}{suffix}",
                dir.display(),
                lock_path.display()
            )))
        }
        Err(err) => Err(LedgerError::StoreUnavailable(format!(
            "failed to lock ledger dir {} (lock file {}): {err}",
            dir.display(),
            lock_path.display()
        ))),
    }
}
