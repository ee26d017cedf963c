use std::fmt;

use utxowallet_storage::{Column, StoreError};

#[derive(Debug)]
pub enum LedgerError {
    /// The backing store could not be opened or used, or the unit of work is finished.
    StoreUnavailable(String),
    /// A stored value failed to decode.
    CorruptRecord {
        partition: &'static str,
        detail: String,
    },
    /// A stored key does not have the expected shape.
    MalformedKey {
        partition: &'static str,
        detail: String,
    },
    /// Invariant violation. The unit of work and the operation driving it must be abandoned.
    Fatal(String),
}

impl LedgerError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::Fatal(_))
    }

    pub(crate) fn corrupt(column: Column, detail: impl fmt::Display) -> Self {
        LedgerError::CorruptRecord {
            partition: column.as_str(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn malformed_key(column: Column, detail: impl fmt::Display) -> Self {
        LedgerError::MalformedKey {
            partition: column.as_str(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::StoreUnavailable(message) => write!(f, "store unavailable: {message}"),
            LedgerError::CorruptRecord { partition, detail } => {
                write!(f, "corrupt record in {partition}: {detail}")
            }
            LedgerError::MalformedKey { partition, detail } => {
                write!(f, "malformed key in {partition}: {detail}")
            }
            LedgerError::Fatal(message) => write!(f, "fatal ledger error: {message}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}
