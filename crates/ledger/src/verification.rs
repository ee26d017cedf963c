//! Unknown -> Unverified -> Verified, driven by the caller.

use utxowallet_log::log_debug;
use utxowallet_primitives::Hash256;
use utxowallet_storage::{Column, KeyValueStore};

use crate::error::LedgerError;
use crate::transactions::hash_label;
use crate::unit::UnitOfWork;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VerificationState {
    Unknown,
    Unverified,
    Verified { header_timestamp: u64 },
}

impl<S: KeyValueStore> UnitOfWork<'_, S> {
    /// Moves `tx_hash` out of the unverified index and records the header
    /// timestamp. Repeating the call overwrites the timestamp.
    pub fn mark_verified(
        &mut self,
        tx_hash: &Hash256,
        header_timestamp: u64,
    ) -> Result<(), LedgerError> {
        self.delete_raw(Column::UnverifiedTransactions, tx_hash.to_vec())?;
        let mut record = self.load_record(tx_hash)?.unwrap_or_default();
        record.verified = Some(true);
        record.header_timestamp = Some(header_timestamp);
        self.store_record(tx_hash, &record)?;
        log_debug!(
            "Verified wallet transaction {} at {header_timestamp}",
            hash_label(tx_hash)
        );
        Ok(())
    }

    pub fn verification_state(&self, tx_hash: &Hash256) -> Result<VerificationState, LedgerError> {
        let Some(record) = self.load_record(tx_hash)? else {
            return Ok(VerificationState::Unknown);
        };
        match (record.is_verified(), record.header_timestamp) {
            (true, Some(header_timestamp)) => Ok(VerificationState::Verified { header_timestamp }),
            (true, None) => Err(LedgerError::corrupt(
                Column::Transactions,
                format!("{} is verified without a header timestamp", hash_label(tx_hash)),
            )),
            (false, _) => Ok(VerificationState::Unverified),
        }
    }
}
