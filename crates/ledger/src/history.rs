use utxowallet_storage::{Column, KeyValueStore};

use crate::error::LedgerError;
use crate::records::{decode_json, encode_json, ScriptHashHex, TxHistory};
use crate::unit::UnitOfWork;

impl<S: KeyValueStore> UnitOfWork<'_, S> {
    /// Replaces the cached history of `address`.
    pub fn put_address_history(
        &mut self,
        address: &ScriptHashHex,
        history: &TxHistory,
    ) -> Result<(), LedgerError> {
        let bytes = encode_json(Column::AddressHistories, history)?;
        self.put_raw(
            Column::AddressHistories,
            address.as_str().as_bytes().to_vec(),
            bytes,
        )
    }

    /// Cached history of `address`; empty when nothing was stored.
    pub fn get_address_history(&self, address: &ScriptHashHex) -> Result<TxHistory, LedgerError> {
        match self.get_raw(Column::AddressHistories, address.as_str().as_bytes())? {
            Some(bytes) => decode_json(Column::AddressHistories, &bytes),
            None => Ok(TxHistory::new()),
        }
    }
}
