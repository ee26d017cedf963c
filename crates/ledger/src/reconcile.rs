//! How a sync engine folds observed transactions into the ledger.
//!
//! The store never infers spentness on its own. These helpers keep the
//! spent-input and UTXO partitions in step with the transaction records
//! they are given, inside the caller's unit of work.

use utxowallet_primitives::{Hash256, OutPoint, Transaction};

use crate::error::LedgerError;
use crate::interface::LedgerTx;
use crate::records::ScriptHashHex;

/// Stores `tx` as seen by `address`.
///
/// Every non-coinbase input is recorded as spent by `tx` and its UTXO entry
/// is dropped. Outputs whose script `is_mine` accepts become UTXOs unless a
/// spend of them is already recorded.
pub fn record_transaction<T, F>(
    unit: &mut T,
    tx: &Transaction,
    height: i32,
    address: &ScriptHashHex,
    is_mine: F,
) -> Result<Hash256, LedgerError>
where
    T: LedgerTx + ?Sized,
    F: Fn(&[u8]) -> bool,
{
    let txid = tx.txid();
    unit.put_transaction(&txid, tx, height)?;
    unit.add_address_to_transaction(&txid, address)?;

    for input in tx.inputs.iter().filter(|input| !input.prevout.is_null()) {
        unit.put_spent_input(&input.prevout, &txid)?;
        unit.delete_utxo(&input.prevout)?;
    }

    for (index, output) in tx.outputs.iter().enumerate() {
        if !is_mine(&output.script_pubkey) {
            continue;
        }
        let outpoint = OutPoint::new(txid, index as u32);
        if unit.get_spent_input(&outpoint)?.is_none() {
            unit.put_utxo(&outpoint, output)?;
        }
    }
    Ok(txid)
}

/// Unlinks `address` from `tx_hash`. When no address remains the
/// transaction is evicted: its outputs leave the UTXO index, its spends are
/// forgotten, and wallet-owned outputs it consumed become spendable again.
///
/// Returns whether the transaction was evicted.
pub fn forget_transaction<T, F>(
    unit: &mut T,
    tx_hash: &Hash256,
    address: &ScriptHashHex,
    is_mine: F,
) -> Result<bool, LedgerError>
where
    T: LedgerTx + ?Sized,
    F: Fn(&[u8]) -> bool,
{
    if !unit.remove_address_from_transaction(tx_hash, address)? {
        return Ok(false);
    }

    let info = unit.get_transaction(tx_hash)?;
    unit.delete_transaction(tx_hash)?;
    let Some(tx) = info.raw_transaction else {
        return Ok(true);
    };

    for index in 0..tx.outputs.len() {
        unit.delete_utxo(&OutPoint::new(*tx_hash, index as u32))?;
    }

    for input in tx.inputs.iter().filter(|input| !input.prevout.is_null()) {
        let prevout = &input.prevout;
        if unit.get_spent_input(prevout)? != Some(*tx_hash) {
            continue;
        }
        unit.delete_spent_input(prevout)?;

        let parent = unit.get_transaction(&prevout.hash)?;
        let restored = parent
            .raw_transaction
            .as_ref()
            .and_then(|parent_tx| parent_tx.outputs.get(prevout.index as usize))
            .filter(|output| is_mine(&output.script_pubkey));
        if let Some(output) = restored {
            unit.put_utxo(prevout, output)?;
        }
    }
    Ok(true)
}
