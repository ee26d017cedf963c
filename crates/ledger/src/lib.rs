//! Wallet ledger: transaction records, verification state, spent inputs,
//! the UTXO set, and cached address histories behind one exclusive unit of work.

pub mod error;
pub mod interface;
pub mod keys;
pub mod reconcile;
pub mod records;
pub mod store;
pub mod verification;

mod history;
mod ledger;
mod transactions;
mod unit;
mod utxo;

pub use error::LedgerError;
pub use interface::{LedgerDb, LedgerTx};
pub use ledger::LedgerStore;
pub use records::{ScriptHashHex, TxHistory, TxHistoryEntry, TxInfo};
pub use store::{Backend, LedgerOptions, Store};
pub use unit::UnitOfWork;
pub use verification::VerificationState;
