//! Transaction types, hashing and consensus serialization.

pub mod encoding;
pub mod hash;
pub mod hex;
pub mod outpoint;
pub mod transaction;

pub use hash::{hash160, sha256, sha256d, Hash256};
pub use outpoint::{OutPoint, OutPointParseError};
pub use transaction::{Transaction, TransactionDecodeError, TxIn, TxOut};
