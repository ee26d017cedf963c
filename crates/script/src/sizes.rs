//! Worst-case unlocking sizes per address type, for fee and weight estimation
//! before any signature exists.
//!
//! A low-S DER signature is 70 or 71 bytes; the model always assumes 71, plus
//! the sighash byte. Keys are compressed (33 bytes).

use utxowallet_primitives::encoding::varint_len;
use utxowallet_primitives::transaction::WITNESS_SCALE_FACTOR;

use crate::address_type::AddressType;
use crate::standard::push_data_len;

pub const MAX_DER_SIGNATURE_LEN: usize = 71;
pub const COMPRESSED_PUBKEY_LEN: usize = 33;
pub const P2WPKH_REDEEM_SCRIPT_LEN: usize = 22;

/// Outpoint plus sequence.
const INPUT_FIXED_LEN: usize = 36 + 4;

const fn max_signature_len() -> usize {
    MAX_DER_SIGNATURE_LEN + 1
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpendSize {
    pub max_sig_script_bytes: usize,
    pub has_witness: bool,
    /// Serialized witness stack including its item count; 0 without witness.
    pub max_witness_bytes: usize,
}

impl SpendSize {
    /// Non-witness bytes of one input spending this type.
    pub fn max_input_base_size(&self) -> usize {
        INPUT_FIXED_LEN + varint_len(self.max_sig_script_bytes as u64) + self.max_sig_script_bytes
    }

    pub fn max_input_weight(&self) -> usize {
        self.max_input_base_size() * WITNESS_SCALE_FACTOR + self.max_witness_bytes
    }
}

pub fn sig_script_witness_size(address_type: AddressType) -> SpendSize {
    let signature_and_key = [max_signature_len(), COMPRESSED_PUBKEY_LEN];
    match address_type {
        AddressType::P2pkh => SpendSize {
            max_sig_script_bytes: signature_and_key.iter().copied().map(push_data_len).sum(),
            has_witness: false,
            max_witness_bytes: 0,
        },
        AddressType::P2wpkhP2sh => SpendSize {
            max_sig_script_bytes: push_data_len(P2WPKH_REDEEM_SCRIPT_LEN),
            has_witness: true,
            max_witness_bytes: witness_stack_len(&signature_and_key),
        },
        AddressType::P2wpkh => SpendSize {
            max_sig_script_bytes: 0,
            has_witness: true,
            max_witness_bytes: witness_stack_len(&signature_and_key),
        },
    }
}

fn witness_stack_len(items: &[usize]) -> usize {
    items
        .iter()
        .fold(varint_len(items.len() as u64), |acc, len| {
            acc + varint_len(*len as u64) + len
        })
}

/// Transaction weight from its witness-stripped size and the bytes the
/// witness serialization adds (marker, flag and stacks). With no witness
/// bytes this is the legacy `4 * size`.
pub fn projected_weight(base_size: usize, witness_size: usize) -> usize {
    base_size * (WITNESS_SCALE_FACTOR - 1) + (base_size + witness_size)
}
