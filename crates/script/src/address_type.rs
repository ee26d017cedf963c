//! Single-signature address types the wallet can receive on and spend from.

use std::fmt;

use secp256k1::ecdsa::Signature;
use secp256k1::PublicKey;
use utxowallet_primitives::hash160;

use crate::standard::{p2pkh_script, p2sh_script, p2wpkh_script, push_data, ScriptType};

pub const SIGHASH_ALL: u8 = 0x01;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AddressType {
    /// Legacy pay-to-public-key-hash.
    P2pkh,
    /// Pay-to-witness-public-key-hash nested in pay-to-script-hash.
    P2wpkhP2sh,
    /// Native pay-to-witness-public-key-hash.
    P2wpkh,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsupportedAddressType(pub String);

impl fmt::Display for UnsupportedAddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported address type {}", self.0)
    }
}

impl std::error::Error for UnsupportedAddressType {}

/// Unlocking data for one input: the signature script and the witness stack.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpendData {
    pub script_sig: Vec<u8>,
    pub witness: Vec<Vec<u8>>,
}

impl AddressType {
    pub const ALL: [AddressType; 3] = [
        AddressType::P2pkh,
        AddressType::P2wpkhP2sh,
        AddressType::P2wpkh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2wpkhP2sh => "p2wpkh-p2sh",
            AddressType::P2wpkh => "p2wpkh",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, UnsupportedAddressType> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "p2pkh" => Ok(AddressType::P2pkh),
            "p2wpkh-p2sh" => Ok(AddressType::P2wpkhP2sh),
            "p2wpkh" => Ok(AddressType::P2wpkh),
            _ => Err(UnsupportedAddressType(raw.to_string())),
        }
    }

    pub fn is_segwit(self) -> bool {
        !matches!(self, AddressType::P2pkh)
    }

    /// `OP_0 <hash160(pubkey)>`, the script committed to by the P2SH wrapper.
    pub fn redeem_script(self, pubkey: &PublicKey) -> Option<Vec<u8>> {
        match self {
            AddressType::P2wpkhP2sh => Some(p2wpkh_script(&hash160(&pubkey.serialize()))),
            AddressType::P2pkh | AddressType::P2wpkh => None,
        }
    }

    pub fn output_script(self, pubkey: &PublicKey) -> Vec<u8> {
        let pubkey_hash = hash160(&pubkey.serialize());
        match self {
            AddressType::P2pkh => p2pkh_script(&pubkey_hash),
            AddressType::P2wpkhP2sh => p2sh_script(&hash160(&p2wpkh_script(&pubkey_hash))),
            AddressType::P2wpkh => p2wpkh_script(&pubkey_hash),
        }
    }

    /// Builds the unlocking data for a SIGHASH_ALL signature by `pubkey`.
    pub fn spend_data(self, signature: &Signature, pubkey: &PublicKey) -> SpendData {
        let mut sig = signature.serialize_der().to_vec();
        sig.push(SIGHASH_ALL);
        let pubkey = pubkey.serialize();

        match self {
            AddressType::P2pkh => {
                let mut script_sig = Vec::with_capacity(sig.len() + pubkey.len() + 2);
                push_data(&mut script_sig, &sig);
                push_data(&mut script_sig, &pubkey);
                SpendData {
                    script_sig,
                    witness: Vec::new(),
                }
            }
            AddressType::P2wpkhP2sh => {
                let redeem_script = p2wpkh_script(&hash160(&pubkey));
                let mut script_sig = Vec::with_capacity(redeem_script.len() + 1);
                push_data(&mut script_sig, &redeem_script);
                SpendData {
                    script_sig,
                    witness: vec![sig, pubkey.to_vec()],
                }
            }
            AddressType::P2wpkh => SpendData {
                script_sig: Vec::new(),
                witness: vec![sig, pubkey.to_vec()],
            },
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a classified output script to the address type that produced it.
/// P2SH outputs are taken to be the wallet's wrapped-segwit addresses.
impl TryFrom<ScriptType> for AddressType {
    type Error = UnsupportedAddressType;

    fn try_from(script_type: ScriptType) -> Result<Self, Self::Error> {
        match script_type {
            ScriptType::P2Pkh => Ok(AddressType::P2pkh),
            ScriptType::P2Sh => Ok(AddressType::P2wpkhP2sh),
            ScriptType::P2Wpkh => Ok(AddressType::P2wpkh),
            other => Err(UnsupportedAddressType(format!("{other:?}"))),
        }
    }
}
