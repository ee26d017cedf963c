use ripemd::{Digest as RipemdDigest, Ripemd160};
use sha2::Sha256;

use crate::hex::{hex_decode, hex_encode};

/// 32-byte hash in internal (little-endian) byte order.
pub type Hash256 = [u8; 32];

pub fn sha256(data: &[u8]) -> Hash256 {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256(data);
    let digest = Ripemd160::digest(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// Display form used by explorers and indexers: byte-reversed hex.
pub fn hash256_to_hex(hash: &Hash256) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex_encode(&reversed)
}

pub fn hash256_from_hex(value: &str) -> Option<Hash256> {
    let bytes = hex_decode(value)?;
    let mut out: Hash256 = bytes.try_into().ok()?;
    out.reverse();
    Some(out)
}
