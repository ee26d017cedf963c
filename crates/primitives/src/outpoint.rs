//! Transaction outpoint type.

use std::fmt;
use std::str::FromStr;

use crate::encoding::{Decodable, DecodeError, Decoder, Encodable, Encoder};
use crate::hash::{hash256_from_hex, hash256_to_hex, Hash256};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct OutPoint {
    pub hash: Hash256,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash256, index: u32) -> Self {
        Self { hash, index }
    }

    pub fn null() -> Self {
        Self {
            hash: [0u8; 32],
            index: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.hash == [0u8; 32] && self.index == u32::MAX
    }
}

impl Encodable for OutPoint {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_hash_le(&self.hash);
        encoder.write_u32_le(self.index);
    }
}

impl Decodable for OutPoint {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let hash = decoder.read_hash_le()?;
        let index = decoder.read_u32_le()?;
        Ok(Self { hash, index })
    }
}

/// `<txid hex>:<index>`, txid in display (reversed) byte order.
impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hash256_to_hex(&self.hash), self.index)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutPointParseError {
    WrongShape(String),
    InvalidHash(String),
    InvalidIndex(String),
}

impl fmt::Display for OutPointParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutPointParseError::WrongShape(raw) => write!(f, "wrong outpoint format {raw}"),
            OutPointParseError::InvalidHash(raw) => write!(f, "invalid outpoint txid {raw}"),
            OutPointParseError::InvalidIndex(raw) => write!(f, "invalid outpoint index {raw}"),
        }
    }
}

impl std::error::Error for OutPointParseError {}

impl FromStr for OutPoint {
    type Err = OutPointParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((hash, index)) = value.split_once(':') else {
            return Err(OutPointParseError::WrongShape(value.to_string()));
        };
        let hash = hash256_from_hex(hash)
            .ok_or_else(|| OutPointParseError::InvalidHash(hash.to_string()))?;
        let index = index
            .parse::<u32>()
            .map_err(|_| OutPointParseError::InvalidIndex(index.to_string()))?;
        Ok(Self { hash, index })
    }
}
