//! Transaction types and serialization (legacy and BIP144 segwit forms).

use crate::encoding::{varint_len, Decodable, DecodeError, Decoder, Encodable, Encoder};
use crate::hash::{sha256d, Hash256};
use crate::outpoint::OutPoint;

pub const WITNESS_SCALE_FACTOR: usize = 4;

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    pub witness: Vec<Vec<u8>>,
}

impl TxIn {
    fn encode_base(&self, encoder: &mut Encoder) {
        self.prevout.consensus_encode(encoder);
        encoder.write_var_bytes(&self.script_sig);
        encoder.write_u32_le(self.sequence);
    }

    fn decode_base(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let prevout = OutPoint::consensus_decode(decoder)?;
        let script_sig = decoder.read_var_bytes()?;
        let sequence = decoder.read_u32_le()?;
        Ok(Self {
            prevout,
            script_sig,
            sequence,
            witness: Vec::new(),
        })
    }
}

/// Serialized size of a witness stack, including its item count.
pub fn witness_size(witness: &[Vec<u8>]) -> usize {
    witness.iter().fold(varint_len(witness.len() as u64), |acc, item| {
        acc + varint_len(item.len() as u64) + item.len()
    })
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxOut {
    pub value: i64,
    pub script_pubkey: Vec<u8>,
}

impl Encodable for TxOut {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_i64_le(self.value);
        encoder.write_var_bytes(&self.script_pubkey);
    }
}

impl Decodable for TxOut {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let value = decoder.read_i64_le()?;
        let script_pubkey = decoder.read_var_bytes()?;
        Ok(Self {
            value,
            script_pubkey,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// Full serialization; uses the segwit layout when any input carries a witness.
    pub fn consensus_encode(&self) -> Vec<u8> {
        self.encode_with(self.has_witness())
    }

    /// Serialization with all witness data stripped, as hashed for the txid.
    pub fn consensus_encode_without_witness(&self) -> Vec<u8> {
        self.encode_with(false)
    }

    fn encode_with(&self, include_witness: bool) -> Vec<u8> {
        let mut encoder = Encoder::with_capacity(self.base_size());
        encoder.write_i32_le(self.version);
        if include_witness {
            encoder.write_u8(SEGWIT_MARKER);
            encoder.write_u8(SEGWIT_FLAG);
        }
        encoder.write_varint(self.inputs.len() as u64);
        for input in &self.inputs {
            input.encode_base(&mut encoder);
        }
        encoder.write_varint(self.outputs.len() as u64);
        for output in &self.outputs {
            output.consensus_encode(&mut encoder);
        }
        if include_witness {
            for input in &self.inputs {
                encoder.write_varint(input.witness.len() as u64);
                for item in &input.witness {
                    encoder.write_var_bytes(item);
                }
            }
        }
        encoder.write_u32_le(self.lock_time);
        encoder.into_inner()
    }

    /// Decodes either serialization. A zero-input legacy transaction starts
    /// with the same `0x00` byte as the segwit marker, so a failed extended
    /// decode is retried as legacy.
    pub fn consensus_decode(bytes: &[u8]) -> Result<Self, TransactionDecodeError> {
        match Self::decode_with(bytes, true) {
            Ok(tx) => Ok(tx),
            Err(err) => match Self::decode_with(bytes, false) {
                Ok(tx) => Ok(tx),
                Err(_) => Err(err),
            },
        }
    }

    fn decode_with(bytes: &[u8], allow_witness: bool) -> Result<Self, TransactionDecodeError> {
        let mut decoder = Decoder::new(bytes);
        let version = decoder.read_i32_le()?;

        let segwit = allow_witness && decoder.peek_u8() == Some(SEGWIT_MARKER);
        if segwit {
            decoder.read_u8()?;
            if decoder.read_u8()? != SEGWIT_FLAG {
                return Err(TransactionDecodeError::InvalidTransactionFormat(
                    "unsupported segwit flag",
                ));
            }
        }

        let input_count = decoder.read_varint()?;
        let mut inputs = Vec::with_capacity(input_count.min(1024) as usize);
        for _ in 0..input_count {
            inputs.push(TxIn::decode_base(&mut decoder)?);
        }

        let output_count = decoder.read_varint()?;
        let mut outputs = Vec::with_capacity(output_count.min(1024) as usize);
        for _ in 0..output_count {
            outputs.push(TxOut::consensus_decode(&mut decoder)?);
        }

        if segwit {
            for input in &mut inputs {
                let items = decoder.read_varint()?;
                for _ in 0..items {
                    input.witness.push(decoder.read_var_bytes()?);
                }
            }
            if inputs.iter().all(|input| input.witness.is_empty()) {
                return Err(TransactionDecodeError::InvalidTransactionFormat(
                    "segwit marker without witness data",
                ));
            }
        }

        let lock_time = decoder.read_u32_le()?;
        if !decoder.is_empty() {
            return Err(DecodeError::TrailingBytes.into());
        }
        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    pub fn txid(&self) -> Hash256 {
        sha256d(&self.consensus_encode_without_witness())
    }

    pub fn wtxid(&self) -> Hash256 {
        sha256d(&self.consensus_encode())
    }

    /// Size without witness data (marker, flag and stacks excluded).
    pub fn base_size(&self) -> usize {
        let inputs = self.inputs.iter().fold(varint_len(self.inputs.len() as u64), |acc, input| {
            acc + 36 + varint_len(input.script_sig.len() as u64) + input.script_sig.len() + 4
        });
        let outputs = self
            .outputs
            .iter()
            .fold(varint_len(self.outputs.len() as u64), |acc, output| {
                acc + 8 + varint_len(output.script_pubkey.len() as u64) + output.script_pubkey.len()
            });
        4 + inputs + outputs + 4
    }

    pub fn total_size(&self) -> usize {
        if !self.has_witness() {
            return self.base_size();
        }
        let witness: usize = self.inputs.iter().map(|input| witness_size(&input.witness)).sum();
        self.base_size() + 2 + witness
    }

    pub fn weight(&self) -> usize {
        self.base_size() * (WITNESS_SCALE_FACTOR - 1) + self.total_size()
    }

    pub fn vsize(&self) -> usize {
        self.weight().div_ceil(WITNESS_SCALE_FACTOR)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum TransactionDecodeError {
    Decode(DecodeError),
    InvalidTransactionFormat(&'static str),
}

impl From<DecodeError> for TransactionDecodeError {
    fn from(error: DecodeError) -> Self {
        TransactionDecodeError::Decode(error)
    }
}

impl std::fmt::Display for TransactionDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionDecodeError::Decode(error) => write!(f, "{error}"),
            TransactionDecodeError::InvalidTransactionFormat(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for TransactionDecodeError {}
