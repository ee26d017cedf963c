//! Standard script classification and construction.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScriptType {
    P2Pk,
    P2Pkh,
    P2Sh,
    P2Wpkh,
    P2Wsh,
    Unknown,
}

pub const OP_0: u8 = 0x00;
pub const OP_DUP: u8 = 0x76;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_CHECKSIG: u8 = 0xac;

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;

pub fn classify_script_pubkey(script: &[u8]) -> ScriptType {
    if is_p2pkh(script) {
        ScriptType::P2Pkh
    } else if is_p2sh(script) {
        ScriptType::P2Sh
    } else if is_p2wpkh(script) {
        ScriptType::P2Wpkh
    } else if is_p2wsh(script) {
        ScriptType::P2Wsh
    } else if is_p2pk(script) {
        ScriptType::P2Pk
    } else {
        ScriptType::Unknown
    }
}

fn is_p2pkh(script: &[u8]) -> bool {
    script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 0x14
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
}

fn is_p2sh(script: &[u8]) -> bool {
    script.len() == 23 && script[0] == OP_HASH160 && script[1] == 0x14 && script[22] == OP_EQUAL
}

fn is_p2wpkh(script: &[u8]) -> bool {
    script.len() == 22 && script[0] == OP_0 && script[1] == 0x14
}

fn is_p2wsh(script: &[u8]) -> bool {
    script.len() == 34 && script[0] == OP_0 && script[1] == 0x20
}

fn is_p2pk(script: &[u8]) -> bool {
    let key_len = match script.first().copied() {
        Some(len @ 33) => len,
        Some(len @ 65) => len,
        _ => return false,
    };

    let expected_len = key_len as usize + 2;
    script.len() == expected_len && script[script.len() - 1] == OP_CHECKSIG
}

pub fn p2pkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[OP_DUP, OP_HASH160, 0x14]);
    script.extend_from_slice(pubkey_hash);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}

pub fn p2sh_script(script_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(23);
    script.extend_from_slice(&[OP_HASH160, 0x14]);
    script.extend_from_slice(script_hash);
    script.push(OP_EQUAL);
    script
}

pub fn p2wpkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(22);
    script.extend_from_slice(&[OP_0, 0x14]);
    script.extend_from_slice(pubkey_hash);
    script
}

/// Appends a minimal data push of `data` to `script`.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        script.push(len as u8);
    } else if len <= 0xff {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xffff {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}

/// Length `push_data` adds for a payload of `len` bytes.
pub fn push_data_len(len: usize) -> usize {
    let opcode_len = if len < OP_PUSHDATA1 as usize {
        1
    } else if len <= 0xff {
        2
    } else if len <= 0xffff {
        3
    } else {
        5
    };
    opcode_len + len
}
