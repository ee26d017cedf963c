use utxowallet_primitives::hash::{hash256_from_hex, hash256_to_hex};
use utxowallet_primitives::{OutPoint, OutPointParseError};

#[test]
fn outpoint_text_form_uses_display_byte_order() {
    let mut hash = [0u8; 32];
    hash[0] = 0xab;
    hash[31] = 0x01;
    let outpoint = OutPoint::new(hash, 7);
    let text = outpoint.to_string();
    assert!(text.starts_with("01"));
    assert!(text.ends_with("ab:7"));
    assert_eq!(text.parse::<OutPoint>().expect("parse"), outpoint);
}

#[test]
fn outpoint_parse_rejects_bad_shapes() {
    assert!(matches!(
        "deadbeef".parse::<OutPoint>(),
        Err(OutPointParseError::WrongShape(_))
    ));
    assert!(matches!(
        "zz:1".parse::<OutPoint>(),
        Err(OutPointParseError::InvalidHash(_))
    ));
    let hash = hash256_to_hex(&[0x42; 32]);
    assert!(matches!(
        format!("{hash}:x").parse::<OutPoint>(),
        Err(OutPointParseError::InvalidIndex(_))
    ));
    assert!(matches!(
        format!("{hash}:-1").parse::<OutPoint>(),
        Err(OutPointParseError::InvalidIndex(_))
    ));
}

#[test]
fn hash_hex_roundtrip() {
    let hash = [0x5a; 32];
    assert_eq!(hash256_from_hex(&hash256_to_hex(&hash)), Some(hash));
    assert_eq!(hash256_from_hex("00"), None);
}

#[test]
fn null_outpoint() {
    assert!(OutPoint::null().is_null());
    assert!(!OutPoint::new([0; 32], 0).is_null());
}
