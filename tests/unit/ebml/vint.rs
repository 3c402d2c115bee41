use super::*;
use proptest::prelude::*;

#[test]
fn reads_single_byte_vint() {
    let mut data = &b"\x81"[..];
    let vint = read_vint(&mut data).expect("vint");
    assert_eq!(vint.length, 1);
    assert_eq!(vint.value, 0x01);
}

#[test]
fn reads_two_byte_vint() {
    let mut data = &b"\x40\x7F"[..];
    let vint = read_vint(&mut data).expect("vint");
    assert_eq!(vint.length, 2);
    assert_eq!(vint.value, 0x7F);
}

#[test]
fn fails_on_truncated_vint() {
    let mut data = &b"\x40"[..];
    let err = read_vint(&mut data).unwrap_err();
    assert!(matches!(err, MuxError::Truncated(_)));

    let mut empty = &b""[..];
    assert!(matches!(
        read_vint(&mut empty).unwrap_err(),
        MuxError::Truncated(_)
    ));
}

#[test]
fn zero_first_byte_is_malformed() {
    let mut data = &b"\x00\x01"[..];
    assert!(matches!(
        read_vint(&mut data).unwrap_err(),
        MuxError::Malformed(_)
    ));
}

#[test]
fn encodes_shortest_form_and_skips_reserved_patterns() {
    assert_eq!(encode_vint(0).unwrap(), vec![0x80]);
    assert_eq!(encode_vint(1).unwrap(), vec![0x81]);
    assert_eq!(encode_vint(126).unwrap(), vec![0xFE]);
    // 127 as a single byte would be 0xFF (unknown size).
    assert_eq!(encode_vint(127).unwrap(), vec![0x40, 0x7F]);
    assert_eq!(encode_vint(0x3FFE).unwrap(), vec![0x7F, 0xFE]);
    assert_eq!(encode_vint(0x3FFF).unwrap(), vec![0x20, 0x3F, 0xFF]);
}

#[test]
fn eight_byte_boundary() {
    let bytes = encode_vint(MAX_VINT_VALUE).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(bytes[0], 0x01);

    let err = encode_vint(MAX_VINT_VALUE + 1).unwrap_err();
    assert!(matches!(err, MuxError::Capacity(_)));
}

#[test]
fn unknown_size_marker_is_detected() {
    let mut data = &b"\xFF"[..];
    assert!(read_vint(&mut data).unwrap().is_unknown_size());

    let mut data = &b"\x01\xFF\xFF\xFF\xFF\xFF\xFF\xFF"[..];
    assert!(read_vint(&mut data).unwrap().is_unknown_size());

    let mut data = &b"\x81"[..];
    assert!(!read_vint(&mut data).unwrap().is_unknown_size());
}

proptest! {
    #[test]
    fn decode_inverts_encode(n in 0u64..=MAX_VINT_VALUE) {
        let bytes = encode_vint(n).unwrap();
        prop_assert_eq!(bytes.len(), vint_len(n));
        let mut slice = &bytes[..];
        let vint = read_vint(&mut slice).unwrap();
        prop_assert_eq!(vint.value, n);
        prop_assert_eq!(vint.length, bytes.len());
        prop_assert!(slice.is_empty());
        prop_assert!(!vint.is_unknown_size());
    }
}
