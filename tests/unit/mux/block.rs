use super::*;

#[test]
fn parses_header_and_frame() {
    let payload = Bytes::from_static(&[0x81, 0x00, 0x21, 0x80, 0xDE, 0xAD]);
    let block = Block::parse(&payload).unwrap();
    assert_eq!(block.track, 1);
    assert_eq!(block.timecode, 33);
    assert!(block.is_keyframe());
    assert_eq!(block.frame[..], [0xDE, 0xAD]);
}

#[test]
fn negative_relative_timecode() {
    let payload = Bytes::from_static(&[0x82, 0xFF, 0xDF, 0x00]);
    let block = Block::parse(&payload).unwrap();
    assert_eq!(block.track, 2);
    assert_eq!(block.timecode, -33);
    assert!(!block.is_keyframe());
    assert!(block.frame.is_empty());
}

#[test]
fn short_header_is_truncated() {
    let payload = Bytes::from_static(&[0x81, 0x00, 0x00]);
    assert!(matches!(
        Block::parse(&payload).unwrap_err(),
        MuxError::Truncated(_)
    ));
}

#[test]
fn payload_roundtrip_preserves_bytes() {
    let payload = Bytes::from_static(&[0x81, 0x00, 0x42, 0x00, 1, 2, 3]);
    let block = Block::parse(&payload).unwrap();
    assert_eq!(block.to_payload().unwrap(), payload);
}
