use super::*;

// EBML header leaf, then a Segment holding Info (opaque) and a Cluster with a Timecode and one
// SimpleBlock.
const SAMPLE: &[u8] = &[
    0x1A, 0x45, 0xDF, 0xA3, 0x84, 0x42, 0x86, 0x81, 0x01, // EBML { EBMLVersion = 1 }
    0x18, 0x53, 0x80, 0x67, 0x96, // Segment, 22 bytes
    0x15, 0x49, 0xA9, 0x66, 0x82, 0xAA, 0xBB, // Info, 2 opaque bytes
    0x1F, 0x43, 0xB6, 0x75, 0x8A, // Cluster, 10 bytes
    0xE7, 0x81, 0x00, // Timecode 0
    0xA3, 0x85, 0x81, 0x00, 0x00, 0x80, 0x11, // SimpleBlock track 1, t=0, key, frame [0x11]
];

#[test]
fn parses_containers_and_leaves() {
    let doc = Document::parse(SAMPLE.to_vec()).unwrap();
    assert_eq!(doc.elements.len(), 2);

    let ebml = &doc.elements[0];
    assert_eq!(ebml.id, ElementId::EBML);
    assert_eq!(ebml.payload().unwrap()[..], [0x42, 0x86, 0x81, 0x01]);

    let segment = &doc.elements[1];
    assert!(segment.is_container());
    assert_eq!(segment.children().len(), 2);
    let info = segment.child(ElementId::INFO).unwrap();
    assert_eq!(info.payload().unwrap()[..], [0xAA, 0xBB]);

    let cluster = segment.child(ElementId::CLUSTER).unwrap();
    assert_eq!(cluster.child(ElementId::TIMECODE).unwrap().as_uint().unwrap(), 0);
    let block = cluster.child(ElementId::SIMPLE_BLOCK).unwrap();
    assert_eq!(block.payload().unwrap()[..], [0x81, 0x00, 0x00, 0x80, 0x11]);
}

#[test]
fn empty_input_is_an_empty_document() {
    let doc = Document::parse(Vec::new()).unwrap();
    assert!(doc.elements.is_empty());
}

#[test]
fn truncated_payload_is_fatal() {
    let cut = &SAMPLE[..SAMPLE.len() - 1];
    let err = Document::parse(cut.to_vec()).unwrap_err();
    assert!(matches!(err, MuxError::Truncated(_)), "{err}");
}

#[test]
fn truncated_size_field_is_fatal() {
    // Segment id followed by a 2-byte size marker with only one byte present.
    let err = Document::parse(vec![0x18, 0x53, 0x80, 0x67, 0x40]).unwrap_err();
    assert!(matches!(err, MuxError::Truncated(_)), "{err}");
}

#[test]
fn child_overrunning_parent_bound_is_fatal() {
    // Cluster claims 3 bytes but its child Timecode claims 2 bytes of payload.
    let bytes = vec![0x1F, 0x43, 0xB6, 0x75, 0x83, 0xE7, 0x82, 0x00];
    let err = Document::parse(bytes).unwrap_err();
    assert!(matches!(err, MuxError::Truncated(_)), "{err}");
}

#[test]
fn unknown_elements_are_kept_as_leaves() {
    // 0x4286 is not in the table, even though its bytes look like nested elements.
    let bytes = vec![0x42, 0x86, 0x83, 0xE7, 0x81, 0x05];
    let doc = Document::parse(bytes).unwrap();
    assert_eq!(doc.elements[0].id, ElementId(0x4286));
    assert_eq!(doc.elements[0].payload().unwrap()[..], [0xE7, 0x81, 0x05]);
}

#[test]
fn unknown_size_extends_to_end_of_input() {
    let bytes = vec![
        0x18, 0x53, 0x80, 0x67, 0xFF, // Segment, unknown size
        0xEC, 0x81, 0x00, // Void
        0xEC, 0x80, // Void, empty
    ];
    let doc = Document::parse(bytes).unwrap();
    assert_eq!(doc.elements.len(), 1);
    assert_eq!(doc.elements[0].children().len(), 2);
}
