#![allow(dead_code)]

use alphamux::mux::block::Block;
use alphamux::{Document, Element, ElementId};
use bytes::Bytes;

/// One `SimpleBlock` in a synthetic stream.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    /// Offset from the cluster timecode.
    pub offset: i16,
    pub keyframe: bool,
    pub data: &'static [u8],
}

pub const fn key(offset: i16, data: &'static [u8]) -> Frame {
    Frame {
        offset,
        keyframe: true,
        data,
    }
}

pub const fn inter(offset: i16, data: &'static [u8]) -> Frame {
    Frame {
        offset,
        keyframe: false,
        data,
    }
}

pub fn ebml_header() -> Element {
    // EBMLVersion 1, DocType "webm"
    Element::leaf(
        ElementId::EBML,
        vec![0x42u8, 0x86, 0x81, 0x01, 0x42, 0x82, 0x84, b'w', b'e', b'b', b'm'],
    )
}

fn simple_block(frame: &Frame) -> Element {
    let payload = Block {
        track: 1,
        timecode: frame.offset,
        flags: if frame.keyframe { 0x80 } else { 0x00 },
        frame: Bytes::from_static(frame.data),
    }
    .to_payload()
    .unwrap();
    Element::leaf(ElementId::SIMPLE_BLOCK, payload)
}

/// A single-track VP9 WebM as libvpx/ffmpeg lays it out, with minimal sizes.
pub fn webm(clusters: &[(u64, &[Frame])]) -> Document {
    let tracks = Element::container(
        ElementId::TRACKS,
        vec![Element::container(
            ElementId::TRACK_ENTRY,
            vec![
                Element::uint(ElementId::TRACK_NUMBER, 1),
                Element::leaf(ElementId::CODEC_ID, Bytes::from_static(b"V_VP9")),
                Element::container(
                    ElementId::VIDEO,
                    vec![
                        Element::uint(ElementId::PIXEL_WIDTH, 64),
                        Element::uint(ElementId::PIXEL_HEIGHT, 64),
                    ],
                ),
            ],
        )],
    );

    let mut segment = vec![
        Element::leaf(ElementId::SEEK_HEAD, vec![0x4Du8, 0xBB, 0x80]),
        Element::leaf(ElementId::VOID, vec![0u8; 5]),
        Element::leaf(ElementId::INFO, vec![0x2Au8, 0xD7, 0xB1, 0x83, 0x0F, 0x42, 0x40]),
        tracks,
    ];
    for (timecode, frames) in clusters {
        let mut children = vec![Element::uint(ElementId::TIMECODE, *timecode)];
        children.extend(frames.iter().map(simple_block));
        segment.push(Element::container(ElementId::CLUSTER, children));
    }
    segment.push(Element::leaf(ElementId::CUES, vec![0xBBu8, 0x80]));
    segment.push(Element::leaf(ElementId::TAGS, vec![0x73u8, 0x73, 0x80]));

    Document::new(vec![
        ebml_header(),
        Element::container(ElementId::SEGMENT, segment),
    ])
}

pub fn webm_bytes(clusters: &[(u64, &[Frame])]) -> Vec<u8> {
    webm(clusters).to_bytes().unwrap()
}

/// Every element with `id`, in document order.
pub fn find_all(doc: &Document, id: ElementId) -> Vec<Element> {
    let mut out = Vec::new();
    doc.walk(&mut |el, _| {
        if el.id == id {
            out.push(el.clone());
        }
    });
    out
}
