//! Matroska element identifiers used by the muxer, and the container/leaf lookup table.

use bytes::{Buf, BufMut};

use crate::foundation::error::{MuxError, MuxResult};

/// Element identifier as stored on disk, marker bits included (e.g. `0x1A45DFA3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

impl ElementId {
    pub const EBML: Self = Self(0x1A45_DFA3);
    pub const SEGMENT: Self = Self(0x1853_8067);
    pub const SEEK_HEAD: Self = Self(0x114D_9B74);
    pub const INFO: Self = Self(0x1549_A966);
    pub const TRACKS: Self = Self(0x1654_AE6B);
    pub const TRACK_ENTRY: Self = Self(0xAE);
    pub const TRACK_NUMBER: Self = Self(0xD7);
    pub const CODEC_ID: Self = Self(0x86);
    pub const VIDEO: Self = Self(0xE0);
    pub const PIXEL_WIDTH: Self = Self(0xB0);
    pub const PIXEL_HEIGHT: Self = Self(0xBA);
    pub const ALPHA_MODE: Self = Self(0x53C0);
    pub const CLUSTER: Self = Self(0x1F43_B675);
    pub const TIMECODE: Self = Self(0xE7);
    pub const SIMPLE_BLOCK: Self = Self(0xA3);
    pub const BLOCK_GROUP: Self = Self(0xA0);
    pub const BLOCK: Self = Self(0xA1);
    pub const BLOCK_ADDITIONS: Self = Self(0x75A1);
    pub const BLOCK_MORE: Self = Self(0xA6);
    pub const BLOCK_ADD_ID: Self = Self(0xEE);
    pub const BLOCK_ADDITIONAL: Self = Self(0xA5);
    pub const REFERENCE_BLOCK: Self = Self(0xFB);
    pub const CUES: Self = Self(0x1C53_BB6B);
    pub const VOID: Self = Self(0xEC);
    pub const TAGS: Self = Self(0x1254_C367);

    /// Canonical on-disk width, derived from magnitude.
    pub fn encoded_len(self) -> usize {
        match self.0 {
            0..=0xFF => 1,
            0x100..=0xFFFF => 2,
            0x1_0000..=0xFF_FFFF => 3,
            _ => 4,
        }
    }

    pub fn put<B: BufMut>(self, buf: &mut B) {
        buf.put_uint(u64::from(self.0), self.encoded_len());
    }

    /// Read an identifier; its width follows the VINT leading-bit convention over the first byte.
    pub fn read<B: Buf>(buf: &mut B) -> MuxResult<Self> {
        if !buf.has_remaining() {
            return Err(MuxError::truncated("missing element id"));
        }
        let first = buf.get_u8();
        let length = first.leading_zeros() as usize + 1;
        if length > 4 {
            return Err(MuxError::malformed(format!(
                "invalid element id lead byte 0x{first:02X}"
            )));
        }
        if buf.remaining() < length - 1 {
            return Err(MuxError::truncated(format!(
                "element id declares {length} bytes, {} available",
                buf.remaining() + 1
            )));
        }
        let mut id = u32::from(first);
        for _ in 1..length {
            id = (id << 8) | u32::from(buf.get_u8());
        }
        Ok(Self(id))
    }

    pub fn kind(self) -> ElementKind {
        lookup(self).map_or(ElementKind::Leaf, |e| e.kind)
    }

    pub fn name(self) -> Option<&'static str> {
        lookup(self).map(|e| e.name)
    }

    /// Index and metadata elements invalidated by block restructuring.
    pub fn is_stale_after_injection(self) -> bool {
        matches!(self, Self::SEEK_HEAD | Self::CUES | Self::VOID | Self::TAGS)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:X})", self.0),
            None => write!(f, "0x{:X}", self.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Content is a sequence of child elements.
    Container,
    /// Content is kept as opaque bytes.
    Leaf,
}

#[derive(Clone, Copy, Debug)]
pub struct ElementInfo {
    pub id: ElementId,
    pub name: &'static str,
    pub kind: ElementKind,
}

const fn container(id: ElementId, name: &'static str) -> ElementInfo {
    ElementInfo {
        id,
        name,
        kind: ElementKind::Container,
    }
}

const fn leaf(id: ElementId, name: &'static str) -> ElementInfo {
    ElementInfo {
        id,
        name,
        kind: ElementKind::Leaf,
    }
}

/// Elements the muxer descends into are containers; everything else, including the EBML header,
/// `Info` and `Cues`, round-trips as an opaque leaf.
pub const ELEMENT_TABLE: &[ElementInfo] = &[
    leaf(ElementId::EBML, "EBML"),
    container(ElementId::SEGMENT, "Segment"),
    leaf(ElementId::SEEK_HEAD, "SeekHead"),
    leaf(ElementId::INFO, "Info"),
    container(ElementId::TRACKS, "Tracks"),
    container(ElementId::TRACK_ENTRY, "TrackEntry"),
    leaf(ElementId::TRACK_NUMBER, "TrackNumber"),
    leaf(ElementId::CODEC_ID, "CodecID"),
    container(ElementId::VIDEO, "Video"),
    leaf(ElementId::PIXEL_WIDTH, "PixelWidth"),
    leaf(ElementId::PIXEL_HEIGHT, "PixelHeight"),
    leaf(ElementId::ALPHA_MODE, "AlphaMode"),
    container(ElementId::CLUSTER, "Cluster"),
    leaf(ElementId::TIMECODE, "Timecode"),
    leaf(ElementId::SIMPLE_BLOCK, "SimpleBlock"),
    container(ElementId::BLOCK_GROUP, "BlockGroup"),
    leaf(ElementId::BLOCK, "Block"),
    container(ElementId::BLOCK_ADDITIONS, "BlockAdditions"),
    container(ElementId::BLOCK_MORE, "BlockMore"),
    leaf(ElementId::BLOCK_ADD_ID, "BlockAddID"),
    leaf(ElementId::BLOCK_ADDITIONAL, "BlockAdditional"),
    leaf(ElementId::REFERENCE_BLOCK, "ReferenceBlock"),
    leaf(ElementId::CUES, "Cues"),
    leaf(ElementId::VOID, "Void"),
    leaf(ElementId::TAGS, "Tags"),
];

pub fn lookup(id: ElementId) -> Option<&'static ElementInfo> {
    ELEMENT_TABLE.iter().find(|e| e.id == id)
}

#[cfg(test)]
#[path = "../../tests/unit/ebml/ids.rs"]
mod tests;
