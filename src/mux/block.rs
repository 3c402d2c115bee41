use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::ebml::vint::{put_vint, read_vint};
use crate::foundation::error::{MuxError, MuxResult};

/// `SimpleBlock` keyframe bit. In a `Block` inside a `BlockGroup` the same bit is reserved.
pub const KEYFRAME_FLAG: u8 = 0x80;

/// Payload of a `SimpleBlock` or `Block`: header fields plus the opaque frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub track: u64,
    /// Offset from the enclosing cluster's timecode.
    pub timecode: i16,
    pub flags: u8,
    pub frame: Bytes,
}

impl Block {
    pub fn parse(payload: &Bytes) -> MuxResult<Self> {
        let mut buf = payload.clone();
        let track = read_vint(&mut buf)?.value;
        if buf.remaining() < 3 {
            return Err(MuxError::truncated(format!(
                "block header needs 3 bytes after the track number, {} available",
                buf.remaining()
            )));
        }
        let timecode = buf.get_i16();
        let flags = buf.get_u8();
        Ok(Self {
            track,
            timecode,
            flags,
            frame: buf,
        })
    }

    pub fn is_keyframe(&self) -> bool {
        self.flags & KEYFRAME_FLAG != 0
    }

    pub fn to_payload(&self) -> MuxResult<Bytes> {
        let mut out = BytesMut::with_capacity(8 + self.frame.len());
        put_vint(&mut out, self.track)?;
        out.put_i16(self.timecode);
        out.put_u8(self.flags);
        out.put_slice(&self.frame);
        Ok(out.freeze())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mux/block.rs"]
mod tests;
