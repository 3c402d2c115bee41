//! EBML variable-length integers.
//!
//! The first byte's leading zero count is `length - 1`; the marker bit that follows is not part
//! of the value. Values use big-endian order.

use bytes::{Buf, BufMut};

use crate::foundation::error::{MuxError, MuxResult};

/// Largest value [`put_vint`] will encode. The all-ones pattern of an 8-byte VINT is reserved for
/// "unknown size".
pub const MAX_VINT_VALUE: u64 = (1 << 56) - 2;

/// A decoded VINT and the number of bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vint {
    pub length: usize,
    pub value: u64,
}

impl Vint {
    /// All value bits set: the reserved "unknown size" marker.
    pub fn is_unknown_size(self) -> bool {
        self.value == (1u64 << (7 * self.length)) - 1
    }
}

/// Number of bytes the shortest encoding of `value` needs, capped at 8.
pub fn vint_len(value: u64) -> usize {
    let mut length = 1usize;
    // All-ones at a given length is reserved, hence `>=`.
    while length < 8 && value >= (1u64 << (7 * length)) - 1 {
        length += 1;
    }
    length
}

/// Append the shortest encoding of `value`.
pub fn put_vint<B: BufMut>(buf: &mut B, value: u64) -> MuxResult<()> {
    if value > MAX_VINT_VALUE {
        return Err(MuxError::capacity(format!(
            "value {value} exceeds 8-byte vint capacity"
        )));
    }
    let length = vint_len(value);
    buf.put_uint(value | (1u64 << (7 * length)), length);
    Ok(())
}

/// Encode `value` into a fresh buffer.
pub fn encode_vint(value: u64) -> MuxResult<Vec<u8>> {
    let mut out = Vec::with_capacity(8);
    put_vint(&mut out, value)?;
    Ok(out)
}

pub fn read_vint<B: Buf>(buf: &mut B) -> MuxResult<Vint> {
    if !buf.has_remaining() {
        return Err(MuxError::truncated("missing vint byte"));
    }

    let first = buf.get_u8();
    if first == 0 {
        return Err(MuxError::malformed("vint longer than 8 bytes"));
    }
    let length = first.leading_zeros() as usize + 1;
    if buf.remaining() < length - 1 {
        return Err(MuxError::truncated(format!(
            "vint declares {length} bytes, {} available",
            buf.remaining() + 1
        )));
    }

    let mut value = u64::from(first) & (0xFFu64 >> length);
    for _ in 1..length {
        value = (value << 8) | u64::from(buf.get_u8());
    }

    Ok(Vint { length, value })
}

#[cfg(test)]
#[path = "../../tests/unit/ebml/vint.rs"]
mod tests;
