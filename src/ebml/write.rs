use bytes::BufMut;

use crate::ebml::element::{Body, Document, Element};
use crate::ebml::vint::put_vint;
use crate::foundation::error::MuxResult;

/// Serialize `el` depth-first: identifier, recomputed size, then children or payload.
pub fn put_element<B: BufMut>(buf: &mut B, el: &Element) -> MuxResult<()> {
    el.id.put(buf);
    put_vint(buf, el.content_len())?;
    match &el.body {
        Body::Container(children) => {
            for child in children {
                put_element(buf, child)?;
            }
        }
        Body::Leaf(payload) => buf.put_slice(payload),
    }
    Ok(())
}

impl Element {
    pub fn to_bytes(&self) -> MuxResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len() as usize);
        put_element(&mut out, self)?;
        Ok(out)
    }
}

impl Document {
    pub fn to_bytes(&self) -> MuxResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len() as usize);
        for el in &self.elements {
            put_element(&mut out, el)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ebml/write.rs"]
mod tests;
