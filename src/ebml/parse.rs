use bytes::{Buf, Bytes};

use crate::ebml::element::{Body, Document, Element};
use crate::ebml::ids::{ElementId, ElementKind};
use crate::ebml::vint::read_vint;
use crate::foundation::error::{MuxError, MuxResult};

impl Document {
    /// Parse a complete file. Leaf payloads share the input buffer.
    pub fn parse(data: impl Into<Bytes>) -> MuxResult<Self> {
        let mut buf = data.into();
        let elements = parse_elements(&mut buf)?;
        tracing::debug!(top_level = elements.len(), "parsed ebml document");
        Ok(Self { elements })
    }
}

/// Parse sibling elements until `buf` is exhausted.
///
/// Containers are parsed recursively within their declared length; everything else is copied
/// verbatim. An unknown-size element extends to the end of `buf`.
pub fn parse_elements(buf: &mut Bytes) -> MuxResult<Vec<Element>> {
    let mut elements = Vec::new();
    while buf.has_remaining() {
        elements.push(parse_element(buf)?);
    }
    Ok(elements)
}

fn parse_element(buf: &mut Bytes) -> MuxResult<Element> {
    let id = ElementId::read(buf)?;
    let size = read_vint(buf)?;

    let len = if size.is_unknown_size() {
        buf.remaining()
    } else {
        usize::try_from(size.value).map_err(|_| {
            MuxError::truncated(format!("{id} declares {} bytes", size.value))
        })?
    };
    if buf.remaining() < len {
        return Err(MuxError::truncated(format!(
            "{id} declares {len} bytes, {} available",
            buf.remaining()
        )));
    }

    let mut content = buf.split_to(len);
    let body = match id.kind() {
        ElementKind::Container => Body::Container(parse_elements(&mut content)?),
        ElementKind::Leaf => Body::Leaf(content),
    };
    Ok(Element { id, body })
}

#[cfg(test)]
#[path = "../../tests/unit/ebml/parse.rs"]
mod tests;
