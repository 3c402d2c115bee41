use bytes::Bytes;

use crate::ebml::ids::ElementId;
use crate::ebml::vint::vint_len;
use crate::foundation::error::{MuxError, MuxResult};

/// Content of an element. Sizes are never stored; they are derived from this on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Container(Vec<Element>),
    Leaf(Bytes),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub body: Body,
}

impl Element {
    pub fn container(id: ElementId, children: Vec<Element>) -> Self {
        Self {
            id,
            body: Body::Container(children),
        }
    }

    pub fn leaf(id: ElementId, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            body: Body::Leaf(payload.into()),
        }
    }

    /// Leaf holding `value` as a minimal-length big-endian unsigned integer.
    pub fn uint(id: ElementId, value: u64) -> Self {
        let width = (8 - value.leading_zeros() as usize / 8).max(1);
        Self::leaf(id, value.to_be_bytes()[8 - width..].to_vec())
    }

    /// Leaf holding `value` as a minimal-length big-endian two's complement integer.
    pub fn sint(id: ElementId, value: i64) -> Self {
        let width = (1..=8usize)
            .find(|&n| {
                let bits = 8 * n as u32 - 1;
                n == 8 || (-(1i64 << bits)..(1i64 << bits)).contains(&value)
            })
            .unwrap_or(8);
        Self::leaf(id, value.to_be_bytes()[8 - width..].to_vec())
    }

    pub fn is_container(&self) -> bool {
        matches!(self.body, Body::Container(_))
    }

    /// Child elements; empty for leaves.
    pub fn children(&self) -> &[Element] {
        match &self.body {
            Body::Container(children) => children,
            Body::Leaf(_) => &[],
        }
    }

    pub fn payload(&self) -> Option<&Bytes> {
        match &self.body {
            Body::Leaf(payload) => Some(payload),
            Body::Container(_) => None,
        }
    }

    /// First direct child with `id`.
    pub fn child(&self, id: ElementId) -> Option<&Element> {
        self.children().iter().find(|c| c.id == id)
    }

    /// Interpret a leaf payload as a big-endian unsigned integer (empty means zero).
    pub fn as_uint(&self) -> MuxResult<u64> {
        let payload = self
            .payload()
            .ok_or_else(|| MuxError::malformed(format!("{} is not a leaf", self.id)))?;
        if payload.len() > 8 {
            return Err(MuxError::malformed(format!(
                "{} holds {} bytes, too wide for an unsigned integer",
                self.id,
                payload.len()
            )));
        }
        Ok(payload
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Interpret a leaf payload as a big-endian signed integer (empty means zero).
    pub fn as_sint(&self) -> MuxResult<i64> {
        let raw = self.as_uint()?;
        let width = self.payload().map_or(0, |p| p.len());
        if width == 0 || width == 8 {
            return Ok(raw as i64);
        }
        let shift = 64 - 8 * width as u32;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Content length recomputed from the current tree shape.
    pub fn content_len(&self) -> u64 {
        match &self.body {
            Body::Container(children) => children.iter().map(Element::encoded_len).sum(),
            Body::Leaf(payload) => payload.len() as u64,
        }
    }

    /// Identifier, size field and content.
    pub fn encoded_len(&self) -> u64 {
        let content = self.content_len();
        (self.id.encoded_len() + vint_len(content)) as u64 + content
    }

    /// Pre-order visit of this element and its descendants.
    pub fn walk<'a>(&'a self, depth: usize, f: &mut impl FnMut(&'a Element, usize)) {
        f(self, depth);
        for child in self.children() {
            child.walk(depth + 1, f);
        }
    }
}

/// Top-level elements of one parsed file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub elements: Vec<Element>,
}

impl Document {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn encoded_len(&self) -> u64 {
        self.elements.iter().map(Element::encoded_len).sum()
    }

    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element, usize)) {
        for el in &self.elements {
            el.walk(0, f);
        }
    }

    /// Number of elements with `id` anywhere in the tree.
    pub fn count(&self, id: ElementId) -> usize {
        let mut n = 0usize;
        self.walk(&mut |el, _| {
            if el.id == id {
                n += 1;
            }
        });
        n
    }

    /// Indented outline of the tree, one element per line.
    pub fn describe(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        self.walk(&mut |el, depth| {
            let indent = "  ".repeat(depth);
            let _ = match &el.body {
                Body::Container(children) => writeln!(
                    out,
                    "{indent}{} [{} bytes, {} children]",
                    el.id,
                    el.content_len(),
                    children.len()
                ),
                Body::Leaf(payload) => {
                    writeln!(out, "{indent}{} [{} bytes]", el.id, payload.len())
                }
            };
        });
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ebml/element.rs"]
mod tests;
