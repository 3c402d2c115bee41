use std::collections::BTreeMap;

use bytes::Bytes;

use crate::ebml::element::{Body, Document, Element};
use crate::ebml::ids::ElementId;
use crate::foundation::error::{MuxError, MuxResult};
use crate::mux::block::{Block, KEYFRAME_FLAG};

/// `BlockAddID` used for the alpha plane (`AlphaMode` 1 semantics).
pub const ALPHA_ADD_ID: u64 = 1;

/// What one injection pass did to the color document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InjectReport {
    /// `SimpleBlock`s rewritten into `BlockGroup`s carrying alpha.
    pub converted_blocks: usize,
    /// `SimpleBlock`s left compact because the alpha frames ran out.
    pub unmatched_blocks: usize,
    /// Alpha frames left over after the last color block.
    pub unused_alpha_frames: usize,
    /// `Video` elements that received an `AlphaMode` flag.
    pub alpha_mode_added: usize,
    /// `SeekHead`, `Cues`, `Void` and `Tags` elements dropped from segments.
    pub stripped_elements: usize,
}

/// Attach `alpha_frames` to the color document's blocks, in order.
///
/// The tree is rebuilt from its transformed children. Each `SimpleBlock` that can be paired with
/// an alpha frame becomes a `BlockGroup` with a `BlockAdditions` entry and, for non-keyframes, a
/// `ReferenceBlock` pointing at the previous block of the same track.
pub fn inject_alpha(doc: Document, alpha_frames: &[Bytes]) -> MuxResult<(Document, InjectReport)> {
    let mut state = InjectState {
        alpha: alpha_frames.iter(),
        last_timecode: BTreeMap::new(),
        report: InjectReport::default(),
    };
    let elements = state.rewrite_all(doc.elements)?;

    let mut report = state.report;
    report.unused_alpha_frames = state.alpha.len();
    if report.unmatched_blocks > 0 {
        tracing::warn!(
            unmatched = report.unmatched_blocks,
            "alpha frames exhausted; remaining color blocks left without alpha"
        );
    }
    if report.unused_alpha_frames > 0 {
        tracing::warn!(
            unused = report.unused_alpha_frames,
            "alpha stream has more frames than the color stream"
        );
    }
    Ok((Document::new(elements), report))
}

/// Traversal state threaded through the rewrite.
struct InjectState<'a> {
    /// Next unconsumed alpha frame.
    alpha: std::slice::Iter<'a, Bytes>,
    /// Absolute timecode of the last emitted block, per track.
    last_timecode: BTreeMap<u64, i64>,
    report: InjectReport,
}

impl InjectState<'_> {
    fn rewrite_all(&mut self, elements: Vec<Element>) -> MuxResult<Vec<Element>> {
        elements.into_iter().map(|el| self.rewrite(el)).collect()
    }

    fn rewrite(&mut self, el: Element) -> MuxResult<Element> {
        let Element { id, body } = el;
        let children = match body {
            Body::Container(children) => children,
            leaf @ Body::Leaf(_) => return Ok(Element { id, body: leaf }),
        };

        let children = match id {
            ElementId::SEGMENT => {
                let before = children.len();
                let kept: Vec<Element> = children
                    .into_iter()
                    .filter(|c| !c.id.is_stale_after_injection())
                    .collect();
                self.report.stripped_elements += before - kept.len();
                self.rewrite_all(kept)?
            }
            ElementId::VIDEO => {
                let mut children = self.rewrite_all(children)?;
                if !children.iter().any(|c| c.id == ElementId::ALPHA_MODE) {
                    children.push(Element::uint(ElementId::ALPHA_MODE, 1));
                    self.report.alpha_mode_added += 1;
                }
                children
            }
            ElementId::CLUSTER => self.rewrite_cluster(children)?,
            _ => self.rewrite_all(children)?,
        };
        Ok(Element::container(id, children))
    }

    fn rewrite_cluster(&mut self, children: Vec<Element>) -> MuxResult<Vec<Element>> {
        let cluster_timecode = match children.iter().find(|c| c.id == ElementId::TIMECODE) {
            Some(tc) => i64::try_from(tc.as_uint()?)
                .map_err(|_| MuxError::malformed("cluster timecode exceeds i64"))?,
            None => 0,
        };

        children
            .into_iter()
            .map(|child| {
                if child.id == ElementId::SIMPLE_BLOCK {
                    self.attach_alpha(child, cluster_timecode)
                } else {
                    self.rewrite(child)
                }
            })
            .collect()
    }

    fn attach_alpha(&mut self, el: Element, cluster_timecode: i64) -> MuxResult<Element> {
        let Some(payload) = el.payload() else {
            return Ok(el);
        };
        let Some(alpha) = self.alpha.next() else {
            self.report.unmatched_blocks += 1;
            return Ok(el);
        };

        let block = Block::parse(payload)?;
        let keyframe = block.is_keyframe();
        let timecode = cluster_timecode
            .checked_add(i64::from(block.timecode))
            .ok_or_else(|| MuxError::malformed("block timecode overflows"))?;
        // A BlockGroup signals keyframes by the absence of ReferenceBlock.
        let block = Block {
            flags: block.flags & !KEYFRAME_FLAG,
            ..block
        };

        let mut group = vec![
            Element::leaf(ElementId::BLOCK, block.to_payload()?),
            Element::container(
                ElementId::BLOCK_ADDITIONS,
                vec![Element::container(
                    ElementId::BLOCK_MORE,
                    vec![
                        Element::uint(ElementId::BLOCK_ADD_ID, ALPHA_ADD_ID),
                        Element::leaf(ElementId::BLOCK_ADDITIONAL, alpha.clone()),
                    ],
                )],
            ),
        ];

        let last = self.last_timecode.entry(block.track).or_insert(0);
        if !keyframe {
            let reference = last
                .checked_sub(timecode)
                .ok_or_else(|| MuxError::malformed("block reference timecode overflows"))?;
            group.push(Element::sint(ElementId::REFERENCE_BLOCK, reference));
        }
        *last = timecode;

        self.report.converted_blocks += 1;
        Ok(Element::container(ElementId::BLOCK_GROUP, group))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mux/inject.rs"]
mod tests;
