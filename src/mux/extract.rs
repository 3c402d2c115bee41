use bytes::Bytes;

use crate::ebml::element::{Document, Element};
use crate::ebml::ids::ElementId;
use crate::foundation::error::MuxResult;
use crate::mux::block::Block;

/// Frame payloads of every `SimpleBlock` and every `Block` inside a `BlockGroup`, in document
/// order, with block headers stripped.
pub fn extract_alpha_frames(doc: &Document) -> MuxResult<Vec<Bytes>> {
    let mut frames = Vec::new();
    for el in &doc.elements {
        collect_frames(el, &mut frames)?;
    }
    tracing::debug!(frames = frames.len(), "extracted alpha frames");
    Ok(frames)
}

fn collect_frames(el: &Element, frames: &mut Vec<Bytes>) -> MuxResult<()> {
    match el.id {
        ElementId::SIMPLE_BLOCK => {
            if let Some(payload) = el.payload() {
                frames.push(Block::parse(payload)?.frame);
            }
        }
        ElementId::BLOCK_GROUP => {
            for block in el.children().iter().filter(|c| c.id == ElementId::BLOCK) {
                if let Some(payload) = block.payload() {
                    frames.push(Block::parse(payload)?.frame);
                }
            }
            return Ok(());
        }
        _ => {}
    }
    for child in el.children() {
        collect_frames(child, frames)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/mux/extract.rs"]
mod tests;
