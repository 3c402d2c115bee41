//! Color + alpha WebM muxing via Matroska block additions.

/// `SimpleBlock`/`Block` payload codec.
pub mod block;
/// Alpha frame extraction.
pub mod extract;
/// Alpha injection into the color document.
pub mod inject;
/// Byte- and file-level entry points.
pub mod merge;
