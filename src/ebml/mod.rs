//! Minimal EBML/Matroska element tree: parse, inspect, mutate, serialize.
//!
//! Only the elements the muxer has to descend into are parsed as containers. Everything else is
//! carried through byte-for-byte as an opaque leaf.

/// Element tree types.
pub mod element;
/// Identifier constants and the container/leaf table.
pub mod ids;
/// Bytes to tree.
pub mod parse;
/// Variable-length integers.
pub mod vint;
/// Tree to bytes.
pub mod write;
