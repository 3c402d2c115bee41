//! Transparent VP9 WebM stickers from RGBA frames.
//!
//! VP9 in WebM carries transparency as a second, grayscale-coded stream stored in each block's
//! `BlockAdditions`. This crate:
//!
//! - Parses and serializes the EBML element tree ([`Document`])
//! - Muxes a separately encoded alpha stream into a color stream ([`merge`], [`mux_files`])
//! - Searches encoder settings for the best result under a byte budget ([`fit_to_budget`])
#![forbid(unsafe_code)]

mod foundation;

/// Output profiles and search tuning.
pub mod config;
/// EBML/Matroska element model and codec.
pub mod ebml;
/// `ffmpeg`-backed VP9 encoding.
pub mod encode;
/// RGBA frame sources.
pub mod frames;
/// Alpha muxing.
pub mod mux;
/// Size-budget candidate search.
pub mod search;

pub use crate::foundation::core::{Canvas, Fps};
pub use crate::foundation::error::{MuxError, MuxResult};
pub use crate::foundation::fs::ensure_parent_dir;

pub use crate::config::{Profile, SearchConfig, StickerKind};
pub use crate::ebml::element::{Body, Document, Element};
pub use crate::ebml::ids::ElementId;
pub use crate::encode::ffmpeg::{
    VpxEncoder, VpxOptions, fit_frames, fit_frames_dir, is_ffmpeg_on_path,
};
pub use crate::frames::FrameSequence;
pub use crate::mux::extract::extract_alpha_frames;
pub use crate::mux::inject::{InjectReport, inject_alpha};
pub use crate::mux::merge::{merge, merge_with_report, mux_files};
pub use crate::search::candidate::{Candidate, FpsDivisor, build_candidates};
pub use crate::search::fit::{CandidateEncoder, FitOutcome, FitSearch, fit_to_budget};
