use std::path::Path;

use anyhow::Context as _;
use bytes::Bytes;

use crate::ebml::element::Document;
use crate::foundation::error::MuxResult;
use crate::foundation::fs::ensure_parent_dir;
use crate::mux::extract::extract_alpha_frames;
use crate::mux::inject::{InjectReport, inject_alpha};

/// Merge a color WebM and an alpha WebM into one file carrying alpha as block additions.
pub fn merge(color: impl Into<Bytes>, alpha: impl Into<Bytes>) -> MuxResult<Vec<u8>> {
    merge_with_report(color, alpha).map(|(bytes, _)| bytes)
}

#[tracing::instrument(skip_all)]
pub fn merge_with_report(
    color: impl Into<Bytes>,
    alpha: impl Into<Bytes>,
) -> MuxResult<(Vec<u8>, InjectReport)> {
    let color = Document::parse(color)?;
    let alpha = Document::parse(alpha)?;

    let alpha_frames = extract_alpha_frames(&alpha)?;
    let (merged, report) = inject_alpha(color, &alpha_frames)?;
    let bytes = merged.to_bytes()?;

    tracing::debug!(
        alpha_frames = alpha_frames.len(),
        converted = report.converted_blocks,
        out_len = bytes.len(),
        "merged color and alpha streams"
    );
    Ok((bytes, report))
}

/// File-to-file variant of [`merge_with_report`].
pub fn mux_files(color_path: &Path, alpha_path: &Path, out_path: &Path) -> MuxResult<InjectReport> {
    let color = std::fs::read(color_path)
        .with_context(|| format!("failed to read color stream '{}'", color_path.display()))?;
    let alpha = std::fs::read(alpha_path)
        .with_context(|| format!("failed to read alpha stream '{}'", alpha_path.display()))?;

    let (bytes, report) = merge_with_report(color, alpha)?;

    ensure_parent_dir(out_path)?;
    std::fs::write(out_path, &bytes)
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;

    tracing::info!(
        out = %out_path.display(),
        bytes = bytes.len(),
        blocks = report.converted_blocks,
        "muxed alpha into color stream"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/mux/merge.rs"]
mod tests;
