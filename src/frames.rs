//! RGBA frame sequences: PNG directories, animated GIFs and per-candidate resampling.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder as _, RgbaImage};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MuxError, MuxResult};

/// Delay assumed for GIF frames that declare none.
pub const DEFAULT_GIF_DELAY_MS: u32 = 100;

/// Ordered RGBA8 frames sharing one size.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<RgbaImage>,
}

impl FrameSequence {
    pub fn new(frames: Vec<RgbaImage>) -> MuxResult<Self> {
        let Some(first) = frames.first() else {
            return Err(MuxError::validation("frame sequence is empty"));
        };
        let dims = first.dimensions();
        if let Some((i, f)) = frames.iter().enumerate().find(|(_, f)| f.dimensions() != dims) {
            return Err(MuxError::validation(format!(
                "frame {i} is {}x{}, expected {}x{}",
                f.width(),
                f.height(),
                dims.0,
                dims.1
            )));
        }
        Ok(Self { frames })
    }

    /// Decode every `*.png` in `dir`, in lexical file name order.
    #[tracing::instrument]
    pub fn load_dir(dir: &Path) -> MuxResult<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read frames directory '{}'", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(MuxError::validation(format!(
                "no .png frames found in '{}'",
                dir.display()
            )));
        }

        let frames = paths
            .iter()
            .map(|p| {
                image::open(p)
                    .with_context(|| format!("failed to decode frame '{}'", p.display()))
                    .map(|img| img.to_rgba8())
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        tracing::debug!(frames = frames.len(), "loaded frame directory");
        Self::new(frames)
    }

    /// Decode an animated GIF, letterboxed into `canvas` and capped at `max_duration_secs`.
    ///
    /// Returns the frames and the frame rate derived from the first frame's delay.
    #[tracing::instrument]
    pub fn from_gif(path: &Path, canvas: Canvas, max_duration_secs: f64) -> MuxResult<(Self, Fps)> {
        canvas.validate()?;
        let file =
            File::open(path).with_context(|| format!("failed to open gif '{}'", path.display()))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .with_context(|| format!("failed to read gif header '{}'", path.display()))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .with_context(|| format!("failed to decode gif frames '{}'", path.display()))?;

        let Some(first) = frames.first() else {
            return Err(MuxError::validation(format!(
                "gif '{}' has no frames",
                path.display()
            )));
        };

        let (numer, denom) = first.delay().numer_denom_ms();
        let fps = if numer == 0 || denom == 0 {
            Fps::from_frame_delay_ms(DEFAULT_GIF_DELAY_MS)?
        } else {
            // delay = numer / denom ms
            Fps::new(denom.saturating_mul(1000), numer)?
        };

        let cap = usize::try_from(fps.secs_to_frames_floor(max_duration_secs))
            .unwrap_or(usize::MAX)
            .max(1);
        let total = frames.len();
        let frames: Vec<RgbaImage> = frames
            .into_iter()
            .take(cap)
            .map(|f| fit_into(f.buffer(), canvas))
            .collect();

        if frames.len() < total {
            tracing::info!(kept = frames.len(), total, %fps, "gif truncated to maximum duration");
        }
        Ok((Self::new(frames)?, fps))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }

    /// Keep at most the frames that fit in `secs` at `fps`.
    pub fn truncate_to_duration(&mut self, fps: Fps, secs: f64) {
        let cap = usize::try_from(fps.secs_to_frames_floor(secs))
            .unwrap_or(usize::MAX)
            .max(1);
        self.frames.truncate(cap);
    }

    /// Frames at `indices`, resized to `canvas` when their size differs.
    pub fn resampled(&self, indices: &[usize], canvas: Canvas) -> MuxResult<Self> {
        let frames = indices
            .iter()
            .map(|&i| {
                let frame = self.frames.get(i).ok_or_else(|| {
                    MuxError::validation(format!(
                        "frame index {i} out of range ({} frames)",
                        self.frames.len()
                    ))
                })?;
                Ok(resize_exact(frame, canvas))
            })
            .collect::<MuxResult<Vec<_>>>()?;
        Self::new(frames)
    }

    /// Write `frame_0000.png`, `frame_0001.png`, ... into `dir`.
    pub fn save_pngs(&self, dir: &Path) -> MuxResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create frames directory '{}'", dir.display()))?;
        let mut out = Vec::with_capacity(self.frames.len());
        for (i, frame) in self.frames.iter().enumerate() {
            let path = dir.join(format!("frame_{i:04}.png"));
            frame
                .save_with_format(&path, image::ImageFormat::Png)
                .with_context(|| format!("failed to write frame '{}'", path.display()))?;
            out.push(path);
        }
        Ok(out)
    }
}

/// Alpha channel of `frame` as an 8-bit gray plane.
pub fn alpha_plane(frame: &RgbaImage) -> Vec<u8> {
    frame.pixels().map(|p| p.0[3]).collect()
}

fn resize_exact(frame: &RgbaImage, canvas: Canvas) -> RgbaImage {
    if frame.dimensions() == (canvas.width, canvas.height) {
        return frame.clone();
    }
    imageops::resize(frame, canvas.width, canvas.height, FilterType::Lanczos3)
}

/// Aspect-preserving resize centered on a transparent `canvas`.
pub fn fit_into(frame: &RgbaImage, canvas: Canvas) -> RgbaImage {
    let (w, h) = frame.dimensions();
    if (w, h) == (canvas.width, canvas.height) {
        return frame.clone();
    }

    let scale = (f64::from(canvas.width) / f64::from(w.max(1)))
        .min(f64::from(canvas.height) / f64::from(h.max(1)));
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, canvas.width);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, canvas.height);
    let resized = imageops::resize(frame, nw, nh, FilterType::Lanczos3);

    let mut out = RgbaImage::new(canvas.width, canvas.height);
    let x = i64::from((canvas.width - nw) / 2);
    let y = i64::from((canvas.height - nh) / 2);
    imageops::replace(&mut out, &resized, x, y);
    out
}

#[cfg(test)]
#[path = "../tests/unit/frames.rs"]
mod tests;
