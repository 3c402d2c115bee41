use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::SearchConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MuxError, MuxResult};
use crate::frames::{FrameSequence, alpha_plane};
use crate::mux::merge::merge_with_report;
use crate::search::candidate::Candidate;
use crate::search::fit::{CandidateEncoder, FitOutcome, fit_to_budget};

/// Options for [`VpxEncoder`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VpxOptions {
    /// `ffmpeg` executable, resolved through `PATH` when relative.
    pub ffmpeg: PathBuf,
    /// Parent directory for per-candidate scratch directories; system temp when `None`.
    pub temp_root: Option<PathBuf>,
    /// libvpx `-deadline` (`good`, `best`, `realtime`).
    pub deadline: String,
    /// libvpx `-cpu-used`.
    pub cpu_used: u8,
}

impl Default for VpxOptions {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            temp_root: None,
            deadline: "good".to_owned(),
            cpu_used: 4,
        }
    }
}

/// Which plane of the RGBA frames a stream carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plane {
    Color,
    Alpha,
}

impl Plane {
    fn pix_fmt(self) -> &'static str {
        match self {
            Plane::Color => "rgba",
            Plane::Alpha => "gray",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Plane::Color => "color.webm",
            Plane::Alpha => "alpha.webm",
        }
    }
}

/// Encodes candidates by running `ffmpeg` (libvpx-vp9) twice and muxing the alpha stream in.
pub struct VpxEncoder {
    frames: FrameSequence,
    opts: VpxOptions,
}

impl VpxEncoder {
    pub fn new(frames: FrameSequence, opts: VpxOptions) -> Self {
        Self { frames, opts }
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    fn scratch_dir(&self) -> MuxResult<tempfile::TempDir> {
        use anyhow::Context as _;
        let dir = match &self.opts.temp_root {
            Some(root) => {
                std::fs::create_dir_all(root).with_context(|| {
                    format!("failed to create temp root '{}'", root.display())
                })?;
                tempfile::Builder::new().prefix("alphamux-").tempdir_in(root)
            }
            None => tempfile::Builder::new().prefix("alphamux-").tempdir(),
        }
        .context("failed to create scratch directory")?;
        Ok(dir)
    }

    fn encode_plane(
        &self,
        frames: &FrameSequence,
        plane: Plane,
        fps: Fps,
        crf: u8,
        out_path: &Path,
    ) -> MuxResult<()> {
        let (width, height) = frames.dimensions();
        Canvas { width, height }.validate()?;

        let mut cmd = Command::new(&self.opts.ffmpeg);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            plane.pix_fmt(),
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &format!("{}/{}", fps.num, fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libvpx-vp9",
            "-pix_fmt",
            "yuv420p",
            "-crf",
            &crf.to_string(),
            "-b:v",
            "0",
            "-deadline",
            &self.opts.deadline,
            "-cpu-used",
            &self.opts.cpu_used.to_string(),
            "-f",
            "webm",
        ]);
        cmd.arg(out_path);

        let mut child = cmd.spawn().map_err(|e| {
            MuxError::encode(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                self.opts.ffmpeg.display()
            ))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MuxError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MuxError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let mut write_result = Ok(());
        for frame in frames.frames() {
            let res = match plane {
                Plane::Color => stdin.write_all(frame.as_raw()),
                Plane::Alpha => stdin.write_all(&alpha_plane(frame)),
            };
            if let Err(e) = res {
                write_result = Err(e);
                break;
            }
        }
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| MuxError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| MuxError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| MuxError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(MuxError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        // A broken pipe with a successful exit still means ffmpeg saw partial input.
        write_result
            .map_err(|e| MuxError::encode(format!("failed to write frames to ffmpeg stdin: {e}")))
    }
}

impl CandidateEncoder for VpxEncoder {
    #[tracing::instrument(skip_all, fields(candidate = %candidate))]
    fn encode(&mut self, candidate: &Candidate) -> MuxResult<Vec<u8>> {
        let indices = candidate.divisor.select_frames(self.frames.len());
        let frames = self.frames.resampled(&indices, candidate.canvas)?;
        let scratch = self.scratch_dir()?;

        let color_path = scratch.path().join(Plane::Color.file_name());
        let alpha_path = scratch.path().join(Plane::Alpha.file_name());
        self.encode_plane(&frames, Plane::Color, candidate.fps, candidate.crf, &color_path)?;
        self.encode_plane(&frames, Plane::Alpha, candidate.fps, candidate.crf, &alpha_path)?;

        use anyhow::Context as _;
        let color = std::fs::read(&color_path).context("failed to read encoded color stream")?;
        let alpha = std::fs::read(&alpha_path).context("failed to read encoded alpha stream")?;
        let (bytes, report) = merge_with_report(color, alpha)?;

        tracing::debug!(
            frames = frames.len(),
            size = bytes.len(),
            converted = report.converted_blocks,
            "candidate encoded"
        );
        Ok(bytes)
    }
}

/// Load `frames_dir` and search for the best encode within `budget_bytes`.
pub fn fit_frames_dir(
    frames_dir: &Path,
    base_fps: Fps,
    canvas: Canvas,
    budget_bytes: u64,
    cfg: &SearchConfig,
    opts: VpxOptions,
) -> MuxResult<FitOutcome> {
    let frames = FrameSequence::load_dir(frames_dir)?;
    fit_frames(frames, base_fps, canvas, budget_bytes, cfg, opts)
}

/// Search over an in-memory frame sequence.
pub fn fit_frames(
    frames: FrameSequence,
    base_fps: Fps,
    canvas: Canvas,
    budget_bytes: u64,
    cfg: &SearchConfig,
    opts: VpxOptions,
) -> MuxResult<FitOutcome> {
    if !is_ffmpeg_available(&opts.ffmpeg) {
        return Err(MuxError::encode(format!(
            "'{}' is required for VP9 encoding, but could not be run",
            opts.ffmpeg.display()
        )));
    }
    let mut encoder = VpxEncoder::new(frames, opts);
    fit_to_budget(&mut encoder, base_fps, canvas, budget_bytes, cfg)
}

/// Return `true` when `ffmpeg` can be invoked.
pub fn is_ffmpeg_available(ffmpeg: &Path) -> bool {
    Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_ffmpeg_available(Path::new("ffmpeg"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
