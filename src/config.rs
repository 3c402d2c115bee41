//! Output profiles and size-search tuning.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{MuxError, MuxResult};

/// Highest CRF accepted by libvpx-vp9.
pub const MAX_CRF: u8 = 63;

/// Target sticker format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerKind {
    /// 512x512 video sticker.
    Sticker,
    /// 100x100 custom emoji.
    Emoji,
}

/// Output constraints for one sticker kind.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    pub kind: StickerKind,
    pub canvas: Canvas,
    /// Longest clip kept; later frames are dropped.
    pub max_duration_secs: f64,
    /// Hard limit on the output file size.
    pub budget_bytes: u64,
}

impl Profile {
    pub fn for_kind(kind: StickerKind) -> Self {
        let side = match kind {
            StickerKind::Sticker => 512,
            StickerKind::Emoji => 100,
        };
        Self {
            kind,
            canvas: Canvas::square(side),
            max_duration_secs: 2.84,
            budget_bytes: 256 * 1024,
        }
    }

    /// `None` when `kib` KiB does not fit in a `u64` byte count.
    pub fn with_budget_kib(mut self, kib: u64) -> Option<Self> {
        self.budget_bytes = kib.checked_mul(1024)?;
        Some(self)
    }
}

/// Candidate generation and skip-ahead tuning for the size search.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Best quality tried (lowest CRF).
    pub crf_min: u8,
    /// Strongest compression tried (highest CRF).
    pub crf_max: u8,
    pub crf_step: u8,
    /// Edge scales relative to the canvas, each in `(0, 1]`.
    /// Defaults to the full canvas only, since sticker output needs one edge at exactly the
    /// profile size. Smaller scales are opt-in through a config file.
    pub scales: Vec<f64>,
    /// Frame-rate divisors are only unlocked while the output stays at or above this rate.
    pub min_output_fps: f64,
    /// Overage ratio (`size / budget - 1`) below which no candidates are skipped.
    pub overage_margin: f64,
    /// Exponent applied to `budget / size` when extrapolating the score that fits.
    pub skip_damping: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            crf_min: 18,
            crf_max: MAX_CRF,
            crf_step: 3,
            scales: vec![1.0],
            min_output_fps: 10.0,
            overage_margin: 0.05,
            skip_damping: 0.5,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> MuxResult<()> {
        if self.crf_min > self.crf_max {
            return Err(MuxError::validation("crf_min must be <= crf_max"));
        }
        if self.crf_max > MAX_CRF {
            return Err(MuxError::validation(format!(
                "crf_max must be <= {MAX_CRF}"
            )));
        }
        if self.crf_step == 0 {
            return Err(MuxError::validation("crf_step must be non-zero"));
        }
        if self.scales.is_empty() {
            return Err(MuxError::validation("at least one scale is required"));
        }
        if let Some(bad) = self.scales.iter().find(|s| !(0.0 < **s && **s <= 1.0)) {
            return Err(MuxError::validation(format!(
                "scale {bad} is outside (0, 1]"
            )));
        }
        if self.min_output_fps.is_nan() || self.min_output_fps <= 0.0 {
            return Err(MuxError::validation("min_output_fps must be positive"));
        }
        if self.overage_margin.is_nan() || self.overage_margin < 0.0 {
            return Err(MuxError::validation("overage_margin must be >= 0"));
        }
        if !(0.0 < self.skip_damping && self.skip_damping <= 1.0) {
            return Err(MuxError::validation("skip_damping must be in (0, 1]"));
        }
        Ok(())
    }

    /// CRF values from `crf_min` to `crf_max` inclusive.
    pub fn crf_values(&self) -> Vec<u8> {
        let mut values: Vec<u8> = (self.crf_min..=self.crf_max)
            .step_by(usize::from(self.crf_step.max(1)))
            .collect();
        if values.last() != Some(&self.crf_max) {
            values.push(self.crf_max);
        }
        values
    }

    /// Load a JSON config; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> MuxResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read search config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            MuxError::validation(format!("invalid search config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
