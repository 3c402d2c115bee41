use crate::config::SearchConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::MuxResult;

/// Keep one frame out of every `num/den` source frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FpsDivisor {
    pub num: u32,
    pub den: u32,
}

impl FpsDivisor {
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Divisors considered by the search, mildest first.
    pub const LADDER: [Self; 6] = [
        Self::ONE,
        Self { num: 3, den: 2 },
        Self { num: 2, den: 1 },
        Self { num: 5, den: 2 },
        Self { num: 3, den: 1 },
        Self { num: 4, den: 1 },
    ];

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Source indices kept out of `count` frames: `floor(i * num / den)` while in range.
    pub fn select_frames(self, count: usize) -> Vec<usize> {
        let (num, den) = (u64::from(self.num), u64::from(self.den));
        (0u64..)
            .map(|i| (i * num / den) as usize)
            .take_while(|&idx| idx < count)
            .collect()
    }
}

impl std::fmt::Display for FpsDivisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// One encoder configuration the search may try.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Candidate {
    pub scale: f64,
    pub crf: u8,
    pub divisor: FpsDivisor,
    /// Output dimensions after scaling.
    pub canvas: Canvas,
    /// Output frame rate after the divisor.
    pub fps: Fps,
    pub score: f64,
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} crf={} fps={} (score {:.4})",
            self.canvas.width, self.canvas.height, self.crf, self.fps, self.score
        )
    }
}

/// Expected relative quality of an encode. Monotone: larger for bigger scale,
/// lower CRF and smaller divisor.
pub fn score(scale: f64, crf: u8, divisor: FpsDivisor) -> f64 {
    let quality = f64::from(64 - u32::from(crf).min(63)) / 64.0;
    scale * scale * quality / divisor.as_f64().sqrt()
}

/// Divisors from [`FpsDivisor::LADDER`] that keep the output at or above `min_output_fps`.
pub fn unlocked_divisors(base_fps: Fps, min_output_fps: f64) -> Vec<FpsDivisor> {
    FpsDivisor::LADDER
        .into_iter()
        .filter(|d| *d == FpsDivisor::ONE || base_fps.as_f64() / d.as_f64() >= min_output_fps)
        .collect()
}

/// Cartesian product of scales, CRF values and unlocked divisors, best score first.
pub fn build_candidates(
    base_fps: Fps,
    canvas: Canvas,
    cfg: &SearchConfig,
) -> MuxResult<Vec<Candidate>> {
    cfg.validate()?;
    canvas.validate()?;

    let divisors = unlocked_divisors(base_fps, cfg.min_output_fps);
    let crfs = cfg.crf_values();

    let mut out = Vec::with_capacity(cfg.scales.len() * crfs.len() * divisors.len());
    for &scale in &cfg.scales {
        let scaled = if scale >= 1.0 { canvas } else { canvas.scaled(scale) };
        for &crf in &crfs {
            for &divisor in &divisors {
                out.push(Candidate {
                    scale,
                    crf,
                    divisor,
                    canvas: scaled,
                    fps: base_fps.divided_by(divisor.num, divisor.den)?,
                    score: score(scale, crf, divisor),
                });
            }
        }
    }

    // Stable, so equal scores keep generation order.
    out.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/search/candidate.rs"]
mod tests;
