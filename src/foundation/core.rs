use crate::foundation::error::{MuxError, MuxResult};

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MuxResult<Self> {
        if den == 0 {
            return Err(MuxError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MuxError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den }.reduced())
    }

    /// Frame rate of a stream whose frames each last `delay_ms` milliseconds.
    pub fn from_frame_delay_ms(delay_ms: u32) -> MuxResult<Self> {
        Self::new(1000, delay_ms)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Rate after keeping one frame out of every `num/den` source frames.
    pub fn divided_by(self, num: u32, den: u32) -> MuxResult<Self> {
        let n = u64::from(self.num) * u64::from(den);
        let d = u64::from(self.den) * u64::from(num);
        let g = gcd(n, d).max(1);
        let (n, d) = (n / g, d / g);
        let num = u32::try_from(n)
            .map_err(|_| MuxError::validation("divided frame rate numerator overflows u32"))?;
        let den = u32::try_from(d)
            .map_err(|_| MuxError::validation("divided frame rate denominator overflows u32"))?;
        Self::new(num, den)
    }

    fn reduced(self) -> Self {
        let g = gcd(u64::from(self.num), u64::from(self.den)).max(1) as u32;
        Self {
            num: self.num / g,
            den: self.den / g,
        }
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl std::str::FromStr for Fps {
    type Err = MuxError;

    /// Accepts `30`, `30000/1001` or `12.5`.
    fn from_str(s: &str) -> MuxResult<Self> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let num = num
                .trim()
                .parse::<u32>()
                .map_err(|e| MuxError::validation(format!("invalid fps numerator '{num}': {e}")))?;
            let den = den.trim().parse::<u32>().map_err(|e| {
                MuxError::validation(format!("invalid fps denominator '{den}': {e}"))
            })?;
            return Self::new(num, den);
        }
        if let Ok(whole) = s.parse::<u32>() {
            return Self::new(whole, 1);
        }
        let value = s
            .parse::<f64>()
            .map_err(|e| MuxError::validation(format!("invalid fps '{s}': {e}")))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(MuxError::validation(format!("fps must be positive, got {s}")));
        }
        Self::new((value * 1000.0).round() as u32, 1000)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Square canvas with `side` pixels per edge.
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Validate dimensions for yuv420p output (non-zero and even).
    pub fn validate(self) -> MuxResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MuxError::validation("canvas width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(MuxError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }

    /// Scale both edges by `scale`, rounding down to the nearest even value (minimum 2).
    pub fn scaled(self, scale: f64) -> Self {
        fn edge(v: u32, scale: f64) -> u32 {
            let scaled = (f64::from(v) * scale).floor() as u32;
            (scaled - scaled % 2).max(2)
        }

        Self {
            width: edge(self.width, scale),
            height: edge(self.height, scale),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
