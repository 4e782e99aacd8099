use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_WINDOW_CENTER, DEFAULT_WINDOW_WIDTH, SAMPLE_MAX};
use crate::error::{Result, ViewerError};

/// Contrast window over 16-bit sample values.
///
/// Always satisfies `lower <= upper`; both bounds lie in `[0, 65535]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContrastWindow {
    lower: u16,
    upper: u16,
}

impl ContrastWindow {
    /// Full sample range, the neutral window.
    pub const FULL: Self = Self {
        lower: 0,
        upper: SAMPLE_MAX,
    };

    /// Build from bounds, clamping to the sample range. Swapped bounds are reordered.
    pub fn from_bounds(lower: i64, upper: i64) -> Self {
        let lo = lower.clamp(0, SAMPLE_MAX as i64) as u16;
        let hi = upper.clamp(0, SAMPLE_MAX as i64) as u16;
        Self {
            lower: lo.min(hi),
            upper: lo.max(hi),
        }
    }

    /// Build from center and width: `[center - width/2, center + width/2]`,
    /// truncated toward zero and clamped.
    pub fn from_center_width(center: u16, width: u16) -> Self {
        let half = width as f64 / 2.0;
        let lower = (center as f64 - half).trunc() as i64;
        let upper = (center as f64 + half).trunc() as i64;
        Self::from_bounds(lower, upper)
    }

    /// Parse raw user input for the two bounds.
    ///
    /// Unlike [`from_bounds`](Self::from_bounds) this rejects anything that is
    /// not an integer in `[0, 65535]`, and rejects `lower > upper`.
    pub fn parse_bounds(lower: &str, upper: &str) -> Result<Self> {
        let lo = parse_sample(lower)?;
        let hi = parse_sample(upper)?;
        if lo > hi {
            return Err(ViewerError::InvalidContrastWindow(format!(
                "lower bound {lo} exceeds upper bound {hi}"
            )));
        }
        Ok(Self {
            lower: lo,
            upper: hi,
        })
    }

    /// Parse raw user input for center and width.
    pub fn parse_center_width(center: &str, width: &str) -> Result<Self> {
        Ok(Self::from_center_width(
            parse_sample(center)?,
            parse_sample(width)?,
        ))
    }

    pub fn lower(&self) -> u16 {
        self.lower
    }

    pub fn upper(&self) -> u16 {
        self.upper
    }

    pub fn center(&self) -> u16 {
        ((self.lower as u32 + self.upper as u32) / 2) as u16
    }

    pub fn width(&self) -> u16 {
        self.upper - self.lower
    }

    /// A zero-width window maps every sample to black.
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }
}

impl Default for ContrastWindow {
    fn default() -> Self {
        Self::from_center_width(DEFAULT_WINDOW_CENTER, DEFAULT_WINDOW_WIDTH)
    }
}

impl fmt::Display for ContrastWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

fn parse_sample(raw: &str) -> Result<u16> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ViewerError::InvalidContrastWindow(format!(
            "'{raw}' is not a non-negative integer"
        )));
    }
    trimmed.parse::<u16>().map_err(|_| {
        ViewerError::InvalidContrastWindow(format!("'{raw}' is outside 0..={SAMPLE_MAX}"))
    })
}
