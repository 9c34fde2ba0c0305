use crate::foundation::error::{TacticError, TacticResult};

pub use kurbo::{Point, Rect};

/// Output frame rate as a rational `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> TacticResult<Self> {
        if den == 0 {
            return Err(TacticError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TacticError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number rate, e.g. `Fps::integer(30)`.
    pub fn integer(num: u32) -> TacticResult<Self> {
        Self::new(num, 1)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of step `i` on this grid, `i / fps`.
    pub fn step_to_secs(self, step: u64) -> f64 {
        step as f64 * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of whole steps needed to cover `secs`, rounding up.
    pub fn secs_to_steps_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }

    /// `ffmpeg` rate argument (`30` or `30000/1001`).
    pub fn to_ffmpeg_arg(self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Clamp `v` to `[0, 1]`, mapping NaN to `0`.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
