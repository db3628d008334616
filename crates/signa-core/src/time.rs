//! Time primitives for SIGNA
//!
//! Gesture data is authored in milliseconds; playback happens in frames.
//! `FrameRate` is the single conversion point between the two.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{SignaError, SignaResult};

/// Playback frame rate in frames per second
/// INVARIANT: finite and strictly positive
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// Renderer default
    pub const DEFAULT: FrameRate = FrameRate(60.0);
    pub const LOW_POWER: FrameRate = FrameRate(30.0);

    pub fn new(fps: f64) -> SignaResult<Self> {
        if fps.is_finite() && fps > 0.0 {
            Ok(FrameRate(fps))
        } else {
            Err(SignaError::InvalidFrameRate(fps))
        }
    }

    #[inline]
    pub fn fps(self) -> f64 {
        self.0
    }

    /// Frame index for a millisecond offset: `round(ms / 1000 * fps)`
    #[inline]
    pub fn frame_for_ms(self, ms: u64) -> u32 {
        let frame = (ms as f64 / 1000.0 * self.0).round();
        frame.clamp(0.0, u32::MAX as f64) as u32
    }

    /// Wall-clock length of a single frame
    #[inline]
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }

    /// Wall-clock length of `frames` frames
    #[inline]
    pub fn duration_of_frames(self, frames: u32) -> Duration {
        Duration::from_secs_f64(frames as f64 / self.0)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = SignaError;

    fn try_from(fps: f64) -> Result<Self, Self::Error> {
        FrameRate::new(fps)
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

impl fmt::Debug for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fps", self.0)
    }
}
