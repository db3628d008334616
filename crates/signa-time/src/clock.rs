//! Playback clock - frame position within a single curve

use std::time::Duration;

use signa_core::FrameRate;

/// Frame-accurate position within one playback
/// INVARIANT: the frame index is monotonically increasing and never passes `end_frame`
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    rate: FrameRate,
    frame: u32,
    end_frame: u32,
}

impl PlaybackClock {
    /// Create a clock positioned at frame 0
    pub fn new(rate: FrameRate, end_frame: u32) -> Self {
        PlaybackClock {
            rate,
            frame: 0,
            end_frame,
        }
    }

    /// Current frame
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// Step one frame forward
    /// Returns the new frame, or `None` once the end has been reached
    pub fn advance(&mut self) -> Option<u32> {
        if self.frame >= self.end_frame {
            return None;
        }
        self.frame += 1;
        Some(self.frame)
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.end_frame
    }

    /// Playback time represented by the current frame
    pub fn elapsed(&self) -> Duration {
        self.rate.duration_of_frames(self.frame)
    }

    /// Playback time left until the end frame
    pub fn remaining(&self) -> Duration {
        self.rate.duration_of_frames(self.end_frame - self.frame)
    }

    /// Total playback length
    pub fn total(&self) -> Duration {
        self.rate.duration_of_frames(self.end_frame)
    }
}
