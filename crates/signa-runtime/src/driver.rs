//! Playback driver - one curve onto one target

use tracing::{debug, trace};

use signa_time::{FrameTicks, PlaybackClock};
use signa_visual::{AnimationCurve, PoseTarget};

use crate::PlaybackToken;

/// How a single playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every frame through the end frame was applied
    Completed { frames: u32 },
    /// The token was cancelled; `at_frame` is the clock position when that
    /// was observed. Nothing past it was applied.
    Cancelled { at_frame: u32 },
}

impl PlaybackOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PlaybackOutcome::Completed { .. })
    }
}

/// Advances a curve one frame per render tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackDriver;

impl PlaybackDriver {
    pub fn new() -> Self {
        PlaybackDriver
    }

    /// Play `curve` into `target`
    ///
    /// Frame 0 is applied immediately, then one frame per tick until the
    /// curve's end frame. The token is checked before the first write and
    /// after every tick; once it is cancelled the target is not touched again.
    pub async fn play(
        &self,
        curve: &AnimationCurve,
        target: &mut dyn PoseTarget,
        token: &PlaybackToken,
        ticks: &mut dyn FrameTicks,
    ) -> PlaybackOutcome {
        let mut clock = PlaybackClock::new(curve.frame_rate(), curve.end_frame());

        if token.is_cancelled() {
            return PlaybackOutcome::Cancelled { at_frame: 0 };
        }

        debug!(
            gesture = %curve.gesture(),
            generation = %token.generation(),
            end_frame = curve.end_frame(),
            total_ms = clock.total().as_millis() as u64,
            target = target.name(),
            "playback started"
        );
        target.apply_rotation(curve.sample(0));
        let mut applied = 1;

        while !clock.is_finished() {
            ticks.next_tick().await;

            if token.is_cancelled() {
                debug!(
                    gesture = %curve.gesture(),
                    generation = %token.generation(),
                    frame = clock.frame(),
                    elapsed_ms = clock.elapsed().as_millis() as u64,
                    remaining_ms = clock.remaining().as_millis() as u64,
                    "playback cancelled"
                );
                return PlaybackOutcome::Cancelled {
                    at_frame: clock.frame(),
                };
            }

            let Some(frame) = clock.advance() else {
                break;
            };
            trace!(frame, "frame");
            target.apply_rotation(curve.sample(frame));
            applied += 1;
        }

        debug!(gesture = %curve.gesture(), frames = applied, "playback completed");
        PlaybackOutcome::Completed { frames: applied }
    }
}
