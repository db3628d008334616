//! Render-tick sources
//!
//! A playback driver suspends once per frame. The renderer owns the real
//! cadence; `IntervalTicks` stands in for it with a tokio interval.

use async_trait::async_trait;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use signa_core::FrameRate;

/// A stream of render ticks, one per frame
#[async_trait]
pub trait FrameTicks: Send {
    /// Suspend until the next frame should be presented
    async fn next_tick(&mut self);
}

/// Factory for per-playback tick streams
pub trait TickSource: Send + Sync {
    fn ticks(&self, rate: FrameRate) -> Box<dyn FrameTicks>;
}

/// Tokio-interval ticks at `1 / fps`
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    /// First tick fires one frame interval from now
    pub fn new(rate: FrameRate) -> Self {
        let period = rate.frame_interval();
        let mut interval = interval_at(Instant::now() + period, period);
        // Late ticks are delivered back to back so the frame count keeps pace
        // with wall-clock time.
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        IntervalTicks { interval }
    }
}

#[async_trait]
impl FrameTicks for IntervalTicks {
    async fn next_tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Real-time tick source
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTickSource;

impl TickSource for IntervalTickSource {
    fn ticks(&self, rate: FrameRate) -> Box<dyn FrameTicks> {
        Box::new(IntervalTicks::new(rate))
    }
}
