//! SIGNA Time - Frame clocks for avatar playback
//!
//! This crate implements the timing side of playback:
//! - Playback clock: frame position within one curve, never runs backwards
//! - Tick sources: the render-loop cadence a driver suspends on

pub mod clock;
pub mod ticks;

pub use clock::*;
pub use ticks::*;
