//! SIGNA Test Harness - Doubles and scenarios for playback testing
//!
//! This crate provides:
//! - Scripted gesture sources with latency, jitter and held fetches
//! - A pose target that records every write
//! - Hand-cranked render ticks
//! - Gesture fixtures
//! - A scenario harness around a live sequencer

pub mod fixtures;
pub mod source;
pub mod target;
pub mod ticks;
pub mod scenario;

pub use fixtures::*;
pub use source::*;
pub use target::*;
pub use ticks::*;
pub use scenario::*;
