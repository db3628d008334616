//! SIGNA Runtime - Sequenced gesture playback
//!
//! This crate ties the lower layers together:
//! - Generation counter and playback tokens (cancellation by supersession)
//! - Playback driver: one curve, one frame per render tick
//! - Sequencer: fetch, build, play each gesture of a sequence in order, with
//!   a state machine and event stream for the UI
//! - Speech pipeline: audio or text in, sequenced playback out
//! - Configuration and tracing setup for embedders

pub mod config;
pub mod token;
pub mod driver;
pub mod sequencer;
pub mod pipeline;
pub mod telemetry;

pub use config::*;
pub use token::*;
pub use driver::*;
pub use sequencer::*;
pub use pipeline::*;
pub use telemetry::*;
