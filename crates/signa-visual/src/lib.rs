//! SIGNA Visual - Gestures as curves, avatars as targets
//!
//! Gesture data arrives as sparse keyframes in milliseconds and degrees.
//! A renderer wants dense frames in radians. This crate sits in between:
//!
//! - `build_curve` turns a validated `GestureAnimation` into an immutable
//!   `AnimationCurve` at a fixed frame rate
//! - `AnimationCurve::sample` gives the pose for any frame in the span
//! - `PoseTarget` is the single mutable handle on the avatar that playback
//!   writes into

pub mod curve;
pub mod pose;

pub use curve::*;
pub use pose::*;
