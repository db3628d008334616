//! Animation Curve - renderer-ready gesture motion
//!
//! A curve is built once per gesture animation and never changes. Keyframe
//! millisecond offsets become frame indices at a fixed frame rate, degrees
//! become radians, and the trailing hold of the animation is kept as the
//! curve's end frame.

use std::time::Duration;

use signa_core::{FrameRate, GestureAnimation, GestureId};

use crate::EulerRadians;

/// One control point of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFrame {
    /// Frame index at the curve's frame rate
    pub frame: u32,
    /// Rotation at this frame
    pub rotation: EulerRadians,
}

/// Immutable, time-parameterized gesture motion
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationCurve {
    gesture: GestureId,
    frame_rate: FrameRate,
    /// INVARIANT: non-empty, frames non-decreasing
    frames: Vec<CurveFrame>,
    /// Last frame of the played span (includes the trailing hold)
    end_frame: u32,
}

/// Build the curve for `animation` at `frame_rate`
///
/// Each keyframe lands on `round(time_offset_ms / 1000 * fps)`. An animation
/// without keyframes yields a single identity frame held for the full
/// duration. Keyframe order is preserved as given.
pub fn build_curve(animation: &GestureAnimation, frame_rate: FrameRate) -> AnimationCurve {
    let mut frames: Vec<CurveFrame> = animation
        .keyframes()
        .iter()
        .map(|k| CurveFrame {
            frame: frame_rate.frame_for_ms(k.time_offset_ms),
            rotation: EulerRadians::from_degrees(&k.rotation),
        })
        .collect();

    if frames.is_empty() {
        frames.push(CurveFrame {
            frame: 0,
            rotation: EulerRadians::IDENTITY,
        });
    }

    let last_key = frames.last().map_or(0, |f| f.frame);
    let end_frame = last_key.max(frame_rate.frame_for_ms(animation.duration_ms()));

    AnimationCurve {
        gesture: animation.gesture().clone(),
        frame_rate,
        frames,
        end_frame,
    }
}

impl AnimationCurve {
    pub fn gesture(&self) -> &GestureId {
        &self.gesture
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn frames(&self) -> &[CurveFrame] {
        &self.frames
    }

    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    /// Real-time length of the played span
    pub fn duration(&self) -> Duration {
        self.frame_rate.duration_of_frames(self.end_frame)
    }

    /// Rotation at `frame`
    ///
    /// Linear between surrounding control points, held constant before the
    /// first and after the last. When several control points share a frame
    /// the last of them wins.
    pub fn sample(&self, frame: u32) -> EulerRadians {
        let idx = self.frames.partition_point(|f| f.frame <= frame);
        if idx == 0 {
            return self.frames[0].rotation;
        }

        let a = &self.frames[idx - 1];
        match self.frames.get(idx) {
            None => a.rotation,
            Some(b) => {
                let span = (b.frame - a.frame) as f64;
                let t = (frame - a.frame) as f64 / span;
                a.rotation.lerp(&b.rotation, t)
            }
        }
    }
}
