//! Gesture fixtures

use signa_core::{GestureAnimation, GestureId, Keyframe, Rotation};
use signa_transport::GestureDto;

/// Rest pose to `degrees` about x over `ms`
pub fn ramp_x(id: impl Into<GestureId>, degrees: f64, ms: u64) -> GestureAnimation {
    animation(
        id,
        vec![
            Keyframe::new(0, Rotation::IDENTITY),
            Keyframe::new(ms, Rotation::new(degrees, 0.0, 0.0)),
        ],
        ms,
    )
}

/// Constant `degrees` about x for `ms`
pub fn hold_x(id: impl Into<GestureId>, degrees: f64, ms: u64) -> GestureAnimation {
    let rotation = Rotation::new(degrees, 0.0, 0.0);
    animation(
        id,
        vec![Keyframe::new(0, rotation), Keyframe::new(ms, rotation)],
        ms,
    )
}

/// Two-beat wave about z with a trailing hold
pub fn wave(id: impl Into<GestureId>) -> GestureAnimation {
    animation(
        id,
        vec![
            Keyframe::new(0, Rotation::IDENTITY),
            Keyframe::new(250, Rotation::new(0.0, 0.0, 30.0)),
            Keyframe::new(500, Rotation::new(0.0, 0.0, -30.0)),
            Keyframe::new(750, Rotation::IDENTITY),
        ],
        1000,
    )
}

/// `count` evenly spaced keyframes over `ms`, for benchmarks
pub fn dense(id: impl Into<GestureId>, count: u64, ms: u64) -> GestureAnimation {
    let step = ms / count.max(1);
    let keyframes = (0..count)
        .map(|i| {
            let angle = (i as f64 * 7.0) % 180.0 - 90.0;
            Keyframe::new(i * step, Rotation::new(angle, angle / 2.0, -angle))
        })
        .collect();
    animation(id, keyframes, ms)
}

/// Body the gesture service would send for `animation`
pub fn gesture_json(animation: &GestureAnimation) -> String {
    match serde_json::to_string(&GestureDto::from_animation(animation)) {
        Ok(json) => json,
        Err(e) => panic!("fixture does not serialize: {}", e),
    }
}

fn animation(id: impl Into<GestureId>, keyframes: Vec<Keyframe>, ms: u64) -> GestureAnimation {
    // Fixtures are hand-built to be valid
    match GestureAnimation::new(id.into(), keyframes, ms) {
        Ok(animation) => animation,
        Err(e) => panic!("invalid fixture: {}", e),
    }
}
