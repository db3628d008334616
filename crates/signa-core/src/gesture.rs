//! Gesture animation data
//!
//! A gesture is a pre-recorded motion: rotation keyframes at millisecond
//! offsets plus a total duration. Construction validates the data; a
//! `GestureAnimation` that exists is well-formed.

use serde::{Deserialize, Serialize};

use crate::{GestureId, SignaError, SignaResult};

/// Rotation triple in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One control point of a gesture's motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Offset from gesture start in milliseconds
    pub time_offset_ms: u64,
    /// Target rotation at this offset
    pub rotation: Rotation,
}

impl Keyframe {
    pub fn new(time_offset_ms: u64, rotation: Rotation) -> Self {
        Self {
            time_offset_ms,
            rotation,
        }
    }
}

/// Validated, immutable gesture animation
#[derive(Debug, Clone, PartialEq)]
pub struct GestureAnimation {
    gesture: GestureId,
    keyframes: Vec<Keyframe>,
    duration_ms: u64,
}

impl GestureAnimation {
    /// Validate and build an animation
    ///
    /// Keyframes must be in non-decreasing time order with finite rotations,
    /// and `duration_ms` must cover the last keyframe. Input is never
    /// re-sorted.
    pub fn new(gesture: GestureId, keyframes: Vec<Keyframe>, duration_ms: u64) -> SignaResult<Self> {
        for (i, pair) in keyframes.windows(2).enumerate() {
            if pair[1].time_offset_ms < pair[0].time_offset_ms {
                return Err(SignaError::malformed(
                    &gesture,
                    format!(
                        "keyframe {} at {}ms precedes keyframe {} at {}ms",
                        i + 1,
                        pair[1].time_offset_ms,
                        i,
                        pair[0].time_offset_ms
                    ),
                ));
            }
        }

        if let Some(i) = keyframes.iter().position(|k| !k.rotation.is_finite()) {
            return Err(SignaError::malformed(
                &gesture,
                format!("keyframe {} has a non-finite rotation", i),
            ));
        }

        if let Some(last) = keyframes.last() {
            if duration_ms < last.time_offset_ms {
                return Err(SignaError::malformed(
                    &gesture,
                    format!(
                        "duration {}ms is shorter than last keyframe at {}ms",
                        duration_ms, last.time_offset_ms
                    ),
                ));
            }
        }

        Ok(Self {
            gesture,
            keyframes,
            duration_ms,
        })
    }

    pub fn gesture(&self) -> &GestureId {
        &self.gesture
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Hold time after the last keyframe
    pub fn trailing_hold_ms(&self) -> u64 {
        let last = self.keyframes.last().map_or(0, |k| k.time_offset_ms);
        self.duration_ms.saturating_sub(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn kf(ms: u64, x: f64) -> Keyframe {
        Keyframe::new(ms, Rotation::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_valid_animation() {
        let anim = GestureAnimation::new(
            GestureId::from("wave"),
            vec![kf(0, 0.0), kf(500, 180.0), kf(1000, 0.0)],
            1200,
        )
        .unwrap();

        assert_eq!(anim.keyframes().len(), 3);
        assert_eq!(anim.duration_ms(), 1200);
        assert_eq!(anim.trailing_hold_ms(), 200);
    }

    #[test]
    fn test_equal_offsets_allowed() {
        let anim = GestureAnimation::new(GestureId::from("snap"), vec![kf(0, 0.0), kf(0, 90.0)], 0);
        assert!(anim.is_ok());
    }

    #[test]
    fn test_unsorted_keyframes_rejected() {
        let err = GestureAnimation::new(
            GestureId::from("G1"),
            vec![kf(0, 0.0), kf(800, 10.0), kf(400, 20.0)],
            1000,
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
        match err {
            SignaError::MalformedData { gesture, .. } => assert_eq!(gesture.as_str(), "G1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_duration_rejected() {
        let err = GestureAnimation::new(GestureId::from("G2"), vec![kf(0, 0.0), kf(1000, 0.0)], 999)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }

    #[test]
    fn test_non_finite_rotation_rejected() {
        let err = GestureAnimation::new(GestureId::from("G3"), vec![kf(0, f64::NAN)], 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }

    #[test]
    fn test_empty_keyframes_allowed() {
        let anim = GestureAnimation::new(GestureId::from("rest"), Vec::new(), 400).unwrap();
        assert!(anim.keyframes().is_empty());
        assert_eq!(anim.trailing_hold_ms(), 400);
    }

    proptest::proptest! {
        #[test]
        fn prop_sorted_keyframes_accepted(mut offsets in proptest::collection::vec(0u64..10_000, 0..32)) {
            offsets.sort_unstable();
            let keyframes: Vec<Keyframe> = offsets.iter().map(|&ms| kf(ms, 45.0)).collect();
            let duration = offsets.last().copied().unwrap_or(0);
            let anim = GestureAnimation::new(GestureId::from("p"), keyframes.clone(), duration).unwrap();
            proptest::prop_assert_eq!(anim.keyframes(), keyframes.as_slice());
        }
    }
}
