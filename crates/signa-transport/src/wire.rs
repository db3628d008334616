//! Wire format for the collaborating services
//!
//! Gesture payload:
//! `{"keyframes": [{"time": ms, "rotation": {"x": deg, "y": deg, "z": deg}}], "duration": ms}`
//!
//! DTOs are loose (numbers as `f64`, optional duration). Shape problems are
//! reported as `MalformedData` with a reason.

use serde::{Deserialize, Serialize};

use signa_core::{GestureAnimation, GestureId, GestureSequence, Keyframe, Rotation, SignaError, SignaResult};

/// Rotation triple in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationDto {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDto {
    /// Milliseconds from gesture start
    pub time: f64,
    pub rotation: RotationDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureDto {
    pub keyframes: Vec<KeyframeDto>,
    /// Milliseconds; defaults to the last keyframe's offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl GestureDto {
    /// Validate into a core animation
    pub fn into_animation(self, gesture: GestureId) -> SignaResult<GestureAnimation> {
        let mut keyframes = Vec::with_capacity(self.keyframes.len());
        for (i, kf) in self.keyframes.iter().enumerate() {
            let time_offset_ms = millis(&gesture, kf.time, &format!("keyframe {} time", i))?;
            let rotation = Rotation::new(kf.rotation.x, kf.rotation.y, kf.rotation.z);
            keyframes.push(Keyframe::new(time_offset_ms, rotation));
        }

        let duration_ms = match self.duration {
            Some(d) => millis(&gesture, d, "duration")?,
            None => keyframes.last().map_or(0, |k| k.time_offset_ms),
        };

        GestureAnimation::new(gesture, keyframes, duration_ms)
    }

    pub fn from_animation(animation: &GestureAnimation) -> Self {
        GestureDto {
            keyframes: animation
                .keyframes()
                .iter()
                .map(|k| KeyframeDto {
                    time: k.time_offset_ms as f64,
                    rotation: RotationDto {
                        x: k.rotation.x,
                        y: k.rotation.y,
                        z: k.rotation.z,
                    },
                })
                .collect(),
            duration: Some(animation.duration_ms() as f64),
        }
    }
}

fn millis(gesture: &GestureId, value: f64, field: &str) -> SignaResult<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SignaError::malformed(
            gesture,
            format!("{} must be a non-negative number of milliseconds, got {}", field, value),
        ));
    }
    if value.fract() != 0.0 {
        return Err(SignaError::malformed(
            gesture,
            format!("{} must be a whole number of milliseconds, got {}", field, value),
        ));
    }
    Ok(value as u64)
}

/// Decode a gesture payload
pub fn decode_gesture(gesture: &GestureId, body: &[u8]) -> SignaResult<GestureAnimation> {
    let dto: GestureDto = serde_json::from_slice(body)
        .map_err(|e| SignaError::malformed(gesture, format!("invalid gesture payload: {}", e)))?;
    dto.into_animation(gesture.clone())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub gestures: GestureSequence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_core::ErrorKind;

    const DEMO: &str = r#"{
        "keyframes": [
            {"time": 0, "rotation": {"x": 0, "y": 0, "z": 0}},
            {"time": 500, "rotation": {"x": 180, "y": 0, "z": 0}},
            {"time": 1000, "rotation": {"x": 0, "y": 0, "z": 0}}
        ],
        "duration": 1000
    }"#;

    #[test]
    fn test_decode_demo_gesture() {
        let anim = decode_gesture(&GestureId::from("gesture_001"), DEMO.as_bytes()).unwrap();

        assert_eq!(anim.gesture().as_str(), "gesture_001");
        assert_eq!(anim.keyframes().len(), 3);
        assert_eq!(anim.keyframes()[1].time_offset_ms, 500);
        assert_eq!(anim.keyframes()[1].rotation.x, 180.0);
        assert_eq!(anim.duration_ms(), 1000);
    }

    #[test]
    fn test_missing_duration_defaults_to_last_key() {
        let body = br#"{"keyframes": [{"time": 0, "rotation": {"x": 0, "y": 0, "z": 0}},
                                      {"time": 750, "rotation": {"x": 10, "y": 0, "z": 0}}]}"#;
        let anim = decode_gesture(&GestureId::from("g"), body).unwrap();
        assert_eq!(anim.duration_ms(), 750);
    }

    #[test]
    fn test_unsorted_payload_is_malformed() {
        let body = br#"{"keyframes": [{"time": 500, "rotation": {"x": 0, "y": 0, "z": 0}},
                                      {"time": 100, "rotation": {"x": 10, "y": 0, "z": 0}}],
                        "duration": 600}"#;
        let err = decode_gesture(&GestureId::from("g"), body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }

    #[test]
    fn test_negative_time_is_malformed() {
        let body = br#"{"keyframes": [{"time": -5, "rotation": {"x": 0, "y": 0, "z": 0}}], "duration": 10}"#;
        let err = decode_gesture(&GestureId::from("g"), body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = decode_gesture(&GestureId::from("g"), b"<html>oops</html>").unwrap_err();
        match err {
            SignaError::MalformedData { gesture, .. } => assert_eq!(gesture.as_str(), "g"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dto_from_animation() {
        let anim = decode_gesture(&GestureId::from("g"), DEMO.as_bytes()).unwrap();
        let dto = GestureDto::from_animation(&anim);
        assert_eq!(dto.duration, Some(1000.0));
        assert_eq!(dto.keyframes[1].rotation.x, 180.0);
    }

    #[test]
    fn test_translate_response_mixed_ids() {
        let resp: TranslateResponse = serde_json::from_str(r#"{"gestures": ["gesture_001", 12]}"#).unwrap();
        assert_eq!(resp.gestures.len(), 2);
        assert_eq!(resp.gestures.get(1).unwrap().as_str(), "12");
    }
}
