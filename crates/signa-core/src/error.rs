//! Error types for SIGNA

use std::fmt;

use thiserror::Error;

use crate::GestureId;

/// Core SIGNA errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignaError {
    // Gesture resolution errors
    #[error("Gesture not found: {0}")]
    GestureNotFound(GestureId),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed data for gesture {gesture}: {reason}")]
    MalformedData { gesture: GestureId, reason: String },

    // Playback errors
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("Sequence too long: {len} gestures (max {max})")]
    SequenceTooLong { len: usize, max: usize },

    #[error("Sequencer closed")]
    SequencerClosed,

    // Pipeline errors
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SignaError {
    pub fn malformed(gesture: &GestureId, reason: impl Into<String>) -> Self {
        SignaError::MalformedData {
            gesture: gesture.clone(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SignaError::GestureNotFound(_) => ErrorKind::GestureNotFound,
            SignaError::NetworkError(_) => ErrorKind::Network,
            SignaError::MalformedData { .. } => ErrorKind::MalformedData,
            SignaError::InvalidFrameRate(_)
            | SignaError::SequenceTooLong { .. }
            | SignaError::InvalidConfig(_) => ErrorKind::Invalid,
            SignaError::SequencerClosed => ErrorKind::Closed,
            SignaError::TranscriptionFailed(_) => ErrorKind::Transcription,
            SignaError::TranslationFailed(_) => ErrorKind::Translation,
        }
    }
}

/// Failure kind, as reported alongside the failing gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    GestureNotFound,
    Network,
    MalformedData,
    Invalid,
    Closed,
    Transcription,
    Translation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::GestureNotFound => "gesture_not_found",
            ErrorKind::Network => "network",
            ErrorKind::MalformedData => "malformed_data",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Closed => "closed",
            ErrorKind::Transcription => "transcription",
            ErrorKind::Translation => "translation",
        };
        f.write_str(name)
    }
}

/// Result type for SIGNA operations
pub type SignaResult<T> = Result<T, SignaError>;
