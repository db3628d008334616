//! SIGNA Transport Layer - HTTP collaborators
//!
//! This crate provides:
//! - Gesture data client (`GET /api/v1/gesture/{id}`)
//! - Translation client (`POST /api/v1/translate`)
//! - Transcription client (`POST /api/v1/transcribe`)
//! - Wire DTOs and their validation into core types
//!
//! Every client is a thin, retry-free wrapper: failures are classified and
//! handed to the caller, which owns retry policy.

pub mod http;
pub mod wire;
pub mod gesture;
pub mod translate;
pub mod transcribe;

pub use http::{HttpConfig, DEFAULT_TIMEOUT};
pub use wire::*;
pub use gesture::*;
pub use translate::*;
pub use transcribe::*;
