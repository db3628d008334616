//! SIGNA Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the SIGNA avatar player:
//! - Identifiers (GestureId, Generation)
//! - Sequences of gestures as submitted by a translator
//! - Keyframes and validated gesture animations
//! - Frame rate arithmetic
//! - The error taxonomy shared by every layer

pub mod id;
pub mod time;
pub mod gesture;
pub mod error;

pub use id::*;
pub use time::*;
pub use gesture::*;
pub use error::*;
