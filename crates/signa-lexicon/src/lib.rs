//! SIGNA Lexicon - offline translation profile
//!
//! When no translation service is reachable, a local lexicon maps sentence
//! tokens straight to gesture ids:
//! - text normalisation (lowercase, ASCII punctuation stripped, whitespace split)
//! - gloss lookup, one token to zero or more gestures
//! - positional ids for demo vocabularies

pub mod text;
pub mod lexicon;

pub use text::*;
pub use lexicon::*;
