//! Identity types for SIGNA
//!
//! Gesture identifiers are opaque: whatever the translation vocabulary hands
//! out is carried verbatim. Generations identify which playback session is
//! authoritative.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Gesture identity - a name in the translation vocabulary
///
/// The translation service may answer with strings or integers; both are
/// accepted and kept in textual form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawGestureId", into = "String")]
pub struct GestureId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGestureId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawGestureId> for GestureId {
    fn from(raw: RawGestureId) -> Self {
        match raw {
            RawGestureId::Text(s) => GestureId(s),
            RawGestureId::Signed(n) => GestureId(n.to_string()),
            RawGestureId::Unsigned(n) => GestureId(n.to_string()),
        }
    }
}

impl GestureId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        GestureId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GestureId {
    fn from(s: &str) -> Self {
        GestureId(s.to_string())
    }
}

impl From<String> for GestureId {
    fn from(s: String) -> Self {
        GestureId(s)
    }
}

impl From<u64> for GestureId {
    fn from(n: u64) -> Self {
        GestureId(n.to_string())
    }
}

impl From<GestureId> for String {
    fn from(id: GestureId) -> Self {
        id.0
    }
}

impl fmt::Debug for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gesture({})", self.0)
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered list of gestures - insertion order is playback order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureSequence(Vec<GestureId>);

impl GestureSequence {
    pub fn new(gestures: Vec<GestureId>) -> Self {
        GestureSequence(gestures)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GestureId> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GestureId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[GestureId] {
        &self.0
    }
}

impl<T: Into<GestureId>> FromIterator<T> for GestureSequence {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        GestureSequence(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for GestureSequence {
    type Item = GestureId;
    type IntoIter = std::vec::IntoIter<GestureId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a GestureSequence {
    type Item = &'a GestureId;
    type IntoIter = std::slice::Iter<'a, GestureId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Playback session generation - monotonically increasing per sequencer
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub const ZERO: Generation = Generation(0);

    #[inline]
    pub fn new(value: u64) -> Self {
        Generation(value)
    }

    #[inline]
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
