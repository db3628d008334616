//! Generation counter and playback tokens
//!
//! Each submitted sequence gets the next generation. A token remembers the
//! generation it was issued for and is live only while that generation is
//! still current, so advancing the counter cancels every outstanding token
//! at once. Nothing is signalled: work checks its token at each suspension
//! boundary and stops on its own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use signa_core::Generation;

/// Monotonic source of session generations
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Move to the next generation, invalidating every issued token
    pub fn advance(&self) -> Generation {
        let previous = self.current.fetch_add(1, Ordering::AcqRel);
        Generation(previous).next()
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }

    /// Token for the current generation
    pub fn token(self: &Arc<Self>) -> PlaybackToken {
        PlaybackToken {
            generation: self.current(),
            authority: Arc::clone(self),
        }
    }
}

/// Cancellation token tied to one generation
#[derive(Debug, Clone)]
pub struct PlaybackToken {
    generation: Generation,
    authority: Arc<GenerationCounter>,
}

impl PlaybackToken {
    /// Token for a specific generation
    ///
    /// Issued under the same lock that advanced the counter, this cannot pick
    /// up a newer generation by accident.
    pub fn new(generation: Generation, authority: Arc<GenerationCounter>) -> Self {
        PlaybackToken {
            generation,
            authority,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        !self.authority.is_current(self.generation)
    }

    /// Cancel this token (and any sibling of the same generation)
    ///
    /// No-op when already superseded.
    pub fn cancel(&self) {
        let _ = self.authority.current.compare_exchange(
            self.generation.value(),
            self.generation.next().value(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}
