//! Recording pose target

use std::sync::Arc;

use parking_lot::Mutex;

use signa_visual::{EulerRadians, PoseTarget};

/// Shared view of everything written to a `RecordingPoseTarget`
#[derive(Clone, Debug, Default)]
pub struct PoseLog {
    writes: Arc<Mutex<Vec<EulerRadians>>>,
}

impl PoseLog {
    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.lock().is_empty()
    }

    pub fn writes(&self) -> Vec<EulerRadians> {
        self.writes.lock().clone()
    }

    /// Writes from index `from` on
    pub fn since(&self, from: usize) -> Vec<EulerRadians> {
        self.writes.lock().get(from..).map(<[_]>::to_vec).unwrap_or_default()
    }

    pub fn last(&self) -> Option<EulerRadians> {
        self.writes.lock().last().copied()
    }
}

/// Pose target that keeps every rotation it receives
#[derive(Debug)]
pub struct RecordingPoseTarget {
    name: String,
    log: PoseLog,
}

impl RecordingPoseTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: PoseLog::default(),
        }
    }

    /// Handle that stays valid after the target is moved into a sequencer
    pub fn log(&self) -> PoseLog {
        self.log.clone()
    }
}

impl PoseTarget for RecordingPoseTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_rotation(&mut self, rotation: EulerRadians) {
        self.log.writes.lock().push(rotation);
    }
}
