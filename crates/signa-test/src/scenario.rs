//! Scenario harness
//!
//! A live `Sequencer` wired to a scripted source and a recording target,
//! with the event stream captured from the start.
//!
//! Real-time scenarios use interval ticks and are meant for
//! `#[tokio::test(start_paused = true)]`. Manual scenarios move only when
//! the test steps them.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use signa_core::{Generation, GestureSequence, SignaResult};
use signa_runtime::{Sequencer, SequencerConfig, SequencerEvent, SessionHandle};
use signa_time::{IntervalTickSource, TickSource};

use crate::{ManualTickSource, PoseLog, RecordingPoseTarget, ScriptedGestureSource};

/// Polls given to other tasks per manual tick
const SETTLE_YIELDS: usize = 8;

pub struct Scenario {
    sequencer: Sequencer,
    source: Arc<ScriptedGestureSource>,
    poses: PoseLog,
    events: broadcast::Receiver<SequencerEvent>,
    manual: Option<Arc<ManualTickSource>>,
}

impl Scenario {
    /// Default configuration, real-time ticks
    pub fn new(source: ScriptedGestureSource) -> SignaResult<Self> {
        Self::with_config(source, SequencerConfig::default())
    }

    pub fn with_config(source: ScriptedGestureSource, config: SequencerConfig) -> SignaResult<Self> {
        Self::build(source, config, Arc::new(IntervalTickSource), None)
    }

    /// Ticks only advance through `step`
    pub fn manual(source: ScriptedGestureSource, config: SequencerConfig) -> SignaResult<Self> {
        let ticks = Arc::new(ManualTickSource::new());
        Self::build(source, config, ticks.clone(), Some(ticks))
    }

    fn build(
        source: ScriptedGestureSource,
        config: SequencerConfig,
        ticks: Arc<dyn TickSource>,
        manual: Option<Arc<ManualTickSource>>,
    ) -> SignaResult<Self> {
        let source = Arc::new(source);
        let target = RecordingPoseTarget::new("avatar");
        let poses = target.log();
        let sequencer = Sequencer::new(source.clone(), target, ticks, config)?;
        let events = sequencer.subscribe();

        Ok(Scenario {
            sequencer,
            source,
            poses,
            events,
            manual,
        })
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn source(&self) -> &ScriptedGestureSource {
        &self.source
    }

    pub fn poses(&self) -> &PoseLog {
        &self.poses
    }

    /// Submit a sequence of ids
    pub fn submit(&self, ids: &[&str]) -> SignaResult<SessionHandle> {
        let sequence: GestureSequence = ids.iter().copied().collect();
        self.sequencer.submit(sequence)
    }

    /// Let spawned sessions run until they block
    pub async fn settle(&self) {
        for _ in 0..SETTLE_YIELDS {
            tokio::task::yield_now().await;
        }
    }

    /// Issue `n` ticks one at a time, settling after each
    ///
    /// No-op for real-time scenarios.
    pub async fn step(&self, n: u64) {
        let Some(ticks) = &self.manual else {
            return;
        };
        for _ in 0..n {
            ticks.advance(1);
            self.settle().await;
        }
    }

    /// Events emitted since the last call
    pub fn events(&mut self) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }

    /// Events emitted since the last call, restricted to one generation
    pub fn events_for(&mut self, generation: Generation) -> Vec<SequencerEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.generation() == generation)
            .collect()
    }
}
