//! Gesture Sequencer - ordered playback with supersession
//!
//! ```text
//! Idle --submit(seq)--> Loading(0)
//! Loading(i) --fetch ok--> Playing(i)
//! Loading(i) --fetch failed--> Error
//! Playing(i) --curve done, more left--> Loading(i+1)
//! Playing(last) --curve done--> Done --> Idle
//! any --submit / stop--> new session (old one is cancelled)
//! ```
//!
//! Every submission advances the generation counter. Each session task
//! carries its generation and, before it touches the shared state, the
//! event stream or the avatar, takes the shared lock and checks that its
//! generation is still current. Superseded sessions therefore fall silent
//! at their next suspension point: a fetch that completes late is dropped,
//! and a playing curve stops before its next frame.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use signa_core::{
    ErrorKind, Generation, GestureAnimation, GestureId, GestureSequence, SignaError, SignaResult,
};
use signa_time::TickSource;
use signa_transport::GestureSource;
use signa_visual::{build_curve, EulerRadians, PoseTarget};

use crate::{GenerationCounter, PlaybackDriver, PlaybackOutcome, PlaybackToken, SequencerConfig};

/// Observable sequencer state
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerState {
    Idle,
    Loading {
        generation: Generation,
        index: usize,
        gesture: GestureId,
    },
    Playing {
        generation: Generation,
        index: usize,
        gesture: GestureId,
    },
    /// Set on completion and replaced by `Idle` under the same lock, so
    /// `state()` and `watch_state()` never observe it. Completion is
    /// reported by `SequencerEvent::SessionCompleted`.
    Done { generation: Generation },
    /// Sticky until the next submit or stop
    Error {
        generation: Generation,
        gesture: GestureId,
        kind: ErrorKind,
    },
}

impl SequencerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SequencerState::Idle)
    }

    /// Loading or playing
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SequencerState::Loading { .. } | SequencerState::Playing { .. }
        )
    }

    pub fn generation(&self) -> Option<Generation> {
        match self {
            SequencerState::Idle => None,
            SequencerState::Loading { generation, .. }
            | SequencerState::Playing { generation, .. }
            | SequencerState::Done { generation }
            | SequencerState::Error { generation, .. } => Some(*generation),
        }
    }
}

/// Progress notifications, in the order they happen
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    SessionStarted {
        generation: Generation,
        gestures: usize,
    },
    GestureLoading {
        generation: Generation,
        index: usize,
        gesture: GestureId,
    },
    GesturePlaying {
        generation: Generation,
        index: usize,
        gesture: GestureId,
        frames: u32,
    },
    GestureCompleted {
        generation: Generation,
        index: usize,
        gesture: GestureId,
    },
    SessionCompleted {
        generation: Generation,
        played: usize,
    },
    /// Emitted by whoever superseded the session, never by the session itself
    SessionCancelled { generation: Generation },
    SessionFailed {
        generation: Generation,
        index: usize,
        gesture: GestureId,
        kind: ErrorKind,
        message: String,
    },
}

impl SequencerEvent {
    pub fn generation(&self) -> Generation {
        match self {
            SequencerEvent::SessionStarted { generation, .. }
            | SequencerEvent::GestureLoading { generation, .. }
            | SequencerEvent::GesturePlaying { generation, .. }
            | SequencerEvent::GestureCompleted { generation, .. }
            | SequencerEvent::SessionCompleted { generation, .. }
            | SequencerEvent::SessionCancelled { generation }
            | SequencerEvent::SessionFailed { generation, .. } => *generation,
        }
    }
}

/// How a session ended, as seen by its submitter
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// All gestures played
    Completed { played: usize },
    /// Superseded by a later submit, `stop` or `teardown`
    Cancelled { played: usize },
    /// A gesture could not be loaded; the rest of the sequence was skipped
    Failed {
        gesture: GestureId,
        error: SignaError,
        played: usize,
    },
    /// The empty sequence: nothing to play
    Empty,
    /// The session task panicked or was aborted
    Aborted,
}

enum Pending {
    Ready(SessionOutcome),
    Running(JoinHandle<SessionOutcome>),
}

/// Handle on one submitted sequence
pub struct SessionHandle {
    generation: Generation,
    pending: Pending,
}

impl SessionHandle {
    fn ready(generation: Generation, outcome: SessionOutcome) -> Self {
        SessionHandle {
            generation,
            pending: Pending::Ready(outcome),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        match &self.pending {
            Pending::Ready(_) => true,
            Pending::Running(task) => task.is_finished(),
        }
    }

    /// Wait for the session to end
    pub async fn wait(self) -> SessionOutcome {
        match self.pending {
            Pending::Ready(outcome) => outcome,
            Pending::Running(task) => match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(generation = %self.generation, error = %e, "session task did not finish");
                    SessionOutcome::Aborted
                }
            },
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("generation", &self.generation)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Everything guarded by the shared lock
struct Cell {
    target: Box<dyn PoseTarget>,
    /// Generation of the session still loading or playing, if any
    active: Option<Generation>,
    closed: bool,
}

struct Shared {
    counter: Arc<GenerationCounter>,
    cell: Mutex<Cell>,
    target_name: String,
    state: watch::Sender<SequencerState>,
    events: broadcast::Sender<SequencerEvent>,
}

impl Shared {
    /// Run `f` only if `generation` is still current
    ///
    /// The check and `f` happen under the lock that `submit` advances the
    /// counter under, so nothing stale slips in between.
    fn gated<R>(&self, generation: Generation, f: impl FnOnce(&mut Cell) -> R) -> Option<R> {
        let mut cell = self.cell.lock();
        if !self.counter.is_current(generation) {
            return None;
        }
        Some(f(&mut cell))
    }

    fn publish(&self, generation: Generation, state: SequencerState, event: SequencerEvent) -> bool {
        self.gated(generation, |_| {
            self.set_state(state);
            self.emit(event);
        })
        .is_some()
    }

    fn announce(&self, generation: Generation, event: SequencerEvent) -> bool {
        self.gated(generation, |_| self.emit(event)).is_some()
    }

    fn set_state(&self, state: SequencerState) {
        self.state.send_replace(state);
    }

    fn emit(&self, event: SequencerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Cancel the running session and refuse new ones
    ///
    /// Returns false if already closed.
    fn close(&self) -> bool {
        let mut cell = self.cell.lock();
        if cell.closed {
            return false;
        }
        cell.closed = true;
        self.supersede(&mut cell);
        self.set_state(SequencerState::Idle);
        true
    }

    /// Cancel whatever is running and move to a fresh generation
    ///
    /// Caller holds the lock.
    fn supersede(&self, cell: &mut Cell) -> Generation {
        if let Some(previous) = cell.active.take() {
            info!(generation = %previous, "session cancelled");
            self.emit(SequencerEvent::SessionCancelled {
                generation: previous,
            });
        }
        self.counter.advance()
    }
}

/// The pose target as seen by one session's driver
struct GatedTarget {
    shared: Arc<Shared>,
    generation: Generation,
}

impl PoseTarget for GatedTarget {
    fn name(&self) -> &str {
        &self.shared.target_name
    }

    fn apply_rotation(&mut self, rotation: EulerRadians) {
        self.shared
            .gated(self.generation, |cell| cell.target.apply_rotation(rotation));
    }
}

/// Plays gesture sequences onto a single avatar
///
/// Cheap to clone; clones drive the same avatar and share one generation
/// counter. Must be created inside a Tokio runtime, which session tasks are
/// spawned onto. Dropping the last clone tears the sequencer down.
#[derive(Clone)]
pub struct Sequencer {
    inner: Arc<Inner>,
}

/// Owned by `Sequencer` clones only; session tasks hold `Shared`
struct Inner {
    shared: Arc<Shared>,
    source: Arc<dyn GestureSource>,
    ticks: Arc<dyn TickSource>,
    config: SequencerConfig,
    runtime: Handle,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.shared.close() {
            debug!("sequencer dropped");
        }
    }
}

impl Sequencer {
    pub fn new(
        source: Arc<dyn GestureSource>,
        target: impl PoseTarget + 'static,
        ticks: Arc<dyn TickSource>,
        config: SequencerConfig,
    ) -> SignaResult<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| {
            SignaError::InvalidConfig(format!("Sequencer needs a Tokio runtime: {}", e))
        })?;

        let (state, _) = watch::channel(SequencerState::Idle);
        let (events, _) = broadcast::channel(config.event_capacity);
        let target_name = target.name().to_string();

        let shared = Arc::new(Shared {
            counter: Arc::new(GenerationCounter::new()),
            cell: Mutex::new(Cell {
                target: Box::new(target),
                active: None,
                closed: false,
            }),
            target_name,
            state,
            events,
        });

        Ok(Sequencer {
            inner: Arc::new(Inner {
                shared,
                source,
                ticks,
                config,
                runtime,
            }),
        })
    }

    /// Start playing `sequence`, cancelling whatever is in progress
    ///
    /// The empty sequence still supersedes: the sequencer goes idle and the
    /// returned handle resolves to `SessionOutcome::Empty`.
    pub fn submit(&self, sequence: GestureSequence) -> SignaResult<SessionHandle> {
        let inner = &self.inner;
        let shared = &inner.shared;
        let mut cell = shared.cell.lock();
        if cell.closed {
            return Err(SignaError::SequencerClosed);
        }
        if sequence.len() > inner.config.max_sequence_len {
            return Err(SignaError::SequenceTooLong {
                len: sequence.len(),
                max: inner.config.max_sequence_len,
            });
        }

        let generation = shared.supersede(&mut cell);
        let Some(first) = sequence.get(0).cloned() else {
            shared.set_state(SequencerState::Idle);
            debug!(%generation, "empty sequence submitted");
            return Ok(SessionHandle::ready(generation, SessionOutcome::Empty));
        };

        info!(%generation, gestures = sequence.len(), "session started");
        cell.active = Some(generation);
        shared.emit(SequencerEvent::SessionStarted {
            generation,
            gestures: sequence.len(),
        });
        shared.set_state(SequencerState::Loading {
            generation,
            index: 0,
            gesture: first,
        });
        let token = PlaybackToken::new(generation, Arc::clone(&shared.counter));
        drop(cell);

        let session = Session {
            shared: Arc::clone(shared),
            source: Arc::clone(&inner.source),
            ticks: Arc::clone(&inner.ticks),
            config: inner.config.clone(),
            token,
        };
        let task = inner.runtime.spawn(session.run(sequence));

        Ok(SessionHandle {
            generation,
            pending: Pending::Running(task),
        })
    }

    /// Cancel the current session, if any, and go idle
    pub fn stop(&self) {
        let shared = &self.inner.shared;
        let mut cell = shared.cell.lock();
        if cell.closed {
            return;
        }
        shared.supersede(&mut cell);
        shared.set_state(SequencerState::Idle);
    }

    /// Cancel the current session and refuse further submissions
    ///
    /// Also happens when the last clone is dropped.
    pub fn teardown(&self) {
        if self.inner.shared.close() {
            info!("sequencer closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shared.cell.lock().closed
    }

    pub fn state(&self) -> SequencerState {
        self.inner.shared.state.borrow().clone()
    }

    /// Follow state changes; intermediate states may be coalesced
    pub fn watch_state(&self) -> watch::Receiver<SequencerState> {
        self.inner.shared.state.subscribe()
    }

    /// Every event from now on, up to `event_capacity` behind
    pub fn subscribe(&self) -> broadcast::Receiver<SequencerEvent> {
        self.inner.shared.events.subscribe()
    }

    pub fn generation(&self) -> Generation {
        self.inner.shared.counter.current()
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.inner.config
    }
}

/// One submitted sequence, run on its own task
struct Session {
    shared: Arc<Shared>,
    source: Arc<dyn GestureSource>,
    ticks: Arc<dyn TickSource>,
    config: SequencerConfig,
    token: PlaybackToken,
}

impl Session {
    async fn run(self, sequence: GestureSequence) -> SessionOutcome {
        let generation = self.token.generation();
        let mut played = 0;

        for (index, gesture) in sequence.iter().enumerate() {
            let loading = self.shared.publish(
                generation,
                SequencerState::Loading {
                    generation,
                    index,
                    gesture: gesture.clone(),
                },
                SequencerEvent::GestureLoading {
                    generation,
                    index,
                    gesture: gesture.clone(),
                },
            );
            if !loading {
                return self.cancelled(played);
            }

            let animation = match self.fetch(gesture).await {
                Ok(animation) => animation,
                Err(error) => return self.fail(index, gesture, error, played),
            };

            let curve = build_curve(&animation, self.config.frame_rate);
            debug!(
                %generation,
                %gesture,
                end_frame = curve.end_frame(),
                hold_ms = animation.trailing_hold_ms(),
                "curve built"
            );
            let playing = self.shared.publish(
                generation,
                SequencerState::Playing {
                    generation,
                    index,
                    gesture: gesture.clone(),
                },
                SequencerEvent::GesturePlaying {
                    generation,
                    index,
                    gesture: gesture.clone(),
                    frames: curve.end_frame().saturating_add(1),
                },
            );
            if !playing {
                return self.cancelled(played);
            }

            let mut target = GatedTarget {
                shared: Arc::clone(&self.shared),
                generation,
            };
            let mut ticks = self.ticks.ticks(curve.frame_rate());
            let outcome = PlaybackDriver
                .play(&curve, &mut target, &self.token, ticks.as_mut())
                .await;

            match outcome {
                PlaybackOutcome::Completed { .. } => {
                    played += 1;
                    let completed = self.shared.announce(
                        generation,
                        SequencerEvent::GestureCompleted {
                            generation,
                            index,
                            gesture: gesture.clone(),
                        },
                    );
                    if !completed {
                        return self.cancelled(played);
                    }
                }
                PlaybackOutcome::Cancelled { .. } => return self.cancelled(played),
            }
        }

        let finished = self.shared.gated(generation, |cell| {
            cell.active = None;
            self.shared.set_state(SequencerState::Done { generation });
            self.shared
                .emit(SequencerEvent::SessionCompleted { generation, played });
            self.shared.set_state(SequencerState::Idle);
        });
        if finished.is_none() {
            return self.cancelled(played);
        }

        info!(%generation, played, "session completed");
        SessionOutcome::Completed { played }
    }

    /// Fetch with the configured upper bound, whatever the source does
    async fn fetch(&self, gesture: &GestureId) -> SignaResult<GestureAnimation> {
        match timeout(self.config.fetch_timeout, self.source.fetch_gesture(gesture)).await {
            Ok(result) => result,
            Err(_) => Err(SignaError::NetworkError(format!(
                "fetching {} timed out after {:?}",
                gesture, self.config.fetch_timeout
            ))),
        }
    }

    fn fail(&self, index: usize, gesture: &GestureId, error: SignaError, played: usize) -> SessionOutcome {
        let generation = self.token.generation();
        let kind = error.kind();

        let reported = self.shared.gated(generation, |cell| {
            cell.active = None;
            self.shared.set_state(SequencerState::Error {
                generation,
                gesture: gesture.clone(),
                kind,
            });
            self.shared.emit(SequencerEvent::SessionFailed {
                generation,
                index,
                gesture: gesture.clone(),
                kind,
                message: error.to_string(),
            });
        });
        if reported.is_none() {
            // Superseded while the fetch was in flight; the failure is moot
            return self.cancelled(played);
        }

        warn!(%generation, %gesture, index, %kind, error = %error, "session failed");
        SessionOutcome::Failed {
            gesture: gesture.clone(),
            error,
            played,
        }
    }

    fn cancelled(&self, played: usize) -> SessionOutcome {
        debug!(generation = %self.token.generation(), played, "session superseded");
        SessionOutcome::Cancelled { played }
    }
}
