//! Scripted gesture source
//!
//! Stands in for the gesture service:
//! - Canned animations and canned failures per id
//! - Fixed latency plus seeded random jitter
//! - Held fetches that complete only when the test releases them

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Notify;

use signa_core::{GestureAnimation, GestureId, SignaError, SignaResult};
use signa_transport::GestureSource;

#[derive(Clone, Debug)]
enum Script {
    Animation(GestureAnimation),
    Failure(SignaError),
}

/// Releases a held fetch
#[derive(Clone, Debug)]
pub struct FetchGate {
    notify: Arc<Notify>,
}

impl FetchGate {
    /// Let one pending (or the next) fetch of the gated id complete
    pub fn release(&self) {
        self.notify.notify_one();
    }
}

/// Gesture source driven by a test script
#[derive(Debug, Default)]
pub struct ScriptedGestureSource {
    scripts: HashMap<GestureId, Script>,
    gates: HashMap<GestureId, Arc<Notify>>,
    latency: Duration,
    jitter: Option<Mutex<(StdRng, Uniform<u64>)>>,
    fetched: Mutex<Vec<GestureId>>,
}

impl ScriptedGestureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `animation` under its own id
    pub fn with_gesture(mut self, animation: GestureAnimation) -> Self {
        self.scripts
            .insert(animation.gesture().clone(), Script::Animation(animation));
        self
    }

    /// Fail every fetch of `id` with `error`
    pub fn with_failure(mut self, id: impl Into<GestureId>, error: SignaError) -> Self {
        self.scripts.insert(id.into(), Script::Failure(error));
        self
    }

    /// Delay every fetch by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add up to `max` of extra delay per fetch, reproducible from `seed`
    pub fn with_jitter(mut self, seed: u64, max: Duration) -> Self {
        let max_ms = max.as_millis() as u64;
        self.jitter = Some(Mutex::new((StdRng::seed_from_u64(seed), Uniform::new_inclusive(0, max_ms))));
        self
    }

    /// Hold fetches of `id` until the returned gate is released
    pub fn hold(&mut self, id: impl Into<GestureId>) -> FetchGate {
        let notify = Arc::new(Notify::new());
        self.gates.insert(id.into(), Arc::clone(&notify));
        FetchGate { notify }
    }

    /// Ids requested so far, in request order
    pub fn fetched(&self) -> Vec<GestureId> {
        self.fetched.lock().clone()
    }

    pub fn fetch_count(&self, id: &GestureId) -> usize {
        self.fetched.lock().iter().filter(|f| *f == id).count()
    }

    fn delay(&self) -> Duration {
        let jitter = match &self.jitter {
            Some(jitter) => {
                let mut guard = jitter.lock();
                let (rng, dist) = &mut *guard;
                Duration::from_millis(dist.sample(rng))
            }
            None => Duration::ZERO,
        };
        self.latency + jitter
    }
}

#[async_trait]
impl GestureSource for ScriptedGestureSource {
    async fn fetch_gesture(&self, gesture: &GestureId) -> SignaResult<GestureAnimation> {
        self.fetched.lock().push(gesture.clone());

        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = self.gates.get(gesture) {
            gate.notified().await;
        }

        match self.scripts.get(gesture) {
            Some(Script::Animation(animation)) => Ok(animation.clone()),
            Some(Script::Failure(error)) => Err(error.clone()),
            None => Err(SignaError::GestureNotFound(gesture.clone())),
        }
    }
}
