//! Hand-cranked render ticks
//!
//! Every tick stream created by a `ManualTickSource` sees the same ticks,
//! counted from the moment the stream was created. Nothing moves until the
//! test calls `advance`.

use async_trait::async_trait;
use tokio::sync::watch;

use signa_core::FrameRate;
use signa_time::{FrameTicks, TickSource};

/// Source of manually advanced ticks
#[derive(Debug)]
pub struct ManualTickSource {
    issued: watch::Sender<u64>,
}

impl Default for ManualTickSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTickSource {
    pub fn new() -> Self {
        let (issued, _) = watch::channel(0);
        Self { issued }
    }

    /// Issue `n` ticks to every live stream
    pub fn advance(&self, n: u64) {
        self.issued.send_modify(|issued| *issued += n);
    }

    /// Ticks issued so far
    pub fn issued(&self) -> u64 {
        *self.issued.borrow()
    }

    /// A stream that starts counting now
    pub fn stream(&self) -> ManualTicks {
        let rx = self.issued.subscribe();
        let seen = *rx.borrow();
        ManualTicks { rx, seen }
    }
}

impl TickSource for ManualTickSource {
    fn ticks(&self, _rate: FrameRate) -> Box<dyn FrameTicks> {
        Box::new(self.stream())
    }
}

/// One consumer of a `ManualTickSource`
#[derive(Debug)]
pub struct ManualTicks {
    rx: watch::Receiver<u64>,
    seen: u64,
}

#[async_trait]
impl FrameTicks for ManualTicks {
    async fn next_tick(&mut self) {
        loop {
            let issued = *self.rx.borrow_and_update();
            if issued > self.seen {
                self.seen += 1;
                return;
            }
            if self.rx.changed().await.is_err() {
                // Source dropped: time has stopped
                std::future::pending::<()>().await;
            }
        }
    }
}
