//! Runtime configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use signa_core::{FrameRate, SignaError, SignaResult};
use signa_transport::{HttpConfig, DEFAULT_TIMEOUT};

/// Sequencer configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Rate curves are built and played at
    pub frame_rate: FrameRate,
    /// Upper bound on one gesture fetch, whatever the source
    pub fetch_timeout: Duration,
    /// Buffered events per subscriber before lagging
    pub event_capacity: usize,
    /// Longest sequence accepted by `submit`
    pub max_sequence_len: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        SequencerConfig {
            frame_rate: FrameRate::DEFAULT,
            fetch_timeout: DEFAULT_TIMEOUT,
            event_capacity: 64,
            max_sequence_len: 256,
        }
    }
}

impl SequencerConfig {
    /// Half-rate playback for battery-powered displays
    pub fn low_power() -> Self {
        SequencerConfig {
            frame_rate: FrameRate::LOW_POWER,
            ..Default::default()
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn validate(&self) -> SignaResult<()> {
        if self.fetch_timeout.is_zero() {
            return Err(SignaError::InvalidConfig("fetch_timeout must be positive".into()));
        }
        if self.event_capacity == 0 {
            return Err(SignaError::InvalidConfig("event_capacity must be positive".into()));
        }
        if self.max_sequence_len == 0 {
            return Err(SignaError::InvalidConfig("max_sequence_len must be positive".into()));
        }
        Ok(())
    }
}

/// Base URLs of the backing services
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub transcription_url: String,
    pub translation_url: String,
    pub gesture_url: String,
    /// Per-request bound applied to every client
    pub timeout: Duration,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        ServiceEndpoints {
            transcription_url: "http://localhost:8000".to_string(),
            translation_url: "http://localhost:8000".to_string(),
            gesture_url: "http://localhost:8002".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceEndpoints {
    /// All three services behind one base URL
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        ServiceEndpoints {
            transcription_url: base_url.clone(),
            translation_url: base_url.clone(),
            gesture_url: base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn transcription(&self) -> HttpConfig {
        HttpConfig::new(self.transcription_url.clone()).with_timeout(self.timeout)
    }

    pub fn translation(&self) -> HttpConfig {
        HttpConfig::new(self.translation_url.clone()).with_timeout(self.timeout)
    }

    pub fn gesture(&self) -> HttpConfig {
        HttpConfig::new(self.gesture_url.clone()).with_timeout(self.timeout)
    }
}
