//! Gesture data client

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use signa_core::{GestureAnimation, GestureId, SignaError, SignaResult};

use crate::http::{network_error, Endpoint, HttpConfig};
use crate::wire::decode_gesture;

/// Source of timed gesture data
///
/// Implementations hold no per-call mutable state, so concurrent fetches of
/// different ids are safe. No retries: the caller owns retry policy.
#[async_trait]
pub trait GestureSource: Send + Sync {
    async fn fetch_gesture(&self, gesture: &GestureId) -> SignaResult<GestureAnimation>;
}

/// `GET {base}/api/v1/gesture/{id}`
#[derive(Debug, Clone)]
pub struct HttpGestureClient {
    endpoint: Endpoint,
}

impl HttpGestureClient {
    pub fn new(config: &HttpConfig) -> SignaResult<Self> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }

    async fn request(&self, gesture: &GestureId) -> SignaResult<GestureAnimation> {
        // URL path normalisation would resolve these to the collection
        if matches!(gesture.as_str(), "." | "..") {
            return Err(SignaError::GestureNotFound(gesture.clone()));
        }
        let url = self.endpoint.url(&["api", "v1", "gesture", gesture.as_str()])?;

        let response = self
            .endpoint
            .client()
            .get(url)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SignaError::GestureNotFound(gesture.clone()));
        }
        if !status.is_success() {
            return Err(SignaError::NetworkError(format!(
                "gesture service returned {} for {}",
                status, gesture
            )));
        }

        let body = response.bytes().await.map_err(network_error)?;
        decode_gesture(gesture, &body)
    }
}

#[async_trait]
impl GestureSource for HttpGestureClient {
    async fn fetch_gesture(&self, gesture: &GestureId) -> SignaResult<GestureAnimation> {
        debug!(%gesture, "fetching gesture");
        let animation = self
            .endpoint
            .bounded("gesture fetch", self.request(gesture))
            .await?;
        debug!(
            %gesture,
            keyframes = animation.keyframes().len(),
            duration_ms = animation.duration_ms(),
            "gesture fetched"
        );
        Ok(animation)
    }
}
