//! Shared HTTP plumbing for the service clients

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use tokio::time::timeout;

use signa_core::{SignaError, SignaResult};

/// Default bound on a single request, body included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client construction parameters
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Service base URL, e.g. `http://localhost:8002`
    pub base_url: String,
    /// Upper bound on one request
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A validated base URL plus a configured client
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl Endpoint {
    pub(crate) fn new(config: &HttpConfig) -> SignaResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| SignaError::InvalidConfig(format!("Invalid base URL {}: {}", config.base_url, e)))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(SignaError::InvalidConfig(format!(
                "Base URL must use http or https: {}",
                config.base_url
            )));
        }
        if base.cannot_be_a_base() {
            return Err(SignaError::InvalidConfig(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SignaError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Endpoint {
            client,
            base,
            timeout: config.timeout,
        })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Append path segments to the base URL, escaping each one
    ///
    /// `.` and `..` segments are dropped by the URL parser.
    pub(crate) fn url(&self, segments: &[&str]) -> SignaResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SignaError::InvalidConfig(format!("Base URL cannot carry a path: {}", self.base)))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// Run a request future under the endpoint's timeout
    pub(crate) async fn bounded<T, F>(&self, what: &str, fut: F) -> SignaResult<T>
    where
        F: Future<Output = SignaResult<T>>,
    {
        match timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SignaError::NetworkError(format!(
                "{} timed out after {:?}",
                what, self.timeout
            ))),
        }
    }
}

/// Classify a transport failure
pub(crate) fn network_error(e: reqwest::Error) -> SignaError {
    if e.is_timeout() {
        SignaError::NetworkError(format!("request timed out: {}", e))
    } else {
        SignaError::NetworkError(e.to_string())
    }
}
