//! Speech transcription

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use signa_core::{SignaError, SignaResult};

use crate::http::{network_error, Endpoint, HttpConfig};
use crate::wire::TranscribeResponse;

/// Recorded audio ready for upload
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub file_name: String,
}

impl AudioClip {
    /// A WAV recording, named the way the recorder uploads it
    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/wav".to_string(),
            file_name: "recording.wav".to_string(),
        }
    }
}

/// Turns recorded speech into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> SignaResult<String>;
}

/// `POST {base}/api/v1/transcribe` with multipart field `audio_file`
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    endpoint: Endpoint,
}

impl HttpTranscriber {
    pub fn new(config: &HttpConfig) -> SignaResult<Self> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }

    async fn request(&self, clip: &AudioClip) -> SignaResult<String> {
        let url = self.endpoint.url(&["api", "v1", "transcribe"])?;

        let part = Part::bytes(clip.bytes.clone())
            .file_name(clip.file_name.clone())
            .mime_str(&clip.mime)
            .map_err(|e| SignaError::TranscriptionFailed(format!("invalid audio mime type: {}", e)))?;
        let form = Form::new().part("audio_file", part);

        let response = self
            .endpoint
            .client()
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignaError::TranscriptionFailed(format!(
                "transcription service returned {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(network_error)?;
        let parsed: TranscribeResponse = serde_json::from_slice(&body)
            .map_err(|e| SignaError::TranscriptionFailed(format!("invalid transcription payload: {}", e)))?;
        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> SignaResult<String> {
        debug!(bytes = clip.bytes.len(), mime = %clip.mime, "uploading audio");
        let text = self
            .endpoint
            .bounded("transcription", self.request(clip))
            .await?;
        debug!(chars = text.len(), "audio transcribed");
        Ok(text)
    }
}
