//! Text-to-gesture translation

use async_trait::async_trait;
use tracing::debug;

use signa_core::{GestureSequence, SignaError, SignaResult};

use crate::http::{network_error, Endpoint, HttpConfig};
use crate::wire::{TranslateRequest, TranslateResponse};

/// Turns a sentence into an ordered gesture sequence
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> SignaResult<GestureSequence>;
}

/// `POST {base}/api/v1/translate {"text": ...}`
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    endpoint: Endpoint,
}

impl HttpTranslator {
    pub fn new(config: &HttpConfig) -> SignaResult<Self> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }

    async fn request(&self, text: &str) -> SignaResult<GestureSequence> {
        let url = self.endpoint.url(&["api", "v1", "translate"])?;

        let response = self
            .endpoint
            .client()
            .post(url)
            .json(&TranslateRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignaError::TranslationFailed(format!(
                "translation service returned {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(network_error)?;
        let parsed: TranslateResponse = serde_json::from_slice(&body)
            .map_err(|e| SignaError::TranslationFailed(format!("invalid translation payload: {}", e)))?;
        Ok(parsed.gestures)
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> SignaResult<GestureSequence> {
        let gestures = self
            .endpoint
            .bounded("translation", self.request(text))
            .await?;
        debug!(gestures = gestures.len(), "text translated");
        Ok(gestures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_core::{ErrorKind, GestureId};

    #[tokio::test]
    async fn test_translate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/translate")
            .match_body(mockito::Matcher::Json(serde_json::json!({"text": "i want water"})))
            .with_status(200)
            .with_body(r#"{"gestures": ["gesture_001", "gesture_002", "gesture_003"]}"#)
            .create_async()
            .await;

        let translator = HttpTranslator::new(&HttpConfig::new(server.url())).unwrap();
        let seq = translator.translate("i want water").await.unwrap();

        mock.assert_async().await;
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(2), Some(&GestureId::from("gesture_003")));
    }

    #[tokio::test]
    async fn test_translate_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/translate")
            .with_status(200)
            .with_body(r#"{"gestures": []}"#)
            .create_async()
            .await;

        let translator = HttpTranslator::new(&HttpConfig::new(server.url())).unwrap();
        assert!(translator.translate("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_translate_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/translate")
            .with_status(400)
            .create_async()
            .await;

        let translator = HttpTranslator::new(&HttpConfig::new(server.url())).unwrap();
        let err = translator.translate("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Translation);
    }
}
