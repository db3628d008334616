//! Speech pipeline - audio or text in, signed gestures out

use std::sync::Arc;

use tracing::{debug, info};

use signa_core::{SignaError, SignaResult};
use signa_time::IntervalTickSource;
use signa_transport::{
    AudioClip, HttpGestureClient, HttpTranscriber, HttpTranslator, Transcriber, Translator,
};
use signa_visual::PoseTarget;

use crate::{Sequencer, SequencerConfig, ServiceEndpoints, SessionHandle};

/// Transcriber, translator and sequencer wired in a row
///
/// Each call supersedes whatever the sequencer was playing, exactly as a
/// direct `submit` would. A failed transcription or translation leaves the
/// current playback untouched.
#[derive(Clone)]
pub struct SpeechPipeline {
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    sequencer: Sequencer,
}

impl SpeechPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
        sequencer: Sequencer,
    ) -> Self {
        SpeechPipeline {
            transcriber,
            translator,
            sequencer,
        }
    }

    /// HTTP clients for every service, real-time ticks
    pub fn connect(
        endpoints: &ServiceEndpoints,
        target: impl PoseTarget + 'static,
        config: SequencerConfig,
    ) -> SignaResult<Self> {
        let gestures = HttpGestureClient::new(&endpoints.gesture())?;
        let translator = HttpTranslator::new(&endpoints.translation())?;
        let transcriber = HttpTranscriber::new(&endpoints.transcription())?;
        let sequencer = Sequencer::new(Arc::new(gestures), target, Arc::new(IntervalTickSource), config)?;

        info!(
            gesture_url = %endpoints.gesture_url,
            translation_url = %endpoints.translation_url,
            transcription_url = %endpoints.transcription_url,
            "speech pipeline connected"
        );
        Ok(Self::new(Arc::new(transcriber), Arc::new(translator), sequencer))
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Translate `text` and play the result
    pub async fn play_text(&self, text: &str) -> SignaResult<SessionHandle> {
        let gestures = self.translator.translate(text).await.map_err(|e| match e {
            SignaError::TranslationFailed(_) => e,
            other => SignaError::TranslationFailed(other.to_string()),
        })?;

        debug!(chars = text.len(), gestures = gestures.len(), "text translated");
        self.sequencer.submit(gestures)
    }

    /// Transcribe `clip`, then play its translation
    pub async fn play_audio(&self, clip: &AudioClip) -> SignaResult<SessionHandle> {
        let text = self.transcriber.transcribe(clip).await.map_err(|e| match e {
            SignaError::TranscriptionFailed(_) => e,
            other => SignaError::TranscriptionFailed(other.to_string()),
        })?;

        debug!(bytes = clip.bytes.len(), chars = text.len(), "audio transcribed");
        self.play_text(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use signa_core::{ErrorKind, GestureAnimation, GestureId, GestureSequence, Keyframe, Rotation};
    use signa_transport::GestureSource;
    use signa_visual::AvatarPose;

    use crate::{SequencerState, SessionOutcome};

    /// Every id resolves to the same short hold
    struct AnyGesture;

    #[async_trait]
    impl GestureSource for AnyGesture {
        async fn fetch_gesture(&self, gesture: &GestureId) -> SignaResult<GestureAnimation> {
            GestureAnimation::new(
                gesture.clone(),
                vec![Keyframe::new(0, Rotation::new(45.0, 0.0, 0.0))],
                50,
            )
        }
    }

    /// One gesture per word, or an error when configured
    struct WordTranslator {
        fail: Option<SignaError>,
    }

    #[async_trait]
    impl Translator for WordTranslator {
        async fn translate(&self, text: &str) -> SignaResult<GestureSequence> {
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(text.split_whitespace().collect()),
            }
        }
    }

    struct FixedTranscriber(SignaResult<String>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _clip: &AudioClip) -> SignaResult<String> {
            self.0.clone()
        }
    }

    fn pipeline(transcript: SignaResult<String>, fail: Option<SignaError>) -> SpeechPipeline {
        let sequencer = Sequencer::new(
            Arc::new(AnyGesture),
            AvatarPose::new("avatar"),
            Arc::new(IntervalTickSource),
            SequencerConfig::default(),
        )
        .unwrap();
        SpeechPipeline::new(
            Arc::new(FixedTranscriber(transcript)),
            Arc::new(WordTranslator { fail }),
            sequencer,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_audio() {
        let pipeline = pipeline(Ok("hello there".to_string()), None);

        let handle = pipeline.play_audio(&AudioClip::wav(vec![0; 16])).await.unwrap();
        assert_eq!(handle.wait().await, SessionOutcome::Completed { played: 2 });
        assert!(pipeline.sequencer().state().is_idle());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_idle_noop() {
        let pipeline = pipeline(Ok(String::new()), None);

        let handle = pipeline.play_audio(&AudioClip::wav(vec![])).await.unwrap();
        assert_eq!(handle.wait().await, SessionOutcome::Empty);
    }

    #[tokio::test]
    async fn test_transcription_failure_kind() {
        let pipeline = pipeline(Err(SignaError::NetworkError("refused".into())), None);

        let err = pipeline.play_audio(&AudioClip::wav(vec![1])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transcription);
        assert_eq!(pipeline.sequencer().generation().value(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_translation_failure_keeps_playback() {
        let ok = pipeline(Ok(String::new()), None);
        let running = ok.play_text("one two three").await.unwrap();

        // Same sequencer, failing translator
        let failing = SpeechPipeline::new(
            Arc::new(FixedTranscriber(Ok(String::new()))),
            Arc::new(WordTranslator {
                fail: Some(SignaError::NetworkError("timed out".into())),
            }),
            ok.sequencer().clone(),
        );
        let err = failing.play_text("four").await.unwrap_err();
        assert!(matches!(err, SignaError::TranslationFailed(_)));
        assert!(matches!(ok.sequencer().state(), SequencerState::Loading { .. } | SequencerState::Playing { .. }));

        assert_eq!(running.wait().await, SessionOutcome::Completed { played: 3 });
    }
}
