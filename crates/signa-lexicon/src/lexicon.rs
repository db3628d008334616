//! Gloss lexicon - token to gesture lookup

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use signa_core::{GestureId, GestureSequence, SignaError, SignaResult};
use signa_transport::Translator;

use crate::normalize;

/// Word → gestures table
///
/// A word may expand to several gestures (variants recorded for one gloss);
/// all of them are emitted, in table order.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<GestureId>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the JSON object form `{"word": ["id", ...], ...}`
    pub fn from_json(json: &str) -> SignaResult<Self> {
        let raw: HashMap<String, Vec<GestureId>> = serde_json::from_str(json)
            .map_err(|e| SignaError::InvalidConfig(format!("Invalid lexicon: {}", e)))?;

        let mut lexicon = Lexicon::new();
        for (word, gestures) in raw {
            lexicon.insert(&word, gestures);
        }
        Ok(lexicon)
    }

    /// Add or replace an entry; the word is stored lowercased
    pub fn insert(&mut self, word: &str, gestures: Vec<GestureId>) {
        self.entries.insert(word.to_lowercase(), gestures);
    }

    pub fn get(&self, word: &str) -> Option<&[GestureId]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map already-normalised tokens; unknown tokens are skipped
    pub fn map_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> GestureSequence {
        let mut gestures = Vec::new();
        for token in tokens {
            match self.entries.get(token.as_ref()) {
                Some(ids) => gestures.extend(ids.iter().cloned()),
                None => debug!(token = token.as_ref(), "no gesture for token"),
            }
        }
        GestureSequence::new(gestures)
    }
}

/// Offline translator backed by a lexicon
#[derive(Debug, Clone)]
pub struct LexiconTranslator {
    lexicon: Lexicon,
}

impl LexiconTranslator {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn translate_now(&self, text: &str) -> GestureSequence {
        self.lexicon.map_tokens(&normalize(text))
    }
}

#[async_trait]
impl Translator for LexiconTranslator {
    async fn translate(&self, text: &str) -> SignaResult<GestureSequence> {
        Ok(self.translate_now(text))
    }
}

/// One gesture per token, named `gesture_001`, `gesture_002`, ...
///
/// Matches the placeholder vocabulary of the demo gesture service.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalTranslator;

impl PositionalTranslator {
    pub fn translate_now(&self, text: &str) -> GestureSequence {
        text.split_whitespace()
            .enumerate()
            .map(|(i, _)| GestureId::new(format!("gesture_{:03}", i + 1)))
            .collect()
    }
}

#[async_trait]
impl Translator for PositionalTranslator {
    async fn translate(&self, text: &str) -> SignaResult<GestureSequence> {
        Ok(self.translate_now(text))
    }
}
