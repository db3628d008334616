//! Text normalisation
//!
//! Tokens are lowercase words with ASCII punctuation removed. Removal happens
//! before splitting, so "don't" becomes "dont" rather than two tokens.

/// Normalise a sentence into lookup tokens
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}
