pub mod extractor;

pub use extractor::extract_sentence_pairs;
use serde::{Deserialize, Serialize};

/// One drill line: the sentence that gets spoken and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    pub text: String,
    pub translation: String,
}

impl SentencePair {
    pub fn new(text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: translation.into(),
        }
    }
}
