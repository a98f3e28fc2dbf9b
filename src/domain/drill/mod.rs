pub mod error;
pub mod naming;
pub mod service;

use crate::domain::audio::SyncLedger;
use crate::domain::sentence::{extract_sentence_pairs, SentencePair};
use crate::domain::tts::VoiceConfig;
use serde::{Deserialize, Serialize};

pub use error::DrillServiceError;
pub use naming::artifact_name;
pub use service::{DrillService, DrillServiceApi};

/// Body of POST /api/drills. Either raw `text` (alternating sentence and
/// translation lines) or explicit `pairs`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RenderDrillRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    pub pairs: Option<Vec<SentencePair>>,
    pub language: Option<String>,
}

impl RenderDrillRequest {
    /// Explicit pairs are trimmed and must have both sides filled in
    pub fn sentence_pairs(&self) -> Result<Vec<SentencePair>, DrillServiceError> {
        match (&self.pairs, &self.text) {
            (Some(pairs), _) if !pairs.is_empty() => pairs
                .iter()
                .enumerate()
                .map(|(index, pair)| trimmed_pair(index, pair))
                .collect(),
            (_, Some(text)) => Ok(extract_sentence_pairs(text)),
            _ => Ok(Vec::new()),
        }
    }
}

fn trimmed_pair(index: usize, pair: &SentencePair) -> Result<SentencePair, DrillServiceError> {
    let text = pair.text.trim();
    let translation = pair.translation.trim();
    if text.is_empty() || translation.is_empty() {
        return Err(DrillServiceError::Invalid(format!(
            "pair {} needs both text and translation",
            index
        )));
    }
    Ok(SentencePair::new(text, translation))
}

/// One pipeline run, fully resolved
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub pairs: Vec<SentencePair>,
    pub voice: VoiceConfig,
    pub logical_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillRender {
    pub artifact_key: String,
    pub sync_ledger: SyncLedger,
    /// Indices of sentences that were skipped
    pub failed_sentences: Vec<usize>,
    pub total_duration_sec: f64,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactQuery {
    pub key: String,
    pub ttl: Option<u64>,
}
