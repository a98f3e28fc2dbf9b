use super::error::DrillServiceError;
use super::{DrillRender, RenderRequest};
use crate::domain::audio::{AudioEncoder, ClipAssembler};
use crate::domain::storage::{ContentPersister, SignedUrl};
use crate::domain::tts::{SpeechSynthesizer, SynthesisResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Runs the drill pipeline: synthesize every sentence in order, assemble the
/// repeated-clip track, encode it, then persist the artifact.
pub struct DrillService {
    synthesizer: Arc<SpeechSynthesizer>,
    persister: Arc<ContentPersister>,
    encoder: AudioEncoder,
}

impl DrillService {
    pub fn new(synthesizer: Arc<SpeechSynthesizer>, persister: Arc<ContentPersister>) -> Self {
        Self {
            synthesizer,
            persister,
            encoder: AudioEncoder::default(),
        }
    }
}

#[async_trait]
pub trait DrillServiceApi: Send + Sync {
    async fn render(&self, request: RenderRequest) -> Result<DrillRender, DrillServiceError>;

    async fn resolve_url(
        &self,
        key: &str,
        ttl: Option<Duration>,
    ) -> Result<SignedUrl, DrillServiceError>;

    async fn discard(&self, key: &str) -> Result<(), DrillServiceError>;
}

#[async_trait]
impl DrillServiceApi for DrillService {
    async fn render(&self, request: RenderRequest) -> Result<DrillRender, DrillServiceError> {
        if request.pairs.is_empty() {
            return Err(DrillServiceError::EmptyInput);
        }
        if let Some(index) = request.pairs.iter().position(|p| p.text.trim().is_empty()) {
            return Err(DrillServiceError::Invalid(format!(
                "sentence {} has no text to speak",
                index
            )));
        }

        let start_time = std::time::Instant::now();
        tracing::info!(
            sentence_count = request.pairs.len(),
            voice = %request.voice,
            provider = self.synthesizer.provider_name(),
            logical_name = %request.logical_name,
            "Drill render started"
        );

        // Sequential so the ledger follows input order
        let mut assembler = ClipAssembler::new();
        for (index, pair) in request.pairs.iter().enumerate() {
            let result = self.synthesizer.synthesize(&pair.text, &request.voice).await;
            if let SynthesisResult::Failed { reason } = &result {
                tracing::warn!(
                    sentence_index = index,
                    reason = %reason,
                    "Sentence skipped in drill track"
                );
            }
            assembler = assembler.push(pair, &result);
        }

        let track = assembler.finish().map_err(|e| {
            tracing::error!(
                sentence_count = request.pairs.len(),
                "Drill render produced no audio"
            );
            DrillServiceError::from(e)
        })?;
        let ledger = track.ledger.clone();

        let encoder = self.encoder.clone();
        let artifact = tokio::task::spawn_blocking(move || encoder.encode(track))
            .await
            .map_err(|e| anyhow::anyhow!("encoder task failed: {}", e))??;

        if artifact.bytes.is_empty() {
            return Err(DrillServiceError::EmptyArtifact);
        }

        let key = self
            .persister
            .save(&request.logical_name, &artifact.bytes, artifact.mime)
            .await?;

        let failed_sentences = ledger.failed_indices();
        tracing::info!(
            artifact_key = %key,
            sentence_count = ledger.len(),
            failed_count = failed_sentences.len(),
            total_duration_sec = artifact.total_duration_sec(),
            latency_ms = start_time.elapsed().as_millis(),
            "Drill render completed"
        );

        Ok(DrillRender {
            artifact_key: key.to_string(),
            sync_ledger: ledger,
            failed_sentences,
            total_duration_sec: artifact.total_duration_sec(),
        })
    }

    async fn resolve_url(
        &self,
        key: &str,
        ttl: Option<Duration>,
    ) -> Result<SignedUrl, DrillServiceError> {
        Ok(self.persister.url(key, ttl).await?)
    }

    async fn discard(&self, key: &str) -> Result<(), DrillServiceError> {
        Ok(self.persister.delete(key).await?)
    }
}
