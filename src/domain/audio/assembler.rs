use super::clip::{samples_for_ms, PcmClip, MASTER_SAMPLE_RATE};
use super::error::AudioError;
use super::ledger::{EntryStatus, SyncLedger, SyncLedgerEntry};
use crate::domain::sentence::SentencePair;
use crate::domain::tts::SynthesisResult;

/// Each sentence is spoken this many times in a row
pub const REPEAT_COUNT: usize = 3;
/// Silence before every repetition and once after the last one
pub const REPEAT_PAD_MS: u64 = 1000;
/// Silence between two consecutive sentence groups
pub const SENTENCE_GAP_MS: u64 = 2000;

/// The concatenated drill track plus its timing ledger
#[derive(Debug, Clone)]
pub struct MasterTrack {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub total_duration_ms: u64,
    pub ledger: SyncLedger,
}

impl MasterTrack {
    pub fn total_duration_sec(&self) -> f64 {
        self.total_duration_ms as f64 / 1000.0
    }
}

/// Run-scoped accumulator for the master track.
///
/// `push` consumes the assembler and hands it back, so one run threads a
/// single value through every sentence and nothing is shared between runs.
/// Sentences must be pushed in input order.
#[derive(Debug)]
pub struct ClipAssembler {
    samples: Vec<f32>,
    sample_rate: u32,
    running_total_ms: u64,
    ledger: SyncLedger,
    voiced: usize,
}

impl Default for ClipAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipAssembler {
    pub fn new() -> Self {
        Self::with_sample_rate(MASTER_SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            running_total_ms: 0,
            ledger: SyncLedger::default(),
            voiced: 0,
        }
    }

    /// Append one sentence and its ledger entry.
    ///
    /// The inter-sentence gap goes in front of every sentence but the first,
    /// which is the same timeline as appending it after every sentence but
    /// the last. Failed sentences contribute no audio of their own, only the
    /// gap, and still get a `Failed` ledger entry.
    pub fn push(mut self, pair: &SentencePair, result: &SynthesisResult) -> Self {
        if !self.ledger.is_empty() {
            self.append_silence(SENTENCE_GAP_MS);
        }

        let start_ms = self.running_total_ms;
        let status = match result.clip() {
            Some(clip) if !clip.is_empty() => {
                self.append_repeated(clip);
                self.voiced += 1;
                EntryStatus::Success
            }
            _ => EntryStatus::Failed,
        };

        tracing::debug!(
            sentence_index = self.ledger.len(),
            start_ms = start_ms,
            end_ms = self.running_total_ms,
            status = ?status,
            "Sentence appended to master track"
        );

        self.ledger.push(SyncLedgerEntry {
            text: pair.text.clone(),
            translation: pair.translation.clone(),
            start_sec: ms_to_sec(start_ms),
            end_sec: ms_to_sec(self.running_total_ms),
            status,
        });

        debug_assert_eq!(
            self.samples.len(),
            samples_for_ms(self.running_total_ms, self.sample_rate)
        );

        self
    }

    pub fn running_total_ms(&self) -> u64 {
        self.running_total_ms
    }

    pub fn ledger(&self) -> &SyncLedger {
        &self.ledger
    }

    /// Close the run. Fails when no sentence contributed audio, so an all
    /// silent file never passes for a real artifact.
    pub fn finish(self) -> Result<MasterTrack, AudioError> {
        if self.voiced == 0 {
            return Err(AudioError::EmptyArtifact);
        }

        Ok(MasterTrack {
            samples: self.samples,
            sample_rate: self.sample_rate,
            total_duration_ms: self.running_total_ms,
            ledger: self.ledger,
        })
    }

    fn append_silence(&mut self, duration_ms: u64) {
        let new_len = self.samples.len() + samples_for_ms(duration_ms, self.sample_rate);
        self.samples.resize(new_len, 0.0);
        self.running_total_ms += duration_ms;
    }

    fn append_repeated(&mut self, clip: &PcmClip) {
        let clip = clip
            .clone()
            .resampled(self.sample_rate)
            .padded_to_whole_ms();
        let clip_ms = clip.duration_ms();

        for _ in 0..REPEAT_COUNT {
            self.append_silence(REPEAT_PAD_MS);
            self.samples.extend_from_slice(&clip.samples);
            self.running_total_ms += clip_ms;
        }
        self.append_silence(REPEAT_PAD_MS);
    }
}

/// Fold a complete, ordered run into a master track
pub fn assemble<'a, I>(items: I) -> Result<MasterTrack, AudioError>
where
    I: IntoIterator<Item = (&'a SentencePair, &'a SynthesisResult)>,
{
    items
        .into_iter()
        .fold(ClipAssembler::new(), |assembler, (pair, result)| {
            assembler.push(pair, result)
        })
        .finish()
}

fn ms_to_sec(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
