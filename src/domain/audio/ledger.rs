use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Success,
    Failed,
}

/// Where one sentence sounds inside the master track.
///
/// Serializes to the playback wire shape `{text, translation, start, end}`;
/// the status stays out of the wire format and is reported separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLedgerEntry {
    pub text: String,
    pub translation: String,
    #[serde(rename = "start")]
    pub start_sec: f64,
    #[serde(rename = "end")]
    pub end_sec: f64,
    #[serde(skip)]
    pub status: EntryStatus,
}

/// One entry per input sentence, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncLedger(Vec<SyncLedgerEntry>);

impl SyncLedger {
    pub fn new(entries: Vec<SyncLedgerEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[SyncLedgerEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, entry: SyncLedgerEntry) {
        self.0.push(entry);
    }

    pub fn last_end_sec(&self) -> f64 {
        self.0.last().map(|e| e.end_sec).unwrap_or(0.0)
    }

    /// Indices of sentences whose synthesis failed
    pub fn failed_indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, e)| e.status == EntryStatus::Failed)
            .map(|(i, _)| i)
            .collect()
    }

    /// Starts never decrease and no entry overlaps the next one
    pub fn is_monotonic(&self) -> bool {
        self.0.iter().all(|e| e.start_sec <= e.end_sec)
            && self
                .0
                .windows(2)
                .all(|w| w[0].start_sec <= w[1].start_sec && w[0].end_sec <= w[1].start_sec)
    }
}
