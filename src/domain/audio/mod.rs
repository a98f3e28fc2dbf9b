pub mod assembler;
pub mod clip;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ledger;

pub use assembler::{assemble, ClipAssembler, MasterTrack};
pub use clip::{PcmClip, MASTER_SAMPLE_RATE};
pub use decoder::decode_mp3;
pub use encoder::{encode_mp3, AudioArtifact, AudioEncoder};
pub use error::AudioError;
pub use ledger::{EntryStatus, SyncLedger, SyncLedgerEntry};
