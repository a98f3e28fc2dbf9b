pub mod audio;
pub mod drill;
pub mod sentence;
pub mod storage;
pub mod tts;
