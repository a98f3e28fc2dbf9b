use super::assembler::MasterTrack;
use super::error::AudioError;
use mp3lame_encoder::{Bitrate, Builder, FlushGap, MonoPcm, Quality};

/// Peak level of the final artifact, in dB below full scale
pub const TARGET_PEAK_DBFS: f32 = -1.0;

pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// LAME needs this much spare room to flush its last frames
const FLUSH_BUFFER_BYTES: usize = 7200;

/// Encoded drill audio, owned by the run until it is handed to storage
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub total_duration_ms: u64,
    pub mime: &'static str,
}

impl AudioArtifact {
    pub fn total_duration_sec(&self) -> f64 {
        self.total_duration_ms as f64 / 1000.0
    }
}

/// Normalizes the master track's loudness and serializes it to MP3
#[derive(Debug, Clone)]
pub struct AudioEncoder {
    target_peak_dbfs: f32,
}

impl Default for AudioEncoder {
    fn default() -> Self {
        Self {
            target_peak_dbfs: TARGET_PEAK_DBFS,
        }
    }
}

impl AudioEncoder {
    /// CPU bound; callers on the async runtime should run this on a blocking
    /// thread.
    pub fn encode(&self, track: MasterTrack) -> Result<AudioArtifact, AudioError> {
        let MasterTrack {
            mut samples,
            sample_rate,
            total_duration_ms,
            ..
        } = track;

        let gain = peak_normalize(&mut samples, self.target_peak_dbfs);
        let bytes = encode_mp3(&samples, sample_rate)?;

        tracing::info!(
            samples = samples.len(),
            sample_rate = sample_rate,
            normalization_gain = format!("{:.3}", gain),
            encoded_bytes = bytes.len(),
            total_duration_ms = total_duration_ms,
            "Master track encoded"
        );

        Ok(AudioArtifact {
            bytes,
            total_duration_ms,
            mime: AUDIO_MIME_TYPE,
        })
    }
}

/// Scale samples so the loudest one sits at `target_dbfs`. Silent input is
/// left untouched. Returns the gain that was applied.
pub fn peak_normalize(samples: &mut [f32], target_dbfs: f32) -> f32 {
    let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
    if peak <= f32::EPSILON {
        return 1.0;
    }

    let target = 10_f32.powf(target_dbfs / 20.0);
    let gain = target / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
    gain
}

/// Encode mono float samples as a constant bitrate MP3 stream.
///
/// The stream opens with a LAME info frame recording encoder delay and
/// padding, so gapless decoders line the first sample up with offset zero.
pub fn encode_mp3(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    let mut builder = Builder::new()
        .ok_or_else(|| AudioError::Encode("could not allocate LAME encoder".to_string()))?;
    builder
        .set_num_channels(1)
        .map_err(|e| AudioError::Encode(format!("channels: {:?}", e)))?;
    builder
        .set_sample_rate(sample_rate)
        .map_err(|e| AudioError::Encode(format!("sample rate {}: {:?}", sample_rate, e)))?;
    builder
        .set_brate(Bitrate::Kbps96)
        .map_err(|e| AudioError::Encode(format!("bitrate: {:?}", e)))?;
    builder
        .set_quality(Quality::Good)
        .map_err(|e| AudioError::Encode(format!("quality: {:?}", e)))?;
    builder
        .set_to_write_vbr_tag(true)
        .map_err(|e| AudioError::Encode(format!("lame tag: {:?}", e)))?;
    let mut encoder = builder
        .build()
        .map_err(|e| AudioError::Encode(format!("encoder init: {:?}", e)))?;

    let pcm: Vec<i16> = samples
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
        .collect();

    let mut out = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(pcm.len()));
    encoder
        .encode_to_vec(MonoPcm(&pcm), &mut out)
        .map_err(|e| AudioError::Encode(format!("{:?}", e)))?;

    out.reserve(FLUSH_BUFFER_BYTES);
    encoder
        .flush_to_vec::<FlushGap>(&mut out)
        .map_err(|e| AudioError::Encode(format!("flush: {:?}", e)))?;

    write_lame_tag(&encoder, &mut out)?;

    Ok(out)
}

/// LAME reserves the first frame of the stream; fill it in now that delay
/// and padding are known.
fn write_lame_tag(encoder: &mp3lame_encoder::Encoder, out: &mut [u8]) -> Result<(), AudioError> {
    let mut tag = Vec::with_capacity(encoder.lame_tag_size());
    let written = encoder
        .lame_tag_encode_to_vec(&mut tag)
        .ok_or_else(|| AudioError::Encode("could not build LAME tag frame".to_string()))?
        .get();

    if written > out.len() {
        return Err(AudioError::Encode(format!(
            "LAME tag frame of {} bytes exceeds stream of {} bytes",
            written,
            out.len()
        )));
    }
    out[..written].copy_from_slice(&tag[..written]);
    Ok(())
}
