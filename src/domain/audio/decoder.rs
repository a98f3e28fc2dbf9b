use super::clip::{downmix_to_mono, PcmClip, MASTER_SAMPLE_RATE};
use super::error::AudioError;
use std::io::Cursor;
use symphonia::core::{
    audio::SampleBuffer,
    codecs::DecoderOptions,
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

/// Decode MP3 bytes from the TTS provider into a mono clip at the master
/// sample rate.
pub fn decode_mp3(data: &[u8]) -> Result<PcmClip, AudioError> {
    if data.is_empty() {
        return Err(AudioError::Decode("empty audio payload".to_string()));
    }

    let source = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());
    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions {
                enable_gapless: true,
                ..Default::default()
            },
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Decode(format!("unrecognized audio container: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| AudioError::Decode("no audio track found".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("unsupported codec: {}", e)))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(AudioError::Decode(format!("failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend(downmix_to_mono(buffer.samples(), spec.channels.count()));
            }
            // Corrupt frames are skipped, the rest of the stream is still usable
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!(error = %e, "Skipping undecodable MP3 frame");
            }
            Err(e) => return Err(AudioError::Decode(format!("decoder failure: {}", e))),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(AudioError::Decode("decoded 0 samples".to_string()));
    }

    tracing::debug!(
        input_bytes = data.len(),
        decoded_samples = samples.len(),
        sample_rate = sample_rate,
        "MP3 decoded"
    );

    Ok(PcmClip::new(samples, sample_rate).resampled(MASTER_SAMPLE_RATE))
}
