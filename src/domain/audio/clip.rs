/// Sample rate of the master track. Divisible by 1000 so every whole
/// millisecond maps to a whole number of samples.
pub const MASTER_SAMPLE_RATE: u32 = 24_000;

/// Mono PCM audio, samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn silence(duration_ms: u64, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; samples_for_ms(duration_ms, sample_rate)],
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration rounded up to the next whole millisecond
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000).div_ceil(self.sample_rate as u64)
    }

    /// Pad with trailing silence so the clip ends exactly on a millisecond
    /// boundary.
    pub fn padded_to_whole_ms(mut self) -> Self {
        let target = samples_for_ms(self.duration_ms(), self.sample_rate);
        self.samples.resize(target.max(self.samples.len()), 0.0);
        self
    }

    /// Resample with linear interpolation. A no-op when the rate already
    /// matches.
    pub fn resampled(self, target_rate: u32) -> Self {
        if self.sample_rate == target_rate {
            return self;
        }
        if self.samples.is_empty() || self.sample_rate == 0 {
            return Self::new(Vec::new(), target_rate);
        }

        let ratio = self.sample_rate as f64 / target_rate as f64;
        let out_len = ((self.samples.len() as f64) / ratio).round() as usize;
        let last = self.samples.len() - 1;

        let samples = (0..out_len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = (pos.floor() as usize).min(last);
                let next = (idx + 1).min(last);
                let frac = (pos - idx as f64) as f32;
                self.samples[idx] * (1.0 - frac) + self.samples[next] * frac
            })
            .collect();

        Self {
            samples,
            sample_rate: target_rate,
        }
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}

pub fn samples_for_ms(duration_ms: u64, sample_rate: u32) -> usize {
    (duration_ms * sample_rate as u64 / 1000) as usize
}

/// Average interleaved channels down to mono
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect(),
    }
}
