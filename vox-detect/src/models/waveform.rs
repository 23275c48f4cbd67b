//! Decoded mono waveform

/// Mono PCM samples at their native sample rate
///
/// Produced by [`crate::utils::audio_decoder::decode_waveform`], which mixes
/// multi-channel audio down to a single channel and never returns an empty
/// waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Mono samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
