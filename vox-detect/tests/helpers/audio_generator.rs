//! Audio Test Fixture Generator
//!
//! Utilities for generating WAV fixtures (tones or silence) on disk or in
//! memory

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Sine frequency in Hz; `None` produces digital silence
    pub frequency: Option<f32>,
    /// Peak amplitude as a fraction of full scale
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 16000,
            channels: 1,
            frequency: Some(440.0),
            amplitude: 0.5,
        }
    }
}

impl AudioConfig {
    pub fn silence() -> Self {
        Self {
            frequency: None,
            ..Default::default()
        }
    }

    pub fn tone(frequency: f32) -> Self {
        Self {
            frequency: Some(frequency),
            ..Default::default()
        }
    }
}

fn write_samples<W: std::io::Write + std::io::Seek>(
    mut writer: hound::WavWriter<W>,
    config: &AudioConfig,
) -> anyhow::Result<()> {
    let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

    for i in 0..total_samples {
        let sample = match config.frequency {
            None => 0,
            Some(freq) => {
                let t = i as f32 / config.sample_rate as f32;
                (config.amplitude * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32)
                    as i16
            }
        };

        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

fn spec_for(config: &AudioConfig) -> hound::WavSpec {
    hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Generate a test WAV file with specified configuration
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    let writer = hound::WavWriter::create(path, spec_for(config))?;
    write_samples(writer, config)?;
    Ok(path.to_path_buf())
}

/// Encode a WAV in memory
pub fn wav_bytes(config: &AudioConfig) -> Vec<u8> {
    let mut bytes = Vec::new();
    let writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec_for(config))
        .expect("WAV header");
    write_samples(writer, config).expect("WAV samples");
    bytes
}

/// Encode a WAV in memory as standard base64
pub fn wav_base64(config: &AudioConfig) -> String {
    STANDARD.encode(wav_bytes(config))
}
