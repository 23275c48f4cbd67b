//! Audio Decoding Utilities
//!
//! **Purpose:** Decode a scratch audio file to a mono f32 [`Waveform`]
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, FLAC, AAC, OGG, ...).
//! The file extension is only a probe hint; the container is detected from
//! its content where symphonia allows.

use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::{i24, u24, Sample};

use crate::error::DetectionError;
use crate::models::Waveform;

/// Decode an audio file to a mono waveform
///
/// **Algorithm:**
/// 1. Open file and probe format using symphonia
/// 2. Find first decodable track
/// 3. Decode all packets of that track, skipping corrupt ones
/// 4. Average channels to mono per frame
///
/// # Errors
/// * [`DetectionError::Io`] - file cannot be opened
/// * [`DetectionError::DecodeFailed`] - unknown container, unsupported codec,
///   unreadable stream, unknown sample rate, or no samples at all
pub fn decode_waveform(file_path: &Path) -> Result<Waveform, DetectionError> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DetectionError::DecodeFailed(format!("Unrecognized audio container: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DetectionError::DecodeFailed("No audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| DetectionError::DecodeFailed("Sample rate unknown".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DetectionError::DecodeFailed(format!("Unsupported codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // End of stream
                break;
            }
            Err(e) => {
                return Err(DetectionError::DecodeFailed(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(e) if is_recoverable(&e) => {
                skipped_packets += 1;
                tracing::warn!("Skipping corrupt audio packet: {}", e);
                continue;
            }
            Err(e) => {
                return Err(DetectionError::DecodeFailed(format!("Failed to decode packet: {}", e)));
            }
        };

        append_mono(&decoded, &mut samples);
    }

    if samples.is_empty() {
        return Err(DetectionError::DecodeFailed(
            "Audio contains no samples".to_string(),
        ));
    }

    tracing::debug!(
        path = %file_path.display(),
        sample_rate,
        total_samples = samples.len(),
        skipped_packets,
        "Audio decoding complete"
    );

    Ok(Waveform::new(samples, sample_rate))
}

/// Corrupt packets (e.g. a damaged MP3 frame) are skipped; anything else aborts
fn is_recoverable(err: &SymphoniaError) -> bool {
    matches!(err, SymphoniaError::DecodeError(_))
}

/// Append one decoded buffer to `out`, averaging channels per frame
fn append_mono(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => mix_to_mono::<u8>(buf, out),
        AudioBufferRef::U16(buf) => mix_to_mono::<u16>(buf, out),
        AudioBufferRef::U24(buf) => mix_to_mono::<u24>(buf, out),
        AudioBufferRef::U32(buf) => mix_to_mono::<u32>(buf, out),
        AudioBufferRef::S8(buf) => mix_to_mono::<i8>(buf, out),
        AudioBufferRef::S16(buf) => mix_to_mono::<i16>(buf, out),
        AudioBufferRef::S24(buf) => mix_to_mono::<i24>(buf, out),
        AudioBufferRef::S32(buf) => mix_to_mono::<i32>(buf, out),
        AudioBufferRef::F32(buf) => mix_to_mono::<f32>(buf, out),
        AudioBufferRef::F64(buf) => mix_to_mono::<f64>(buf, out),
    }
}

fn mix_to_mono<S: Sample>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
where
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return;
    }

    out.reserve(buf.frames());
    for frame_idx in 0..buf.frames() {
        let sum: f32 = (0..num_channels)
            .map(|ch| f32::from_sample(buf.chan(ch)[frame_idx]))
            .sum();
        out.push(sum / num_channels as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_wav(samples_per_channel: &[Vec<i16>], sample_rate: u32) -> tempfile::NamedTempFile {
        let file = Builder::new().suffix(".wav").tempfile().unwrap();
        let spec = hound::WavSpec {
            channels: samples_per_channel.len() as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
        for i in 0..samples_per_channel[0].len() {
            for channel in samples_per_channel {
                writer.write_sample(channel[i]).unwrap();
            }
        }
        writer.finalize().unwrap();
        file
    }

    #[test]
    fn test_only_decode_errors_are_recoverable() {
        assert!(is_recoverable(&SymphoniaError::DecodeError("invalid main_data offset")));
        assert!(!is_recoverable(&SymphoniaError::Unsupported("codec")));
        assert!(!is_recoverable(&SymphoniaError::ResetRequired));
        assert!(!is_recoverable(&SymphoniaError::IoError(std::io::Error::other("read"))));
    }

    #[test]
    fn test_decode_audio_file_not_found() {
        let result = decode_waveform(Path::new("/nonexistent/file.wav"));
        assert!(matches!(result, Err(DetectionError::Io(_))));
    }

    #[test]
    fn test_decode_mono_wav() {
        let tone: Vec<i16> = (0..1600)
            .map(|i| ((i as f32 * 0.1).sin() * 8000.0) as i16)
            .collect();
        let file = write_wav(&[tone.clone()], 16000);

        let waveform = decode_waveform(file.path()).unwrap();
        assert_eq!(waveform.sample_rate, 16000);
        assert_eq!(waveform.len(), 1600);
        assert!((waveform.samples[10] - tone[10] as f32 / 32768.0).abs() < 1e-4);
    }

    #[test]
    fn test_stereo_is_averaged_to_mono() {
        let left: Vec<i16> = (0..800).map(|i| ((i % 100) as i16 - 50) * 100).collect();
        let right: Vec<i16> = left.iter().map(|s| -s).collect();
        let file = write_wav(&[left, right], 8000);

        let waveform = decode_waveform(file.path()).unwrap();
        assert_eq!(waveform.len(), 800);
        assert!(waveform.samples.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn test_stereo_mean_of_channels() {
        let left = vec![16384i16; 400];
        let right = vec![0i16; 400];
        let file = write_wav(&[left, right], 8000);

        let waveform = decode_waveform(file.path()).unwrap();
        assert!(waveform.samples.iter().all(|s| (s - 0.25).abs() < 1e-4));
    }

    #[test]
    fn test_garbage_is_decode_failure() {
        let mut file = Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"this is definitely not a RIFF container").unwrap();
        file.flush().unwrap();

        let result = decode_waveform(file.path());
        assert!(matches!(result, Err(DetectionError::DecodeFailed(_))));
    }

    #[test]
    fn test_empty_wav_is_decode_failure() {
        let file = write_wav(&[Vec::new()], 16000);
        let result = decode_waveform(file.path());
        assert!(matches!(result, Err(DetectionError::DecodeFailed(_))));
    }
}
