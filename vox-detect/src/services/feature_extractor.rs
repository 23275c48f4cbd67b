//! Time-domain feature extraction
//!
//! Computes the three descriptors the classifier scores:
//! - Energy: mean of squared samples
//! - Zero-crossing rate: mean absolute first difference of the sample signs
//! - Peak density: strict local maxima of |x| at or above the signal's
//!   standard deviation, per sample
//!
//! All functions are total: empty, single-sample, and constant inputs yield
//! zeros rather than NaN or a panic.

use crate::models::FeatureVector;

/// Extract the feature vector of a mono waveform
pub fn extract_features(samples: &[f32]) -> FeatureVector {
    let features = FeatureVector {
        energy: compute_energy(samples),
        zero_crossing_rate: compute_zero_crossing_rate(samples),
        peak_density: compute_peak_density(samples),
    };

    tracing::debug!(
        "Audio features: energy={:.6}, zcr={:.4}, peak_density={:.5}, samples={}",
        features.energy,
        features.zero_crossing_rate,
        features.peak_density,
        samples.len()
    );

    features
}

/// Mean of squared sample values
pub fn compute_energy(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum();
    sum_squares / samples.len() as f64
}

fn sign(sample: f32) -> i8 {
    if sample > 0.0 {
        1
    } else if sample < 0.0 {
        -1
    } else {
        0
    }
}

/// Mean of `|sign(x[i+1]) - sign(x[i])|` over all adjacent pairs
///
/// A full crossing (+ to -) contributes 2, touching zero contributes 1, so
/// the result lies in [0, 2].
pub fn compute_zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let total: u64 = samples
        .windows(2)
        .map(|w| (sign(w[1]) - sign(w[0])).unsigned_abs() as u64)
        .sum();

    total as f64 / (samples.len() - 1) as f64
}

/// Population standard deviation of the signed samples
pub fn standard_deviation(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Count strict local maxima of `|x|` whose height is at least `threshold`
///
/// The first and last samples are never peaks. No minimum distance,
/// prominence, or width filtering is applied.
pub fn count_peaks(samples: &[f32], threshold: f64) -> usize {
    if samples.len() < 3 {
        return 0;
    }

    samples
        .windows(3)
        .filter(|w| {
            let (prev, mid, next) = (w[0].abs() as f64, w[1].abs() as f64, w[2].abs() as f64);
            mid > prev && mid > next && mid >= threshold
        })
        .count()
}

/// Qualifying peaks per sample, threshold = standard deviation of the signal
pub fn compute_peak_density(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let threshold = standard_deviation(samples);
    count_peaks(samples, threshold) as f64 / samples.len() as f64
}
