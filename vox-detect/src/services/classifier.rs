//! Rule-based AI / human voice scoring
//!
//! Starts from a neutral score of 0.5 and adds 0.2 for each indicator of
//! synthetic audio:
//! - peak density below 0.01: "uniform waveform structure"
//! - zero-crossing rate below 0.05: "low zero-crossing rate"
//!
//! Confidence is the score capped at 1.0 and rounded to two decimals; the
//! label is AI generated iff confidence exceeds 0.55.

use crate::models::{Classification, ClassificationResult, FeatureVector, DEFAULT_LANGUAGE};

const BASE_SCORE: f64 = 0.5;
const INDICATOR_WEIGHT: f64 = 0.2;
const PEAK_DENSITY_THRESHOLD: f64 = 0.01;
const ZERO_CROSSING_THRESHOLD: f64 = 0.05;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score a feature vector
///
/// Pure and total. An empty `language` is reported as "English".
pub fn classify(features: &FeatureVector, language: &str) -> ClassificationResult {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<&str> = Vec::new();

    if features.peak_density < PEAK_DENSITY_THRESHOLD {
        score += INDICATOR_WEIGHT;
        reasons.push("uniform waveform structure");
    }

    if features.zero_crossing_rate < ZERO_CROSSING_THRESHOLD {
        score += INDICATOR_WEIGHT;
        reasons.push("low zero-crossing rate");
    }

    let confidence = round2(score.min(1.0));
    let classification = Classification::from_confidence(confidence);

    let language = if language.is_empty() {
        DEFAULT_LANGUAGE
    } else {
        language
    };

    ClassificationResult {
        classification,
        confidence,
        language: language.to_string(),
        explanation: format!(
            "Analysis suggests {} voice: {}",
            classification.label().to_lowercase(),
            reasons.join(", ")
        ),
    }
}
