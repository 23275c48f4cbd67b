//! Scalar waveform descriptors

/// Time-domain features of one waveform
///
/// Derived once per request by
/// [`crate::services::feature_extractor::extract_features`] and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    /// Mean of squared samples (>= 0)
    pub energy: f64,
    /// Mean absolute first difference of the sample signs (range [0, 2])
    pub zero_crossing_rate: f64,
    /// Qualifying local maxima per sample (range [0, 1])
    pub peak_density: f64,
}
