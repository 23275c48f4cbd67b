//! Data models for the detection pipeline

pub mod classification;
pub mod features;
pub mod request;
pub mod waveform;

pub use classification::{Classification, ClassificationResult};
pub use features::FeatureVector;
pub use request::{AudioSource, DetectionRequest, ValidatedRequest, DEFAULT_LANGUAGE};
pub use waveform::Waveform;
