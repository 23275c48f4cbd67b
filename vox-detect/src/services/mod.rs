//! Detection pipeline services

pub mod audio_acquirer;
pub mod classifier;
pub mod detection_orchestrator;
pub mod feature_extractor;

pub use audio_acquirer::{AcquirerConfig, AudioAcquirer, TemporaryAudioResource};
pub use detection_orchestrator::DetectionService;
