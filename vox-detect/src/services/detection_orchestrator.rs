//! Detection request orchestration
//!
//! Sequences acquire → decode → extract → classify for one request.
//!
//! The two input modes fail differently:
//! - URL: every error is returned to the caller.
//! - Inline payload: any error is logged and replaced by
//!   [`ClassificationResult::safe_fallback`], so malformed or dummy payloads
//!   never produce an error response.
//!
//! The scratch file is released on every path: explicitly after a successful
//! decode, by `Drop` when a step returns early.

use crate::error::DetectionError;
use crate::models::{AudioSource, ClassificationResult, DetectionRequest, ValidatedRequest};
use crate::services::audio_acquirer::AudioAcquirer;
use crate::services::{classifier, feature_extractor};
use crate::utils::audio_decoder::decode_waveform;

/// Detection service shared by all requests (read-only after construction)
pub struct DetectionService {
    acquirer: AudioAcquirer,
}

impl DetectionService {
    pub fn new(acquirer: AudioAcquirer) -> Self {
        Self { acquirer }
    }

    /// Classify the audio referenced by `request`
    ///
    /// # Errors
    /// * [`DetectionError::MissingInput`] - no audio field supplied
    /// * URL path only: [`DetectionError::InvalidInput`],
    ///   [`DetectionError::AcquisitionFailed`], [`DetectionError::DecodeFailed`],
    ///   [`DetectionError::Io`]
    pub async fn detect(&self, request: DetectionRequest) -> Result<ClassificationResult, DetectionError> {
        let ValidatedRequest { source, language } = request.validate()?;

        match source {
            AudioSource::RemoteUrl(_) => {
                let result = self.run_pipeline(&source, &language).await?;
                tracing::info!(
                    classification = %result.classification,
                    confidence = result.confidence,
                    "Classified remote audio"
                );
                Ok(result)
            }
            AudioSource::InlinePayload { .. } => match self.run_pipeline(&source, &language).await {
                Ok(result) => {
                    tracing::info!(
                        classification = %result.classification,
                        confidence = result.confidence,
                        "Classified inline audio"
                    );
                    Ok(result)
                }
                Err(e) => {
                    tracing::warn!("Inline audio unusable, returning fallback verdict: {}", e);
                    Ok(ClassificationResult::safe_fallback(language))
                }
            },
        }
    }

    async fn run_pipeline(
        &self,
        source: &AudioSource,
        language: &str,
    ) -> Result<ClassificationResult, DetectionError> {
        let resource = self.acquirer.acquire(source).await?;
        let waveform = decode_waveform(resource.path())?;
        resource.release();

        tracing::debug!(
            samples = waveform.len(),
            sample_rate = waveform.sample_rate,
            duration_seconds = format!("{:.2}", waveform.duration_seconds()),
            "Waveform ready"
        );

        let features = feature_extractor::extract_features(&waveform.samples);
        Ok(classifier::classify(&features, language))
    }
}
