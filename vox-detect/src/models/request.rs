//! Inbound detection request and its validated form

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

/// Language reported when the caller does not name one
pub const DEFAULT_LANGUAGE: &str = "English";

/// Raw `/predict` request body
///
/// Field names follow the public wire format (`audio_url`, `audioBase64`,
/// `audioFormat`). Exactly one of the two audio fields is expected; use
/// [`DetectionRequest::validate`] to turn this into an [`AudioSource`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetectionRequest {
    #[serde(default)]
    pub audio_url: Option<String>,

    #[serde(default, rename = "audioBase64")]
    pub audio_base64: Option<String>,

    #[serde(default, rename = "audioFormat")]
    pub audio_format: Option<String>,

    #[serde(default)]
    pub language: Option<String>,
}

/// Where the audio for one request comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Fetch over HTTP(S)
    RemoteUrl(String),
    /// Base64 text carried in the request body
    InlinePayload {
        encoded: String,
        format_hint: Option<String>,
    },
}

/// Request after validation: a definite source plus the effective language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub source: AudioSource,
    pub language: String,
}

/// Empty strings are treated the same as absent fields
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl DetectionRequest {
    /// Language to echo back, `"English"` when absent or empty
    ///
    /// Any other value, whitespace included, is echoed unchanged.
    pub fn effective_language(&self) -> String {
        match self.language.as_deref() {
            None | Some("") => DEFAULT_LANGUAGE.to_string(),
            Some(language) => language.to_string(),
        }
    }

    /// Resolve the audio source
    ///
    /// The URL takes precedence when both fields are present.
    ///
    /// # Errors
    /// * [`DetectionError::MissingInput`] - neither `audio_url` nor `audioBase64` set
    pub fn validate(self) -> Result<ValidatedRequest, DetectionError> {
        let language = self.effective_language();

        let url = non_empty(self.audio_url);
        let inline = non_empty(self.audio_base64);

        let source = match (url, inline) {
            (Some(url), inline) => {
                if inline.is_some() {
                    tracing::warn!("Both audio_url and audioBase64 supplied; using audio_url");
                }
                AudioSource::RemoteUrl(url)
            }
            (None, Some(encoded)) => AudioSource::InlinePayload {
                encoded,
                format_hint: non_empty(self.audio_format),
            },
            (None, None) => return Err(DetectionError::MissingInput),
        };

        Ok(ValidatedRequest { source, language })
    }
}
