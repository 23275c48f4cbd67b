//! API authentication via a static shared key
//!
//! Callers present the key in a request header; the service compares it with
//! the key loaded from configuration at startup. Both values are hashed with
//! SHA-256 before comparison so the comparison time does not depend on where
//! the first differing byte is, nor on the key length.

use sha2::{Digest, Sha256};

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuthError {
    /// No key was presented
    MissingKey,

    /// A key was presented but does not match
    InvalidKey,
}

impl std::fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiAuthError::MissingKey => write!(f, "Missing API key"),
            ApiAuthError::InvalidKey => write!(f, "Invalid API key"),
        }
    }
}

impl std::error::Error for ApiAuthError {}

fn digest(value: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}

/// Validate a presented key against the configured key
///
/// # Examples
///
/// ```
/// use vox_common::api::auth::{validate_api_key, ApiAuthError};
///
/// assert!(validate_api_key(Some("secret"), "secret").is_ok());
/// assert_eq!(validate_api_key(Some("nope"), "secret"), Err(ApiAuthError::InvalidKey));
/// assert_eq!(validate_api_key(None, "secret"), Err(ApiAuthError::MissingKey));
/// ```
pub fn validate_api_key(provided: Option<&str>, expected: &str) -> Result<(), ApiAuthError> {
    let provided = provided.ok_or(ApiAuthError::MissingKey)?;

    let diff = digest(provided)
        .iter()
        .zip(digest(expected).iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));

    if diff == 0 {
        Ok(())
    } else {
        Err(ApiAuthError::InvalidKey)
    }
}

/// Short, non-reversible identifier for a key (first 8 hex chars of SHA-256)
///
/// Safe to log; lets operators tell which key a running service loaded.
pub fn key_fingerprint(key: &str) -> String {
    let hex: String = digest(key).iter().map(|b| format!("{:02x}", b)).collect();
    hex[..8].to_string()
}
