//! Audio acquisition
//!
//! Turns an [`AudioSource`] into a [`TemporaryAudioResource`]: a named file
//! in the scratch directory holding the raw audio bytes. Remote sources are
//! fetched over HTTP(S) with a bounded timeout and size; inline sources are
//! base64 decoded. The resource deletes its file when released or dropped.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::error::DetectionError;
use crate::models::AudioSource;

const USER_AGENT: &str = concat!("vox-detect/", env!("CARGO_PKG_VERSION"));
const DEFAULT_SUFFIX: &str = ".wav";
const SCRATCH_PREFIX: &str = "vox-audio-";
const DEFAULT_MAX_DOWNLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Acquirer settings
#[derive(Debug, Clone)]
pub struct AcquirerConfig {
    /// Upper bound on a whole remote fetch (connect + body)
    pub fetch_timeout: Duration,
    /// Directory for per-request scratch files
    pub scratch_dir: PathBuf,
    /// Largest remote body accepted, in bytes
    pub max_download_bytes: usize,
}

impl Default for AcquirerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            scratch_dir: std::env::temp_dir(),
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        }
    }
}

/// Exclusively owned scratch file holding one request's audio
///
/// Deleted exactly once: by [`TemporaryAudioResource::release`], or by
/// `Drop` on any path that does not release it explicitly.
#[derive(Debug)]
pub struct TemporaryAudioResource {
    file: NamedTempFile,
}

impl TemporaryAudioResource {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now, logging (not failing) if deletion errors
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Released scratch audio"),
            Err(e) => tracing::warn!(path = %path.display(), "Failed to delete scratch audio: {}", e),
        }
    }
}

/// Audio acquirer service
pub struct AudioAcquirer {
    http_client: reqwest::Client,
    scratch_dir: PathBuf,
    max_download_bytes: usize,
}

impl AudioAcquirer {
    pub fn new(config: AcquirerConfig) -> vox_common::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| vox_common::Error::Internal(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            scratch_dir: config.scratch_dir,
            max_download_bytes: config.max_download_bytes,
        })
    }

    /// Materialize `source` as a scratch file
    pub async fn acquire(&self, source: &AudioSource) -> Result<TemporaryAudioResource, DetectionError> {
        match source {
            AudioSource::RemoteUrl(url) => self.fetch_remote(url).await,
            AudioSource::InlinePayload {
                encoded,
                format_hint,
            } => self.materialize_inline(encoded, format_hint.as_deref()),
        }
    }

    /// Download `url` into a `.wav` scratch file
    ///
    /// The body is streamed to disk and abandoned once it passes
    /// `max_download_bytes`; a larger declared `Content-Length` is refused
    /// before reading.
    ///
    /// # Errors
    /// * [`DetectionError::InvalidInput`] - unparsable URL or scheme other than
    ///   http/https (checked before any network I/O)
    /// * [`DetectionError::AcquisitionFailed`] - transport error, timeout,
    ///   non-success status, or body over the size limit
    /// * [`DetectionError::Io`] - scratch file cannot be created or written
    pub async fn fetch_remote(&self, url: &str) -> Result<TemporaryAudioResource, DetectionError> {
        let url = validate_url(url)?;

        tracing::debug!(url = %url, "Fetching remote audio");

        let mut response = self.http_client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                DetectionError::AcquisitionFailed(format!("Timed out fetching {}", url))
            } else {
                DetectionError::AcquisitionFailed(format!("Request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectionError::AcquisitionFailed(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_download_bytes as u64 {
                return Err(DetectionError::AcquisitionFailed(format!(
                    "{} declares {} bytes, limit is {}",
                    url, length, self.max_download_bytes
                )));
            }
        }

        // On any early return `file` is dropped, which removes it
        let mut file = self.create_scratch(DEFAULT_SUFFIX)?;
        let mut received = 0usize;

        while let Some(chunk) = response.chunk().await.map_err(|e| {
            DetectionError::AcquisitionFailed(format!("Reading body from {} failed: {}", url, e))
        })? {
            received += chunk.len();
            if received > self.max_download_bytes {
                return Err(DetectionError::AcquisitionFailed(format!(
                    "{} exceeds the {} byte download limit",
                    url, self.max_download_bytes
                )));
            }
            file.write_all(&chunk)?;
        }
        file.flush()?;

        tracing::debug!(url = %url, bytes = received, "Remote audio downloaded");

        Ok(TemporaryAudioResource { file })
    }

    /// Decode base64 text into a scratch file named after `format_hint`
    ///
    /// ASCII whitespace inside the payload (line wrapping) is ignored.
    ///
    /// # Errors
    /// * [`DetectionError::DecodeFailed`] - not valid standard base64
    /// * [`DetectionError::InvalidInput`] - format hint is not a plain extension
    pub fn materialize_inline(
        &self,
        encoded: &str,
        format_hint: Option<&str>,
    ) -> Result<TemporaryAudioResource, DetectionError> {
        let suffix = suffix_for(format_hint)?;

        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DetectionError::DecodeFailed(format!("Invalid base64 audio: {}", e)))?;

        tracing::debug!(bytes = bytes.len(), suffix = %suffix, "Inline audio decoded");

        self.write_scratch(&bytes, &suffix)
    }

    fn create_scratch(&self, suffix: &str) -> Result<NamedTempFile, DetectionError> {
        let file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.scratch_dir)?;
        Ok(file)
    }

    fn write_scratch(&self, bytes: &[u8], suffix: &str) -> Result<TemporaryAudioResource, DetectionError> {
        let mut file = self.create_scratch(suffix)?;

        // On error `file` is dropped here, which removes it
        file.write_all(bytes)?;
        file.flush()?;

        Ok(TemporaryAudioResource { file })
    }
}

/// Parse `url` and require an http/https scheme
pub fn validate_url(url: &str) -> Result<reqwest::Url, DetectionError> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|e| DetectionError::InvalidInput(format!("Unparsable audio URL {:?}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DetectionError::InvalidInput(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}

/// Scratch file suffix for an optional format hint (`"mp3"` or `".mp3"`)
fn suffix_for(format_hint: Option<&str>) -> Result<String, DetectionError> {
    let hint = match format_hint.map(|h| h.trim().trim_start_matches('.')) {
        None | Some("") => return Ok(DEFAULT_SUFFIX.to_string()),
        Some(hint) => hint,
    };

    if !hint.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DetectionError::InvalidInput(format!(
            "Unsupported audio format: {:?}",
            hint
        )));
    }

    Ok(format!(".{}", hint.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn acquirer_in(dir: &Path) -> AudioAcquirer {
        AudioAcquirer::new(AcquirerConfig {
            fetch_timeout: Duration::from_secs(5),
            scratch_dir: dir.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_validate_url_schemes() {
        assert!(validate_url("http://example.com/a.wav").is_ok());
        assert!(validate_url("https://example.com/a.wav").is_ok());
        assert!(matches!(
            validate_url("ftp://host/file"),
            Err(DetectionError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(DetectionError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(DetectionError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_ftp_rejected_before_network() {
        let dir = TempDir::new().unwrap();
        let acquirer = acquirer_in(dir.path());

        let result = acquirer
            .acquire(&AudioSource::RemoteUrl("ftp://host/file".to_string()))
            .await;

        assert!(matches!(result, Err(DetectionError::InvalidInput(_))));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn test_suffix_for() {
        assert_eq!(suffix_for(None).unwrap(), ".wav");
        assert_eq!(suffix_for(Some("")).unwrap(), ".wav");
        assert_eq!(suffix_for(Some("mp3")).unwrap(), ".mp3");
        assert_eq!(suffix_for(Some(".FLAC")).unwrap(), ".flac");
        assert!(matches!(
            suffix_for(Some("../../etc")),
            Err(DetectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_inline_payload_written_and_released() {
        let dir = TempDir::new().unwrap();
        let acquirer = acquirer_in(dir.path());

        let resource = acquirer
            .materialize_inline(&STANDARD.encode(b"RIFF....WAVE"), Some("mp3"))
            .unwrap();

        let path = resource.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVE");
        assert_eq!(files_in(dir.path()), 1);

        resource.release();
        assert!(!path.exists());
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn test_drop_deletes_file() {
        let dir = TempDir::new().unwrap();
        let acquirer = acquirer_in(dir.path());

        {
            let _resource = acquirer.materialize_inline("AAAA", None).unwrap();
            assert_eq!(files_in(dir.path()), 1);
        }
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn test_invalid_base64() {
        let dir = TempDir::new().unwrap();
        let acquirer = acquirer_in(dir.path());

        let result = acquirer.materialize_inline("not-base64-!!", None);
        assert!(matches!(result, Err(DetectionError::DecodeFailed(_))));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn test_wrapped_base64_accepted() {
        let dir = TempDir::new().unwrap();
        let acquirer = acquirer_in(dir.path());

        let resource = acquirer.materialize_inline("AAEC\nAwQF\r\n", None).unwrap();
        assert_eq!(std::fs::read(resource.path()).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }
}
