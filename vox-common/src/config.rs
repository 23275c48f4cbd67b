//! Configuration loading and config-file discovery
//!
//! Services resolve each setting in the order CLI → ENV → TOML → compiled
//! default. This module owns the last two tiers: the TOML schema, where the
//! file lives, and the compiled defaults used when nothing else is set.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set ("info", "debug", ...)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// On-disk TOML configuration
///
/// Every field is optional so that partial files (or files written by older
/// versions) still deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Interface to bind
    #[serde(default)]
    pub host: Option<String>,

    /// TCP port to listen on
    #[serde(default)]
    pub port: Option<u16>,

    /// Secret expected in the `x-api-key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on a remote audio download, in seconds
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Largest accepted request body, in bytes
    #[serde(default)]
    pub max_body_bytes: Option<usize>,

    /// Directory where per-request temporary audio files are created
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values compiled into the binary, used when no other source provides one
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub log_level: String,
    pub fetch_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub scratch_dir: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_key: "hackathon_2024_secret_token".to_string(),
            log_level: default_log_level(),
            fetch_timeout_secs: 30,
            max_body_bytes: 25 * 1024 * 1024,
            scratch_dir: std::env::temp_dir(),
        }
    }
}

/// Locate the TOML config file for a module
///
/// Looks for `<config_dir>/vox/<module>.toml` and, on Linux, falls back to
/// `/etc/vox/<module>.toml`. Returns `None` when neither exists.
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    let file_name = format!("{}.toml", module_name);

    if let Some(user_config) = dirs::config_dir().map(|d| d.join("vox").join(&file_name)) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/vox").join(&file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load a TOML config file
///
/// A missing file is not an error: a warning is logged and defaults are
/// returned so the service still starts. A file that exists but cannot be
/// read or parsed is reported as [`Error::Config`].
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found: {} (using defaults)",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    debug!(path = %path.display(), "Loaded TOML config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_compiled_defaults() {
        let defaults = CompiledDefaults::for_current_platform();
        assert_eq!(defaults.port, 8000);
        assert_eq!(defaults.log_level, "info");
        assert_eq!(defaults.fetch_timeout_secs, 30);
        assert!(!defaults.api_key.is_empty());
        assert!(!defaults.scratch_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_toml_config(Path::new("/nonexistent/vox/vox-detect.toml")).unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_parses() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 9100\napi_key = \"abc\"\n[logging]\nlevel = \"debug\"").unwrap();

        let config = load_toml_config(file.path()).unwrap();
        assert_eq!(config.port, Some(9100));
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.fetch_timeout_secs, None);
        assert_eq!(config.scratch_dir, None);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = load_toml_config(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Parse TOML failed"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TomlConfig {
            port: Some(8080),
            api_key: Some("k".to_string()),
            scratch_dir: Some(PathBuf::from("/tmp/vox")),
            ..Default::default()
        };

        let text = toml::to_string(&config).unwrap();
        let parsed: TomlConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
