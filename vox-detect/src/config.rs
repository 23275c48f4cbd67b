//! Configuration resolution for vox-detect
//!
//! Each setting is resolved with priority CLI → ENV → TOML → compiled
//! default. When a value is supplied by more than one source a warning is
//! logged naming them, and the highest-priority source wins.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};
use vox_common::config::{CompiledDefaults, TomlConfig};
use vox_common::{Error, Result};

pub const ENV_HOST: &str = "VOX_DETECT_HOST";
pub const ENV_PORT: &str = "VOX_DETECT_PORT";
pub const ENV_API_KEY: &str = "VOX_API_KEY";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "VOX_FETCH_TIMEOUT_SECS";
pub const ENV_MAX_BODY_BYTES: &str = "VOX_MAX_BODY_BYTES";
pub const ENV_SCRATCH_DIR: &str = "VOX_SCRATCH_DIR";

/// Values given on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
    pub max_body_bytes: Option<usize>,
    pub scratch_dir: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub fetch_timeout: Duration,
    pub max_body_bytes: usize,
    pub scratch_dir: PathBuf,
    pub log_level: String,
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn env_value<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparsable environment variable {}={:?}", name, raw);
            None
        }
    }
}

/// Pick the highest-priority value, warning when several sources set it
fn resolve<T>(setting: &str, cli: Option<T>, env: Option<T>, toml: Option<T>, default: T) -> T {
    let sources: Vec<&str> = [
        cli.as_ref().map(|_| "command line"),
        env.as_ref().map(|_| "environment"),
        toml.as_ref().map(|_| "TOML"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if sources.len() > 1 {
        warn!(
            "{} found in multiple sources: {}. Using {} (highest priority).",
            setting,
            sources.join(", "),
            sources[0]
        );
    }

    cli.or(env).or(toml).unwrap_or(default)
}

impl ServiceConfig {
    /// Resolve every setting from CLI overrides, environment, and TOML
    pub fn resolve(cli: CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let host = resolve(
            "host",
            cli.host,
            env_value(ENV_HOST),
            toml_config.host.clone(),
            defaults.host,
        );

        let port = resolve(
            "port",
            cli.port,
            env_value(ENV_PORT),
            toml_config.port,
            defaults.port,
        );

        let api_key = resolve(
            "API key",
            cli.api_key.filter(|k| is_valid_key(k)),
            env_value::<String>(ENV_API_KEY).filter(|k| is_valid_key(k)),
            toml_config.api_key.clone().filter(|k| is_valid_key(k)),
            defaults.api_key.clone(),
        );
        if api_key == defaults.api_key {
            warn!(
                "Using the compiled-in default API key. Configure one via --api-key, {} or api_key in the TOML config.",
                ENV_API_KEY
            );
        }

        let fetch_timeout_secs = resolve(
            "fetch timeout",
            cli.fetch_timeout_secs,
            env_value(ENV_FETCH_TIMEOUT_SECS),
            toml_config.fetch_timeout_secs,
            defaults.fetch_timeout_secs,
        );
        if fetch_timeout_secs == 0 {
            return Err(Error::Config("fetch timeout must be at least 1 second".to_string()));
        }

        let max_body_bytes = resolve(
            "max body size",
            cli.max_body_bytes,
            env_value(ENV_MAX_BODY_BYTES),
            toml_config.max_body_bytes,
            defaults.max_body_bytes,
        );
        if max_body_bytes == 0 {
            return Err(Error::Config("max body size must be non-zero".to_string()));
        }

        let scratch_dir = resolve(
            "scratch directory",
            cli.scratch_dir,
            env_value(ENV_SCRATCH_DIR),
            toml_config.scratch_dir.clone(),
            defaults.scratch_dir,
        );

        let config = Self {
            host,
            port,
            api_key,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_body_bytes,
            scratch_dir,
            log_level: toml_config.logging.level.clone(),
        };

        info!(
            host = %config.host,
            port = config.port,
            fetch_timeout_secs,
            max_body_bytes = config.max_body_bytes,
            scratch_dir = %config.scratch_dir.display(),
            "Configuration resolved"
        );

        Ok(config)
    }

    /// Create the scratch directory if missing
    pub fn ensure_scratch_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.scratch_dir)?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
