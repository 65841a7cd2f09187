//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MOODSYNC_CONFIG`)
//! 3. User config file (`<config_dir>/moodsync/config.toml`)
//! 4. System config file (`/etc/moodsync/config.toml`, Linux only)
//! 5. Compiled defaults (fallback)
//!
//! A file named explicitly (priorities 1 and 2) must exist and parse.
//! Discovered files (priorities 3 and 4) degrade to compiled defaults with a
//! warning when they cannot be read.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MOODSYNC_CONFIG";

/// Default log level when neither RUST_LOG nor the config file sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level TOML configuration
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub fusion: FusionSettings,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing level directive (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// `[fusion]` section
///
/// Unset values fall back to the engine's compiled constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSettings {
    pub confidence_floor: Option<f64>,
    pub confidence_ceiling: Option<f64>,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserConfig(PathBuf),
    SystemConfig(PathBuf),
    Defaults,
}

impl ConfigSource {
    /// Path of the config file, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserConfig(p)
            | ConfigSource::SystemConfig(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }

    /// True when the user named this file explicitly
    pub fn is_explicit(&self) -> bool {
        matches!(
            self,
            ConfigSource::CommandLine(_) | ConfigSource::Environment(_)
        )
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read config {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Determine which config file applies, without reading it
pub fn resolve_config_source(cli_arg: Option<&Path>) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::CommandLine(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return ConfigSource::Environment(PathBuf::from(path));
        }
    }

    // Priority 3: User config directory
    if let Some(path) = user_config_path() {
        if path.exists() {
            return ConfigSource::UserConfig(path);
        }
    }

    // Priority 4: System config (Linux only)
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/moodsync/config.toml");
        if system_config.exists() {
            return ConfigSource::SystemConfig(system_config);
        }
    }

    // Priority 5: Compiled defaults
    ConfigSource::Defaults
}

/// Resolve and load the active configuration
///
/// Returns the parsed config together with the source it was read from.
pub fn load_config(cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let source = resolve_config_source(cli_arg);

    let Some(path) = source.path().map(Path::to_path_buf) else {
        info!("No config file found, using compiled defaults");
        return Ok((TomlConfig::default(), source));
    };

    match TomlConfig::from_file(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            Ok((config, source))
        }
        Err(e) if source.is_explicit() => Err(e),
        Err(e) => {
            warn!("Ignoring config file {}: {}. Using compiled defaults.", path.display(), e);
            Ok((TomlConfig::default(), ConfigSource::Defaults))
        }
    }
}

/// Per-user config file location for the platform
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodsync").join("config.toml"))
}
