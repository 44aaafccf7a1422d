//! Configuration file discovery.
//!
//! Resolution order: CLI argument → environment variable → working directory
//! → XDG config directory → built-in defaults.

use crate::file::ConfigFile;
use crate::validate::{ValidationError, ValidationResult};
use crate::DEFAULT_CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Where the configuration file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in the current working directory.
    WorkingDirectory,

    /// Found in XDG config directory.
    XdgConfig,

    /// No file; using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::WorkingDirectory => write!(f, "working directory"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered configuration file path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPath {
    /// Path to the config file (or None if not found).
    pub path: Option<PathBuf>,

    /// Source of the path (for diagnostics).
    pub source: ConfigSource,
}

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "LOG_SCRUBBER_CONFIG";

/// Application name for XDG directories.
const APP_NAME: &str = scrub_common::APP_NAME;

/// Resolve the configuration file path.
///
/// 1. Explicit CLI path; it must exist.
/// 2. `LOG_SCRUBBER_CONFIG`, if it names an existing file
/// 3. `scrubber_config.json` in the working directory
/// 4. XDG config directory (`~/.config/log-scrubber/scrubber_config.json`)
/// 5. None
pub fn resolve_config_path(cli_path: Option<&Path>) -> ValidationResult<ConfigPath> {
    if let Some(path) = cli_path {
        if !path.is_file() {
            return Err(ValidationError::NotFound(path.to_path_buf()));
        }
        return Ok(found(path.to_path_buf(), ConfigSource::CliArgument));
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.is_file() {
            return Ok(found(path, ConfigSource::Environment));
        }
        tracing::warn!(path = %path.display(), "{} names a missing file; ignoring", ENV_CONFIG_PATH);
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return Ok(found(local, ConfigSource::WorkingDirectory));
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            return Ok(found(path, ConfigSource::XdgConfig));
        }
    }

    Ok(ConfigPath::default())
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    ConfigPath {
        path: Some(path),
        source,
    }
}

/// Resolve and load the configuration file, if any.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<(Option<ConfigFile>, ConfigPath)> {
    let resolved = resolve_config_path(cli_path)?;
    match &resolved.path {
        Some(path) => {
            let config = ConfigFile::from_file(path)?;
            tracing::debug!(path = %path.display(), source = %resolved.source, "loaded config file");
            Ok((Some(config), resolved))
        }
        None => Ok((None, resolved)),
    }
}

/// Get the XDG config directory for log-scrubber.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
