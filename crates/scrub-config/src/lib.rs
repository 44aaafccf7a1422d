//! Log scrubber configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `scrubber_config.json`
//! - Config file discovery (CLI → env → working directory → XDG → defaults)
//! - Field-by-field precedence of CLI flags over file values
//! - Semantic validation of the merged settings, including the input size guard

pub mod file;
pub mod resolve;
pub mod settings;
pub mod size;
pub mod validate;

pub use file::ConfigFile;
pub use resolve::{load_config, resolve_config_path, ConfigPath, ConfigSource};
pub use settings::{resolve_settings, CliOverrides, ResolvedSettings};
pub use size::{format_file_size, parse_file_size, DEFAULT_MAX_FILE_SIZE};
pub use validate::{validate_settings, ValidatedSettings, ValidationError, ValidationResult};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "scrubber_config.json";
