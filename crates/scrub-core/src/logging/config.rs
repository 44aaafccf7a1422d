//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (LOG_SCRUBBER_LOG, RUST_LOG, LOG_SCRUBBER_LOG_FORMAT)
//! - CLI flags (-v/-q, --log-format)

use serde::{Deserialize, Serialize};

/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "LOG_SCRUBBER_LOG";

/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "LOG_SCRUBBER_LOG_FORMAT";

/// Standard tracing filter variable, consulted when nothing else sets a level.
pub const ENV_RUST_LOG: &str = "RUST_LOG";

/// Log output format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Warnings and errors only (default; stdout carries the run summary).
    #[default]
    Warn,
    Error,
    /// Completely silent.
    Off,
}

impl LogLevel {
    /// Level for a `-v` count, or `Off` when quiet.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return LogLevel::Off;
        }
        match verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Off => tracing_subscriber::filter::LevelFilter::OFF,
        }
    }
}

/// Logging-related environment values, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct EnvLogSettings {
    /// `LOG_SCRUBBER_LOG`
    pub level: Option<String>,
    /// `RUST_LOG`
    pub rust_log: Option<String>,
    /// `LOG_SCRUBBER_LOG_FORMAT`
    pub format: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Minimum log level.
    pub level: LogLevel,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
    /// Raw `RUST_LOG` directive, kept only when it decided the level.
    pub env_directive: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: false,
            env_directive: None,
        }
    }
}

impl LogConfig {
    /// Create config from environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_sources(
            &EnvLogSettings {
                level: std::env::var(ENV_LOG_LEVEL).ok(),
                rust_log: std::env::var(ENV_RUST_LOG).ok(),
                format: std::env::var(ENV_LOG_FORMAT).ok(),
            },
            cli_level,
            cli_format,
        )
    }

    /// Resolve a config from already-read environment values.
    ///
    /// Level precedence: CLI, then `LOG_SCRUBBER_LOG`, then `RUST_LOG`. The
    /// raw `RUST_LOG` directive is only kept when it is the source that won.
    pub fn from_sources(
        env: &EnvLogSettings,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        // LOG_SCRUBBER_LOG takes precedence over RUST_LOG
        if let Some(val) = &env.level {
            if let Ok(level) = val.parse::<LogLevel>() {
                config.level = level;
            }
        } else if let Some(val) = &env.rust_log {
            if val.contains("trace") {
                config.level = LogLevel::Trace;
            } else if val.contains("debug") {
                config.level = LogLevel::Debug;
            } else if val.contains("info") {
                config.level = LogLevel::Info;
            } else if val.contains("error") {
                config.level = LogLevel::Error;
            }
            config.env_directive = Some(val.clone());
        }

        if let Some(format) = env.format.as_deref().and_then(|v| v.parse::<LogFormat>().ok()) {
            config.format = format;
        }

        // CLI overrides take final precedence
        if let Some(level) = cli_level {
            config.level = level;
            config.env_directive = None;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    /// Set log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enable timestamps in human output.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("jsonl".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0, false), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1, false), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(5, false), LogLevel::Trace);
        assert_eq!(LogLevel::from_verbosity(3, true), LogLevel::Off);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogFormat::Jsonl.to_string(), "jsonl");
    }

    fn env(level: Option<&str>, rust_log: Option<&str>) -> EnvLogSettings {
        EnvLogSettings {
            level: level.map(str::to_string),
            rust_log: rust_log.map(str::to_string),
            format: None,
        }
    }

    #[test]
    fn test_rust_log_used_when_alone() {
        let config = LogConfig::from_sources(&env(None, Some("scrub_engine=debug")), None, None);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.env_directive.as_deref(), Some("scrub_engine=debug"));
    }

    #[test]
    fn test_cli_level_beats_rust_log() {
        let quiet = LogConfig::from_sources(&env(None, Some("debug")), Some(LogLevel::Off), None);
        assert_eq!(quiet.level, LogLevel::Off);
        assert!(quiet.env_directive.is_none());

        let verbose = LogConfig::from_sources(&env(None, Some("error")), Some(LogLevel::Info), None);
        assert_eq!(verbose.level, LogLevel::Info);
        assert!(verbose.env_directive.is_none());
    }

    #[test]
    fn test_scrubber_log_var_beats_rust_log() {
        let config = LogConfig::from_sources(&env(Some("error"), Some("trace")), None, None);
        assert_eq!(config.level, LogLevel::Error);
        assert!(config.env_directive.is_none());
    }

    #[test]
    fn test_format_from_env_then_cli() {
        let vars = EnvLogSettings {
            format: Some("json".to_string()),
            ..EnvLogSettings::default()
        };
        assert_eq!(LogConfig::from_sources(&vars, None, None).format, LogFormat::Jsonl);
        assert_eq!(
            LogConfig::from_sources(&vars, None, Some(LogFormat::Human)).format,
            LogFormat::Human
        );
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::default()
            .with_format(LogFormat::Jsonl)
            .with_level(LogLevel::Debug)
            .with_timestamps(true);

        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.timestamps);
    }
}
