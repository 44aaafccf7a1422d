//! Structured logging for the log scrubber.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines
//!
//! stdout is reserved for the run banner and summary; every log event goes
//! to stderr.

pub mod config;

pub use config::{EnvLogSettings, LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crate targets the default filter applies to.
const LOG_TARGETS: &[&str] = &["log_scrubber", "scrub_core", "scrub_engine", "scrub_config"];

/// Build the filter directive for a level across all crate targets.
pub fn filter_directive(level: LogLevel) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the event filter for a resolved config.
///
/// A `RUST_LOG` directive is used verbatim only when it decided the level and
/// parses; otherwise the filter covers the crate targets at `config.level`.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .env_directive
        .as_deref()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(filter_directive(config.level)))
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init();
            } else {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init();
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        // Format: run-<12 hex chars>
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive(LogLevel::Debug),
            "log_scrubber=debug,scrub_core=debug,scrub_engine=debug,scrub_config=debug"
        );
    }

    #[test]
    fn test_quiet_flag_silences_despite_rust_log() {
        let env = EnvLogSettings {
            rust_log: Some("debug".to_string()),
            ..EnvLogSettings::default()
        };
        let config = LogConfig::from_sources(&env, Some(LogLevel::Off), None);
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::OFF));
    }

    #[test]
    fn test_rust_log_directive_applies_when_it_wins() {
        let env = EnvLogSettings {
            rust_log: Some("scrub_engine=trace".to_string()),
            ..EnvLogSettings::default()
        };
        let config = LogConfig::from_sources(&env, None, None);
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_default_filter_is_warn() {
        let config = LogConfig::from_sources(&EnvLogSettings::default(), None, None);
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Warn);
    }
}
