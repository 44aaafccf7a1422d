//! Configuration resolution and validation tests against real files.
//!
//! Covers:
//! - Config file discovery order (CLI > env > XDG)
//! - CLI-over-file precedence after loading
//! - Validation of the merged settings

use scrub_common::{AuditFormat, OverwriteAction, ScrubLevel};
use scrub_config::resolve::{load_config, resolve_config_path, ConfigSource, ENV_CONFIG_PATH};
use scrub_config::{resolve_settings, validate_settings, CliOverrides, ValidationError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f()
}

fn write_config(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create config parent");
    }
    fs::write(&path, json).expect("write config");
    path
}

#[test]
fn test_cli_path_wins_over_env() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH]);
        let dir = TempDir::new().unwrap();
        let cli = write_config(dir.path(), "cli.json", "{}");
        let from_env = write_config(dir.path(), "env.json", "{}");
        env::set_var(ENV_CONFIG_PATH, &from_env);

        let resolved = resolve_config_path(Some(&cli)).unwrap();
        assert_eq!(resolved.path, Some(cli));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
    });
}

#[test]
fn test_env_path_used_without_cli() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH]);
        let dir = TempDir::new().unwrap();
        let from_env = write_config(dir.path(), "env.json", "{}");
        env::set_var(ENV_CONFIG_PATH, &from_env);

        let resolved = resolve_config_path(None).unwrap();
        assert_eq!(resolved.path, Some(from_env));
        assert_eq!(resolved.source, ConfigSource::Environment);
    });
}

#[cfg(target_os = "linux")]
#[test]
fn test_xdg_config_and_missing_env_file() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, "XDG_CONFIG_HOME"]);
        let dir = TempDir::new().unwrap();
        let xdg = write_config(
            dir.path(),
            "log-scrubber/scrubber_config.json",
            r#"{"ScrubSettings":{"ScrubLevel":2}}"#,
        );
        env::set_var("XDG_CONFIG_HOME", dir.path());
        env::set_var(ENV_CONFIG_PATH, dir.path().join("missing.json"));

        let (config, found) = load_config(None).unwrap();
        assert_eq!(found.source, ConfigSource::XdgConfig);
        assert_eq!(found.path, Some(xdg.clone()));
        assert_eq!(config.unwrap().scrub_settings.scrub_level, Some(2));
        assert!(xdg.exists());
    });
}

#[cfg(target_os = "linux")]
#[test]
fn test_no_config_anywhere() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, "XDG_CONFIG_HOME"]);
        let dir = TempDir::new().unwrap();
        env::remove_var(ENV_CONFIG_PATH);
        env::set_var("XDG_CONFIG_HOME", dir.path());

        let (config, found) = load_config(None).unwrap();
        assert!(config.is_none());
        assert!(found.path.is_none());
        assert_eq!(found.source, ConfigSource::BuiltinDefault);
    });
}

#[test]
fn test_missing_cli_config_is_not_found() {
    let err = load_config(Some(Path::new("/nonexistent/scrubber_config.json"))).unwrap_err();
    assert!(matches!(err, ValidationError::NotFound(_)));
}

#[test]
fn test_malformed_config_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "bad.json", "{\"ScrubSettings\": [");
    let err = load_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ValidationError::ParseError(_)));
    assert_eq!(err.code(), 61);
}

#[test]
fn test_config_file_drives_full_validation() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("mattermost.log");
    fs::write(&input, "{\"user\":\"a\"}\n").unwrap();

    let json = format!(
        r#"{{
            "FileSettings": {{
                "InputFile": {},
                "AuditFileType": "json",
                "CompressOutputFile": true,
                "OverwriteAction": "overwrite"
            }},
            "ScrubSettings": {{ "ScrubLevel": 2 }},
            "ProcessingSettings": {{ "MaxInputFileSize": "1KB" }}
        }}"#,
        serde_json::to_string(&input.to_string_lossy()).unwrap()
    );
    let path = write_config(dir.path(), "scrubber_config.json", &json);

    let (config, found) = load_config(Some(&path)).unwrap();
    assert_eq!(found.source, ConfigSource::CliArgument);

    let cli = CliOverrides {
        level: Some(3),
        ..Default::default()
    };
    let settings = resolve_settings(&cli, config.as_ref());
    let validated = validate_settings(&settings).unwrap();

    assert_eq!(validated.level, ScrubLevel::High);
    assert_eq!(validated.audit_format, AuditFormat::Json);
    assert_eq!(validated.overwrite, OverwriteAction::Overwrite);
    assert_eq!(validated.max_file_size, 1024);
    assert_eq!(validated.output, dir.path().join("mattermost_scrubbed.log.gz"));
    assert_eq!(validated.audit, dir.path().join("mattermost_audit.json"));
}

#[test]
fn test_size_limit_from_config_rejects_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("big.log");
    fs::write(&input, vec![b'a'; 4096]).unwrap();

    let config: scrub_config::ConfigFile =
        r#"{"ProcessingSettings":{"MaxInputFileSize":"2KB"}}"#.parse().unwrap();
    let cli = CliOverrides {
        input: Some(input),
        level: Some(1),
        ..Default::default()
    };
    let err = validate_settings(&resolve_settings(&cli, Some(&config))).unwrap_err();
    assert!(matches!(err, ValidationError::TooLarge { size: 4096, limit: 2048, .. }));
    assert!(err.to_string().contains("4.0 KB"));
}
