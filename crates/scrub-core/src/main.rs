//! log-scrubber: replace identifying values in chat-server logs.
//!
//! Emails, usernames, IPv4 addresses and long IDs are replaced with stable
//! pseudonyms or masks, and every replacement is recorded in an audit file.

use clap::error::ErrorKind;
use clap::Parser;
use scrub_common::{AuditFormat, OverwriteAction, APP_NAME};
use scrub_config::{load_config, resolve_settings, validate_settings, CliOverrides};
use scrub_core::exit_codes::ExitCode;
use scrub_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use scrub_core::run::{execute, RunError};
use std::path::PathBuf;

/// Scrub identifying information from log files
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Input log file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: <input>_scrubbed<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scrubbing level: 1 (low), 2 (medium), 3 (high)
    #[arg(short, long, allow_negative_numbers = true)]
    level: Option<i64>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Audit file (default: <input>_audit.<csv|json>)
    #[arg(short, long)]
    audit: Option<PathBuf>,

    /// Audit file format
    #[arg(long = "audit-type", value_enum)]
    audit_type: Option<AuditFormat>,

    /// What to do when an output or audit file exists
    #[arg(long, value_enum)]
    overwrite: Option<OverwriteAction>,

    /// Maximum input file size (e.g. 150MB, 1GB)
    #[arg(long)]
    max_file_size: Option<String>,

    /// Domain suffix for pseudonymous email domains
    #[arg(long)]
    domain_suffix: Option<String>,

    /// Gzip-compress the output file
    #[arg(short = 'z', long)]
    compress: bool,

    /// Process everything but write no files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print errors from the run itself
    #[arg(short, long)]
    quiet: bool,

    /// Diagnostic log format on stderr
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Print version information
    #[arg(short = 'V', long)]
    version: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            input: self.input.clone(),
            output: self.output.clone(),
            audit: self.audit.clone(),
            audit_format: self.audit_type,
            level: self.level,
            overwrite: self.overwrite,
            max_file_size: self.max_file_size.clone(),
            domain_suffix: self.domain_suffix.clone(),
            verbose: self.verbose > 0,
            dry_run: self.dry_run,
            compress: self.compress,
        }
    }

    fn log_level(&self) -> Option<LogLevel> {
        if self.quiet || self.verbose > 0 {
            Some(LogLevel::from_verbosity(self.verbose, self.quiet))
        } else {
            None
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Clean,
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    if cli.version {
        println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
        std::process::exit(ExitCode::Clean.as_i32());
    }

    init_logging(&LogConfig::from_env(cli.log_level(), cli.log_format));

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(target: "log_scrubber", error = ?err, "run aborted");
            eprintln!("Error: {}", err);
            err.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<ExitCode, RunError> {
    let (config, found) = load_config(cli.config.as_deref()).map_err(RunError::Config)?;
    if let Some(path) = &found.path {
        println!("Config file found, using config file at {}", path.display());
    }

    let resolved = resolve_settings(&cli.overrides(), config.as_ref());
    let settings = validate_settings(&resolved).map_err(RunError::Validation)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let report = execute(&settings, &mut stdin.lock(), &mut stdout.lock())?;
    Ok(report.exit_code())
}
