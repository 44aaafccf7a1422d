//! Log scrubber command-line plumbing.
//!
//! This library holds everything around the scrubbing engine that the
//! `log-scrubber` binary needs:
//! - Exit codes for CLI runs
//! - Structured logging setup
//! - Output sinks (plain or gzip) and overwrite-conflict handling
//! - Audit file export (CSV or JSON)
//! - Run orchestration and the end-of-run summary
//!
//! The binary entry point is in `main.rs`.

pub mod audit;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod run;

pub use exit_codes::ExitCode;
pub use run::{execute, RunError, RunReport};
