//! Scrubbing engine for chat-server log files.
//!
//! This crate rewrites log lines so that user-identifying values are replaced
//! with stable, consistent placeholders while the log structure is preserved.
//!
//! # Key Features
//!
//! - **Consistent identities**: every person gets one ordinal; their username
//!   renders as `userN` and every email they own as `userN@domainM.<suffix>`.
//! - **Cross-field linking**: a JSON object carrying both a `user`/`username`
//!   and an `email` field ties the two to the same identity before anything
//!   on that line is masked.
//! - **Levels**: level 1 maps users and emails, level 2 also partially masks
//!   IPv4 addresses, level 3 fully masks IPs and long identifiers.
//! - **Fail-safe lines**: a JSON line that would be corrupted by scrubbing is
//!   emitted unchanged and counted as failed.
//! - **Audit ledger**: one record per distinct original value replaced.
//!
//! # Example
//!
//! ```
//! use scrub_common::ScrubLevel;
//! use scrub_engine::{ScrubberSession, SessionOptions};
//!
//! let mut session = ScrubberSession::new(SessionOptions::new(ScrubLevel::Medium));
//! let out = session.process_line(
//!     r#"{"user":"claude","email":"claude@mattermost.com","ip":"192.168.1.10"}"#,
//!     1,
//! );
//! assert_eq!(
//!     out.output,
//!     r#"{"user":"user1","email":"user1@domain1.example.com","ip":"***.***.***.10"}"#
//! );
//! ```

pub mod classify;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod level;
pub mod pipeline;
pub mod session;

pub use classify::{find_all, Detection, UID_MIN_LENGTH};
pub use error::{Result, ScrubError};
pub use identity::{DomainAliases, IdentityMapper, UserIdentity, DEFAULT_DOMAIN_SUFFIX};
pub use ledger::{AuditLedger, AuditRecord};
pub use level::{mask_ip, mask_uid, render_email, render_username, UID_KEEP_CHARS, UID_TARGET_LENGTH};
pub use pipeline::{scrub_stream, RunSummary, PROGRESS_INTERVAL};
pub use session::{
    JsonFailure, LineDisposition, LineOutcome, ParseStats, ScrubberSession, SessionOptions,
    MAX_FAILURE_SAMPLES,
};
