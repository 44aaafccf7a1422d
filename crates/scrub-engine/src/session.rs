//! Scrubber session and line processor.
//!
//! A [`ScrubberSession`] owns every piece of mutable state for one run: the
//! identity and domain tables, per-kind replacement caches, the audit ledger
//! and parse statistics. Nothing outside the session can reach the maps
//! directly, which keeps the per-line ordering rule enforceable: link
//! detection for a whole JSON line completes before any substitution on it.

use crate::classify::{
    has_candidates, EMAIL_PATTERN, IPV4_PATTERN, UID_PATTERN, USERNAME_FIELD_PATTERN,
};
use crate::identity::{DomainAliases, IdentityMapper, DEFAULT_DOMAIN_SUFFIX};
use crate::level::{mask_ip, mask_uid, render_email, render_username};
use crate::ledger::AuditLedger;
use regex::Captures;
use scrub_common::{ScrubLevel, ValueKind};
use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Maximum number of JSON parse failures kept as samples.
pub const MAX_FAILURE_SAMPLES: usize = 10;

/// Maximum characters of a failing line kept in a sample.
const SAMPLE_CHARS: usize = 100;

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Scrubbing level.
    pub level: ScrubLevel,
    /// Source file name recorded in audit records.
    pub source: String,
    /// Emit identity and domain creation events at `info` level.
    pub verbose: bool,
    /// Suffix for domain aliases (`domain<N>.<suffix>`).
    pub domain_suffix: String,
}

impl SessionOptions {
    /// Options for a level with default source, verbosity and suffix.
    pub fn new(level: ScrubLevel) -> Self {
        Self {
            level,
            source: String::new(),
            verbose: false,
            domain_suffix: DEFAULT_DOMAIN_SUFFIX.to_string(),
        }
    }

    /// Set the source file name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Enable verbose creation events.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the domain alias suffix.
    pub fn with_domain_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.domain_suffix = suffix.into();
        self
    }
}

/// How a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDisposition {
    /// Parsed as a JSON object, linked and scrubbed.
    Json,
    /// Not a JSON object; scrubbed as plain text.
    PlainText,
    /// Scrubbing broke JSON structure; the original line was kept.
    Reverted,
}

/// Result of processing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// Line to emit, without trailing newline.
    pub output: String,
    /// Which path produced it.
    pub disposition: LineDisposition,
}

impl LineOutcome {
    /// Whether the line was emitted unscrubbed because processing failed.
    pub fn is_failure(&self) -> bool {
        self.disposition == LineDisposition::Reverted
    }
}

/// A line that did not parse as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonFailure {
    /// 1-based line number in the input.
    pub line_number: usize,
    /// Parser message.
    pub error: String,
    /// Leading characters of the line.
    pub sample: String,
}

/// Per-run parse statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseStats {
    /// Lines handled as JSON objects (including reverted ones).
    pub json_lines: u64,
    /// Lines handled as plain text.
    pub plain_lines: u64,
    /// JSON lines emitted unscrubbed because scrubbing broke them.
    pub reverted_lines: u64,
    /// First few plain-text fallbacks.
    pub failures: Vec<JsonFailure>,
}

/// A substitution awaiting commit to the ledger.
struct Substitution {
    original: String,
    replacement: String,
    kind: ValueKind,
}

/// All mutable scrubbing state for one file-processing run.
pub struct ScrubberSession {
    options: SessionOptions,
    identities: IdentityMapper,
    domains: DomainAliases,
    email_cache: HashMap<String, String>,
    username_cache: HashMap<String, String>,
    ip_cache: HashMap<String, String>,
    uid_cache: HashMap<String, String>,
    ledger: AuditLedger,
    stats: ParseStats,
}

impl ScrubberSession {
    /// Create a session with empty tables.
    pub fn new(options: SessionOptions) -> Self {
        let identities = IdentityMapper::with_verbose(options.verbose);
        let domains =
            DomainAliases::new(options.domain_suffix.clone()).with_verbose(options.verbose);

        Self {
            options,
            identities,
            domains,
            email_cache: HashMap::new(),
            username_cache: HashMap::new(),
            ip_cache: HashMap::new(),
            uid_cache: HashMap::new(),
            ledger: AuditLedger::new(),
            stats: ParseStats::default(),
        }
    }

    /// Session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Scrubbing level.
    pub fn level(&self) -> ScrubLevel {
        self.options.level
    }

    /// Identity table.
    pub fn identities(&self) -> &IdentityMapper {
        &self.identities
    }

    /// Domain alias table.
    pub fn domains(&self) -> &DomainAliases {
        &self.domains
    }

    /// Audit ledger.
    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    /// Parse statistics.
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Consume the session, keeping only the ledger.
    pub fn into_ledger(self) -> AuditLedger {
        self.ledger
    }

    /// Scrub one non-blank line.
    ///
    /// JSON objects are linked first, then scrubbed on their raw text and
    /// re-validated; if the result no longer parses the original is returned
    /// and nothing from the line is audited. Anything else is scrubbed as
    /// plain text. Never fails.
    pub fn process_line(&mut self, line: &str, line_number: usize) -> LineOutcome {
        let parsed = match serde_json::from_str::<Value>(line) {
            Ok(value) if value.is_object() => value,
            Ok(_) => {
                self.track_json_failure(line_number, line, "not a JSON object");
                return self.plain_outcome(line);
            }
            Err(err) => {
                self.track_json_failure(line_number, line, &err.to_string());
                return self.plain_outcome(line);
            }
        };

        self.stats.json_lines += 1;
        self.link_identities(&parsed);

        let mut pending = Vec::new();
        let scrubbed = self.scrub_passes(line, &mut pending);

        if serde_json::from_str::<IgnoredAny>(&scrubbed).is_err() {
            self.stats.reverted_lines += 1;
            tracing::warn!(
                target: "scrub_engine::session",
                line_number,
                "scrubbing produced invalid JSON; keeping original line"
            );
            return LineOutcome {
                output: line.to_string(),
                disposition: LineDisposition::Reverted,
            };
        }

        self.commit(pending);
        LineOutcome {
            output: scrubbed,
            disposition: LineDisposition::Json,
        }
    }

    /// Scrub a non-blank line that is not valid UTF-8.
    ///
    /// The line is treated as plain text. Each decodable run is scrubbed on
    /// its own and undecodable bytes are copied through unchanged, so the
    /// output differs from the input only where a value was masked.
    pub fn process_bytes(&mut self, raw: &[u8], line_number: usize) -> Vec<u8> {
        self.track_json_failure(line_number, &String::from_utf8_lossy(raw), "invalid UTF-8");
        self.stats.plain_lines += 1;

        let mut output = Vec::with_capacity(raw.len());
        for chunk in raw.utf8_chunks() {
            output.extend_from_slice(self.scrub_text(chunk.valid()).as_bytes());
            output.extend_from_slice(chunk.invalid());
        }
        output
    }

    /// Run the masking passes over arbitrary text and audit the substitutions.
    pub fn scrub_text(&mut self, text: &str) -> String {
        let mut pending = Vec::new();
        let scrubbed = self.scrub_passes(text, &mut pending);
        self.commit(pending);
        scrubbed
    }

    /// Walk a parsed JSON value and link every object holding both a
    /// username-shaped field and an `email` field.
    ///
    /// Traversal is pre-order with an explicit stack: an object's own pair is
    /// linked before its children, children in key order, arrays in index
    /// order.
    pub fn link_identities(&mut self, value: &Value) {
        let mut stack: Vec<&Value> = vec![value];

        while let Some(node) = stack.pop() {
            match node {
                Value::Object(map) => {
                    let username = map
                        .get("user")
                        .or_else(|| map.get("username"))
                        .and_then(Value::as_str);
                    let email = map.get("email").and_then(Value::as_str);

                    if let (Some(username), Some(email)) = (username, email) {
                        if !username.is_empty() && !email.is_empty() {
                            self.identities.link_or_create(username, email);
                        }
                    }

                    stack.extend(map.values().rev());
                }
                Value::Array(items) => stack.extend(items.iter().rev()),
                _ => {}
            }
        }
    }

    fn plain_outcome(&mut self, line: &str) -> LineOutcome {
        self.stats.plain_lines += 1;
        LineOutcome {
            output: self.scrub_text(line),
            disposition: LineDisposition::PlainText,
        }
    }

    fn scrub_passes(&mut self, text: &str, pending: &mut Vec<Substitution>) -> String {
        if !has_candidates(text) {
            return text.to_string();
        }

        let mut result = self.replace_emails(text, pending);
        result = self.replace_usernames(&result, pending);

        if self.options.level.masks_ips() {
            result = self.replace_ips(&result, pending);
        }
        if self.options.level.masks_uids() {
            result = self.replace_uids(&result, pending);
        }

        result
    }

    fn replace_emails(&mut self, text: &str, pending: &mut Vec<Substitution>) -> String {
        EMAIL_PATTERN
            .replace_all(text, |caps: &Captures| {
                let email = &caps[0];
                let replacement = self.email_replacement(email);
                pending.push(Substitution::new(email, &replacement, ValueKind::Email));
                replacement
            })
            .into_owned()
    }

    fn replace_usernames(&mut self, text: &str, pending: &mut Vec<Substitution>) -> String {
        USERNAME_FIELD_PATTERN
            .replace_all(text, |caps: &Captures| {
                let username = &caps[2];
                let replacement = self.username_replacement(username);
                pending.push(Substitution::new(username, &replacement, ValueKind::Username));
                format!("{}{}{}", &caps[1], replacement, &caps[3])
            })
            .into_owned()
    }

    fn replace_ips(&mut self, text: &str, pending: &mut Vec<Substitution>) -> String {
        let level = self.options.level.as_u8();
        IPV4_PATTERN
            .replace_all(text, |caps: &Captures| {
                let ip = &caps[0];
                let replacement = self
                    .ip_cache
                    .entry(ip.to_string())
                    .or_insert_with(|| mask_ip(ip, level))
                    .clone();
                pending.push(Substitution::new(ip, &replacement, ValueKind::Ip));
                replacement
            })
            .into_owned()
    }

    fn replace_uids(&mut self, text: &str, pending: &mut Vec<Substitution>) -> String {
        let level = self.options.level.as_u8();
        UID_PATTERN
            .replace_all(text, |caps: &Captures| {
                let uid = &caps[0];
                let replacement = self
                    .uid_cache
                    .entry(uid.to_string())
                    .or_insert_with(|| mask_uid(uid, level))
                    .clone();
                pending.push(Substitution::new(uid, &replacement, ValueKind::Uid));
                replacement
            })
            .into_owned()
    }

    fn email_replacement(&mut self, email: &str) -> String {
        let key = email.to_lowercase();
        if let Some(cached) = self.email_cache.get(&key) {
            return cached.clone();
        }

        let ordinal = self.identities.resolve_email(email);
        let domain = self.domains.alias_for_email(email);
        let replacement = render_email(ordinal, &domain);
        self.email_cache.insert(key, replacement.clone());
        replacement
    }

    fn username_replacement(&mut self, username: &str) -> String {
        let key = username.to_lowercase();
        if let Some(cached) = self.username_cache.get(&key) {
            return cached.clone();
        }

        let ordinal = self.identities.resolve_username(username);
        let replacement = render_username(ordinal);
        self.username_cache.insert(key, replacement.clone());
        replacement
    }

    fn commit(&mut self, pending: Vec<Substitution>) {
        for sub in pending {
            self.ledger
                .record(&sub.original, &sub.replacement, sub.kind, &self.options.source);
        }
    }

    fn track_json_failure(&mut self, line_number: usize, line: &str, error: &str) {
        if self.stats.failures.len() >= MAX_FAILURE_SAMPLES {
            return;
        }

        let mut sample: String = line.chars().take(SAMPLE_CHARS).collect();
        if line.chars().nth(SAMPLE_CHARS).is_some() {
            sample.push_str("...");
        }

        self.stats.failures.push(JsonFailure {
            line_number,
            error: error.to_string(),
            sample,
        });
    }
}

impl Substitution {
    fn new(original: &str, replacement: &str, kind: ValueKind) -> Self {
        Self {
            original: original.to_string(),
            replacement: replacement.to_string(),
            kind,
        }
    }
}
