//! Identity mapping for users and email domains.
//!
//! Every distinct person gets a stable ordinal (1, 2, 3, ...) in
//! first-detection order. A person may first be seen by username, by email,
//! or by both in the same JSON object; once both are known they are linked
//! and a lookup by either key returns the same identity.
//!
//! Identities live in an arena owned by the mapper. The username and email
//! indexes are case-insensitive and only hold arena positions, so linking
//! never copies or renumbers a record.

use serde::Serialize;
use std::collections::HashMap;

/// One detected person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    /// Stable ordinal, assigned once.
    pub ordinal: u64,
    /// Original username, exact case as first seen.
    pub username: Option<String>,
    /// Original email, exact case as first seen.
    pub email: Option<String>,
}

/// Registry of user identities keyed by username and by email.
#[derive(Debug, Default)]
pub struct IdentityMapper {
    identities: Vec<UserIdentity>,
    by_username: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
    verbose: bool,
}

impl IdentityMapper {
    /// Create an empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapper that reports creation events at `info` level.
    pub fn with_verbose(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// Number of identities allocated so far.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether no identity has been allocated.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// All identities in ordinal order.
    pub fn identities(&self) -> &[UserIdentity] {
        &self.identities
    }

    /// Identity registered under a username (case-insensitive).
    pub fn get_by_username(&self, username: &str) -> Option<&UserIdentity> {
        self.by_username
            .get(&username.to_lowercase())
            .map(|&idx| &self.identities[idx])
    }

    /// Identity registered under an email (case-insensitive).
    pub fn get_by_email(&self, email: &str) -> Option<&UserIdentity> {
        self.by_email
            .get(&email.to_lowercase())
            .map(|&idx| &self.identities[idx])
    }

    /// Record that `username` and `email` belong to the same person.
    ///
    /// - If the username is known, attach the email when the identity lacks one.
    /// - Else if the email is known, attach the username when the identity lacks one.
    /// - Else allocate a new identity holding both.
    ///
    /// Returns the ordinal of the identity the pair resolved to.
    pub fn link_or_create(&mut self, username: &str, email: &str) -> u64 {
        let username_key = username.to_lowercase();
        let email_key = email.to_lowercase();

        if let Some(&idx) = self.by_username.get(&username_key) {
            if self.identities[idx].email.is_none() {
                self.identities[idx].email = Some(email.to_string());
                self.by_email.insert(email_key, idx);
                self.trace_link(idx);
            }
            return self.identities[idx].ordinal;
        }

        if let Some(&idx) = self.by_email.get(&email_key) {
            if self.identities[idx].username.is_none() {
                self.identities[idx].username = Some(username.to_string());
                self.by_username.insert(username_key, idx);
                self.trace_link(idx);
            }
            return self.identities[idx].ordinal;
        }

        let idx = self.allocate(Some(username.to_string()), Some(email.to_string()));
        self.by_username.insert(username_key, idx);
        self.by_email.insert(email_key, idx);

        let ordinal = self.identities[idx].ordinal;
        if self.verbose {
            tracing::info!(
                target: "scrub_engine::identity",
                ordinal,
                "created user mapping: {} / {} -> user{}",
                username,
                email,
                ordinal
            );
        } else {
            tracing::debug!(target: "scrub_engine::identity", ordinal, "created linked user mapping");
        }
        ordinal
    }

    /// Ordinal for a username, creating a single-field identity if unseen.
    pub fn resolve_username(&mut self, username: &str) -> u64 {
        let key = username.to_lowercase();
        if let Some(&idx) = self.by_username.get(&key) {
            return self.identities[idx].ordinal;
        }

        let idx = self.allocate(Some(username.to_string()), None);
        self.by_username.insert(key, idx);

        let ordinal = self.identities[idx].ordinal;
        if self.verbose {
            tracing::info!(
                target: "scrub_engine::identity",
                ordinal,
                "created standalone user mapping: {} -> user{}",
                username,
                ordinal
            );
        } else {
            tracing::debug!(target: "scrub_engine::identity", ordinal, "created standalone user mapping");
        }
        ordinal
    }

    /// Ordinal for an email, creating a single-field identity if unseen.
    pub fn resolve_email(&mut self, email: &str) -> u64 {
        let key = email.to_lowercase();
        if let Some(&idx) = self.by_email.get(&key) {
            return self.identities[idx].ordinal;
        }

        let idx = self.allocate(None, Some(email.to_string()));
        self.by_email.insert(key, idx);

        let ordinal = self.identities[idx].ordinal;
        if self.verbose {
            tracing::info!(
                target: "scrub_engine::identity",
                ordinal,
                "created standalone email mapping: {} -> user{}",
                email,
                ordinal
            );
        } else {
            tracing::debug!(target: "scrub_engine::identity", ordinal, "created standalone email mapping");
        }
        ordinal
    }

    fn allocate(&mut self, username: Option<String>, email: Option<String>) -> usize {
        let ordinal = self.identities.len() as u64 + 1;
        self.identities.push(UserIdentity {
            ordinal,
            username,
            email,
        });
        self.identities.len() - 1
    }

    fn trace_link(&self, idx: usize) {
        let identity = &self.identities[idx];
        if self.verbose {
            tracing::info!(
                target: "scrub_engine::identity",
                ordinal = identity.ordinal,
                "linked user mapping: {} / {} -> user{}",
                identity.username.as_deref().unwrap_or(""),
                identity.email.as_deref().unwrap_or(""),
                identity.ordinal
            );
        } else {
            tracing::debug!(target: "scrub_engine::identity", ordinal = identity.ordinal, "linked user mapping");
        }
    }
}

/// Default suffix appended to numbered domain aliases.
pub const DEFAULT_DOMAIN_SUFFIX: &str = "example.com";

/// Numbered aliases for email domains, in first-sighting order.
#[derive(Debug)]
pub struct DomainAliases {
    aliases: HashMap<String, String>,
    counter: u64,
    suffix: String,
    verbose: bool,
}

impl Default for DomainAliases {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_SUFFIX)
    }
}

impl DomainAliases {
    /// Create an empty table rendering aliases as `domain<N>.<suffix>`.
    ///
    /// An empty suffix renders bare `domain<N>`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            aliases: HashMap::new(),
            counter: 0,
            suffix: suffix.into(),
            verbose: false,
        }
    }

    /// Report alias creation at `info` level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Number of distinct domains aliased.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether no domain has been aliased.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Existing alias for a domain (case-insensitive), without allocating.
    pub fn get(&self, domain: &str) -> Option<&str> {
        self.aliases.get(&domain.to_lowercase()).map(String::as_str)
    }

    /// Alias for the domain part of `email`.
    ///
    /// An address that does not split into exactly two parts on `@` gets the
    /// fallback domain (the suffix itself, or `domain` when the suffix is empty).
    pub fn alias_for_email(&mut self, email: &str) -> String {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return self.fallback();
        }
        self.alias_for_domain(parts[1])
    }

    /// Alias for a domain, allocating the next number on first sighting.
    pub fn alias_for_domain(&mut self, domain: &str) -> String {
        let key = domain.to_lowercase();
        if let Some(alias) = self.aliases.get(&key) {
            return alias.clone();
        }

        self.counter += 1;
        let alias = if self.suffix.is_empty() {
            format!("domain{}", self.counter)
        } else {
            format!("domain{}.{}", self.counter, self.suffix)
        };

        if self.verbose {
            tracing::info!(target: "scrub_engine::domain", "created domain mapping: {} -> {}", key, alias);
        } else {
            tracing::debug!(target: "scrub_engine::domain", alias = %alias, "created domain mapping");
        }

        self.aliases.insert(key, alias.clone());
        alias
    }

    fn fallback(&self) -> String {
        if self.suffix.is_empty() {
            "domain".to_string()
        } else {
            self.suffix.clone()
        }
    }
}
