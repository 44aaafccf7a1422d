//! Audit ledger: one record per distinct original value replaced.
//!
//! Keys are the original text with case preserved, so `Alice` and `alice`
//! are separate rows even though they map to the same identity.

use scrub_common::ValueKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Audit trail entry for one original value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuditRecord {
    /// Original value, exact case as first seen.
    pub original_value: String,
    /// Replacement produced on first encounter.
    pub new_value: String,
    /// Number of substitutions of this exact original.
    pub times_replaced: u64,
    /// Kind of value.
    #[serde(rename = "Type")]
    pub kind: ValueKind,
    /// File name the value was first seen in.
    pub source: String,
}

/// Occurrence-counting registry of replacements.
#[derive(Debug, Default)]
pub struct AuditLedger {
    records: Vec<AuditRecord>,
    index: HashMap<String, usize>,
}

impl AuditLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one substitution.
    ///
    /// The first call for an original fixes its replacement, kind and source;
    /// later calls only increment the counter.
    pub fn record(&mut self, original: &str, replacement: &str, kind: ValueKind, source: &str) {
        if let Some(&idx) = self.index.get(original) {
            self.records[idx].times_replaced += 1;
            return;
        }

        self.index.insert(original.to_string(), self.records.len());
        self.records.push(AuditRecord {
            original_value: original.to_string(),
            new_value: replacement.to_string(),
            times_replaced: 1,
            kind,
            source: source.to_string(),
        });
    }

    /// Records in first-seen order.
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Record for an exact original value.
    pub fn get(&self, original: &str) -> Option<&AuditRecord> {
        self.index.get(original).map(|&idx| &self.records[idx])
    }

    /// Number of distinct originals.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been replaced.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all counters.
    pub fn total_replacements(&self) -> u64 {
        self.records.iter().map(|r| r.times_replaced).sum()
    }

    /// Distinct originals per kind.
    pub fn count_by_kind(&self, kind: ValueKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}
