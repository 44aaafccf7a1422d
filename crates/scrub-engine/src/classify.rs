//! Value classification using fixed regular-expression shapes.
//!
//! Four matchers locate candidate values in the raw text of a line:
//! email addresses, JSON `user`/`username` fields, IPv4 addresses and long
//! lowercase identifiers. They operate on raw text rather than parsed JSON
//! values so that surrounding key/value punctuation is left untouched.
//!
//! The matchers are compiled once and shared read-only.

use once_cell::sync::Lazy;
use regex::Regex;
use scrub_common::ValueKind;

/// Minimum length of a long identifier.
pub const UID_MIN_LENGTH: usize = 20;

/// Email address. The local-part class excludes quotes, colons and
/// whitespace so a match never extends into JSON punctuation.
pub static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// Quoted `user` or `username` key followed by a quoted string value.
///
/// Groups: 1 = key prefix through the opening value quote, 2 = value,
/// 3 = closing quote.
pub static USERNAME_FIELD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"("(?:user|username)"\s*:\s*")([^"]+)(")"#).unwrap());

/// Four dot-separated groups of 1-3 digits. Octet ranges are not checked.
///
/// Word boundaries are ASCII-only: a letter such as `é` right before the
/// address does not hide it.
pub static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)(?:[0-9]{1,3}\.){3}[0-9]{1,3}(?-u:\b)").unwrap());

/// Run of at least [`UID_MIN_LENGTH`] lowercase alphanumerics on ASCII word
/// boundaries.
pub static UID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?-u:\b)[a-z0-9]{{{},}}(?-u:\b)", UID_MIN_LENGTH)).unwrap()
});

/// Classifier table in pass order. Later passes see text already rewritten
/// by earlier ones, so this order is part of the contract.
static CLASSIFIERS: &[(ValueKind, &Lazy<Regex>)] = &[
    (ValueKind::Email, &EMAIL_PATTERN),
    (ValueKind::Username, &USERNAME_FIELD_PATTERN),
    (ValueKind::Ip, &IPV4_PATTERN),
    (ValueKind::Uid, &UID_PATTERN),
];

/// A classified occurrence within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Kind of value found.
    pub kind: ValueKind,
    /// Byte offset of the value start.
    pub start: usize,
    /// Byte offset one past the value end.
    pub end: usize,
}

impl Detection {
    /// The matched value within `text`.
    pub fn value<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Find every candidate value in `text`, sorted by position.
///
/// For username fields the span covers only the value, not the key.
/// Unlike the masking passes, all matchers run on the same unmodified text.
pub fn find_all(text: &str) -> Vec<Detection> {
    let mut detections = Vec::new();

    for (kind, pattern) in CLASSIFIERS {
        if *kind == ValueKind::Username {
            for caps in pattern.captures_iter(text) {
                if let Some(value) = caps.get(2) {
                    detections.push(Detection {
                        kind: *kind,
                        start: value.start(),
                        end: value.end(),
                    });
                }
            }
        } else {
            for m in pattern.find_iter(text) {
                detections.push(Detection {
                    kind: *kind,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
    }

    detections.sort_by_key(|d| (d.start, d.end));
    detections
}

/// Whether `text` contains anything a masking pass could touch.
pub fn has_candidates(text: &str) -> bool {
    CLASSIFIERS.iter().any(|(_, pattern)| pattern.is_match(text))
}
