//! Scrubbing levels.

use crate::ParseError;
use serde::{Deserialize, Serialize};

/// How aggressively IP addresses and long identifiers are masked.
///
/// Identity mapping of usernames and emails applies at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScrubLevel {
    /// Usernames and emails only.
    Low = 1,
    /// Also mask the first three octets of IPv4 addresses.
    Medium = 2,
    /// Mask IPv4 addresses completely and mask long identifiers.
    High = 3,
}

impl ScrubLevel {
    /// All levels in ascending order.
    pub const ALL: [ScrubLevel; 3] = [ScrubLevel::Low, ScrubLevel::Medium, ScrubLevel::High];

    /// Raw numeric level.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether IP addresses are masked at this level.
    pub fn masks_ips(self) -> bool {
        self >= ScrubLevel::Medium
    }

    /// Whether long identifiers are masked at this level.
    pub fn masks_uids(self) -> bool {
        self == ScrubLevel::High
    }
}

impl TryFrom<u8> for ScrubLevel {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ScrubLevel::Low),
            2 => Ok(ScrubLevel::Medium),
            3 => Ok(ScrubLevel::High),
            other => Err(ParseError::InvalidLevel(other as i64)),
        }
    }
}

impl TryFrom<i64> for ScrubLevel {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ParseError::InvalidLevel(value))
            .and_then(ScrubLevel::try_from)
    }
}

impl From<ScrubLevel> for u8 {
    fn from(level: ScrubLevel) -> Self {
        level.as_u8()
    }
}

impl std::str::FromStr for ScrubLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => ScrubLevel::try_from(n),
            Err(_) => Err(ParseError::InvalidLevel(-1)),
        }
    }
}

impl std::fmt::Display for ScrubLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
