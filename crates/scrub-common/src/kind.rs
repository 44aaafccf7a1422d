//! Kinds of scrubbed values.

use crate::ParseError;
use serde::{Deserialize, Serialize};

/// Category of a replaced value, recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Email address
    Email,
    /// Username from a JSON `user`/`username` field
    Username,
    /// IPv4 address
    Ip,
    /// Long opaque identifier (user, channel, team IDs)
    Uid,
}

impl ValueKind {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Email => "email",
            ValueKind::Username => "username",
            ValueKind::Ip => "ip",
            ValueKind::Uid => "uid",
        }
    }
}

impl std::str::FromStr for ValueKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(ValueKind::Email),
            "username" => Ok(ValueKind::Username),
            "ip" => Ok(ValueKind::Ip),
            "uid" => Ok(ValueKind::Uid),
            _ => Err(ParseError::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serialization() {
        assert_eq!(serde_json::to_string(&ValueKind::Email).unwrap(), "\"email\"");
        assert_eq!(serde_json::to_string(&ValueKind::Uid).unwrap(), "\"uid\"");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("IP".parse::<ValueKind>().unwrap(), ValueKind::Ip);
        assert_eq!("username".parse::<ValueKind>().unwrap(), ValueKind::Username);
        assert!("fqdn".parse::<ValueKind>().is_err());
    }
}
