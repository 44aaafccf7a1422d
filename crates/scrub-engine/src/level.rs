//! Level policy: pure masking and rendering functions.
//!
//! Nothing here touches session state. Inputs are a value and a raw numeric
//! level; unrecognized levels leave values unchanged, and values that do not
//! split into the expected shape are returned as-is.

/// Total length of a masked long identifier.
pub const UID_TARGET_LENGTH: usize = 26;

/// Trailing characters of a long identifier kept in clear.
pub const UID_KEEP_CHARS: usize = 4;

/// Mask character.
const MASK: char = '*';

/// Mask an IPv4 address for the given level.
///
/// | level | output |
/// |---|---|
/// | 2 | `***.***.***.<last group>` |
/// | 3 | `***.***.***.***` |
/// | other | unchanged |
pub fn mask_ip(ip: &str, level: u8) -> String {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return ip.to_string();
    }

    match level {
        2 => format!("***.***.***.{}", parts[3]),
        3 => "***.***.***.***".to_string(),
        _ => ip.to_string(),
    }
}

/// Mask a long identifier for the given level.
///
/// Only level 3 masks. All but the last [`UID_KEEP_CHARS`] characters become
/// `*`, and the masked prefix is sized so the result is [`UID_TARGET_LENGTH`]
/// long without ever exceeding the original's length.
pub fn mask_uid(uid: &str, level: u8) -> String {
    if level != 3 {
        return uid.to_string();
    }

    let len = uid.chars().count();
    if len < UID_KEEP_CHARS {
        return MASK.to_string().repeat(len);
    }

    let prefix_len = UID_TARGET_LENGTH
        .saturating_sub(UID_KEEP_CHARS)
        .min(len - UID_KEEP_CHARS);
    let kept: String = uid.chars().skip(len - UID_KEEP_CHARS).collect();

    let mut out = String::with_capacity(prefix_len + kept.len());
    out.extend(std::iter::repeat(MASK).take(prefix_len));
    out.push_str(&kept);
    out
}

/// Render a mapped username.
pub fn render_username(ordinal: u64) -> String {
    format!("user{}", ordinal)
}

/// Render a mapped email from a user ordinal and a domain alias.
pub fn render_email(ordinal: u64, domain_alias: &str) -> String {
    format!("user{}@{}", ordinal, domain_alias)
}
