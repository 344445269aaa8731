//! ASCII folding for identity-bearing header values.

/// Formatted keys (lower-cased) whose values are folded to ASCII.
const IDENTITY_KEYS: [&str; 4] = ["sn", "cn", "givenname", "login"];

/// True when values stored under `formatted_key` must be transliterated.
pub fn is_identity_key(formatted_key: &str) -> bool {
    IDENTITY_KEYS
        .iter()
        .any(|k| formatted_key.eq_ignore_ascii_case(k))
}

/// Replace non-ASCII characters with their nearest ASCII approximation.
pub fn normalize(value: &str) -> String {
    deunicode::deunicode(value)
}
