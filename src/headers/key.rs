//! Claim name -> header-name fragment.

/// Canonicalize a claim name into a header-name fragment.
///
/// Every run of characters outside `[A-Za-z0-9]` acts as one separator; empty
/// segments are dropped, the first character of each segment is upper-cased
/// and the segments are joined with `-`.
///
/// ```ignore
/// assert_eq!(format_key("foo_bar-baz"), "Foo-Bar-Baz");
/// assert_eq!(format_key("givenName"), "GivenName");
/// ```
pub fn format_key(raw_key: &str) -> String {
    raw_key
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(upper_case_first)
        .collect::<Vec<_>>()
        .join("-")
}

// Segments are ASCII-only, so the first byte is the first char.
fn upper_case_first(segment: &str) -> String {
    let (head, tail) = segment.split_at(1);
    let mut out = String::with_capacity(segment.len());
    out.push_str(&head.to_ascii_uppercase());
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separators_and_capitalizes() {
        assert_eq!(format_key("foo_bar-baz"), "Foo-Bar-Baz");
        assert_eq!(format_key("common_name"), "Common-Name");
    }

    #[test]
    fn keeps_the_rest_of_each_segment() {
        assert_eq!(format_key("givenName"), "GivenName");
        assert_eq!(format_key("x509_SERIAL"), "X509-SERIAL");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(format_key(""), "");
        assert_eq!(format_key("__--"), "");
    }

    #[test]
    fn collapses_runs_and_drops_edge_separators() {
        assert_eq!(format_key("__a..b__"), "A-B");
        assert_eq!(format_key("é-mail"), "Mail");
        assert_eq!(format_key("https://example.com/roles"), "Https-Example-Com-Roles");
    }
}
