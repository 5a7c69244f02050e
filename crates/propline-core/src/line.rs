//! Line classification
//!
//! A line is either a property line (`key=value`) or opaque content
//! (comment, blank, or anything else). Classification never fails.

/// Separator between key and value
pub const SEPARATOR: char = '=';

/// Comment prefixes recognised at the start of a trimmed line
const COMMENT_PREFIXES: [&str; 2] = ["#", "/-"];

/// Check whether a line is a property line.
///
/// The trimmed line must not start with a comment prefix or the separator,
/// and must contain the separator.
pub fn is_property(line: &str) -> bool {
    let trimmed = line.trim();
    if COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(*p))
        || trimmed.starts_with(SEPARATOR)
    {
        return false;
    }
    trimmed.contains(SEPARATOR)
}

/// The text before the first separator, or the whole line if there is none.
///
/// Defined for every line, comments included; it is what anchors and
/// preceding keys are matched against.
pub fn line_key(line: &str) -> &str {
    line.split_once(SEPARATOR).map_or(line, |(key, _)| key)
}

/// The text after the first separator, with any further separators dropped.
///
/// `a=b=c` yields `bc`. Lines without a separator yield an empty value.
pub fn line_value(line: &str) -> String {
    line.split_once(SEPARATOR)
        .map(|(_, rest)| rest.chars().filter(|&c| c != SEPARATOR).collect())
        .unwrap_or_default()
}

/// Split a property line into key and value.
///
/// Returns `None` for non-property lines and for lines whose key is empty.
pub fn split_property(line: &str) -> Option<(&str, String)> {
    if !is_property(line) {
        return None;
    }
    let key = line_key(line);
    if key.is_empty() {
        return None;
    }
    Some((key, line_value(line)))
}

/// Render a reconciled property line; the separator is always kept.
pub fn property_line(key: &str, value: &str) -> String {
    format!("{}{}{}", key, SEPARATOR, value)
}

/// Render a content line: `key` alone for an empty value, else `key=value`.
pub fn form_content(key: &str, value: &str) -> String {
    if value.is_empty() {
        key.to_string()
    } else {
        property_line(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blanks_are_not_properties() {
        assert!(!is_property("# a=b"));
        assert!(!is_property("   #a=b"));
        assert!(!is_property("/- a=b"));
        assert!(!is_property(""));
        assert!(!is_property("   "));
        assert!(!is_property("no separator"));
    }

    #[test]
    fn test_leading_separator_is_not_property() {
        assert!(!is_property("=value"));
        assert!(!is_property("  =value"));
    }

    #[test]
    fn test_property_lines() {
        assert!(is_property("a=1"));
        assert!(is_property("  key = value  "));
        assert!(is_property("empty="));
    }

    #[test]
    fn test_line_key_and_value() {
        assert_eq!(line_key("greeting=hello"), "greeting");
        assert_eq!(line_value("greeting=hello"), "hello");
        assert_eq!(line_key("# header"), "# header");
        assert_eq!(line_value("# header"), "");
    }

    #[test]
    fn test_extra_separators_dropped_from_value() {
        assert_eq!(line_value("url=a=b=c"), "abc");
        assert_eq!(line_value("k=="), "");
    }

    #[test]
    fn test_key_keeps_surrounding_whitespace() {
        let (key, value) = split_property(" spaced = v").expect("property line");
        assert_eq!(key, " spaced ");
        assert_eq!(value, " v");
    }

    #[test]
    fn test_split_property_rejects_non_properties() {
        assert!(split_property("# k=v").is_none());
        assert!(split_property("k").is_none());
        assert_eq!(
            split_property("k=").map(|(k, v)| (k.to_string(), v)),
            Some(("k".to_string(), String::new()))
        );
    }

    #[test]
    fn test_form_content() {
        assert_eq!(form_content("k", "v"), "k=v");
        assert_eq!(form_content("k", ""), "k");
        assert_eq!(property_line("k", ""), "k=");
    }
}
