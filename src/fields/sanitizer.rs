//! MongoDB field-name sanitizer

use regex::Regex;
use std::sync::LazyLock;

/// A leading `$` or any `.`; see https://jira.mongodb.org/browse/SERVER-3229
static SPECIAL_CHARACTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$|\.").expect("valid field-name regex"));

/// Remove characters MongoDB treats specially in field names.
///
/// Every `.` is removed. A `$` is removed only when it is the first
/// character of the input; embedded `$` characters are kept.
///
/// ```
/// use i18n_mongo_backend::fields::sanitize_field_name;
///
/// assert_eq!(sanitize_field_name("a.b$c"), "ab$c");
/// assert_eq!(sanitize_field_name("$lang"), "lang");
/// ```
pub fn sanitize_field_name(field_name: &str) -> String {
    SPECIAL_CHARACTER_RE.replace_all(field_name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_every_dot() {
        assert_eq!(sanitize_field_name("a.b.c"), "abc");
        assert_eq!(sanitize_field_name("..."), "");
    }

    #[test]
    fn test_removes_only_leading_dollar() {
        assert_eq!(sanitize_field_name("$data"), "data");
        assert_eq!(sanitize_field_name("da$ta"), "da$ta");
        assert_eq!(sanitize_field_name("$$data"), "$data");
    }

    #[test]
    fn test_dollar_after_dot_is_not_leading() {
        assert_eq!(sanitize_field_name(".$a"), "$a");
    }

    #[test]
    fn test_mixed() {
        assert_eq!(sanitize_field_name("a.b$c"), "ab$c");
        assert_eq!(sanitize_field_name("$a.b"), "ab");
    }

    #[test]
    fn test_untouched_and_empty() {
        assert_eq!(sanitize_field_name("lang"), "lang");
        assert_eq!(sanitize_field_name(""), "");
    }
}
