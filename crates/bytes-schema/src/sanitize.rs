//! Identifier and literal sanitization for interpolated DDL.
//!
//! DDL statements cannot bind identifiers as parameters, so every name that
//! ends up inside a statement goes through [`safe_parameter`] first. This is
//! a character whitelist, not a full escaping scheme: it keeps names usable
//! and strips statement separators and quotes, nothing more.

use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_()\s]").expect("Invalid sanitize regex"));

/// Strips every character outside `[A-Za-z0-9_()\s]`.
///
/// ```
/// use bytes_schema::safe_parameter;
///
/// assert_eq!(safe_parameter("users; DROP TABLE x"), "users DROP TABLE x");
/// ```
#[must_use]
pub fn safe_parameter(name: &str) -> String {
    UNSAFE_CHARACTERS.replace_all(name, "").into_owned()
}

/// Backslash-escapes `'`, `"`, `\` and NUL, for use inside a quoted literal.
#[must_use]
pub fn add_slashes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Whether a type argument should be rendered bare rather than quoted.
#[must_use]
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_parameter_strips_separators() {
        assert_eq!(safe_parameter("users; DROP TABLE x"), "users DROP TABLE x");
        assert_eq!(safe_parameter("`Users`"), "Users");
        assert_eq!(safe_parameter("Users_Profiles"), "Users_Profiles");
        assert_eq!(safe_parameter("a'b\"c-d.e"), "abcde");
    }

    #[test]
    fn test_safe_parameter_keeps_parentheses_and_spaces() {
        assert_eq!(safe_parameter("SET NULL"), "SET NULL");
        assert_eq!(safe_parameter("fn(x)"), "fn(x)");
    }

    #[test]
    fn test_add_slashes() {
        assert_eq!(add_slashes("plain"), "plain");
        assert_eq!(add_slashes(r#"it's "x""#), r#"it\'s \"x\""#);
        assert_eq!(add_slashes(r"a\b"), r"a\\b");
        assert_eq!(add_slashes("a\0b"), r"a\0b");
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("255"));
        assert!(is_numeric("10.5"));
        assert!(!is_numeric("abc"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("inf"));
        assert!(!is_numeric("NaN"));
    }
}
