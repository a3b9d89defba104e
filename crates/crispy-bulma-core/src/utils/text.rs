//! String utility functions.

use regex::Regex;
use std::sync::OnceLock;

/// Converts a string to a URL-friendly slug.
///
/// Lowercases, drops anything that is not a word character, space, or
/// hyphen, and collapses runs of spaces and hyphens into one hyphen.
///
/// # Examples
///
/// ```
/// use crispy_bulma_core::utils::text::slugify;
///
/// assert_eq!(slugify("Search the Site"), "search-the-site");
/// assert_eq!(slugify("my-submit"), "my-submit");
/// ```
pub fn slugify(s: &str) -> String {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();

    let non_word = NON_WORD.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[-\s]+").expect("valid regex"));

    let s = s.to_lowercase();
    let s = non_word.replace_all(&s, "");
    let s = separators.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

/// Turns a field name into a human-readable label.
///
/// Underscores become spaces and the first character is upper-cased.
///
/// # Examples
///
/// ```
/// use crispy_bulma_core::utils::text::pretty_name;
///
/// assert_eq!(pretty_name("first_name"), "First name");
/// ```
pub fn pretty_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("  Spaced  Out  "), "spaced-out");
        assert_eq!(slugify("My Button"), "my-button");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_pretty_name() {
        assert_eq!(pretty_name("email"), "Email");
        assert_eq!(pretty_name("password_confirm"), "Password confirm");
        assert_eq!(pretty_name(""), "");
    }
}
