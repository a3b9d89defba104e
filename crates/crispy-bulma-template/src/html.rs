//! HTML helpers shared by widgets and layout objects.
//!
//! The engine runs with Tera's auto-escaping disabled, so every value that
//! comes from users (labels, submitted data, attribute values) is escaped
//! here before it reaches a template.

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their HTML entity equivalents.
/// Unlike Tera's built-in filter, `/` is left alone so URLs stay readable.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Formats attributes as ` key="value"` pairs in iteration order.
///
/// Values are escaped. An empty iterator yields an empty string.
///
/// # Examples
///
/// ```
/// use crispy_bulma_template::html::flatatt;
///
/// let html = flatatt([("data-id", "7"), ("title", "a \"b\"")]);
/// assert_eq!(html, r#" data-id="7" title="a &quot;b&quot;""#);
/// ```
pub fn flatatt<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    attrs
        .into_iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape_html(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="/x?a=1&b='2'">"#),
            "&lt;a href=&quot;/x?a=1&amp;b=&#x27;2&#x27;&quot;&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_flatatt_empty() {
        assert_eq!(flatatt(std::iter::empty()), "");
    }

    #[test]
    fn test_flatatt_keeps_order() {
        assert_eq!(flatatt([("b", "2"), ("a", "1")]), r#" b="2" a="1""#);
    }
}
