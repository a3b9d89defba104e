//! Submitted form data with several values per key.
//!
//! Checkbox groups and multi-selects submit the same name repeatedly, so a
//! plain map would lose values. [`get`](MultiValueDict::get) returns the
//! **last** value for a key, [`get_list`](MultiValueDict::get_list) all of them.

use std::collections::HashMap;

/// A string-keyed dictionary holding a list of values per key.
///
/// # Examples
///
/// ```
/// use crispy_bulma_core::utils::MultiValueDict;
///
/// let data = MultiValueDict::from_pairs([("color", "red"), ("color", "blue")]);
/// assert_eq!(data.get("color"), Some("blue"));
/// assert_eq!(data.get_list("color"), Some(&["red".to_string(), "blue".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiValueDict {
    inner: HashMap<String, Vec<String>>,
}

impl MultiValueDict {
    /// Creates an empty `MultiValueDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from `(key, value)` pairs, appending repeats.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut dict = Self::new();
        for (k, v) in pairs {
            dict.append(k, v);
        }
        dict
    }

    /// Returns the last value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    /// Returns every value for `key`.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Sets the value for a key, replacing any existing values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Appends a value to the list for a key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Returns `true` if the key has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
