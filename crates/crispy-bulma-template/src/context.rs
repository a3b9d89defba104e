//! Render context for variable resolution.
//!
//! [`ContextValue`] is the dynamic value type templates see. [`RenderContext`]
//! is an immutable chain of scopes: a layout object never mutates the context
//! it receives, it derives an overlay with [`RenderContext::overlay`] and
//! hands that to its children. Siblings therefore cannot leak variables
//! into each other.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A dynamic value stored in a render context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// A string value.
    String(String),
    /// A 64-bit integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An ordered list of values.
    List(Vec<ContextValue>),
    /// A key-value mapping.
    Dict(HashMap<String, ContextValue>),
    /// The absence of a value.
    None,
}

impl ContextValue {
    /// Builds a `Dict` from `(key, value)` pairs.
    pub fn dict<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Dict(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` if this value is considered "truthy" by templates.
    ///
    /// `None`, `false`, zero, and empty strings/lists/dicts are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Dict(d) => !d.is_empty(),
        }
    }

    /// Converts this value to the string a template would print.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items
                .iter()
                .map(Self::to_display_string)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Dict(_) | Self::None => String::new(),
        }
    }

    /// Resolves one path segment on this value (a dict key or list index).
    pub fn resolve_path(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Dict(map) => map.get(key),
            Self::List(list) => key.parse::<usize>().ok().and_then(|idx| list.get(idx)),
            _ => None,
        }
    }

    /// Returns the string contents if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// -- From implementations --

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for ContextValue {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<usize> for ContextValue {
    fn from(i: usize) -> Self {
        Self::Integer(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ContextValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for ContextValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::None, Into::into)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::None),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(arr) => Self::List(arr.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Dict(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[derive(Debug)]
struct Scope {
    vars: HashMap<String, ContextValue>,
    parent: Option<Arc<Scope>>,
}

/// An immutable, layered render context.
///
/// Cloning is cheap (one `Arc`). Lookups search the newest overlay first.
///
/// # Examples
///
/// ```
/// use crispy_bulma_template::context::RenderContext;
///
/// let base = RenderContext::new().with("name", "Bulma");
/// let inner = base.with("name", "Overridden");
///
/// assert_eq!(inner.get("name").unwrap().to_display_string(), "Overridden");
/// assert_eq!(base.get("name").unwrap().to_display_string(), "Bulma");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    scope: Option<Arc<Scope>>,
}

impl RenderContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context holding the given variables.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        Self::new().overlay(pairs)
    }

    /// Returns a new context with `pairs` layered over this one.
    #[must_use]
    pub fn overlay<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        let vars: HashMap<String, ContextValue> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if vars.is_empty() {
            return self.clone();
        }
        Self {
            scope: Some(Arc::new(Scope {
                vars,
                parent: self.scope.clone(),
            })),
        }
    }

    /// Returns a new context with a single variable layered over this one.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.overlay([(key.into(), value.into())])
    }

    /// Looks up a variable, supporting dot-separated paths like `form.title`.
    pub fn get(&self, path: &str) -> Option<&ContextValue> {
        let mut parts = path.split('.');
        let root = parts.next()?;

        let mut scope = self.scope.as_deref();
        let mut current = None;
        while let Some(s) = scope {
            if let Some(v) = s.vars.get(root) {
                current = Some(v);
                break;
            }
            scope = s.parent.as_deref();
        }

        parts.try_fold(current?, |value, part| value.resolve_path(part))
    }

    /// Returns `true` if `path` resolves to a value.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Returns `true` if `path` resolves to a truthy value.
    pub fn is_truthy(&self, path: &str) -> bool {
        self.get(path).is_some_and(ContextValue::is_truthy)
    }

    /// Returns the display string for `path`, if it resolves.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).map(ContextValue::to_display_string)
    }

    /// Returns the number of overlays in this context.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.scope.as_deref();
        while let Some(s) = scope {
            depth += 1;
            scope = s.parent.as_deref();
        }
        depth
    }

    /// Flattens every overlay into one map, newer overlays winning.
    pub fn flatten(&self) -> HashMap<String, ContextValue> {
        let mut chain = Vec::new();
        let mut scope = self.scope.as_deref();
        while let Some(s) = scope {
            chain.push(s);
            scope = s.parent.as_deref();
        }

        let mut result = HashMap::new();
        for s in chain.into_iter().rev() {
            for (k, v) in &s.vars {
                result.insert(k.clone(), v.clone());
            }
        }
        result
    }

    /// Converts the flattened context into a [`tera::Context`].
    pub fn to_tera(&self) -> tera::Context {
        let mut ctx = tera::Context::new();
        for (k, v) in self.flatten() {
            ctx.insert(k, &v);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_value_conversions() {
        assert_eq!(ContextValue::from("hi").to_display_string(), "hi");
        assert_eq!(ContextValue::from(42i64).to_display_string(), "42");
        assert_eq!(ContextValue::from(true).to_display_string(), "true");
        assert_eq!(ContextValue::from(None::<String>), ContextValue::None);
        assert_eq!(
            ContextValue::from(vec!["a", "b"]).to_display_string(),
            "a b"
        );
    }

    #[test]
    fn test_context_value_truthiness() {
        assert!(!ContextValue::None.is_truthy());
        assert!(!ContextValue::from("").is_truthy());
        assert!(!ContextValue::from(Vec::<String>::new()).is_truthy());
        assert!(!ContextValue::from(0i64).is_truthy());
        assert!(ContextValue::from("x").is_truthy());
        assert!(ContextValue::from(true).is_truthy());
    }

    #[test]
    fn test_context_value_from_json() {
        let v = ContextValue::from(serde_json::json!({"a": [1, "two", null]}));
        let list = v.resolve_path("a").unwrap();
        assert_eq!(list.resolve_path("0"), Some(&ContextValue::Integer(1)));
        assert_eq!(list.resolve_path("1"), Some(&ContextValue::from("two")));
        assert_eq!(list.resolve_path("2"), Some(&ContextValue::None));
    }

    #[test]
    fn test_context_value_serializes_untagged() {
        let v = ContextValue::dict([("name", ContextValue::from("x")), ("n", ContextValue::None)]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({"name": "x", "n": null}));
    }

    #[test]
    fn test_overlay_does_not_touch_parent() {
        let base = RenderContext::from_pairs([("a", "1")]);
        let child = base.overlay([("b", "2")]);
        assert!(child.contains("a"));
        assert!(child.contains("b"));
        assert!(!base.contains("b"));
        assert_eq!(child.depth(), 2);
        assert_eq!(base.depth(), 1);
    }

    #[test]
    fn test_siblings_do_not_leak() {
        let base = RenderContext::new().with("shared", "yes");
        let first = base.with("only_first", true);
        let second = base.with("only_second", true);
        assert!(first.contains("only_first"));
        assert!(!second.contains("only_first"));
        assert!(!first.contains("only_second"));
    }

    #[test]
    fn test_empty_overlay_reuses_scope() {
        let base = RenderContext::new().with("a", "1");
        let same = base.overlay(Vec::<(String, ContextValue)>::new());
        assert_eq!(same.depth(), 1);
    }

    #[test]
    fn test_dot_path_lookup() {
        let ctx = RenderContext::new().with(
            "form",
            ContextValue::dict([("title", ContextValue::from("Contact"))]),
        );
        assert_eq!(ctx.get_string("form.title").as_deref(), Some("Contact"));
        assert!(ctx.get("form.missing").is_none());
        assert!(ctx.get("missing.title").is_none());
    }

    #[test]
    fn test_shadowing_with_none() {
        let base = RenderContext::new().with("icon", "fa-home");
        let child = base.with("icon", ContextValue::None);
        assert!(child.contains("icon"));
        assert!(!child.is_truthy("icon"));
        assert!(base.is_truthy("icon"));
    }

    #[test]
    fn test_flatten_newest_wins() {
        let ctx = RenderContext::from_pairs([("a", "old"), ("b", "kept")]).with("a", "new");
        let flat = ctx.flatten();
        assert_eq!(flat.get("a"), Some(&ContextValue::from("new")));
        assert_eq!(flat.get("b"), Some(&ContextValue::from("kept")));
    }

    #[test]
    fn test_to_tera() {
        let ctx = RenderContext::new().with("name", "Bulma");
        let tera_ctx = ctx.to_tera();
        assert!(tera_ctx.contains_key("name"));
    }
}
