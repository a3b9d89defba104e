//! The field class-name resolver and its tag mini-language.
//!
//! [`crispy_field`] takes a bound field, converts each underlying widget's
//! type into Bulma classes through [`ClassConverters`], merges caller
//! attributes into the widget, and renders the widget.
//!
//! [`CrispyFieldTag`] is the textual form used by templates and tests:
//!
//! ```text
//! field 'class' 'is-danger' placeholder hint_var
//! ```
//!
//! The first token names the field, the rest are name/value pairs. Quoted
//! tokens are literals; bare tokens are looked up in the render context.

use crispy_bulma_core::error::{CrispyError, CrispyResult};
use crispy_bulma_forms::widgets::{Attrs, Widget};
use crispy_bulma_forms::BoundField;
use crispy_bulma_template::context::RenderContext;

use crate::converters::ClassConverters;
use crate::utils::RenderPass;

/// One side of a tag attribute: a literal or a context variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrExpr {
    /// A quoted literal.
    Literal(String),
    /// A variable path resolved against the render context.
    Variable(String),
}

impl AttrExpr {
    /// Parses a single token; `'x'` and `"x"` are literals.
    pub fn parse(token: &str) -> Self {
        let quoted = token.len() >= 2
            && ((token.starts_with('\'') && token.ends_with('\''))
                || (token.starts_with('"') && token.ends_with('"')));
        if quoted {
            Self::Literal(token[1..token.len() - 1].to_string())
        } else {
            Self::Variable(token.to_string())
        }
    }

    /// Shorthand for a literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Resolves the expression. A missing variable yields the empty string,
    /// or `VariableDoesNotExist` when `strict` is set.
    pub fn resolve(&self, context: &RenderContext, strict: bool) -> CrispyResult<String> {
        match self {
            Self::Literal(s) => Ok(s.clone()),
            Self::Variable(path) => match context.get_string(path) {
                Some(value) => Ok(value),
                None if strict => Err(CrispyError::VariableDoesNotExist(path.clone())),
                None => Ok(String::new()),
            },
        }
    }
}

/// A `(name, value)` pair of attribute expressions.
pub type AttrPair = (AttrExpr, AttrExpr);

/// Caller attributes for [`crispy_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAttrs {
    /// One mapping, applied to every underlying widget.
    Shared(Vec<AttrPair>),
    /// One mapping per underlying widget, matched by position. Widgets past
    /// the end of the list get no caller attributes.
    PerWidget(Vec<Vec<AttrPair>>),
}

impl Default for FieldAttrs {
    fn default() -> Self {
        Self::Shared(Vec::new())
    }
}

impl FieldAttrs {
    /// A shared mapping of literal attributes.
    pub fn literals<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::Shared(literal_pairs(pairs))
    }

    /// One literal mapping per widget.
    pub fn per_widget(mappings: &[Attrs]) -> Self {
        Self::PerWidget(
            mappings
                .iter()
                .map(|attrs| literal_pairs(attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
                .collect(),
        )
    }

    fn for_widget(&self, index: usize) -> &[AttrPair] {
        match self {
            Self::Shared(pairs) => pairs,
            Self::PerWidget(list) => list.get(index).map_or(&[], Vec::as_slice),
        }
    }
}

fn literal_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<AttrPair> {
    pairs
        .into_iter()
        .map(|(k, v)| (AttrExpr::literal(k), AttrExpr::literal(v)))
        .collect()
}

/// Merges whitespace-separated tokens: tokens of `existing` first, then the
/// tokens of `extra` not seen yet. No token appears twice.
///
/// ```
/// use crispy_bulma_layout::field_tag::merge_tokens;
///
/// assert_eq!(merge_tokens("input is-small", "is-small is-danger"), "input is-small is-danger");
/// ```
pub fn merge_tokens(existing: &str, extra: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for token in existing.split_whitespace().chain(extra.split_whitespace()) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens.join(" ")
}

/// Adds the converted classes for the widget's type to its `class`
/// attribute. An empty result removes the attribute.
pub fn apply_widget_classes(widget: &mut Widget, converters: &ClassConverters) {
    let type_name = widget.type_name();
    let tokens = converters.lookup(&type_name);
    let current = widget.attrs.get("class").map_or("", String::as_str);
    let merged = merge_tokens(current, tokens);
    if merged.is_empty() {
        widget.attrs.remove("class");
    } else {
        widget.attrs.insert("class".to_string(), merged);
    }
}

fn merge_attr(attrs: &mut Attrs, name: String, value: String) {
    if let Some(existing) = attrs.get_mut(&name) {
        *existing = merge_tokens(existing, &value);
    } else {
        attrs.insert(name.clone(), value);
    }
    if name == "class" && attrs.get("class").is_some_and(String::is_empty) {
        attrs.remove("class");
    }
}

/// Resolves classes and caller attributes onto every underlying widget of
/// `bound`, then renders it.
///
/// Running it again on the same field adds nothing: every merge
/// de-duplicates tokens.
pub fn crispy_field(
    bound: &mut BoundField,
    attrs: &FieldAttrs,
    pass: &RenderPass<'_>,
    context: &RenderContext,
) -> CrispyResult<String> {
    for (index, widget) in bound.widget.underlying_mut().into_iter().enumerate() {
        apply_widget_classes(widget, pass.converters);
        for (name, value) in attrs.for_widget(index) {
            let name = name.resolve(context, pass.strict_variables)?;
            let value = value.resolve(context, pass.strict_variables)?;
            if name.is_empty() {
                continue;
            }
            merge_attr(&mut widget.attrs, name, value);
        }
    }
    tracing::debug!(field = %bound.name, widget = %bound.widget.kind, "field classes resolved");
    bound.render(pass.engine)
}

/// A parsed `crispy_field` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrispyFieldTag {
    field: AttrExpr,
    attrs: Vec<AttrPair>,
}

impl CrispyFieldTag {
    /// Parses `field name value name value ...`. A leading `crispy_field`
    /// tag name is accepted and skipped.
    pub fn parse(source: &str) -> CrispyResult<Self> {
        let mut tokens = tokenize(source)?;
        if tokens.first().is_some_and(|t| t == "crispy_field") {
            tokens.remove(0);
        }
        if tokens.is_empty() {
            return Err(CrispyError::TemplateSyntaxError(
                "crispy_field requires a field".to_string(),
            ));
        }
        let field = AttrExpr::parse(&tokens.remove(0));
        if tokens.len() % 2 != 0 {
            return Err(CrispyError::TemplateSyntaxError(format!(
                "crispy_field attribute '{}' has no value",
                tokens[tokens.len() - 1]
            )));
        }
        let attrs = tokens
            .chunks(2)
            .map(|pair| (AttrExpr::parse(&pair[0]), AttrExpr::parse(&pair[1])))
            .collect();
        Ok(Self { field, attrs })
    }

    /// The field reference.
    pub const fn field(&self) -> &AttrExpr {
        &self.field
    }

    /// The attribute pairs, in source order.
    pub fn attrs(&self) -> &[AttrPair] {
        &self.attrs
    }

    /// Resolves the field and renders it through [`crispy_field`].
    ///
    /// A bare field reference that names a context variable uses the
    /// variable's value as the field name; otherwise the token itself is the
    /// field name.
    pub fn render(&self, pass: &RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let name = match &self.field {
            AttrExpr::Literal(name) => name.clone(),
            AttrExpr::Variable(path) => context.get_string(path).unwrap_or_else(|| path.clone()),
        };
        let Some(mut bound) = pass.form.bound_field(&name) else {
            return pass.missing_field(&name);
        };
        crispy_field(&mut bound, &FieldAttrs::Shared(self.attrs.clone()), pass, context)
    }
}

fn tokenize(source: &str) -> CrispyResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    for ch in source.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None if ch == '\'' || ch == '"' => {
                current.push(ch);
                quote = Some(ch);
            }
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }
    if quote.is_some() {
        return Err(CrispyError::TemplateSyntaxError(format!(
            "unterminated quote in crispy_field tag: {source}"
        )));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
