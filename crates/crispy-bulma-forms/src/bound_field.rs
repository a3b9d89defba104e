//! Bound fields: form fields populated with data and errors.
//!
//! A [`BoundField`] pairs a field definition with its current value, its
//! validation errors and an owned copy of its widget. Layout objects mutate
//! that copy (CSS classes, extra attributes) before rendering, so the form's
//! own definitions are never touched by a render.

use crispy_bulma_core::error::CrispyResult;
use crispy_bulma_template::engine::Engine;
use crispy_bulma_template::html::escape_html;

use crate::fields::FormFieldDef;
use crate::widgets::{Attrs, Widget};

/// A form field bound to data and validation state.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    /// The field's HTML name attribute (prefixed when the form has a prefix).
    pub name: String,
    /// Snapshot of the field definition.
    pub field: BoundFieldDef,
    /// The values to render: submitted data when bound, else the initial
    /// value. Empty when there is none.
    pub data: Vec<String>,
    /// Validation error messages for this field.
    pub errors: Vec<String>,
    /// The widget used for rendering.
    pub widget: Widget,
}

/// Minimal field definition snapshot stored in a `BoundField`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFieldDef {
    /// The field name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Help text.
    pub help_text: String,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
}

impl BoundField {
    /// Creates a new `BoundField` from a field definition and current state.
    pub fn new(
        field_def: &FormFieldDef,
        data: Vec<String>,
        errors: Vec<String>,
        prefix: Option<&str>,
    ) -> Self {
        let html_name = match prefix {
            Some(p) => format!("{p}-{}", field_def.name),
            None => field_def.name.clone(),
        };

        Self {
            name: html_name,
            field: BoundFieldDef {
                name: field_def.name.clone(),
                label: field_def.label.clone(),
                help_text: field_def.help_text.clone(),
                required: field_def.required,
                disabled: field_def.disabled,
            },
            data,
            errors,
            widget: field_def.widget.clone(),
        }
    }

    /// Renders the widget HTML for this bound field.
    ///
    /// The widget's own `id` attribute wins over the auto id.
    pub fn render(&self, engine: &Engine) -> CrispyResult<String> {
        let mut extra = Attrs::new();
        extra.insert("id".to_string(), self.id());
        if self.field.required && self.widget.kind.uses_required_attribute() {
            extra.insert("required".to_string(), String::new());
        }
        if self.field.disabled {
            extra.insert("disabled".to_string(), String::new());
        }
        self.widget.render(&self.name, &self.data, &extra, engine)
    }

    /// Renders a `<label>` element for this field.
    pub fn label_tag(&self) -> String {
        let label = escape_html(&self.field.label);
        let label_id = self.id_for_label();
        if label_id.is_empty() {
            format!("<label>{label}</label>")
        } else {
            format!(r#"<label for="{label_id}">{label}</label>"#)
        }
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Returns the `id` the widget renders with.
    pub fn id(&self) -> String {
        self.widget
            .attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| self.auto_id())
    }

    /// Returns the `id` a label for this field should point at.
    pub fn id_for_label(&self) -> String {
        self.widget.id_for_label(&self.id())
    }

    /// Returns `true` if this field has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if the field renders as a hidden input.
    pub fn is_hidden(&self) -> bool {
        self.widget.is_hidden()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }
}
