//! Field predicates used by the field templates.
//!
//! Each predicate inspects the bound field's widget type. The templates do
//! not call them directly; [`field_context`] evaluates them all once and
//! exposes the results as `field.is_checkbox`, `field.is_select`, ...

use crispy_bulma_forms::widgets::{render_attrs, WidgetType};
use crispy_bulma_forms::BoundField;
use crispy_bulma_template::context::ContextValue;
use crispy_bulma_template::html::escape_html;

/// A single checkbox.
pub fn is_checkbox(field: &BoundField) -> bool {
    field.widget.kind == WidgetType::CheckboxInput
}

/// A password input.
pub fn is_password(field: &BoundField) -> bool {
    field.widget.kind == WidgetType::PasswordInput
}

/// A set of radio buttons.
pub fn is_radioselect(field: &BoundField) -> bool {
    field.widget.kind == WidgetType::RadioSelect
}

/// A `<select>`; true for multi-selects too.
pub fn is_select(field: &BoundField) -> bool {
    matches!(field.widget.kind, WidgetType::Select | WidgetType::SelectMultiple)
}

/// A `<select multiple>`.
pub fn is_selectmultiple(field: &BoundField) -> bool {
    field.widget.kind == WidgetType::SelectMultiple
}

/// A set of checkboxes.
pub fn is_checkboxselectmultiple(field: &BoundField) -> bool {
    field.widget.kind == WidgetType::CheckboxSelectMultiple
}

/// A file input; true for clearable file inputs too.
pub fn is_file(field: &BoundField) -> bool {
    matches!(
        field.widget.kind,
        WidgetType::FileInput | WidgetType::ClearableFileInput
    )
}

/// A clearable file input.
pub fn is_clearable_file(field: &BoundField) -> bool {
    field.widget.kind == WidgetType::ClearableFileInput
}

/// A widget made of sub-widgets.
pub fn is_multivalue(field: &BoundField) -> bool {
    field.widget.is_composite()
}

/// The widget's `class` attribute, if any.
pub fn classes(field: &BoundField) -> Option<&str> {
    field.widget.attrs.get("class").map(String::as_str)
}

/// The lower-cased widget type name.
pub fn css_class(field: &BoundField) -> String {
    field.widget.type_name()
}

/// Builds the `field` dict the field templates read.
///
/// Every key is always present so templates can print values without
/// tripping over undefined variables.
pub fn field_context(field: &BoundField) -> ContextValue {
    let id = field.id();
    let choice_type = if is_radioselect(field) { "radio" } else { "checkbox" };

    let choices: Vec<ContextValue> = field
        .widget
        .choice_items(&id, &field.data)
        .into_iter()
        .map(|c| {
            ContextValue::dict([
                ("id", ContextValue::from(c.id)),
                ("value", ContextValue::from(escape_html(&c.value))),
                ("label", ContextValue::from(escape_html(&c.label))),
                ("checked", ContextValue::from(c.checked)),
            ])
        })
        .collect();

    let mut choice_attrs = field.widget.attrs.clone();
    choice_attrs.remove("id");
    if field.field.required && field.widget.kind.uses_required_attribute() {
        choice_attrs.insert("required".to_string(), String::new());
    }

    let errors: Vec<String> = field.errors.iter().map(|e| escape_html(e)).collect();

    ContextValue::dict([
        ("auto_id", ContextValue::from(id.as_str())),
        ("id_for_label", ContextValue::from(field.id_for_label())),
        ("html_name", ContextValue::from(field.name.as_str())),
        ("label", ContextValue::from(escape_html(&field.field.label))),
        ("help_text", ContextValue::from(field.field.help_text.as_str())),
        ("errors", ContextValue::from(errors)),
        ("required", ContextValue::from(field.field.required)),
        ("is_hidden", ContextValue::from(field.is_hidden())),
        ("is_checkbox", ContextValue::from(is_checkbox(field))),
        ("is_password", ContextValue::from(is_password(field))),
        ("is_radioselect", ContextValue::from(is_radioselect(field))),
        ("is_select", ContextValue::from(is_select(field))),
        ("is_selectmultiple", ContextValue::from(is_selectmultiple(field))),
        (
            "is_checkboxselectmultiple",
            ContextValue::from(is_checkboxselectmultiple(field)),
        ),
        ("is_file", ContextValue::from(is_file(field))),
        ("is_clearable_file", ContextValue::from(is_clearable_file(field))),
        ("is_multivalue", ContextValue::from(is_multivalue(field))),
        ("classes", ContextValue::from(classes(field).unwrap_or_default())),
        ("css_class", ContextValue::from(css_class(field))),
        ("choices", ContextValue::from(choices)),
        ("choice_type", ContextValue::from(choice_type)),
        ("choice_class", ContextValue::from(choice_type)),
        ("choice_attrs", ContextValue::from(render_attrs(&choice_attrs))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crispy_bulma_forms::widgets::Widget;
    use crispy_bulma_forms::{FormFieldDef, FormFieldType};

    fn bound(kind: WidgetType) -> BoundField {
        let def = FormFieldDef::new("f", FormFieldType::char()).widget(Widget::new(kind));
        BoundField::new(&def, vec![], vec![], None)
    }

    #[test]
    fn test_predicates() {
        assert!(is_checkbox(&bound(WidgetType::CheckboxInput)));
        assert!(is_password(&bound(WidgetType::PasswordInput)));
        assert!(is_radioselect(&bound(WidgetType::RadioSelect)));
        assert!(!is_radioselect(&bound(WidgetType::CheckboxSelectMultiple)));
        assert!(is_checkboxselectmultiple(&bound(WidgetType::CheckboxSelectMultiple)));
        assert!(!is_multivalue(&bound(WidgetType::TextInput)));
        assert!(is_multivalue(&bound(WidgetType::SplitDateTimeWidget)));
    }

    #[test]
    fn test_select_predicates() {
        assert!(is_select(&bound(WidgetType::Select)));
        assert!(is_select(&bound(WidgetType::SelectMultiple)));
        assert!(!is_selectmultiple(&bound(WidgetType::Select)));
        assert!(is_selectmultiple(&bound(WidgetType::SelectMultiple)));
    }

    #[test]
    fn test_file_predicates() {
        assert!(is_file(&bound(WidgetType::FileInput)));
        assert!(is_file(&bound(WidgetType::ClearableFileInput)));
        assert!(!is_clearable_file(&bound(WidgetType::FileInput)));
        assert!(is_clearable_file(&bound(WidgetType::ClearableFileInput)));
    }

    #[test]
    fn test_classes_and_css_class() {
        let mut field = bound(WidgetType::TextInput);
        assert_eq!(classes(&field), None);
        field.widget.attrs.insert("class".to_string(), "input".to_string());
        assert_eq!(classes(&field), Some("input"));
        assert_eq!(css_class(&field), "textinput");
    }

    #[test]
    fn test_field_context_keys() {
        let def = FormFieldDef::new(
            "size",
            FormFieldType::Choice {
                choices: vec![("s".to_string(), "<Small>".to_string())],
            },
        )
        .widget(Widget::new(WidgetType::RadioSelect));
        let field = BoundField::new(&def, vec!["s".to_string()], vec!["Bad & wrong".to_string()], None);
        let ctx = field_context(&field);

        assert_eq!(ctx.resolve_path("auto_id"), Some(&ContextValue::from("id_size")));
        assert_eq!(ctx.resolve_path("id_for_label"), Some(&ContextValue::from("id_size_0")));
        assert_eq!(ctx.resolve_path("choice_type"), Some(&ContextValue::from("radio")));
        assert_eq!(ctx.resolve_path("is_radioselect"), Some(&ContextValue::from(true)));

        let choice = ctx.resolve_path("choices").and_then(|c| c.resolve_path("0")).unwrap();
        assert_eq!(choice.resolve_path("label"), Some(&ContextValue::from("&lt;Small&gt;")));
        assert_eq!(choice.resolve_path("checked"), Some(&ContextValue::from(true)));

        let errors = ctx.resolve_path("errors").unwrap();
        assert_eq!(errors.to_display_string(), "Bad &amp; wrong");
        assert_eq!(
            ctx.resolve_path("choice_attrs"),
            Some(&ContextValue::from(" required"))
        );
    }
}
