//! Bulma-specific layout objects.

use crispy_bulma_core::error::CrispyResult;
use crispy_bulma_template::context::RenderContext;

use crate::layout::{Field, LayoutObject};
use crate::utils::RenderPass;

macro_rules! inline_field {
    ($(#[$doc:meta])* $name:ident, $template:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(Field);

        impl $name {
            /// Creates the inline field.
            pub fn new(name: impl Into<String>) -> Self {
                Self(Field::new(name).template($template))
            }

            /// Adds an attribute to each choice input.
            #[must_use]
            pub fn attr(self, key: &str, value: impl Into<String>) -> Self {
                Self(self.0.attr(key, value))
            }

            /// Sets classes for the wrapper `<div class="field">`.
            #[must_use]
            pub fn wrapper_class(self, class: impl Into<String>) -> Self {
                Self(self.0.wrapper_class(class))
            }
        }

        impl LayoutObject for $name {
            fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
                self.0.render(pass, context)
            }
        }
    };
}

inline_field!(
    /// Radio buttons laid out on one line.
    InlineRadios,
    "{pack}/layout/radioselect_inline.html"
);

inline_field!(
    /// Checkboxes laid out on one line.
    InlineCheckboxes,
    "{pack}/layout/checkboxselectmultiple_inline.html"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crispy_bulma_core::settings::Settings;
    use crispy_bulma_forms::widgets::{Widget, WidgetType};
    use crispy_bulma_forms::{BaseForm, FormFieldDef, FormFieldType};
    use crispy_bulma_template::engine::Engine;

    use crate::converters::ClassConverters;

    fn choices() -> Vec<(String, String)> {
        vec![
            ("s".to_string(), "Small".to_string()),
            ("l".to_string(), "Large".to_string()),
        ]
    }

    fn render(object: &dyn LayoutObject) -> String {
        let form = BaseForm::new(vec![
            FormFieldDef::new("size", FormFieldType::Choice { choices: choices() })
                .widget(Widget::new(WidgetType::RadioSelect))
                .initial("l"),
            FormFieldDef::new("toppings", FormFieldType::MultipleChoice { choices: choices() })
                .widget(Widget::new(WidgetType::CheckboxSelectMultiple))
                .required(false),
        ]);
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let settings = Settings::default();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings);
        object.render(&mut pass, &RenderContext::new()).unwrap()
    }

    #[test]
    fn test_inline_radios() {
        let html = render(&InlineRadios::new("size"));
        assert_eq!(html.matches(r#"<label for="id_size_"#).count(), 2);
        assert!(html.contains(r#"class="radio""#));
        assert!(html.contains(r#"value="l" id="id_size_1" checked"#));
        assert!(!html.contains("<div><label"));
    }

    #[test]
    fn test_inline_checkboxes() {
        let html = render(&InlineCheckboxes::new("toppings").wrapper_class("is-inline"));
        assert_eq!(html.matches(r#"type="checkbox""#).count(), 2);
        assert!(html.contains(r#"class="field is-inline""#));
        assert!(!html.contains("required"));
    }
}
