//! Render pass state and field rendering.
//!
//! A [`RenderPass`] lives for one `render_crispy_form` call. It carries the
//! form, the engine, the class table, the template pack and the form style,
//! and records which fields have been rendered so the helper can append the
//! unmentioned ones afterwards.

use crispy_bulma_core::error::{CrispyError, CrispyResult};
use crispy_bulma_core::settings::Settings;
use crispy_bulma_forms::widgets::Attrs;
use crispy_bulma_forms::{BoundField, Form};
use crispy_bulma_template::context::{ContextValue, RenderContext};
use crispy_bulma_template::engine::Engine;

use crate::converters::ClassConverters;
use crate::field_tag::{crispy_field, FieldAttrs};
use crate::filters;

/// Presentation flags shared by every field of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStyle {
    /// Whether field and form errors are shown.
    pub show_errors: bool,
    /// Whether field labels are shown.
    pub show_labels: bool,
    /// Extra classes for `<label>` elements.
    pub label_class: String,
    /// Extra classes for the `control` div around inputs.
    pub field_class: String,
    /// Template used for every field instead of `{pack}/field.html`.
    pub field_template: Option<String>,
}

impl Default for FormStyle {
    fn default() -> Self {
        Self {
            show_errors: true,
            show_labels: true,
            label_class: String::new(),
            field_class: String::new(),
            field_template: None,
        }
    }
}

/// State of one render.
pub struct RenderPass<'a> {
    /// The form being rendered.
    pub form: &'a dyn Form,
    /// The template engine.
    pub engine: &'a Engine,
    /// The class conversion table.
    pub converters: &'a ClassConverters,
    /// The template pack, e.g. `bulma`.
    pub template_pack: String,
    /// Presentation flags.
    pub style: FormStyle,
    /// Whether missing fields are skipped instead of failing the render.
    pub fail_silently: bool,
    /// Whether unresolvable tag variables are errors.
    pub strict_variables: bool,
    rendered_fields: Vec<String>,
}

impl<'a> RenderPass<'a> {
    /// Creates a pass using the pack, failure mode and variable strictness
    /// of `settings`.
    pub fn new(
        form: &'a dyn Form,
        engine: &'a Engine,
        converters: &'a ClassConverters,
        settings: &Settings,
    ) -> Self {
        Self {
            form,
            engine,
            converters,
            template_pack: settings.template_pack.clone(),
            style: FormStyle::default(),
            fail_silently: settings.fails_silently(),
            strict_variables: settings.strict_variables,
            rendered_fields: Vec::new(),
        }
    }

    /// Sets the template pack.
    #[must_use]
    pub fn with_template_pack(mut self, pack: impl Into<String>) -> Self {
        self.template_pack = pack.into();
        self
    }

    /// Sets the form style.
    #[must_use]
    pub fn with_style(mut self, style: FormStyle) -> Self {
        self.style = style;
        self
    }

    /// Expands a template name: `{pack}` is replaced by the template pack.
    pub fn template(&self, name: &str) -> String {
        name.replace("{pack}", &self.template_pack)
    }

    /// Records that `name` was rendered. Returns `false` if it already was.
    pub fn mark_rendered(&mut self, name: &str) -> bool {
        if self.rendered_fields.iter().any(|f| f == name) {
            return false;
        }
        self.rendered_fields.push(name.to_string());
        true
    }

    /// Field names rendered so far, in render order.
    pub fn rendered_fields(&self) -> &[String] {
        &self.rendered_fields
    }

    /// Returns `true` if `name` has been rendered.
    pub fn is_rendered(&self, name: &str) -> bool {
        self.rendered_fields.iter().any(|f| f == name)
    }

    /// Handles a layout reference to a field the form does not have.
    pub fn missing_field(&self, name: &str) -> CrispyResult<String> {
        if self.fail_silently {
            tracing::warn!(field = name, "could not resolve form field, skipping");
            Ok(String::new())
        } else {
            Err(CrispyError::FieldDoesNotExist(name.to_string()))
        }
    }
}

/// How a layout object wants one field rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Attributes for the widget: `class` is appended to the existing class,
    /// the rest overwrite.
    pub attrs: WidgetAttrs,
    /// Extra classes appended to the widget class.
    pub css_class: Option<String>,
    /// Extra classes for the wrapper `<div class="field">`.
    pub wrapper_class: Option<String>,
    /// Field template instead of the pass default.
    pub template: Option<String>,
    /// Widget template override (e.g. the Bulma file upload markup).
    pub widget_template: Option<String>,
    /// Widget class-name override for the CSS resolver.
    pub widget_class_name: Option<String>,
}

/// Layout attributes for a field's widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAttrs {
    /// One mapping applied to every underlying widget.
    Shared(Attrs),
    /// One mapping per underlying widget, matched by position.
    PerWidget(Vec<Attrs>),
}

impl Default for WidgetAttrs {
    fn default() -> Self {
        Self::Shared(Attrs::new())
    }
}

impl WidgetAttrs {
    fn for_widget(&self, index: usize) -> Option<&Attrs> {
        match self {
            Self::Shared(attrs) => Some(attrs),
            Self::PerWidget(list) => list.get(index),
        }
    }
}

fn append_class(attrs: &mut Attrs, class: &str) {
    if class.is_empty() {
        return;
    }
    match attrs.get_mut("class") {
        Some(existing) if !existing.is_empty() => {
            existing.push(' ');
            existing.push_str(class);
        }
        _ => {
            attrs.insert("class".to_string(), class.to_string());
        }
    }
}

fn apply_layout_options(bound: &mut BoundField, options: &FieldOptions) {
    let composite = bound.widget.is_composite();
    if let Some(template) = &options.widget_template {
        bound.widget.template_name = Some(template.clone());
    }
    if let Some(class_name) = &options.widget_class_name {
        bound.widget.class_name = Some(class_name.clone());
    }
    for (index, widget) in bound.widget.underlying_mut().into_iter().enumerate() {
        if let Some(attrs) = options.attrs.for_widget(index) {
            for (key, value) in attrs {
                if key == "class" {
                    append_class(&mut widget.attrs, value);
                } else {
                    widget.attrs.insert(key.clone(), value.clone());
                }
            }
        }
        if let Some(css_class) = &options.css_class {
            append_class(&mut widget.attrs, css_class);
        }
        if composite && options.widget_class_name.is_some() {
            widget.class_name.clone_from(&options.widget_class_name);
        }
    }
}

/// Renders one form field through its field template.
///
/// A name the form does not know is skipped with a warning when the pass
/// fails silently, otherwise it is a `FieldDoesNotExist` error. Rendering
/// the same field twice is allowed but logged.
pub fn render_field(
    pass: &mut RenderPass<'_>,
    context: &RenderContext,
    name: &str,
    options: &FieldOptions,
) -> CrispyResult<String> {
    let Some(mut bound) = pass.form.bound_field(name) else {
        return pass.missing_field(name);
    };
    if !pass.mark_rendered(name) {
        tracing::warn!(field = name, "field rendered more than once");
    }

    apply_layout_options(&mut bound, options);

    let field_html = if bound.is_hidden() {
        bound.render(pass.engine)?
    } else {
        let attrs = if bound.has_errors() {
            FieldAttrs::literals([("class", "is-danger")])
        } else {
            FieldAttrs::default()
        };
        crispy_field(&mut bound, &attrs, pass, context)?
    };

    let template = options
        .template
        .as_deref()
        .or(pass.style.field_template.as_deref())
        .unwrap_or("{pack}/field.html");
    let template = pass.template(template);

    let mut field_context = context.overlay([
        ("field", filters::field_context(&bound)),
        ("field_html", ContextValue::from(field_html)),
        (
            "wrapper_class",
            ContextValue::from(options.wrapper_class.clone().unwrap_or_default()),
        ),
        ("label_class", ContextValue::from(pass.style.label_class.as_str())),
        ("field_class", ContextValue::from(pass.style.field_class.as_str())),
        ("form_show_labels", ContextValue::from(pass.style.show_labels)),
        ("form_show_errors", ContextValue::from(pass.style.show_errors)),
    ]);
    if !field_context.contains("suppress_field_wrapper") {
        field_context = field_context.with("suppress_field_wrapper", false);
    }

    tracing::debug!(field = name, template = %template, "rendering field");
    pass.engine.render(&template, &field_context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crispy_bulma_forms::widgets::{Widget, WidgetType};
    use crispy_bulma_forms::{BaseForm, FormFieldDef, FormFieldType};

    fn form() -> BaseForm {
        BaseForm::new(vec![
            FormFieldDef::new("name", FormFieldType::char()),
            FormFieldDef::new("token", FormFieldType::char())
                .widget(Widget::new(WidgetType::HiddenInput))
                .initial("abc"),
            FormFieldDef::new("when", FormFieldType::SplitDateTime).required(false),
        ])
    }

    fn settings(fail_silently: bool) -> Settings {
        Settings {
            fail_silently: Some(fail_silently),
            ..Settings::default()
        }
    }

    #[test]
    fn test_template_expansion() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        assert_eq!(pass.template("{pack}/field.html"), "bulma/field.html");
        let pass = pass.with_template_pack("uni_form");
        assert_eq!(pass.template("{pack}/layout/div.html"), "uni_form/layout/div.html");
        assert_eq!(pass.template("custom.html"), "custom.html");
    }

    #[test]
    fn test_render_field_basic() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let html = render_field(&mut pass, &RenderContext::new(), "name", &FieldOptions::default()).unwrap();
        assert!(html.contains(r#"<div id="div_id_name" class="field">"#));
        assert!(html.contains(r#"<label for="id_name" class="label requiredField">Name"#));
        assert!(html.contains(r#"class="input""#));
        assert!(pass.is_rendered("name"));
    }

    #[test]
    fn test_render_field_missing() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();

        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let html = render_field(&mut pass, &RenderContext::new(), "nope", &FieldOptions::default()).unwrap();
        assert!(html.is_empty());

        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(false));
        let err = render_field(&mut pass, &RenderContext::new(), "nope", &FieldOptions::default()).unwrap_err();
        assert!(matches!(err, CrispyError::FieldDoesNotExist(ref n) if n == "nope"));
    }

    #[test]
    fn test_render_field_twice_still_renders() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let ctx = RenderContext::new();
        let first = render_field(&mut pass, &ctx, "name", &FieldOptions::default()).unwrap();
        let second = render_field(&mut pass, &ctx, "name", &FieldOptions::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(pass.rendered_fields(), ["name"]);
    }

    #[test]
    fn test_render_hidden_field_is_bare() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let html = render_field(&mut pass, &RenderContext::new(), "token", &FieldOptions::default()).unwrap();
        assert_eq!(
            html.trim(),
            r#"<input type="hidden" name="token" value="abc" id="id_token" />"#
        );
    }

    #[test]
    fn test_layout_attrs_class_appends() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let mut attrs = Attrs::new();
        attrs.insert("class".to_string(), "is-rounded".to_string());
        attrs.insert("data-test".to_string(), "12".to_string());
        let options = FieldOptions {
            attrs: WidgetAttrs::Shared(attrs),
            css_class: Some("is-large".to_string()),
            wrapper_class: Some("testing".to_string()),
            ..FieldOptions::default()
        };
        let html = render_field(&mut pass, &RenderContext::new(), "name", &options).unwrap();
        assert!(html.contains(r#"class="is-rounded is-large input""#));
        assert!(html.contains(r#"data-test="12""#));
        assert!(html.contains(r#"class="field testing""#));
    }

    #[test]
    fn test_per_widget_attrs() {
        let form = form();
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let mut first = Attrs::new();
        first.insert("rel".to_string(), "test_dateinput".to_string());
        let options = FieldOptions {
            attrs: WidgetAttrs::PerWidget(vec![first]),
            ..FieldOptions::default()
        };
        let html = render_field(&mut pass, &RenderContext::new(), "when", &options).unwrap();
        assert_eq!(html.matches(r#"rel="test_dateinput""#).count(), 1);
        assert_eq!(html.matches(r#"class="dateinput input""#).count(), 1);
        assert_eq!(html.matches(r#"class="timeinput input""#).count(), 1);
    }

    #[test]
    fn test_errors_add_is_danger() {
        let mut form = form();
        form.bind(&crispy_bulma_core::utils::MultiValueDict::new());
        assert!(!form.is_valid());
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings(true));
        let html = render_field(&mut pass, &RenderContext::new(), "name", &FieldOptions::default()).unwrap();
        assert!(html.contains(r#"class="input is-danger""#));
        assert!(html.contains("has-errors"));
        assert!(html.contains(r#"<p id="error_1_id_name" class="help is-danger"><strong>This field is required.</strong></p>"#));
    }
}
