//! Form helper and the `render_crispy_form` entry point.
//!
//! A [`FormHelper`] describes how a form is wrapped: the `<form>` tag and its
//! attributes, the layout, the buttons rendered after it, and presentation
//! flags. [`CrispyRenderer`] turns a form plus a helper into markup.

use crispy_bulma_core::error::{CrispyError, CrispyResult};
use crispy_bulma_core::logging::render_span;
use crispy_bulma_core::settings::{Settings, SETTINGS};
use crispy_bulma_forms::widgets::Attrs;
use crispy_bulma_forms::Form;
use crispy_bulma_template::context::{ContextValue, RenderContext};
use crispy_bulma_template::engine::Engine;
use crispy_bulma_template::html::{escape_html, flatatt};

use crate::converters::ClassConverters;
use crate::layout::{Layout, LayoutItem, LayoutObject};
use crate::utils::{render_field, FieldOptions, FormStyle, RenderPass};

const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Form-level rendering options.
#[derive(Debug)]
pub struct FormHelper {
    /// Whether the output is wrapped in a `<form>` element.
    pub form_tag: bool,
    form_method: String,
    /// The `action` attribute.
    pub form_action: String,
    /// The `id` attribute.
    pub form_id: String,
    /// The `class` attribute.
    pub form_class: String,
    /// Extra `<form>` attributes. `id`, `class` and `action` fill the matching
    /// setting when it is empty.
    pub attrs: Attrs,
    /// The layout. Without one every field renders in declaration order.
    pub layout: Option<Layout>,
    /// Buttons rendered after the layout.
    pub inputs: Vec<LayoutItem>,
    /// Whether errors are shown.
    pub form_show_errors: bool,
    /// Whether labels are shown.
    pub form_show_labels: bool,
    /// Heading of the non-field error box.
    pub form_error_title: String,
    /// Extra classes for every `<label>`.
    pub label_class: String,
    /// Extra classes for every `control` div.
    pub field_class: String,
    /// Appends every field the layout did not render.
    pub render_unmentioned_fields: bool,
    /// Appends hidden fields the layout did not render.
    pub render_hidden_fields: bool,
    /// Appends required fields the layout did not render.
    pub render_required_fields: bool,
    /// Omits the CSRF input.
    pub disable_csrf: bool,
    /// Form template instead of `{pack}/whole_uni_form.html` or
    /// `{pack}/uni_form.html`.
    pub template: Option<String>,
    /// Template used for every field.
    pub field_template: Option<String>,
    /// Template pack instead of the configured one.
    pub template_pack: Option<String>,
}

impl Default for FormHelper {
    fn default() -> Self {
        Self {
            form_tag: true,
            form_method: "post".to_string(),
            form_action: String::new(),
            form_id: String::new(),
            form_class: String::new(),
            attrs: Attrs::new(),
            layout: None,
            inputs: Vec::new(),
            form_show_errors: true,
            form_show_labels: true,
            form_error_title: String::new(),
            label_class: String::new(),
            field_class: String::new(),
            render_unmentioned_fields: false,
            render_hidden_fields: false,
            render_required_fields: false,
            disable_csrf: false,
            template: None,
            field_template: None,
            template_pack: None,
        }
    }
}

impl FormHelper {
    /// Creates a helper with the defaults: a POST `<form>` tag, errors and
    /// labels shown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Sets the form method. Only `post` and `get` are accepted, in any case.
    pub fn set_form_method(&mut self, method: &str) -> CrispyResult<()> {
        let method = method.to_lowercase();
        if method != "post" && method != "get" {
            return Err(CrispyError::FormHelpersException(format!(
                "Only GET and POST are valid in the form_method helper attribute, got '{method}'"
            )));
        }
        self.form_method = method;
        Ok(())
    }

    /// The form method, lower-cased.
    pub fn form_method(&self) -> &str {
        &self.form_method
    }

    /// Appends a button rendered after the layout.
    pub fn add_input(&mut self, input: impl Into<LayoutItem>) {
        self.inputs.push(input.into());
    }

    fn form_setting<'a>(&'a self, explicit: &'a str, key: &str) -> &'a str {
        if explicit.is_empty() {
            self.attrs.get(key).map_or("", String::as_str)
        } else {
            explicit
        }
    }

    fn form_attrs(&self) -> String {
        let attrs: Attrs = self
            .attrs
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "id" | "class" | "action"))
            .map(|(k, v)| (k.replace('_', "-"), v.clone()))
            .collect();
        flatatt(attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn style(&self) -> FormStyle {
        FormStyle {
            show_errors: self.form_show_errors,
            show_labels: self.form_show_labels,
            label_class: self.label_class.clone(),
            field_class: self.field_class.clone(),
            field_template: self.field_template.clone(),
        }
    }

    fn wants_unmentioned(&self, form: &dyn Form, name: &str) -> bool {
        if self.render_unmentioned_fields {
            return true;
        }
        form.field(name).is_some_and(|field| {
            (self.render_hidden_fields && field.widget.is_hidden())
                || (self.render_required_fields && field.required)
        })
    }
}

/// Renders forms with a given engine, class table and settings.
#[derive(Debug, Clone, Copy)]
pub struct CrispyRenderer<'a> {
    engine: &'a Engine,
    converters: &'a ClassConverters,
    settings: &'a Settings,
}

impl<'a> CrispyRenderer<'a> {
    /// Creates a renderer.
    pub const fn new(engine: &'a Engine, converters: &'a ClassConverters, settings: &'a Settings) -> Self {
        Self {
            engine,
            converters,
            settings,
        }
    }

    /// Renders `form`. Without a helper, a default [`FormHelper`] is used.
    ///
    /// Returns `ImproperlyConfigured` when the template pack is not allowed.
    pub fn render(
        &self,
        form: &dyn Form,
        helper: Option<&FormHelper>,
        context: &RenderContext,
    ) -> CrispyResult<String> {
        let default_helper;
        let helper = if let Some(helper) = helper {
            helper
        } else {
            default_helper = FormHelper::default();
            &default_helper
        };

        let pack = helper
            .template_pack
            .as_deref()
            .unwrap_or(&self.settings.template_pack);
        self.settings.check_template_pack(pack)?;

        let form_id = helper.form_setting(&helper.form_id, "id");
        let span = render_span(form_id, pack);
        let _guard = span.enter();

        let mut pass = RenderPass::new(form, self.engine, self.converters, self.settings)
            .with_template_pack(pack)
            .with_style(helper.style());

        let mut form_html = String::new();
        if let Some(layout) = &helper.layout {
            form_html.push_str(&layout.render(&mut pass, context)?);
            for field in form.fields() {
                if !pass.is_rendered(&field.name) && helper.wants_unmentioned(form, &field.name) {
                    form_html.push_str(&render_field(&mut pass, context, &field.name, &FieldOptions::default())?);
                }
            }
        } else {
            for field in form.fields() {
                form_html.push_str(&render_field(&mut pass, context, &field.name, &FieldOptions::default())?);
            }
        }

        let input_context = context.with("suppress_field_wrapper", true);
        let mut inputs = String::new();
        for input in &helper.inputs {
            inputs.push_str(&input.render(&mut pass, &input_context)?);
        }

        let template = match &helper.template {
            Some(template) => pass.template(template),
            None if helper.form_tag => pass.template("{pack}/whole_uni_form.html"),
            None => pass.template("{pack}/uni_form.html"),
        };

        let csrf_input = match context.get_string("csrf_token") {
            Some(token) if helper.form_method == "post" && !helper.disable_csrf => format!(
                r#"<input type="hidden" name="{CSRF_FIELD}" value="{}">"#,
                escape_html(&token)
            ),
            _ => String::new(),
        };
        let enctype = if form.is_multipart() { "multipart/form-data" } else { "" };
        let non_field_errors: Vec<String> = form.non_field_errors().iter().map(|e| escape_html(e)).collect();

        let ctx = context.overlay([
            ("form_html", ContextValue::from(form_html)),
            ("inputs", ContextValue::from(inputs)),
            ("form_tag", ContextValue::from(helper.form_tag)),
            ("form_show_errors", ContextValue::from(helper.form_show_errors)),
            ("form_show_labels", ContextValue::from(helper.form_show_labels)),
            ("form_error_title", ContextValue::from(escape_html(&helper.form_error_title))),
            ("non_field_errors", ContextValue::from(non_field_errors)),
            ("form_id", ContextValue::from(escape_html(form_id))),
            (
                "form_class",
                ContextValue::from(escape_html(helper.form_setting(&helper.form_class, "class"))),
            ),
            ("form_method", ContextValue::from(helper.form_method.as_str())),
            (
                "form_action",
                ContextValue::from(escape_html(helper.form_setting(&helper.form_action, "action"))),
            ),
            ("form_enctype", ContextValue::from(enctype)),
            ("form_attrs", ContextValue::from(helper.form_attrs())),
            ("csrf_input", ContextValue::from(csrf_input)),
        ]);

        tracing::debug!(template = %template, fields = pass.rendered_fields().len(), "rendering form");
        self.engine.render(&template, &ctx)
    }
}

/// Renders `form` with the process-wide engine, class table and settings.
///
/// ```
/// use crispy_bulma_forms::{BaseForm, FormFieldDef, FormFieldType};
/// use crispy_bulma_layout::helper::{render_crispy_form, FormHelper};
/// use crispy_bulma_template::context::RenderContext;
///
/// let form = BaseForm::new(vec![FormFieldDef::new("email", FormFieldType::Email)]);
/// let mut helper = FormHelper::new();
/// helper.form_tag = false;
/// let html = render_crispy_form(&form, Some(&helper), &RenderContext::new()).unwrap();
/// assert!(html.contains(r#"type="email""#));
/// ```
pub fn render_crispy_form(
    form: &dyn Form,
    helper: Option<&FormHelper>,
    context: &RenderContext,
) -> CrispyResult<String> {
    let settings = SETTINGS.get_or_default();
    CrispyRenderer::new(Engine::global()?, ClassConverters::global(), settings).render(form, helper, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_method() {
        let mut helper = FormHelper::new();
        assert_eq!(helper.form_method(), "post");
        helper.set_form_method("GET").unwrap();
        assert_eq!(helper.form_method(), "get");

        let err = helper.set_form_method("PUT").unwrap_err();
        assert!(matches!(err, CrispyError::FormHelpersException(_)));
        assert_eq!(helper.form_method(), "get");
    }

    #[test]
    fn test_form_settings_fall_back_to_attrs() {
        let mut helper = FormHelper::new();
        helper.attrs.insert("id".to_string(), "from-attrs".to_string());
        helper.attrs.insert("data_role".to_string(), "search".to_string());
        assert_eq!(helper.form_setting(&helper.form_id, "id"), "from-attrs");
        assert_eq!(helper.form_attrs(), r#" data-role="search""#);

        helper.form_id = "explicit".to_string();
        assert_eq!(helper.form_setting(&helper.form_id, "id"), "explicit");
    }

    #[test]
    fn test_defaults() {
        let helper = FormHelper::default();
        assert!(helper.form_tag);
        assert!(helper.form_show_errors);
        assert!(helper.form_show_labels);
        assert!(!helper.disable_csrf);
        assert!(helper.layout.is_none());
    }
}
