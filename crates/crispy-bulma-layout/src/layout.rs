//! Layout objects.
//!
//! A layout is a tree of descriptors. Each node renders its children with
//! the context it was given (or an overlay of it) and then renders its own
//! template. Nodes are immutable, so rendering the same tree twice yields
//! identical markup.
//!
//! Attribute names passed to builders have `_` replaced by `-`, so
//! `attr("data_id", "7")` renders as `data-id="7"`.

use std::fmt;

use crispy_bulma_core::error::CrispyResult;
use crispy_bulma_core::utils::text::slugify;
use crispy_bulma_forms::widgets::Attrs;
use crispy_bulma_template::context::{ContextValue, RenderContext};
use crispy_bulma_template::engine::has_template_syntax;
use crispy_bulma_template::html::{escape_html, flatatt};

use crate::utils::{render_field, FieldOptions, RenderPass, WidgetAttrs};

/// A node of a layout tree.
pub trait LayoutObject: fmt::Debug + Send + Sync {
    /// Renders the node and its children.
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String>;
}

/// A child of a container: a plain field name or a layout object.
#[derive(Debug)]
pub enum LayoutItem {
    /// A field rendered with default options.
    Field(String),
    /// Any layout object.
    Object(Box<dyn LayoutObject>),
}

impl LayoutItem {
    /// Renders the item.
    pub fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        match self {
            Self::Field(name) => render_field(pass, context, name, &FieldOptions::default()),
            Self::Object(object) => object.render(pass, context),
        }
    }
}

impl From<&str> for LayoutItem {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for LayoutItem {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl<T: LayoutObject + 'static> From<T> for LayoutItem {
    fn from(object: T) -> Self {
        Self::Object(Box::new(object))
    }
}

/// Builds a `Vec<LayoutItem>` from field names and layout objects.
///
/// ```
/// use crispy_bulma_layout::layout::{Layout, Submit};
/// use crispy_bulma_layout::layout_items;
///
/// let layout = Layout::new(layout_items!["email", Submit::new("save", "Save")]);
/// assert_eq!(layout.len(), 2);
/// ```
#[macro_export]
macro_rules! layout_items {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::layout::LayoutItem::from($item)),*]
    };
}

fn attr_name(key: &str) -> String {
    key.replace('_', "-")
}

fn flat_attrs(attrs: &Attrs) -> String {
    flatatt(attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

fn append_class(current: &mut Option<String>, extra: &str) {
    match current {
        Some(classes) if !classes.is_empty() => {
            classes.push(' ');
            classes.push_str(extra);
        }
        _ => *current = Some(extra.to_string()),
    }
}

fn render_children(
    fields: &[LayoutItem],
    pass: &mut RenderPass<'_>,
    context: &RenderContext,
) -> CrispyResult<String> {
    let mut html = String::new();
    for field in fields {
        html.push_str(&field.render(pass, context)?);
    }
    Ok(html)
}

fn container_dict(css_id: Option<&str>, css_class: Option<&str>, attrs: &Attrs) -> ContextValue {
    ContextValue::dict([
        ("css_id", ContextValue::from(css_id.map(escape_html))),
        ("css_class", ContextValue::from(css_class.map(escape_html))),
        ("flat_attrs", ContextValue::from(flat_attrs(attrs))),
    ])
}

/// The root of a form layout.
#[derive(Debug, Default)]
pub struct Layout {
    fields: Vec<LayoutItem>,
}

impl Layout {
    /// Creates a layout from its top-level items.
    pub fn new(fields: Vec<LayoutItem>) -> Self {
        Self { fields }
    }

    /// Appends an item.
    pub fn push(&mut self, item: impl Into<LayoutItem>) {
        self.fields.push(item.into());
    }

    /// Number of top-level items.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the layout has no items.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl LayoutObject for Layout {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        render_children(&self.fields, pass, context)
    }
}

/// Wraps its children in a `<div>`.
#[derive(Debug)]
pub struct Div {
    fields: Vec<LayoutItem>,
    css_id: Option<String>,
    css_class: Option<String>,
    attrs: Attrs,
    template: String,
}

impl Div {
    /// Creates a div around `fields`.
    pub fn new(fields: Vec<LayoutItem>) -> Self {
        Self {
            fields,
            css_id: None,
            css_class: None,
            attrs: Attrs::new(),
            template: "{pack}/layout/div.html".to_string(),
        }
    }

    /// Sets the `id`.
    #[must_use]
    pub fn css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Appends classes.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        append_class(&mut self.css_class, class);
        self
    }

    /// Adds an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(attr_name(key), value.into());
        self
    }

    /// Overrides the template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// The current class string.
    pub fn classes(&self) -> Option<&str> {
        self.css_class.as_deref()
    }
}

impl LayoutObject for Div {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let fields = render_children(&self.fields, pass, context)?;
        let ctx = context.overlay([
            (
                "div",
                container_dict(self.css_id.as_deref(), self.css_class.as_deref(), &self.attrs),
            ),
            ("fields", ContextValue::from(fields)),
        ]);
        pass.engine.render(&pass.template(&self.template), &ctx)
    }
}

macro_rules! div_variant {
    ($(#[$doc:meta])* $name:ident, $class:literal) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name(Div);

        impl $name {
            #[doc = concat!("Creates a div with class `", $class, "` around `fields`.")]
            pub fn new(fields: Vec<LayoutItem>) -> Self {
                Self(Div::new(fields).css_class($class))
            }

            /// Sets the `id`.
            #[must_use]
            pub fn css_id(self, id: impl Into<String>) -> Self {
                Self(self.0.css_id(id))
            }

            #[doc = concat!("Appends classes after `", $class, "`.")]
            #[must_use]
            pub fn css_class(self, class: &str) -> Self {
                Self(self.0.css_class(class))
            }

            /// Adds an HTML attribute.
            #[must_use]
            pub fn attr(self, key: &str, value: impl Into<String>) -> Self {
                Self(self.0.attr(key, value))
            }

            /// The current class string.
            pub fn classes(&self) -> Option<&str> {
                self.0.classes()
            }
        }

        impl LayoutObject for $name {
            fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
                self.0.render(pass, context)
            }
        }
    };
}

div_variant!(
    /// A Bulma `columns` container.
    Row,
    "columns"
);

div_variant!(
    /// A Bulma `column`.
    Column,
    "column"
);

/// A `<fieldset>` with an optional legend. The legend may use template
/// syntax.
#[derive(Debug)]
pub struct Fieldset {
    legend: String,
    fields: Vec<LayoutItem>,
    css_id: Option<String>,
    css_class: Option<String>,
    attrs: Attrs,
    template: String,
}

impl Fieldset {
    /// Creates a fieldset.
    pub fn new(legend: impl Into<String>, fields: Vec<LayoutItem>) -> Self {
        Self {
            legend: legend.into(),
            fields,
            css_id: None,
            css_class: None,
            attrs: Attrs::new(),
            template: "{pack}/layout/fieldset.html".to_string(),
        }
    }

    /// Sets the `id`.
    #[must_use]
    pub fn css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Appends classes.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        append_class(&mut self.css_class, class);
        self
    }

    /// Adds an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(attr_name(key), value.into());
        self
    }

    /// Overrides the template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

impl LayoutObject for Fieldset {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let fields = render_children(&self.fields, pass, context)?;
        let legend = pass.engine.render_string(&self.legend, context, pass.strict_variables)?;
        let ctx = context.overlay([
            (
                "fieldset",
                container_dict(self.css_id.as_deref(), self.css_class.as_deref(), &self.attrs),
            ),
            ("legend", ContextValue::from(legend)),
            ("fields", ContextValue::from(fields)),
        ]);
        pass.engine.render(&pass.template(&self.template), &ctx)
    }
}

/// A raw template snippet rendered against the current context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html {
    html: String,
}

impl Html {
    /// Creates the snippet.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl LayoutObject for Html {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        pass.engine.render_string(&self.html, context, pass.strict_variables)
    }
}

/// A `<div class="buttons">` holding buttons. Children render without
/// their field wrapper.
#[derive(Debug)]
pub struct ButtonHolder {
    fields: Vec<LayoutItem>,
    css_id: Option<String>,
    css_class: Option<String>,
    attrs: Attrs,
    template: String,
}

impl ButtonHolder {
    /// Creates a holder.
    pub fn new(fields: Vec<LayoutItem>) -> Self {
        Self {
            fields,
            css_id: None,
            css_class: None,
            attrs: Attrs::new(),
            template: "{pack}/layout/buttonholder.html".to_string(),
        }
    }

    /// Sets the `id`.
    #[must_use]
    pub fn css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Appends classes after `buttons`.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        append_class(&mut self.css_class, class);
        self
    }

    /// Adds an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(attr_name(key), value.into());
        self
    }
}

impl LayoutObject for ButtonHolder {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let inner = context.with("suppress_field_wrapper", true);
        let fields = render_children(&self.fields, pass, &inner)?;
        let ctx = context.overlay([
            (
                "holder",
                container_dict(self.css_id.as_deref(), self.css_class.as_deref(), &self.attrs),
            ),
            ("fields", ContextValue::from(fields)),
        ]);
        pass.engine.render(&pass.template(&self.template), &ctx)
    }
}

/// One or more fields rendered with the same attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    fields: Vec<String>,
    options: FieldOptions,
}

impl Field {
    /// A single field.
    pub fn new(name: impl Into<String>) -> Self {
        Self::many([name.into()])
    }

    /// Several fields sharing the same options.
    pub fn many(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: names.into_iter().map(Into::into).collect(),
            options: FieldOptions::default(),
        }
    }

    /// Adds a widget attribute. `class` is appended to the widget's class.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        if let WidgetAttrs::Shared(attrs) = &mut self.options.attrs {
            attrs.insert(attr_name(key), value.into());
        }
        self
    }

    /// Appends classes to the widget.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        append_class(&mut self.options.css_class, class);
        self
    }

    /// Sets classes for the wrapper `<div class="field">`.
    #[must_use]
    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.options.wrapper_class = Some(class.into());
        self
    }

    /// Overrides the field template. `{pack}` expands to the template pack.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.options.template = Some(template.into());
        self
    }
}

impl LayoutObject for Field {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let mut html = String::new();
        for name in &self.fields {
            html.push_str(&render_field(pass, context, name, &self.options)?);
        }
        Ok(html)
    }
}

/// A composite-widget field with one attribute mapping per sub-widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiWidgetField {
    fields: Vec<String>,
    options: FieldOptions,
}

impl MultiWidgetField {
    /// Creates the field. `attrs[i]` applies to sub-widget `i`.
    pub fn new(name: impl Into<String>, attrs: Vec<Attrs>) -> Self {
        let attrs = attrs
            .into_iter()
            .map(|a| a.into_iter().map(|(k, v)| (attr_name(&k), v)).collect())
            .collect();
        Self {
            fields: vec![name.into()],
            options: FieldOptions {
                attrs: WidgetAttrs::PerWidget(attrs),
                ..FieldOptions::default()
            },
        }
    }

    /// Sets classes for the wrapper `<div class="field">`.
    #[must_use]
    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.options.wrapper_class = Some(class.into());
        self
    }

    /// Overrides the field template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.options.template = Some(template.into());
        self
    }
}

impl LayoutObject for MultiWidgetField {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let mut html = String::new();
        for name in &self.fields {
            html.push_str(&render_field(pass, context, name, &self.options)?);
        }
        Ok(html)
    }
}

/// An `<input>` button or hidden input.
///
/// The `id` defaults to `{input_type}-id-{slug(name)}`. The value may use
/// template syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseInput {
    input_type: &'static str,
    name: String,
    value: String,
    field_classes: String,
    css_id: Option<String>,
    control_class: Option<String>,
    attrs: Attrs,
    template: String,
}

impl BaseInput {
    /// Creates an input of `input_type` with base classes `field_classes`.
    pub fn new(
        input_type: &'static str,
        field_classes: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            input_type,
            name: name.into(),
            value: value.into(),
            field_classes: field_classes.to_string(),
            css_id: None,
            control_class: None,
            attrs: Attrs::new(),
            template: "{pack}/layout/baseinput.html".to_string(),
        }
    }

    /// Appends classes to the input.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        if self.field_classes.is_empty() {
            self.field_classes = class.to_string();
        } else {
            self.field_classes.push(' ');
            self.field_classes.push_str(class);
        }
        self
    }

    /// Sets the `id`.
    #[must_use]
    pub fn css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Adds classes to the `control` div.
    #[must_use]
    pub fn control_class(mut self, class: impl Into<String>) -> Self {
        self.control_class = Some(class.into());
        self
    }

    /// Adds an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(attr_name(key), value.into());
        self
    }

    /// Overrides the template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// The rendered `id`.
    pub fn id(&self) -> String {
        self.css_id
            .clone()
            .unwrap_or_else(|| format!("{}-id-{}", self.input_type, slugify(&self.name)))
    }

    /// The classes on the input.
    pub fn field_classes(&self) -> &str {
        &self.field_classes
    }
}

impl LayoutObject for BaseInput {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let value = if has_template_syntax(&self.value) {
            pass.engine.render_string(&self.value, context, pass.strict_variables)?
        } else {
            escape_html(&self.value)
        };
        let input = ContextValue::dict([
            ("input_type", ContextValue::from(self.input_type)),
            ("name", ContextValue::from(escape_html(&self.name))),
            ("value", ContextValue::from(value)),
            ("id", ContextValue::from(escape_html(&self.id()))),
            (
                "control_class",
                ContextValue::from(self.control_class.as_deref().map(escape_html)),
            ),
            ("field_classes", ContextValue::from(escape_html(&self.field_classes))),
            ("flat_attrs", ContextValue::from(flat_attrs(&self.attrs))),
        ]);
        let ctx = context.with("input", input);
        pass.engine.render(&pass.template(&self.template), &ctx)
    }
}

macro_rules! base_input {
    ($(#[$doc:meta])* $name:ident, $input_type:literal, $classes:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(BaseInput);

        impl $name {
            /// Creates the input from its name and value.
            pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
                Self(BaseInput::new($input_type, $classes, name, value))
            }

            /// Appends classes to the input.
            #[must_use]
            pub fn css_class(self, class: &str) -> Self {
                Self(self.0.css_class(class))
            }

            /// Sets the `id`.
            #[must_use]
            pub fn css_id(self, id: impl Into<String>) -> Self {
                Self(self.0.css_id(id))
            }

            /// Adds classes to the `control` div.
            #[must_use]
            pub fn control_class(self, class: impl Into<String>) -> Self {
                Self(self.0.control_class(class))
            }

            /// Adds an HTML attribute.
            #[must_use]
            pub fn attr(self, key: &str, value: impl Into<String>) -> Self {
                Self(self.0.attr(key, value))
            }

            /// The rendered `id`.
            pub fn id(&self) -> String {
                self.0.id()
            }

            /// The classes on the input.
            pub fn field_classes(&self) -> &str {
                self.0.field_classes()
            }
        }

        impl LayoutObject for $name {
            fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
                self.0.render(pass, context)
            }
        }
    };
}

base_input!(
    /// A primary submit button: `<input type="submit" class="button is-primary">`.
    Submit,
    "submit",
    "button is-primary"
);

base_input!(
    /// A reset button: `<input type="reset" class="button is-text">`.
    Reset,
    "reset",
    "button is-text"
);

base_input!(
    /// A hidden input outside the form's fields.
    Hidden,
    "hidden",
    ""
);

/// A `<button>` element. The content may contain markup and template syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    content: String,
    button_type: String,
    field_classes: String,
    css_id: Option<String>,
    control_class: Option<String>,
    attrs: Attrs,
    template: String,
}

impl Button {
    /// Creates a `type="button"` button.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            button_type: "button".to_string(),
            field_classes: "button".to_string(),
            css_id: None,
            control_class: None,
            attrs: Attrs::new(),
            template: "{pack}/layout/button.html".to_string(),
        }
    }

    /// Sets the `type` attribute (`button`, `submit`, `reset`).
    #[must_use]
    pub fn button_type(mut self, button_type: impl Into<String>) -> Self {
        self.button_type = button_type.into();
        self
    }

    /// Appends classes after `button`.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        self.field_classes.push(' ');
        self.field_classes.push_str(class);
        self
    }

    /// Sets the `id`.
    #[must_use]
    pub fn css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Adds classes to the `control` div.
    #[must_use]
    pub fn control_class(mut self, class: impl Into<String>) -> Self {
        self.control_class = Some(class.into());
        self
    }

    /// Adds an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(attr_name(key), value.into());
        self
    }
}

impl LayoutObject for Button {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let content = pass.engine.render_string(&self.content, context, pass.strict_variables)?;
        let button = ContextValue::dict([
            ("button_type", ContextValue::from(escape_html(&self.button_type))),
            ("field_classes", ContextValue::from(escape_html(&self.field_classes))),
            ("id", ContextValue::from(self.css_id.as_deref().map(escape_html))),
            (
                "control_class",
                ContextValue::from(self.control_class.as_deref().map(escape_html)),
            ),
            ("flat_attrs", ContextValue::from(flat_attrs(&self.attrs))),
            ("content", ContextValue::from(content)),
        ]);
        let ctx = context.with("button", button);
        pass.engine.render(&pass.template(&self.template), &ctx)
    }
}

/// A field with Font Awesome icons inside the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconField {
    field: String,
    icon_prepend: Option<String>,
    icon_append: Option<String>,
    options: FieldOptions,
}

impl IconField {
    /// Creates the field without icons.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            icon_prepend: None,
            icon_append: None,
            options: FieldOptions {
                template: Some("{pack}/layout/input_with_icon.html".to_string()),
                ..FieldOptions::default()
            },
        }
    }

    /// Icon on the left, e.g. `fa-envelope`.
    #[must_use]
    pub fn icon_prepend(mut self, icon: impl Into<String>) -> Self {
        self.icon_prepend = Some(icon.into());
        self
    }

    /// Icon on the right, e.g. `fa-check`.
    #[must_use]
    pub fn icon_append(mut self, icon: impl Into<String>) -> Self {
        self.icon_append = Some(icon.into());
        self
    }

    /// Appends classes to the widget.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        append_class(&mut self.options.css_class, class);
        self
    }

    /// Sets classes for the wrapper `<div class="field">`.
    #[must_use]
    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.options.wrapper_class = Some(class.into());
        self
    }

    /// Adds a widget attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        if let WidgetAttrs::Shared(attrs) = &mut self.options.attrs {
            attrs.insert(attr_name(key), value.into());
        }
        self
    }

    /// The context the field renders with: `context` plus only the icons
    /// that were given.
    pub fn icon_context(&self, context: &RenderContext) -> RenderContext {
        let icons = [
            ("icon_prepend", &self.icon_prepend),
            ("icon_append", &self.icon_append),
        ];
        context.overlay(
            icons
                .into_iter()
                .filter_map(|(key, icon)| icon.as_deref().map(|i| (key, escape_html(i)))),
        )
    }
}

impl LayoutObject for IconField {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let ctx = self.icon_context(context);
        render_field(pass, &ctx, &self.field, &self.options)
    }
}

/// A file field rendered with the Bulma file-upload markup.
///
/// The widget class is the caller's `css_class` followed by `file-input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadField {
    field: String,
    options: FieldOptions,
}

impl UploadField {
    /// Creates the field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            options: FieldOptions {
                widget_class_name: Some("fileuploadinput".to_string()),
                ..FieldOptions::default()
            },
        }
    }

    /// Sets the caller classes placed before `file-input`.
    #[must_use]
    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.options.css_class = Some(class.into());
        self
    }

    /// Sets classes for the wrapper `<div class="field">`.
    #[must_use]
    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.options.wrapper_class = Some(class.into());
        self
    }

    /// Adds a widget attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        if let WidgetAttrs::Shared(attrs) = &mut self.options.attrs {
            attrs.insert(attr_name(key), value.into());
        }
        self
    }

    /// The class string the widget receives.
    pub fn field_classes(&self) -> String {
        match self.options.css_class.as_deref() {
            Some(class) if !class.is_empty() => format!("{class} file-input"),
            _ => "file-input".to_string(),
        }
    }
}

impl LayoutObject for UploadField {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let options = FieldOptions {
            css_class: Some(self.field_classes()),
            widget_template: Some(pass.template("{pack}/widgets/file_upload_input.html")),
            ..self.options.clone()
        };
        render_field(pass, context, &self.field, &options)
    }
}

/// Groups controls on one line (`<div class="field is-grouped">`). Children
/// render without their own field wrapper.
#[derive(Debug)]
pub struct FormGroup {
    fields: Vec<LayoutItem>,
    css_id: Option<String>,
    css_class: Option<String>,
    attrs: Attrs,
    template: String,
}

impl FormGroup {
    /// Creates the group.
    pub fn new(fields: Vec<LayoutItem>) -> Self {
        Self {
            fields,
            css_id: None,
            css_class: None,
            attrs: Attrs::new(),
            template: "{pack}/layout/formgroup.html".to_string(),
        }
    }

    /// Sets the `id`.
    #[must_use]
    pub fn css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Appends classes after `field is-grouped`.
    #[must_use]
    pub fn css_class(mut self, class: &str) -> Self {
        append_class(&mut self.css_class, class);
        self
    }

    /// Adds an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(attr_name(key), value.into());
        self
    }

    /// Overrides the template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

impl LayoutObject for FormGroup {
    fn render(&self, pass: &mut RenderPass<'_>, context: &RenderContext) -> CrispyResult<String> {
        let inner = context.with("suppress_field_wrapper", true);
        let fields = render_children(&self.fields, pass, &inner)?;
        let ctx = context.overlay([
            (
                "formgroup",
                container_dict(self.css_id.as_deref(), self.css_class.as_deref(), &self.attrs),
            ),
            ("fields", ContextValue::from(fields)),
        ]);
        pass.engine.render(&pass.template(&self.template), &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crispy_bulma_core::error::CrispyError;
    use crispy_bulma_core::settings::Settings;
    use crispy_bulma_forms::{BaseForm, FormFieldDef, FormFieldType};
    use crispy_bulma_template::engine::Engine;

    use crate::converters::ClassConverters;

    fn render(object: &dyn LayoutObject, ctx: &RenderContext) -> String {
        let form = BaseForm::new(vec![
            FormFieldDef::new("email", FormFieldType::Email),
            FormFieldDef::new("doc", FormFieldType::File).required(false),
        ]);
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let settings = Settings::default();
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings);
        object.render(&mut pass, ctx).unwrap()
    }

    #[test]
    fn test_submit_defaults() {
        let submit = Submit::new("Save changes", "Save");
        assert_eq!(submit.id(), "submit-id-save-changes");
        assert_eq!(submit.field_classes(), "button is-primary");
        let html = render(&submit, &RenderContext::new());
        assert!(html.contains(
            r#"<input type="submit" name="Save changes" value="Save" class="button is-primary" id="submit-id-save-changes" />"#
        ));
        assert!(html.starts_with(r#"<div class="field"><div class="control">"#));
    }

    #[test]
    fn test_reset_and_css_class() {
        let reset = Reset::new("reset", "Revert").css_class("is-small");
        assert_eq!(reset.field_classes(), "button is-text is-small");
        assert_eq!(reset.id(), "reset-id-reset");
    }

    #[test]
    fn test_input_value_uses_context() {
        let submit = Submit::new("go", "Search {{ site }}").control_class("is-expanded");
        let html = render(&submit, &RenderContext::new().with("site", "<docs>"));
        assert!(html.contains(r#"value="Search &lt;docs&gt;""#));
        assert!(html.contains(r#"<div class="control is-expanded">"#));
    }

    #[test]
    fn test_hidden_input() {
        let hidden = Hidden::new("next", "/home");
        let html = render(&hidden, &RenderContext::new());
        assert_eq!(
            html,
            r#"<input type="hidden" name="next" value="/home" id="hidden-id-next" />"#
        );
    }

    #[test]
    fn test_button() {
        let button = Button::new("<span>Go</span>").css_id("go").attr("data_action", "run");
        let html = render(&button, &RenderContext::new());
        assert!(html.contains(
            r#"<button type="button" class="button" id="go" data-action="run"><span>Go</span></button>"#
        ));
        assert!(html.contains(r#"<div class="field">"#));
    }

    #[test]
    fn test_undefined_variables_render_empty() {
        let html = render(&Html::new("<p>Hi {{ user_name }}</p>"), &RenderContext::new());
        assert_eq!(html, "<p>Hi </p>");
        let html = render(&Button::new("Save {{ thing }}"), &RenderContext::new());
        assert!(html.contains(">Save </button>"));
    }

    #[test]
    fn test_undefined_variable_strict() {
        let form = BaseForm::new(vec![FormFieldDef::new("email", FormFieldType::Email)]);
        let engine = Engine::new().unwrap();
        let converters = ClassConverters::builtin();
        let settings = Settings {
            strict_variables: true,
            ..Settings::default()
        };
        let mut pass = RenderPass::new(&form, &engine, &converters, &settings);
        let err = Html::new("{{ user_name }}")
            .render(&mut pass, &RenderContext::new())
            .unwrap_err();
        assert!(matches!(err, CrispyError::VariableDoesNotExist(ref v) if v == "user_name"));
    }

    #[test]
    fn test_snippet_context_values_escaped() {
        let ctx = RenderContext::new().with("note", "<script>alert(1)</script>");
        let html = render(&Html::new("<p>{{ note }}</p>"), &ctx);
        assert!(html.starts_with("<p>&lt;script&gt;alert(1)"));
        let html = render(&Button::new("{{ note }}"), &ctx);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        let html = render(&Fieldset::new("{{ note }}", layout_items![]), &ctx);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_input_literal_value_escaped() {
        let html = render(&Submit::new("go", r#"Say "hi""#), &RenderContext::new());
        assert!(html.contains(r#"value="Say &quot;hi&quot;""#));
    }

    #[test]
    fn test_button_suppressed_wrapper() {
        let html = render(
            &Button::new("Go"),
            &RenderContext::new().with("suppress_field_wrapper", true),
        );
        assert!(!html.contains(r#"<div class="field">"#));
        assert!(html.starts_with(r#"<div class="control">"#));
    }

    #[test]
    fn test_row_and_column_classes() {
        assert_eq!(Row::new(vec![]).classes(), Some("columns"));
        assert_eq!(Row::new(vec![]).css_class("is-mobile").classes(), Some("columns is-mobile"));
        assert_eq!(Column::new(vec![]).css_class("is-half").classes(), Some("column is-half"));
        assert_eq!(Div::new(vec![]).classes(), None);
    }

    #[test]
    fn test_row_renders_columns() {
        let row = Row::new(layout_items![Column::new(layout_items!["email"])]);
        let html = render(&row, &RenderContext::new());
        assert!(html.contains(r#"<div class="columns">"#));
        assert!(html.contains(r#"<div class="column">"#));
        assert!(html.contains(r#"name="email""#));
    }

    #[test]
    fn test_fieldset_legend_template() {
        let fieldset = Fieldset::new("Contact {{ who }}", layout_items!["email"]).css_class("box");
        let html = render(&fieldset, &RenderContext::new().with("who", "us"));
        assert!(html.contains(r#"<fieldset class="box">"#));
        assert!(html.contains(r#"<legend class="label">Contact us</legend>"#));
    }

    #[test]
    fn test_html_snippet() {
        let html = render(&Html::new("<hr>{{ note }}"), &RenderContext::new().with("note", "x"));
        assert_eq!(html, "<hr>x");
    }

    #[test]
    fn test_field_attrs_and_wrapper() {
        let field = Field::new("email")
            .attr("data_test", "12")
            .attr("placeholder", "you@example.com")
            .wrapper_class("testing");
        let html = render(&field, &RenderContext::new());
        assert_eq!(html.matches(r#"data-test="12""#).count(), 1);
        assert_eq!(html.matches(r#"class="field testing""#).count(), 1);
        assert!(html.contains(r#"placeholder="you@example.com""#));
    }

    #[test]
    fn test_field_type_hidden_attr() {
        let html = render(&Field::new("email").attr("type", "hidden"), &RenderContext::new());
        assert_eq!(html.matches(r#"type="hidden""#).count(), 1);
        assert!(!html.contains(r#"type="email""#));
    }

    #[test]
    fn test_icon_context_only_given_icons() {
        let field = IconField::new("email").icon_prepend("fa-home");
        let ctx = field.icon_context(&RenderContext::new());
        assert!(ctx.contains("icon_prepend"));
        assert!(!ctx.contains("icon_append"));

        let html = render(&field, &RenderContext::new());
        assert!(html.contains("has-icons-left"));
        assert!(!html.contains("has-icons-right"));
        assert!(html.contains(r#"<i class="fas fa-home"></i>"#));
    }

    #[test]
    fn test_upload_field_classes() {
        assert_eq!(UploadField::new("doc").css_class("foo").field_classes(), "foo file-input");
        assert_eq!(UploadField::new("doc").field_classes(), "file-input");
    }

    #[test]
    fn test_upload_field_render() {
        let html = render(&UploadField::new("doc").css_class("foo"), &RenderContext::new());
        assert!(html.contains(r#"<div class="file">"#));
        assert!(html.contains(r#"class="foo file-input""#));
        assert_eq!(html.matches("file-input").count(), 1);
    }

    #[test]
    fn test_form_group_wraps_once() {
        let group = FormGroup::new(layout_items![
            Submit::new("save", "Save"),
            Button::new("Cancel").css_class("is-light"),
        ])
        .css_id("actions");
        let html = render(&group, &RenderContext::new());
        assert_eq!(html.matches("is-grouped").count(), 1);
        assert!(html.contains(r#"<div id="actions" class="field is-grouped">"#));
        assert!(!html.contains(r#"<div class="field">"#));
        assert_eq!(html.matches(r#"<div class="control">"#).count(), 2);
    }

    #[test]
    fn test_button_holder() {
        let holder = ButtonHolder::new(layout_items![Submit::new("save", "Save")]);
        let html = render(&holder, &RenderContext::new());
        assert!(html.contains(r#"<div class="buttons">"#));
        assert!(!html.contains(r#"<div class="field">"#));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let build = || {
            Layout::new(layout_items![
                Row::new(layout_items![Field::new("email").css_class("is-small")]),
                FormGroup::new(layout_items![Submit::new("save", "Save")]),
            ])
        };
        assert_eq!(
            render(&build(), &RenderContext::new()),
            render(&build(), &RenderContext::new())
        );
    }
}
