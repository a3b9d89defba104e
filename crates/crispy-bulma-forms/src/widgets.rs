//! Widget system for rendering HTML form elements.
//!
//! A [`Widget`] is a plain record: its [`WidgetType`] picks the built-in
//! rendering, and optional overrides swap the template or the class name the
//! CSS resolver sees. A customized widget is a configured `Widget`, not a new
//! type; see [`Widget::with_template`] and [`Widget::with_class_name`].
//!
//! Attributes live in an ordered [`Attrs`] map so the class resolver can
//! mutate them in place before the widget renders.

use std::collections::BTreeMap;
use std::fmt;

use crispy_bulma_core::error::CrispyResult;
use crispy_bulma_core::utils::MultiValueDict;
use crispy_bulma_template::context::{ContextValue, RenderContext};
use crispy_bulma_template::engine::Engine;
use crispy_bulma_template::html::{escape_html, flatatt};

/// HTML attributes of a widget, rendered in key order.
pub type Attrs = BTreeMap<String, String>;

/// Enumerates all built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="url">`.
    UrlInput,
    /// `<input type="password">`.
    PasswordInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<select multiple>`.
    SelectMultiple,
    /// A set of `<input type="radio">` elements.
    RadioSelect,
    /// A set of `<input type="checkbox">` elements.
    CheckboxSelectMultiple,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
    /// `<input type="time">`.
    TimeInput,
    /// `<input type="file">`.
    FileInput,
    /// `<input type="file">` with a clear checkbox.
    ClearableFileInput,
    /// A date input followed by a time input.
    SplitDateTimeWidget,
    /// Any other composite of sub-widgets.
    MultiWidget,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::UrlInput => "UrlInput",
            Self::PasswordInput => "PasswordInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::RadioSelect => "RadioSelect",
            Self::CheckboxSelectMultiple => "CheckboxSelectMultiple",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
            Self::TimeInput => "TimeInput",
            Self::FileInput => "FileInput",
            Self::ClearableFileInput => "ClearableFileInput",
            Self::SplitDateTimeWidget => "SplitDateTimeWidget",
            Self::MultiWidget => "MultiWidget",
        };
        write!(f, "{name}")
    }
}

impl WidgetType {
    /// The `type` attribute for single `<input>` widgets.
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::TextInput => Some("text"),
            Self::NumberInput => Some("number"),
            Self::EmailInput => Some("email"),
            Self::UrlInput => Some("url"),
            Self::PasswordInput => Some("password"),
            Self::HiddenInput => Some("hidden"),
            Self::DateInput => Some("date"),
            Self::DateTimeInput => Some("datetime-local"),
            Self::TimeInput => Some("time"),
            Self::FileInput | Self::ClearableFileInput => Some("file"),
            Self::CheckboxInput => Some("checkbox"),
            _ => None,
        }
    }

    /// Whether the widget lets the user pick several choices.
    pub const fn allows_multiple(self) -> bool {
        matches!(self, Self::SelectMultiple | Self::CheckboxSelectMultiple)
    }

    /// Whether the widget renders a list of choices.
    pub const fn has_choices(self) -> bool {
        matches!(
            self,
            Self::Select | Self::SelectMultiple | Self::RadioSelect | Self::CheckboxSelectMultiple
        )
    }

    /// Whether a required field should carry the HTML `required` attribute.
    pub const fn uses_required_attribute(self) -> bool {
        !matches!(self, Self::HiddenInput | Self::CheckboxSelectMultiple)
    }
}

/// One choice of a choice widget, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceItem {
    /// The submitted value.
    pub value: String,
    /// The display label.
    pub label: String,
    /// The `id` of the choice's own input.
    pub id: String,
    /// Whether the choice is currently selected.
    pub checked: bool,
}

/// A configured form widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    /// The built-in behavior this widget is based on.
    pub kind: WidgetType,
    /// HTML attributes, mutated by layout objects and the class resolver.
    pub attrs: Attrs,
    /// Template used instead of the built-in markup.
    pub template_name: Option<String>,
    /// Name the CSS resolver uses instead of the lower-cased type name.
    pub class_name: Option<String>,
    /// `(value, label)` pairs for choice widgets.
    pub choices: Vec<(String, String)>,
    /// Sub-widgets of a composite widget.
    pub subwidgets: Vec<Widget>,
    /// Whether a password widget renders its current value.
    pub render_value: bool,
}

impl Widget {
    /// Creates a widget of the given type with no attributes.
    ///
    /// A `SplitDateTimeWidget` gets its date and time sub-widgets.
    pub fn new(kind: WidgetType) -> Self {
        let subwidgets = if kind == WidgetType::SplitDateTimeWidget {
            vec![Self::new(WidgetType::DateInput), Self::new(WidgetType::TimeInput)]
        } else {
            Vec::new()
        };
        Self {
            kind,
            attrs: Attrs::new(),
            template_name: None,
            class_name: None,
            choices: Vec::new(),
            subwidgets,
            render_value: false,
        }
    }

    /// Creates a composite widget from sub-widgets.
    pub fn multi(subwidgets: Vec<Self>) -> Self {
        Self {
            subwidgets,
            ..Self::new(WidgetType::MultiWidget)
        }
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Renders through `template_name` instead of the built-in markup.
    #[must_use]
    pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = Some(template_name.into());
        self
    }

    /// Overrides the name the CSS class resolver looks up.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the choices of a choice widget.
    #[must_use]
    pub fn with_choices(mut self, choices: Vec<(String, String)>) -> Self {
        self.choices = choices;
        self
    }

    /// Sets whether a password widget renders its value.
    #[must_use]
    pub const fn with_render_value(mut self, render_value: bool) -> Self {
        self.render_value = render_value;
        self
    }

    /// The lower-cased type name used for CSS class lookup.
    pub fn type_name(&self) -> String {
        self.class_name
            .clone()
            .unwrap_or_else(|| self.kind.to_string().to_lowercase())
    }

    /// Returns `true` if the widget renders as a hidden input.
    pub fn is_hidden(&self) -> bool {
        if self.subwidgets.is_empty() {
            self.kind == WidgetType::HiddenInput
        } else {
            self.subwidgets.iter().all(Self::is_hidden)
        }
    }

    /// Returns `true` for widgets made of sub-widgets.
    pub fn is_composite(&self) -> bool {
        !self.subwidgets.is_empty()
    }

    /// The widgets that actually render inputs: the sub-widgets of a
    /// composite widget, otherwise the widget itself.
    pub fn underlying(&self) -> Vec<&Self> {
        if self.subwidgets.is_empty() {
            vec![self]
        } else {
            self.subwidgets.iter().collect()
        }
    }

    /// Mutable version of [`underlying`](Self::underlying).
    pub fn underlying_mut(&mut self) -> Vec<&mut Self> {
        if self.subwidgets.is_empty() {
            vec![self]
        } else {
            self.subwidgets.iter_mut().collect()
        }
    }

    /// Returns the `id` a `<label>` for this widget should point at.
    pub fn id_for_label(&self, id: &str) -> String {
        if id.is_empty() {
            return String::new();
        }
        match self.kind {
            WidgetType::RadioSelect
            | WidgetType::CheckboxSelectMultiple
            | WidgetType::SplitDateTimeWidget
            | WidgetType::MultiWidget => format!("{id}_0"),
            _ => id.to_string(),
        }
    }

    /// Extracts this widget's raw values from submitted data.
    ///
    /// Multi-select widgets return every submitted value. Composite widgets
    /// return one entry per sub-widget (`name_0`, `name_1`, ...), empty for a
    /// part that was not submitted.
    pub fn value_from_data(&self, data: &MultiValueDict, name: &str) -> Option<Vec<String>> {
        if self.is_composite() {
            let parts: Vec<Option<String>> = self
                .subwidgets
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    w.value_from_data(data, &format!("{name}_{i}"))
                        .and_then(|v| v.into_iter().next())
                })
                .collect();
            if parts.iter().all(Option::is_none) {
                return None;
            }
            return Some(parts.into_iter().map(Option::unwrap_or_default).collect());
        }
        if self.kind.allows_multiple() {
            data.get_list(name).map(<[String]>::to_vec)
        } else {
            data.get(name).map(|v| vec![v.to_string()])
        }
    }

    /// Returns the choices with their ids and selection state.
    ///
    /// Only the first value counts for single-choice widgets.
    pub fn choice_items(&self, id_base: &str, values: &[String]) -> Vec<ChoiceItem> {
        let selected = if self.kind.allows_multiple() { values } else { first_only(values) };
        self.choices
            .iter()
            .enumerate()
            .map(|(i, (val, label))| ChoiceItem {
                value: val.clone(),
                label: label.clone(),
                id: format!("{id_base}_{i}"),
                checked: selected.contains(val),
            })
            .collect()
    }

    /// Splits `values` into one value per sub-widget.
    ///
    /// Submitted data already has one entry per part. A single combined
    /// value, such as an initial `2024-01-15 10:30`, is split on whitespace.
    fn decompress(&self, values: &[String]) -> Vec<String> {
        let mut parts: Vec<String> = match values {
            [combined] if self.subwidgets.len() > 1 => {
                combined.split_whitespace().map(String::from).collect()
            }
            _ => values.to_vec(),
        };
        parts.resize(self.subwidgets.len(), String::new());
        parts
    }

    /// Renders the widget as HTML.
    ///
    /// `values` holds the current value: empty for none, several entries for
    /// multi-select and composite widgets. `extra_attrs` (typically `id`,
    /// `required`, `disabled`) override the widget's own attributes for this
    /// render only, and reach every sub-widget of a composite widget.
    pub fn render(
        &self,
        name: &str,
        values: &[String],
        extra_attrs: &Attrs,
        engine: &Engine,
    ) -> CrispyResult<String> {
        if self.is_composite() && self.template_name.is_none() {
            return self.render_composite(name, values, extra_attrs, engine);
        }

        let mut attrs = self.attrs.clone();
        attrs.extend(extra_attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        let value = values.first().map(String::as_str);

        if let Some(template) = &self.template_name {
            return self.render_template(template, name, value, &attrs, engine);
        }
        Ok(self.render_builtin(name, values, &attrs))
    }

    fn render_template(
        &self,
        template: &str,
        name: &str,
        value: Option<&str>,
        attrs: &Attrs,
        engine: &Engine,
    ) -> CrispyResult<String> {
        let id = attrs.get("id").cloned().unwrap_or_default();
        let widget = ContextValue::dict([
            ("name", ContextValue::from(name)),
            ("type", ContextValue::from(self.kind.input_type().unwrap_or("text"))),
            ("value", ContextValue::from(value.map(escape_html))),
            ("attrs_html", ContextValue::from(render_attrs(attrs))),
            ("required", ContextValue::from(attrs.contains_key("required"))),
            ("input_text", ContextValue::from("Choose a file…")),
            ("clear_checkbox_name", ContextValue::from(format!("{name}-clear"))),
            ("clear_checkbox_id", ContextValue::from(format!("{id}-clear_id"))),
            ("clear_checkbox_label", ContextValue::from("Clear")),
        ]);
        let ctx = RenderContext::new().with("widget", widget);
        tracing::debug!(template, name, "rendering widget template");
        engine.render(template, &ctx)
    }

    fn render_composite(
        &self,
        name: &str,
        values: &[String],
        extra_attrs: &Attrs,
        engine: &Engine,
    ) -> CrispyResult<String> {
        let id = extra_attrs.get("id").or_else(|| self.attrs.get("id"));
        let shared: Attrs = extra_attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "id")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut html = String::new();
        for (i, (widget, part)) in self.subwidgets.iter().zip(self.decompress(values)).enumerate() {
            let mut sub_attrs = shared.clone();
            if let Some(id) = id {
                sub_attrs.insert("id".to_string(), format!("{id}_{i}"));
            }
            let part = if part.is_empty() { Vec::new() } else { vec![part] };
            html.push_str(&widget.render(&format!("{name}_{i}"), &part, &sub_attrs, engine)?);
        }
        Ok(html)
    }

    fn render_builtin(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let value = values.first().map(String::as_str);
        let attrs_html = render_attrs(attrs);
        let escaped = value.map(escape_html).unwrap_or_default();
        let value_attr = if escaped.is_empty() {
            String::new()
        } else {
            format!(r#" value="{escaped}""#)
        };

        match self.kind {
            WidgetType::PasswordInput => {
                let value_attr = if self.render_value { value_attr } else { String::new() };
                format!(r#"<input type="password" name="{name}"{value_attr}{attrs_html} />"#)
            }
            WidgetType::Textarea => {
                format!(r#"<textarea name="{name}"{attrs_html}>{escaped}</textarea>"#)
            }
            WidgetType::CheckboxInput => {
                let checked = value.is_some_and(|v| matches!(v, "true" | "True" | "on" | "1"));
                let checked_attr = if checked { " checked" } else { "" };
                format!(r#"<input type="checkbox" name="{name}"{checked_attr}{attrs_html} />"#)
            }
            WidgetType::FileInput => {
                format!(r#"<input type="file" name="{name}"{attrs_html} />"#)
            }
            WidgetType::ClearableFileInput => {
                let input = format!(r#"<input type="file" name="{name}"{attrs_html} />"#);
                if escaped.is_empty() {
                    input
                } else {
                    let id = attrs.get("id").map_or(name, String::as_str);
                    format!(
                        r#"Currently: {escaped} <input type="checkbox" name="{name}-clear" id="{id}-clear_id" /> <label for="{id}-clear_id">Clear</label><br />Change: {input}"#
                    )
                }
            }
            WidgetType::Select | WidgetType::SelectMultiple => {
                let multiple = if self.kind == WidgetType::SelectMultiple { " multiple" } else { "" };
                let options: String = self
                    .choice_items(name, values)
                    .iter()
                    .map(|c| {
                        let selected = if c.checked { " selected" } else { "" };
                        format!(
                            r#"<option value="{}"{selected}>{}</option>"#,
                            escape_html(&c.value),
                            escape_html(&c.label)
                        )
                    })
                    .collect();
                format!(r#"<select name="{name}"{multiple}{attrs_html}>{options}</select>"#)
            }
            WidgetType::RadioSelect | WidgetType::CheckboxSelectMultiple => {
                let input_type = if self.kind == WidgetType::RadioSelect { "radio" } else { "checkbox" };
                let id_base = attrs.get("id").map_or(name, String::as_str);
                let mut option_attrs = attrs.clone();
                option_attrs.remove("id");
                let option_attrs = render_attrs(&option_attrs);
                let mut html = format!(r#"<div id="{id_base}">"#);
                for c in self.choice_items(id_base, values) {
                    let checked = if c.checked { " checked" } else { "" };
                    html.push_str(&format!(
                        r#"<div><label for="{id}"><input type="{input_type}" name="{name}" value="{val}" id="{id}"{checked}{option_attrs} /> {label}</label></div>"#,
                        id = c.id,
                        val = escape_html(&c.value),
                        label = escape_html(&c.label),
                    ));
                }
                html.push_str("</div>");
                html
            }
            _ => match attrs.get("type") {
                Some(input_type) => {
                    let mut attrs = attrs.clone();
                    attrs.remove("type");
                    let attrs_html = render_attrs(&attrs);
                    let input_type = escape_html(input_type);
                    format!(r#"<input type="{input_type}" name="{name}"{value_attr}{attrs_html} />"#)
                }
                None => {
                    let input_type = self.kind.input_type().unwrap_or("text");
                    format!(r#"<input type="{input_type}" name="{name}"{value_attr}{attrs_html} />"#)
                }
            },
        }
    }
}

/// HTML attributes that render bare when their value is empty.
pub const BOOLEAN_ATTRS: &[&str] = &["required", "disabled", "readonly", "multiple", "checked", "autofocus"];

fn first_only(values: &[String]) -> &[String] {
    &values[..values.len().min(1)]
}

/// Formats widget attributes in key order. An empty value on one of the
/// [`BOOLEAN_ATTRS`] renders as a bare attribute; any other attribute keeps
/// its `key=""` form.
pub fn render_attrs(attrs: &Attrs) -> String {
    let (boolean, valued): (Vec<_>, Vec<_>) = attrs
        .iter()
        .partition(|(k, v)| v.is_empty() && BOOLEAN_ATTRS.contains(&k.as_str()));
    let mut html = flatatt(valued.into_iter().map(|(k, v)| (k.as_str(), v.as_str())));
    for (k, _) in boolean {
        html.push(' ');
        html.push_str(k);
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new().unwrap()
    }

    fn render(w: &Widget, name: &str, value: Option<&str>) -> String {
        let values: Vec<String> = value.into_iter().map(String::from).collect();
        w.render(name, &values, &Attrs::new(), &engine()).unwrap()
    }

    fn vals(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn choices() -> Vec<(String, String)> {
        vec![
            ("a".to_string(), "Apple".to_string()),
            ("b".to_string(), "Banana".to_string()),
        ]
    }

    #[test]
    fn test_type_name_lowercase() {
        assert_eq!(Widget::new(WidgetType::TextInput).type_name(), "textinput");
        assert_eq!(
            Widget::new(WidgetType::ClearableFileInput).type_name(),
            "clearablefileinput"
        );
        assert_eq!(
            Widget::new(WidgetType::ClearableFileInput)
                .with_class_name("fileuploadinput")
                .type_name(),
            "fileuploadinput"
        );
    }

    #[test]
    fn test_text_input_render() {
        let html = render(&Widget::new(WidgetType::TextInput), "name", Some("Alice"));
        assert_eq!(html, r#"<input type="text" name="name" value="Alice" />"#);
    }

    #[test]
    fn test_text_input_render_empty_omits_value() {
        let html = render(&Widget::new(WidgetType::TextInput), "name", None);
        assert!(!html.contains("value="));
    }

    #[test]
    fn test_value_is_escaped() {
        let html = render(&Widget::new(WidgetType::TextInput), "q", Some(r#"<"x">"#));
        assert!(html.contains(r#"value="&lt;&quot;x&quot;&gt;""#));
    }

    #[test]
    fn test_attrs_sorted_and_boolean() {
        let w = Widget::new(WidgetType::EmailInput)
            .with_attr("placeholder", "you@example.com")
            .with_attr("class", "input")
            .with_attr("required", "");
        let html = render(&w, "email", None);
        assert_eq!(
            html,
            r#"<input type="email" name="email" class="input" placeholder="you@example.com" required />"#
        );
    }

    #[test]
    fn test_extra_attrs_override() {
        let w = Widget::new(WidgetType::TextInput).with_attr("id", "own");
        let mut extra = Attrs::new();
        extra.insert("id".to_string(), "forced".to_string());
        let html = w.render("x", &[], &extra, &engine()).unwrap();
        assert!(html.contains(r#"id="forced""#));
        // The widget itself is untouched.
        assert_eq!(w.attrs.get("id").map(String::as_str), Some("own"));
    }

    #[test]
    fn test_password_hides_value() {
        let w = Widget::new(WidgetType::PasswordInput);
        assert!(!render(&w, "pw", Some("secret")).contains("secret"));
        let w = w.with_render_value(true);
        assert!(render(&w, "pw", Some("secret")).contains(r#"value="secret""#));
    }

    #[test]
    fn test_checkbox_checked() {
        let w = Widget::new(WidgetType::CheckboxInput);
        assert!(render(&w, "agree", Some("on")).contains(" checked"));
        assert!(!render(&w, "agree", Some("false")).contains(" checked"));
    }

    #[test]
    fn test_select_render() {
        let w = Widget::new(WidgetType::Select).with_choices(choices());
        let html = render(&w, "fruit", Some("b"));
        assert!(html.contains(r#"<option value="a">Apple</option>"#));
        assert!(html.contains(r#"<option value="b" selected>Banana</option>"#));
    }

    #[test]
    fn test_select_multiple_render() {
        let w = Widget::new(WidgetType::SelectMultiple).with_choices(choices());
        let html = w.render("fruit", &vals(&["a", "b"]), &Attrs::new(), &engine()).unwrap();
        assert!(html.contains("multiple"));
        assert_eq!(html.matches(" selected").count(), 2);
    }

    #[test]
    fn test_choice_value_with_comma() {
        let w = Widget::new(WidgetType::CheckboxSelectMultiple).with_choices(vec![
            ("a,b".to_string(), "Both".to_string()),
            ("a".to_string(), "Only a".to_string()),
            ("b".to_string(), "Only b".to_string()),
        ]);
        let data = MultiValueDict::from_pairs([("pick", "a,b")]);
        let values = w.value_from_data(&data, "pick").unwrap();
        assert_eq!(values, vals(&["a,b"]));
        let checked: Vec<bool> = w.choice_items("id_pick", &values).iter().map(|c| c.checked).collect();
        assert_eq!(checked, [true, false, false]);
    }

    #[test]
    fn test_radio_select_render() {
        let w = Widget::new(WidgetType::RadioSelect).with_choices(choices());
        let mut extra = Attrs::new();
        extra.insert("id".to_string(), "id_fruit".to_string());
        let html = w.render("fruit", &vals(&["a"]), &extra, &engine()).unwrap();
        assert!(html.contains(r#"<div id="id_fruit">"#));
        assert!(html.contains(r#"id="id_fruit_0" checked"#));
        assert!(html.contains(r#"id="id_fruit_1""#));
        assert_eq!(w.id_for_label("id_fruit"), "id_fruit_0");
    }

    #[test]
    fn test_choice_items() {
        let w = Widget::new(WidgetType::CheckboxSelectMultiple).with_choices(choices());
        let items = w.choice_items("id_f", &vals(&["b"]));
        assert_eq!(items.len(), 2);
        assert!(!items[0].checked);
        assert!(items[1].checked);
        assert_eq!(items[1].id, "id_f_1");
    }

    #[test]
    fn test_split_datetime_composite() {
        let w = Widget::new(WidgetType::SplitDateTimeWidget);
        assert!(w.is_composite());
        assert_eq!(w.underlying().len(), 2);
        let mut extra = Attrs::new();
        extra.insert("id".to_string(), "id_when".to_string());
        let html = w
            .render("when", &vals(&["2024-01-15 10:30"]), &extra, &engine())
            .unwrap();
        assert!(html.contains(r#"<input type="date" name="when_0" value="2024-01-15" id="id_when_0" />"#));
        assert!(html.contains(r#"<input type="time" name="when_1" value="10:30" id="id_when_1" />"#));
    }

    #[test]
    fn test_composite_parts_keep_spaces() {
        let w = Widget::multi(vec![
            Widget::new(WidgetType::TextInput),
            Widget::new(WidgetType::TextInput),
        ]);
        let data = MultiValueDict::from_pairs([("name_0", "Ada Lovelace"), ("name_1", "")]);
        let values = w.value_from_data(&data, "name").unwrap();
        assert_eq!(values, vals(&["Ada Lovelace", ""]));
        let html = w.render("name", &values, &Attrs::new(), &engine()).unwrap();
        assert!(html.contains(r#"name="name_0" value="Ada Lovelace""#));
        assert!(html.contains(r#"<input type="text" name="name_1" />"#));
    }

    #[test]
    fn test_composite_passes_extra_attrs_to_parts() {
        let w = Widget::new(WidgetType::SplitDateTimeWidget);
        let mut extra = Attrs::new();
        extra.insert("id".to_string(), "id_when".to_string());
        extra.insert("required".to_string(), String::new());
        extra.insert("disabled".to_string(), String::new());
        let html = w.render("when", &[], &extra, &engine()).unwrap();
        assert!(html.contains(r#"<input type="date" name="when_0" id="id_when_0" disabled required />"#));
        assert!(html.contains(r#"<input type="time" name="when_1" id="id_when_1" disabled required />"#));
    }

    #[test]
    fn test_value_from_data() {
        let data = MultiValueDict::from_pairs([
            ("name", "Alice"),
            ("tags", "a"),
            ("tags", "b"),
            ("when_0", "2024-01-15"),
            ("when_1", "10:30"),
        ]);
        assert_eq!(
            Widget::new(WidgetType::TextInput).value_from_data(&data, "name"),
            Some(vals(&["Alice"]))
        );
        assert_eq!(
            Widget::new(WidgetType::SelectMultiple).value_from_data(&data, "tags"),
            Some(vals(&["a", "b"]))
        );
        assert_eq!(
            Widget::new(WidgetType::SplitDateTimeWidget).value_from_data(&data, "when"),
            Some(vals(&["2024-01-15", "10:30"]))
        );
        assert_eq!(Widget::new(WidgetType::TextInput).value_from_data(&data, "x"), None);
    }

    #[test]
    fn test_is_hidden() {
        assert!(Widget::new(WidgetType::HiddenInput).is_hidden());
        assert!(!Widget::new(WidgetType::TextInput).is_hidden());
        let hidden_pair = Widget::multi(vec![
            Widget::new(WidgetType::HiddenInput),
            Widget::new(WidgetType::HiddenInput),
        ]);
        assert!(hidden_pair.is_hidden());
    }

    #[test]
    fn test_clearable_file_with_value() {
        let w = Widget::new(WidgetType::ClearableFileInput);
        let html = render(&w, "doc", Some("report.pdf"));
        assert!(html.contains("Currently: report.pdf"));
        assert!(html.contains(r#"name="doc-clear""#));
        assert!(html.contains(r#"<input type="file" name="doc" />"#));
    }

    #[test]
    fn test_template_override() {
        let mut engine = engine();
        engine
            .add_raw_template("custom/widget.html", "<x-{{ widget.name }}{{ widget.attrs_html }}>")
            .unwrap();
        let w = Widget::new(WidgetType::TextInput)
            .with_template("custom/widget.html")
            .with_attr("class", "input");
        let html = w.render("title", &[], &Attrs::new(), &engine).unwrap();
        assert_eq!(html, r#"<x-title class="input">"#);
    }

    #[test]
    fn test_empty_non_boolean_attr_keeps_value() {
        let w = Widget::new(WidgetType::TextInput)
            .with_attr("placeholder", "")
            .with_attr("readonly", "");
        let html = render(&w, "q", None);
        assert_eq!(html, r#"<input type="text" name="q" placeholder="" readonly />"#);
    }

    #[test]
    fn test_type_attr_overrides_input_type() {
        let w = Widget::new(WidgetType::EmailInput).with_attr("type", "hidden");
        let html = render(&w, "email", None);
        assert_eq!(html, r#"<input type="hidden" name="email" />"#);
    }
}
