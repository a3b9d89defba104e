//! Form field definitions and type-level validation.
//!
//! Each [`FormFieldDef`] describes a single form field: its type, widget and
//! metadata. [`clean_field_value`] performs the type-specific checks that
//! [`BaseForm::is_valid`](crate::form::BaseForm) relies on. Cleaned values
//! stay strings; layout rendering never needs typed values.

use std::sync::LazyLock;

use crispy_bulma_core::utils::text::pretty_name;
use regex::Regex;

use crate::widgets::{Widget, WidgetType};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").expect("valid regex")
});

/// Defines the type of a form field, including type-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A floating-point field.
    Float,
    /// A boolean field (checkbox).
    Boolean,
    /// A date field (YYYY-MM-DD).
    Date,
    /// A date-time field (YYYY-MM-DD HH:MM or YYYY-MM-DDTHH:MM).
    DateTime,
    /// A date-time field entered through separate date and time inputs.
    SplitDateTime,
    /// A time field (HH:MM or HH:MM:SS).
    Time,
    /// An email address field.
    Email,
    /// A URL field.
    Url,
    /// A single-choice field.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A multiple-choice field.
    MultipleChoice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A file upload field. Only the file name is carried.
    File,
    /// An image upload field.
    Image,
}

impl FormFieldType {
    /// Shorthand for an unconstrained `Char` field.
    pub const fn char() -> Self {
        Self::Char {
            min_length: None,
            max_length: None,
        }
    }

    /// Shorthand for an unconstrained `Integer` field.
    pub const fn integer() -> Self {
        Self::Integer {
            min_value: None,
            max_value: None,
        }
    }

    fn choices(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Choice { choices } | Self::MultipleChoice { choices } => Some(choices),
            _ => None,
        }
    }
}

/// Complete definition of a form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldDef {
    /// The field name (HTML name attribute, before any form prefix).
    pub name: String,
    /// The field type, controlling validation.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Default/initial value.
    pub initial: Option<String>,
    /// Help text displayed below the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget used for rendering.
    pub widget: Widget,
    /// Whether the field is disabled (rendered but not editable).
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a new `FormFieldDef` with sensible defaults.
    ///
    /// The field is required, uses the default widget for its type, and is
    /// labelled from its name (`first_name` becomes `First name`).
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = pretty_name(&name);
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replaces the widget. Choices of choice fields carry over when the new
    /// widget has none.
    #[must_use]
    pub fn widget(mut self, mut widget: Widget) -> Self {
        if widget.choices.is_empty() {
            if let Some(choices) = self.field_type.choices() {
                widget.choices = choices.to_vec();
            }
        }
        self.widget = widget;
        self
    }

    /// Sets whether this field is disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Returns the default widget for a given form field type.
pub fn default_widget_for_field_type(field_type: &FormFieldType) -> Widget {
    let kind = match field_type {
        FormFieldType::Char { .. } => WidgetType::TextInput,
        FormFieldType::Integer { .. } | FormFieldType::Float => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::Date => WidgetType::DateInput,
        FormFieldType::DateTime => WidgetType::DateTimeInput,
        FormFieldType::SplitDateTime => WidgetType::SplitDateTimeWidget,
        FormFieldType::Time => WidgetType::TimeInput,
        FormFieldType::Email => WidgetType::EmailInput,
        FormFieldType::Url => WidgetType::UrlInput,
        FormFieldType::Choice { .. } => WidgetType::Select,
        FormFieldType::MultipleChoice { .. } => WidgetType::SelectMultiple,
        FormFieldType::File | FormFieldType::Image => WidgetType::ClearableFileInput,
    };
    let widget = Widget::new(kind);
    match field_type.choices() {
        Some(choices) => widget.with_choices(choices.to_vec()),
        None => widget,
    }
}

/// Cleans the raw submitted values of a field.
///
/// Performs the required check, then the type-specific checks. Returns the
/// cleaned values (empty for an empty optional field without initial) or the
/// error messages. Multiple-choice fields keep every value; a split date/time
/// joins its two parts; other fields use the first value.
pub fn clean_field_value(field: &FormFieldDef, raw: &[String]) -> Result<Vec<String>, Vec<String>> {
    if let FormFieldType::MultipleChoice { choices } = &field.field_type {
        return clean_multiple_choice(field, choices, raw);
    }

    let joined;
    let raw_str = match (&field.field_type, raw) {
        (FormFieldType::SplitDateTime, [date, time, ..]) => {
            joined = format!("{} {}", date.trim(), time.trim());
            joined.trim()
        }
        _ => raw.first().map_or("", |v| v.trim()),
    };
    let is_empty = match field.field_type {
        FormFieldType::Boolean => !is_truthy(raw_str),
        _ => raw_str.is_empty(),
    };

    if is_empty {
        if field.required {
            return Err(vec!["This field is required.".to_string()]);
        }
        return Ok(field.initial.clone().into_iter().collect());
    }

    let mut errors = Vec::new();
    match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
        } => {
            let len = raw_str.chars().count();
            if let Some(min) = min_length {
                if len < *min {
                    errors.push(format!(
                        "Ensure this value has at least {min} characters (it has {len})."
                    ));
                }
            }
            if let Some(max) = max_length {
                if len > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {len})."
                    ));
                }
            }
        }
        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw_str.parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!("Ensure this value is greater than or equal to {min}."));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!("Ensure this value is less than or equal to {max}."));
                    }
                }
            }
            Err(_) => errors.push("Enter a whole number.".to_string()),
        },
        FormFieldType::Float => {
            if raw_str.parse::<f64>().is_err() {
                errors.push("Enter a number.".to_string());
            }
        }
        FormFieldType::Boolean => {}
        FormFieldType::Date => {
            if !DATE_RE.is_match(raw_str) {
                errors.push("Enter a valid date.".to_string());
            }
        }
        FormFieldType::DateTime | FormFieldType::SplitDateTime => {
            let valid = raw_str
                .split_once(['T', ' '])
                .is_some_and(|(d, t)| DATE_RE.is_match(d) && TIME_RE.is_match(t.trim()));
            if !valid {
                errors.push("Enter a valid date/time.".to_string());
            }
        }
        FormFieldType::Time => {
            if !TIME_RE.is_match(raw_str) {
                errors.push("Enter a valid time.".to_string());
            }
        }
        FormFieldType::Email => {
            if !EMAIL_RE.is_match(raw_str) {
                errors.push("Enter a valid email address.".to_string());
            }
        }
        FormFieldType::Url => {
            let rest = raw_str
                .strip_prefix("http://")
                .or_else(|| raw_str.strip_prefix("https://"));
            if rest.is_none_or(|host| host.is_empty() || host.contains(char::is_whitespace)) {
                errors.push("Enter a valid URL.".to_string());
            }
        }
        FormFieldType::Choice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw_str) {
                errors.push(format!(
                    "Select a valid choice. {raw_str} is not one of the available choices."
                ));
            }
        }
        FormFieldType::MultipleChoice { .. } | FormFieldType::File | FormFieldType::Image => {}
    }

    if errors.is_empty() {
        Ok(vec![raw_str.to_string()])
    } else {
        Err(errors)
    }
}

fn clean_multiple_choice(
    field: &FormFieldDef,
    choices: &[(String, String)],
    raw: &[String],
) -> Result<Vec<String>, Vec<String>> {
    let values: Vec<String> = raw
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        if field.required {
            return Err(vec!["This field is required.".to_string()]);
        }
        return Ok(field.initial.clone().into_iter().collect());
    }

    let errors: Vec<String> = values
        .iter()
        .filter(|value| !choices.iter().any(|(v, _)| v == *value))
        .map(|value| format!("Select a valid choice. {value} is not one of the available choices."))
        .collect();
    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(value, "" | "false" | "False" | "0" | "off")
}
