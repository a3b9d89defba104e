//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is what layout rendering consumes: field definitions,
//! current values, errors and bound fields. [`BaseForm`] is a concrete,
//! general-purpose implementation built from a list of field definitions.

use std::collections::HashMap;

use crispy_bulma_core::utils::MultiValueDict;

use crate::bound_field::BoundField;
use crate::fields::{clean_field_value, FormFieldDef};

/// Key under which form-level errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Cross-field validation hook for [`BaseForm`].
pub type CleanFn = fn(&HashMap<String, Vec<String>>) -> Result<(), HashMap<String, Vec<String>>>;

/// The core form trait. All form types implement this.
pub trait Form: Send + Sync {
    /// Returns the form's field definitions, in declaration order.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the initial values that override field-level initials.
    fn initial(&self) -> &HashMap<String, String>;

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds submitted data to this form, clearing previous validation state.
    fn bind(&mut self, data: &MultiValueDict);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Returns the raw submitted values of a field (by unprefixed name).
    fn data(&self, name: &str) -> Option<&[String]>;

    /// Validates the form. Returns `true` if valid.
    ///
    /// After calling this, `errors()` and `cleaned_data()` are populated.
    fn is_valid(&mut self) -> bool;

    /// Returns validation errors keyed by field name; form-level errors use
    /// [`NON_FIELD_ERRORS`].
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned values. Only populated by `is_valid()`.
    fn cleaned_data(&self) -> &HashMap<String, Vec<String>>;

    /// Cross-field validation hook. The default implementation does nothing.
    fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }

    /// Returns the form-level errors.
    fn non_field_errors(&self) -> &[String] {
        self.errors()
            .get(NON_FIELD_ERRORS)
            .map_or(&[], Vec::as_slice)
    }

    /// Looks up a field definition by name.
    fn field(&self, name: &str) -> Option<&FormFieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// The value a field renders with: submitted data when bound, else the
    /// form's initial value, else the field's own initial.
    fn value(&self, name: &str) -> Vec<String> {
        if self.is_bound() {
            return self.data(name).map(<[String]>::to_vec).unwrap_or_default();
        }
        self.initial()
            .get(name)
            .cloned()
            .or_else(|| self.field(name).and_then(|f| f.initial.clone()))
            .into_iter()
            .collect()
    }

    /// Builds the bound field for `name`, or `None` if the form has no such
    /// field.
    fn bound_field(&self, name: &str) -> Option<BoundField> {
        let field = self.field(name)?;
        let errors = self.errors().get(name).cloned().unwrap_or_default();
        Some(BoundField::new(field, self.value(name), errors, self.prefix()))
    }

    /// Returns bound fields for every field, in declaration order.
    fn bound_fields(&self) -> Vec<BoundField> {
        self.fields()
            .iter()
            .filter_map(|f| self.bound_field(&f.name))
            .collect()
    }

    /// Returns `true` if any widget uploads files, so the `<form>` needs
    /// `enctype="multipart/form-data"`.
    fn is_multipart(&self) -> bool {
        self.fields().iter().any(|f| {
            f.widget
                .underlying()
                .iter()
                .any(|w| w.kind.input_type() == Some("file"))
        })
    }
}

/// A general-purpose form implementation.
///
/// # Examples
///
/// ```
/// use crispy_bulma_core::utils::MultiValueDict;
/// use crispy_bulma_forms::{BaseForm, Form, FormFieldDef, FormFieldType};
///
/// let mut form = BaseForm::new(vec![FormFieldDef::new("email", FormFieldType::Email)]);
/// form.bind(&MultiValueDict::from_pairs([("email", "user@example.com")]));
/// assert!(form.is_valid());
/// assert_eq!(form.cleaned_data()["email"], ["user@example.com"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    initial_data: HashMap<String, String>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Vec<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Vec<String>>,
    clean_fn: Option<CleanFn>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            ..Self::default()
        }
    }

    /// Sets initial (default) values for fields.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, String>) -> Self {
        self.initial_data = initial;
        self
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets a cross-field validation hook, run after field validation.
    #[must_use]
    pub fn with_clean(mut self, clean: CleanFn) -> Self {
        self.clean_fn = Some(clean);
        self
    }

    /// Adds an error to a field, or to the form when `field` is `None`.
    ///
    /// The field's cleaned value, if any, is dropped.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        let key = field.unwrap_or(NON_FIELD_ERRORS);
        self.cleaned_data.remove(key);
        self.errors
            .entry(key.to_string())
            .or_default()
            .push(message.into());
    }

    fn html_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{name}"),
            None => name.to_string(),
        }
    }
}

impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn initial(&self) -> &HashMap<String, String> {
        &self.initial_data
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &MultiValueDict) {
        self.bound = true;
        self.errors.clear();
        self.cleaned_data.clear();

        let raw_data = self
            .field_defs
            .iter()
            .map(|field| {
                let values = field
                    .widget
                    .value_from_data(data, &self.html_name(&field.name))
                    .unwrap_or_default();
                (field.name.clone(), values)
            })
            .collect();
        self.raw_data = raw_data;
        tracing::debug!(fields = self.field_defs.len(), "form bound");
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    fn data(&self, name: &str) -> Option<&[String]> {
        self.raw_data
            .get(name)
            .filter(|values| !values.is_empty())
            .map(Vec::as_slice)
    }

    fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_defs {
            if field.disabled {
                if let Some(initial) = self.value_for_disabled(field) {
                    self.cleaned_data.insert(field.name.clone(), vec![initial]);
                }
                continue;
            }
            let raw = self.raw_data.get(&field.name).map_or(&[][..], Vec::as_slice);
            match clean_field_value(field, raw) {
                Ok(values) if values.is_empty() => {}
                Ok(values) => {
                    self.cleaned_data.insert(field.name.clone(), values);
                }
                Err(errors) => {
                    self.errors.insert(field.name.clone(), errors);
                }
            }
        }

        if let Err(form_errors) = self.clean() {
            for (key, msgs) in form_errors {
                for msg in msgs {
                    self.add_error(Some(&key), msg);
                }
            }
        }

        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "form failed validation");
        }
        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Vec<String>> {
        &self.cleaned_data
    }

    fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        self.clean_fn.map_or(Ok(()), |clean| clean(&self.cleaned_data))
    }
}

impl BaseForm {
    /// Disabled fields ignore submitted data and keep their initial value.
    fn value_for_disabled(&self, field: &FormFieldDef) -> Option<String> {
        self.initial_data
            .get(&field.name)
            .cloned()
            .or_else(|| field.initial.clone())
    }
}
