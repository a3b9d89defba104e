//! # crispy-bulma-forms
//!
//! The form model the layout pack renders: widgets with mutable attribute
//! maps, field definitions with light validation, bound fields, and the
//! [`Form`](form::Form) trait with its general-purpose [`BaseForm`](form::BaseForm).

pub mod bound_field;
pub mod fields;
pub mod form;
pub mod widgets;

pub use bound_field::BoundField;
pub use fields::{FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form};
pub use widgets::{Attrs, Widget, WidgetType};
