//! # crispy-bulma
//!
//! A Bulma template pack for crispy-style form layouts.
//!
//! This is the meta-crate that re-exports all sub-crates. Depend on
//! `crispy-bulma` for everything, or on individual crates for finer-grained
//! control.
//!
//! ```
//! use crispy_bulma::prelude::*;
//!
//! let form = BaseForm::new(vec![
//!     FormFieldDef::new("email", FormFieldType::Email),
//!     FormFieldDef::new("message", FormFieldType::char()),
//! ]);
//! let mut helper = FormHelper::new().with_layout(Layout::new(layout_items![
//!     IconField::new("email").icon_prepend("fa-envelope"),
//!     "message",
//! ]));
//! helper.add_input(Submit::new("send", "Send"));
//!
//! let html = render_crispy_form(&form, Some(&helper), &RenderContext::new()).unwrap();
//! assert!(html.contains("has-icons-left"));
//! assert!(html.contains(r#"class="button is-primary""#));
//! ```

/// Errors, settings, logging, and text utilities.
pub use crispy_bulma_core as core;

/// Template engine with the built-in `bulma` pack.
pub use crispy_bulma_template as template;

/// Widgets, field definitions, bound fields, and forms.
pub use crispy_bulma_forms as forms;

/// Layout objects, the class resolver, and the form helper.
pub use crispy_bulma_layout as layout;

pub use crispy_bulma_layout::layout_items;

// Re-export commonly used third-party crates
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// Convenience prelude that imports the most commonly used types.
pub mod prelude {
    pub use crispy_bulma_core::{CrispyError, CrispyResult, Settings, SETTINGS};
    pub use crispy_bulma_forms::{
        Attrs, BaseForm, BoundField, Form, FormFieldDef, FormFieldType, Widget, WidgetType,
    };
    pub use crispy_bulma_layout::widgets::{
        email_field, email_input, file_field, file_upload_input, image_field,
    };
    pub use crispy_bulma_layout::{
        render_crispy_form, BaseInput, Button, ButtonHolder, ClassConverters, Column, CrispyRenderer,
        Div, Field, Fieldset, FormGroup, FormHelper, Hidden, Html, IconField, InlineCheckboxes,
        InlineRadios, Layout, LayoutItem, LayoutObject, MultiWidgetField, Reset, Row, Submit,
        UploadField,
    };
    pub use crispy_bulma_template::{ContextValue, Engine, RenderContext};
    pub use crate::layout_items;
}
