//! # crispy-bulma-layout
//!
//! The Bulma template pack: layout objects, the field class-name resolver,
//! and the form helper that ties them together.
//!
//! ## Modules
//!
//! - [`converters`] - Widget-type to CSS-class table
//! - [`field_tag`] - The `crispy_field` resolver and its tag mini-language
//! - [`filters`] - Field predicates and the field template context
//! - [`utils`] - Render pass state and field rendering
//! - [`layout`] - Generic and Bulma layout objects
//! - [`bulma`] - Inline radio and checkbox fields
//! - [`widgets`] - Bulma widgets and form fields
//! - [`helper`] - `FormHelper` and `render_crispy_form`

pub mod bulma;
pub mod converters;
pub mod field_tag;
pub mod filters;
pub mod helper;
pub mod layout;
pub mod utils;
pub mod widgets;

pub use bulma::{InlineCheckboxes, InlineRadios};
pub use converters::ClassConverters;
pub use field_tag::{crispy_field, CrispyFieldTag, FieldAttrs};
pub use helper::{render_crispy_form, CrispyRenderer, FormHelper};
pub use layout::{
    BaseInput, Button, ButtonHolder, Column, Div, Field, Fieldset, FormGroup, Hidden, Html, IconField,
    Layout, LayoutItem, LayoutObject, MultiWidgetField, Reset, Row, Submit, UploadField,
};
pub use utils::{render_field, FieldOptions, FormStyle, RenderPass};
