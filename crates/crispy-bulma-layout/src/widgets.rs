//! Bulma widgets and the form fields that use them.

use crispy_bulma_forms::fields::{FormFieldDef, FormFieldType};
use crispy_bulma_forms::widgets::{Widget, WidgetType};

/// Template of the Bulma file upload control.
pub const FILE_UPLOAD_TEMPLATE: &str = "bulma/widgets/file_upload_input.html";

/// A clearable file input rendered as a Bulma `file` control.
///
/// Its class name is `fileuploadinput`, which the converter table maps to
/// `file-input`.
pub fn file_upload_input() -> Widget {
    Widget::new(WidgetType::ClearableFileInput)
        .with_template(FILE_UPLOAD_TEMPLATE)
        .with_class_name("fileuploadinput")
}

/// An email input carrying the Bulma `input` class.
pub fn email_input() -> Widget {
    Widget::new(WidgetType::EmailInput).with_attr("class", "input")
}

/// A file field using [`file_upload_input`].
pub fn file_field(name: impl Into<String>) -> FormFieldDef {
    FormFieldDef::new(name, FormFieldType::File).widget(file_upload_input())
}

/// An image field using [`file_upload_input`].
pub fn image_field(name: impl Into<String>) -> FormFieldDef {
    FormFieldDef::new(name, FormFieldType::Image).widget(file_upload_input())
}

/// An email field using [`email_input`].
pub fn email_field(name: impl Into<String>) -> FormFieldDef {
    FormFieldDef::new(name, FormFieldType::Email).widget(email_input())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crispy_bulma_forms::widgets::Attrs;
    use crispy_bulma_template::engine::Engine;

    #[test]
    fn test_file_upload_input() {
        let w = file_upload_input();
        assert_eq!(w.kind, WidgetType::ClearableFileInput);
        assert_eq!(w.type_name(), "fileuploadinput");

        let mut extra = Attrs::new();
        extra.insert("id".to_string(), "id_doc".to_string());
        let html = w.render("doc", &["cv.pdf".to_string()], &extra, &Engine::new().unwrap()).unwrap();
        assert!(html.contains(r#"<div class="file has-name">"#));
        assert!(html.contains(r#"<input type="file" name="doc" id="id_doc" />"#));
        assert!(html.contains(r#"<span class="file-name">cv.pdf</span>"#));
        assert!(html.contains(r#"name="doc-clear" id="id_doc-clear_id""#));
    }

    #[test]
    fn test_email_input() {
        let w = email_input();
        assert_eq!(w.attrs.get("class").map(String::as_str), Some("input"));
        assert_eq!(w.kind.input_type(), Some("email"));
    }

    #[test]
    fn test_fields() {
        assert_eq!(file_field("doc").widget.type_name(), "fileuploadinput");
        assert_eq!(image_field("avatar").field_type, FormFieldType::Image);
        assert_eq!(email_field("email").widget.kind, WidgetType::EmailInput);
    }
}
