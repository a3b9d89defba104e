//! Core error types for crispy-bulma.
//!
//! [`CrispyError`] covers every way a render can fail: template lookup and
//! syntax problems, unresolvable variables, missing form fields, invalid
//! helper configuration, and settings errors. Nothing in the pack retries;
//! every error propagates to the caller of the top-level render function.

use thiserror::Error;

/// The primary error type for crispy-bulma.
#[derive(Error, Debug)]
pub enum CrispyError {
    // ── Templates ────────────────────────────────────────────────────

    /// A template or tag invocation contains invalid syntax.
    #[error("Template syntax error: {0}")]
    TemplateSyntaxError(String),

    /// The requested template is not registered with the engine.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    /// The template engine failed while rendering.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// A variable could not be resolved and strict resolution is enabled.
    #[error("Variable does not exist: {0}")]
    VariableDoesNotExist(String),

    // ── Forms and layouts ────────────────────────────────────────────

    /// A layout referenced a field the form does not declare.
    #[error("Could not resolve form field '{0}'")]
    FieldDoesNotExist(String),

    /// A `FormHelper` was configured with an invalid value.
    #[error("Form helper error: {0}")]
    FormHelpersException(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The pack is improperly configured.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CrispyError {
    /// Returns `true` for errors raised by the template layer.
    pub const fn is_template_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateSyntaxError(_)
                | Self::TemplateDoesNotExist(_)
                | Self::TemplateError(_)
                | Self::VariableDoesNotExist(_)
        )
    }
}

/// A convenience type alias for `Result<T, CrispyError>`.
pub type CrispyResult<T> = Result<T, CrispyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrispyError::FieldDoesNotExist("email".into());
        assert_eq!(err.to_string(), "Could not resolve form field 'email'");

        let err = CrispyError::FormHelpersException("bad method".into());
        assert_eq!(err.to_string(), "Form helper error: bad method");
    }

    #[test]
    fn test_is_template_error() {
        assert!(CrispyError::TemplateDoesNotExist("x".into()).is_template_error());
        assert!(CrispyError::VariableDoesNotExist("x".into()).is_template_error());
        assert!(!CrispyError::FieldDoesNotExist("x".into()).is_template_error());
        assert!(!CrispyError::ImproperlyConfigured("x".into()).is_template_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CrispyError = io_err.into();
        assert!(err.to_string().contains("file missing"));
    }
}
