//! Template engine: loading and rendering pack templates.
//!
//! [`Engine`] wraps a [`tera::Tera`] instance preloaded with the built-in
//! `bulma` template pack. Projects can register extra templates (another
//! pack, or overrides of single bulma templates) from strings, files, or
//! whole directories.
//!
//! Auto-escaping is disabled for pack templates: they pass pre-rendered
//! markup between each other, and user-supplied values are escaped with
//! [`escape_html`](crate::html::escape_html) before they enter a context.
//! Snippets given to [`Engine::render_string`] are the exception. Their
//! context values are user data, so those renders escape.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

use crispy_bulma_core::error::{CrispyError, CrispyResult};
use crispy_bulma_core::settings::{Settings, SETTINGS};
use regex::Regex;
use serde_json::{Map, Value};
use tera::Tera;

use crate::context::RenderContext;

/// The built-in `bulma` template pack, as `(name, source)` pairs.
const BULMA_TEMPLATES: &[(&str, &str)] = &[
    ("bulma/field.html", include_str!("../templates/bulma/field.html")),
    ("bulma/errors.html", include_str!("../templates/bulma/errors.html")),
    ("bulma/uni_form.html", include_str!("../templates/bulma/uni_form.html")),
    (
        "bulma/whole_uni_form.html",
        include_str!("../templates/bulma/whole_uni_form.html"),
    ),
    (
        "bulma/layout/help_text_and_errors.html",
        include_str!("../templates/bulma/layout/help_text_and_errors.html"),
    ),
    (
        "bulma/layout/baseinput.html",
        include_str!("../templates/bulma/layout/baseinput.html"),
    ),
    (
        "bulma/layout/button.html",
        include_str!("../templates/bulma/layout/button.html"),
    ),
    (
        "bulma/layout/buttonholder.html",
        include_str!("../templates/bulma/layout/buttonholder.html"),
    ),
    (
        "bulma/layout/div.html",
        include_str!("../templates/bulma/layout/div.html"),
    ),
    (
        "bulma/layout/fieldset.html",
        include_str!("../templates/bulma/layout/fieldset.html"),
    ),
    (
        "bulma/layout/formgroup.html",
        include_str!("../templates/bulma/layout/formgroup.html"),
    ),
    (
        "bulma/layout/input_with_icon.html",
        include_str!("../templates/bulma/layout/input_with_icon.html"),
    ),
    (
        "bulma/layout/radioselect_inline.html",
        include_str!("../templates/bulma/layout/radioselect_inline.html"),
    ),
    (
        "bulma/layout/checkboxselectmultiple_inline.html",
        include_str!("../templates/bulma/layout/checkboxselectmultiple_inline.html"),
    ),
    (
        "bulma/widgets/file_upload_input.html",
        include_str!("../templates/bulma/widgets/file_upload_input.html"),
    ),
];

static GLOBAL_ENGINE: OnceLock<Engine> = OnceLock::new();

static MISSING_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variable `([^`]+)` not found in context").expect("valid regex")
});

/// Returns `true` if `source` contains template variables or tags.
pub fn has_template_syntax(source: &str) -> bool {
    source.contains("{{") || source.contains("{%")
}

/// The template engine.
///
/// # Examples
///
/// ```
/// use crispy_bulma_template::engine::Engine;
/// use crispy_bulma_template::context::RenderContext;
///
/// let mut engine = Engine::new().unwrap();
/// engine.add_raw_template("hello.html", "Hello {{ name }}!").unwrap();
///
/// let ctx = RenderContext::new().with("name", "Bulma");
/// assert_eq!(engine.render("hello.html", &ctx).unwrap(), "Hello Bulma!");
/// ```
#[derive(Debug)]
pub struct Engine {
    tera: Tera,
}

impl Engine {
    /// Creates an engine holding only the built-in `bulma` pack.
    pub fn new() -> CrispyResult<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_templates(BULMA_TEMPLATES.iter().copied())
            .map_err(syntax_error)?;
        Ok(Self { tera })
    }

    /// Creates an engine with the built-in pack plus every template found
    /// under `settings.template_dirs`.
    pub fn from_settings(settings: &Settings) -> CrispyResult<Self> {
        let mut engine = Self::new()?;
        for dir in &settings.template_dirs {
            let count = engine.load_dir(dir)?;
            tracing::debug!(dir = %dir.display(), count, "loaded template directory");
        }
        Ok(engine)
    }

    /// Returns the process-wide engine, built from the global settings on
    /// first use.
    pub fn global() -> CrispyResult<&'static Self> {
        if let Some(engine) = GLOBAL_ENGINE.get() {
            return Ok(engine);
        }
        let engine = Self::from_settings(SETTINGS.get_or_default())?;
        Ok(GLOBAL_ENGINE.get_or_init(|| engine))
    }

    /// Registers a template from a string, replacing any template with the
    /// same name.
    pub fn add_raw_template(&mut self, name: &str, source: &str) -> CrispyResult<()> {
        self.tera
            .add_raw_template(name, source)
            .map_err(syntax_error)
    }

    /// Registers a template from a file. Without `name`, the path is used.
    pub fn add_template_file(&mut self, path: impl AsRef<Path>, name: Option<&str>) -> CrispyResult<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CrispyError::TemplateDoesNotExist(path.display().to_string()));
        }
        self.tera
            .add_template_file(path, name)
            .map_err(syntax_error)
    }

    /// Registers every `.html` file below `dir`, named by its path relative
    /// to `dir` (so `dir/bulma/field.html` overrides `bulma/field.html`).
    ///
    /// Returns the number of templates loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> CrispyResult<usize> {
        let root = dir.as_ref();
        let mut files = Vec::new();
        collect_html_files(root, &mut files)?;

        let mut templates = Vec::with_capacity(files.len());
        for path in &files {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            templates.push((path.as_path(), Some(name)));
        }

        let count = templates.len();
        self.tera
            .add_template_files(templates)
            .map_err(syntax_error)?;
        Ok(count)
    }

    /// Returns `true` if a template with this name is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Renders a registered template.
    pub fn render(&self, name: &str, context: &RenderContext) -> CrispyResult<String> {
        tracing::trace!(template = name, "rendering template");
        self.tera
            .render(name, &context.to_tera())
            .map_err(render_error)
    }

    /// Renders a template given as source text, e.g. the content of an
    /// `HTML` layout object or a button label.
    ///
    /// Context values are HTML-escaped. An undefined variable renders as an
    /// empty string, or fails with `VariableDoesNotExist` when `strict` is set.
    pub fn render_string(&self, source: &str, context: &RenderContext, strict: bool) -> CrispyResult<String> {
        if !has_template_syntax(source) {
            return Ok(source.to_string());
        }

        let mut vars = Map::new();
        for (key, value) in context.flatten() {
            let value = serde_json::to_value(&value).map_err(|e| CrispyError::TemplateError(e.to_string()))?;
            vars.insert(key, value);
        }

        let mut filled = HashSet::new();
        loop {
            let tera_ctx = tera::Context::from_value(Value::Object(vars.clone())).map_err(render_error)?;
            let err = match Tera::one_off(source, &tera_ctx, true) {
                Ok(html) => return Ok(html),
                Err(err) => err,
            };
            let Some(name) = missing_variable(&err) else {
                return Err(render_error(err));
            };
            if strict {
                return Err(CrispyError::VariableDoesNotExist(name));
            }
            if !filled.insert(name.clone()) || !fill_empty(&mut vars, &name) {
                return Err(render_error(err));
            }
            tracing::debug!(variable = %name, "undefined variable rendered as empty string");
        }
    }
}

/// The name of the undefined variable a render failed on, if that is why it
/// failed.
fn missing_variable(err: &tera::Error) -> Option<String> {
    let mut cause: Option<&dyn std::error::Error> = Some(err);
    while let Some(e) = cause {
        if let Some(caps) = MISSING_VARIABLE.captures(&e.to_string()) {
            return Some(caps[1].to_string());
        }
        cause = e.source();
    }
    None
}

/// Sets the dotted `path` to `""`, creating the objects along the way.
/// Returns `false` when a non-object value is in the way.
fn fill_empty(vars: &mut Map<String, Value>, path: &str) -> bool {
    let mut segments = path.split('.').peekable();
    let mut scope = vars;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            scope.insert(segment.to_string(), Value::String(String::new()));
            return true;
        }
        let next = scope
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match next {
            Value::Object(map) => scope = map,
            _ => return false,
        }
    }
    false
}

fn collect_html_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> CrispyResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_html_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            out.push(path);
        }
    }
    Ok(())
}

/// Joins a Tera error with its source chain; Tera's top-level message alone
/// rarely names the failing expression.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn syntax_error(err: tera::Error) -> CrispyError {
    CrispyError::TemplateSyntaxError(describe(&err))
}

fn render_error(err: tera::Error) -> CrispyError {
    match &err.kind {
        tera::ErrorKind::TemplateNotFound(name) => CrispyError::TemplateDoesNotExist(name.clone()),
        _ => CrispyError::TemplateError(describe(&err)),
    }
}
