//! Settings for the crispy-bulma template pack.
//!
//! [`Settings`] holds the pack configuration and [`LazySettings`] a
//! globally-accessible, lazily-initialized instance. The fields mirror the
//! `CRISPY_*` settings a project would otherwise declare by hand.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{CrispyError, CrispyResult};

/// The complete set of pack settings.
///
/// # Examples
///
/// ```
/// use crispy_bulma_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.template_pack, "bulma");
/// assert!(settings.fails_silently());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled.
    pub debug: bool,

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Template packs ───────────────────────────────────────────────

    /// The template pack used when a helper does not name one.
    pub template_pack: String,
    /// Template packs a helper is allowed to select.
    pub allowed_template_packs: Vec<String>,
    /// Extra directories searched for template files.
    pub template_dirs: Vec<PathBuf>,

    // ── Rendering ────────────────────────────────────────────────────

    /// Widget type name to CSS token overrides, merged over the built-in table.
    pub class_converters: HashMap<String, String>,
    /// Whether missing fields are logged and skipped instead of raising.
    ///
    /// `None` means "the opposite of `debug`".
    pub fail_silently: Option<bool>,
    /// Whether unresolvable template variables are errors instead of `""`.
    pub strict_variables: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            template_pack: "bulma".to_string(),
            allowed_template_packs: ["bootstrap", "uni_form", "bootstrap3", "bootstrap4", "bulma"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            template_dirs: Vec::new(),
            class_converters: HashMap::new(),
            fail_silently: None,
            strict_variables: false,
        }
    }
}

impl Settings {
    /// Returns whether missing fields should be skipped silently.
    pub fn fails_silently(&self) -> bool {
        self.fail_silently.unwrap_or(!self.debug)
    }

    /// Checks that `pack` is one of the allowed template packs.
    pub fn check_template_pack(&self, pack: &str) -> CrispyResult<()> {
        if self.allowed_template_packs.iter().any(|p| p == pack) {
            Ok(())
        } else {
            Err(CrispyError::ImproperlyConfigured(format!(
                "template pack '{pack}' is not in allowed_template_packs {:?}",
                self.allowed_template_packs
            )))
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Code that
/// reads settings uses [`get_or_default`](LazySettings::get_or_default) so
/// the pack also works when nothing was configured.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, installing the defaults if nothing
    /// was configured yet.
    pub fn get_or_default(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
