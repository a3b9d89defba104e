//! Loads [`Settings`] from TOML or JSON and the environment.
//!
//! A config source only needs the keys it changes: it is laid over the
//! serialized defaults before deserializing, so `class_converters` entries
//! merge with each other rather than replacing the table. Environment
//! variables are applied last:
//!
//! | Variable | Setting |
//! |---|---|
//! | `CRISPY_DEBUG` | `debug` |
//! | `CRISPY_LOG_LEVEL` | `log_level` |
//! | `CRISPY_TEMPLATE_PACK` | `template_pack` |
//! | `CRISPY_FAIL_SILENTLY` | `fail_silently` |
//!
//! ```rust,no_run
//! use crispy_bulma_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/crispy.toml").unwrap();
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::{CrispyError, CrispyResult};
use crate::settings::Settings;

/// Parses TOML settings. Missing keys keep their defaults.
pub fn from_toml_str(source: &str) -> CrispyResult<Settings> {
    let value: Value = toml::from_str(source)
        .map_err(|e| CrispyError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    over_defaults(value, "TOML")
}

/// Reads and parses a TOML settings file.
pub fn from_toml_file(path: impl AsRef<Path>) -> CrispyResult<Settings> {
    from_toml_str(&read_source(path.as_ref(), "TOML")?)
}

/// Reads a TOML settings file, then applies the environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> CrispyResult<Settings> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Parses JSON settings. Missing keys keep their defaults.
pub fn from_json_str(source: &str) -> CrispyResult<Settings> {
    let value: Value = serde_json::from_str(source)
        .map_err(|e| CrispyError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    over_defaults(value, "JSON")
}

/// Reads and parses a JSON settings file.
pub fn from_json_file(path: impl AsRef<Path>) -> CrispyResult<Settings> {
    from_json_str(&read_source(path.as_ref(), "JSON")?)
}

/// The defaults with the environment overrides applied.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies the `CRISPY_*` variables that are set.
///
/// Flags are true for `true`, `1` or `yes` in any case.
pub fn apply_env_overrides(settings: &mut Settings) {
    let var = |name: &str| std::env::var(name).ok();

    if let Some(debug) = var("CRISPY_DEBUG") {
        settings.debug = is_truthy(&debug);
    }
    if let Some(level) = var("CRISPY_LOG_LEVEL") {
        settings.log_level = level;
    }
    if let Some(pack) = var("CRISPY_TEMPLATE_PACK") {
        settings.template_pack = pack;
    }
    if let Some(silent) = var("CRISPY_FAIL_SILENTLY") {
        settings.fail_silently = Some(is_truthy(&silent));
    }
}

fn is_truthy(flag: &str) -> bool {
    ["true", "1", "yes"].contains(&flag.to_ascii_lowercase().as_str())
}

fn read_source(path: &Path, format: &str) -> CrispyResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CrispyError::ConfigurationError(format!("Failed to read {format} file '{}': {e}", path.display()))
    })
}

fn over_defaults(value: Value, format: &str) -> CrispyResult<Settings> {
    let mut settings = serde_json::to_value(Settings::default())
        .map_err(|e| CrispyError::ConfigurationError(format!("Failed to serialize default settings: {e}")))?;
    overlay(&mut settings, value);
    serde_json::from_value(settings)
        .map_err(|e| CrispyError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}")))
}

/// Lays `top` over `base`: objects merge per key, anything else replaces.
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, top) => *base = top,
    }
}
