//! Widget-type to CSS-class conversion table.
//!
//! Maps a lower-cased widget type name (`textinput`, `dateinput`, ...) to the
//! Bulma classes its inputs receive. Names missing from the table map to
//! themselves, so unknown widgets still get a stable class and never error.

use std::collections::HashMap;
use std::sync::OnceLock;

use crispy_bulma_core::settings::{Settings, SETTINGS};

const BUILTIN: &[(&str, &str)] = &[
    ("dateinput", "dateinput input"),
    ("datetimeinput", "datetimeinput input"),
    ("textinput", "input"),
    ("fileinput", "fileinput"),
    ("clearablefileinput", "clearablefileinput"),
    ("passwordinput", "input"),
    ("emailinput", "input"),
    ("checkboxinput", ""),
    ("select", ""),
    ("selectmultiple", ""),
    ("numberinput", "numberinput input"),
    ("timeinput", "timeinput input"),
    ("urlinput", "urlinput input"),
    ("fileuploadinput", "file-input"),
];

static GLOBAL_CONVERTERS: OnceLock<ClassConverters> = OnceLock::new();

/// The class conversion table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConverters {
    table: HashMap<String, String>,
}

impl Default for ClassConverters {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ClassConverters {
    /// The built-in Bulma table.
    pub fn builtin() -> Self {
        Self {
            table: BUILTIN
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// The built-in table with `overrides` layered on top. Override keys are
    /// lower-cased.
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let mut converters = Self::builtin();
        for (name, classes) in overrides {
            converters.table.insert(name.to_lowercase(), classes.clone());
        }
        converters
    }

    /// The built-in table merged with `settings.class_converters`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_overrides(&settings.class_converters)
    }

    /// Returns the process-wide table, built from the global settings on
    /// first use.
    pub fn global() -> &'static Self {
        GLOBAL_CONVERTERS.get_or_init(|| Self::from_settings(SETTINGS.get_or_default()))
    }

    /// Returns the classes for a widget type name, or the name itself when it
    /// is not in the table.
    pub fn lookup<'a>(&'a self, type_name: &'a str) -> &'a str {
        self.table.get(type_name).map_or(type_name, String::as_str)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
