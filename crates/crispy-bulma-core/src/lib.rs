//! # crispy-bulma-core
//!
//! Core types, settings, and error types for the crispy-bulma workspace.
//! This crate has no template or form dependencies and provides the
//! foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`utils`] - Utility types (`MultiValueDict`, text helpers)
//! - [`settings`] - Pack settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{CrispyError, CrispyResult};
pub use settings::{Settings, SETTINGS};
