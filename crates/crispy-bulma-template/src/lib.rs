//! # crispy-bulma-template
//!
//! Template rendering for crispy-bulma. Wraps a [`tera`] engine preloaded
//! with the `bulma` template pack, and provides [`RenderContext`], the
//! immutable, overlay-based scope handed down a layout tree.

pub mod context;
pub mod engine;
pub mod html;

pub use context::{ContextValue, RenderContext};
pub use engine::Engine;
