//! Utility types and functions.
//!
//! - [`MultiValueDict`]: submitted form data, several values per key.
//! - [`text`]: string helpers (`slugify`, `pretty_name`).

mod multi_value_dict;
pub mod text;

pub use multi_value_dict::MultiValueDict;
