//! Type system for annotation attributes.

mod value;

pub use value::Value;
