//! Error types and result aliases for discograph.
//!
//! Every fallible operation in the workspace returns [`DiscographResult`].

mod error;

pub use error::{DiscographError, DiscographResult};
