//! discograph - layer-aware annotation graphs for multi-layer linguistic corpora
//!
//! discograph stores the annotation layers of one document (syntax trees,
//! rhetorical structure, coreference, ...) as a single directed multigraph
//! whose nodes and edges are tagged with the layers they belong to, and
//! merges independently built layers over a shared tokenization.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_error as error;
pub use discograph_core as core;

/// discograph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
