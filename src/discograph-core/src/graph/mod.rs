//! Annotation graph data model.
//!
//! This module provides the core graph primitives:
//! - `NodeId`, `EdgeKey` and the closed `EdgeType` vocabulary
//! - `NodeData` and `EdgeData` carrying layers and attributes
//! - `AnnotationGraph`, the layer-aware multigraph container

mod attributes;
mod container;
mod edge;
mod identifiers;
mod node;
mod relabel;
mod snapshot;
mod tokens;

pub use attributes::{AttributeMap, HasAttributes};
pub use container::{AnnotationGraph, LayerTarget, METADATA_KEY};
pub use edge::{EdgeData, EdgeRecord, EdgeRef};
pub use identifiers::{EdgeKey, EdgeType, GraphFormat, LayerSet, NodeId, RESERVED_ATTRIBUTE_KEYS};
pub use node::{NodeData, NodeRef};
