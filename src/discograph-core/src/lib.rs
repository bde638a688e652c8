//! Core data model for discograph annotation graphs.
//!
//! This crate provides the layer-aware annotation multigraph and everything
//! built directly on it:
//! - `AnnotationGraph`, `NodeId`, `EdgeType` and `Value` for the data model
//! - token, span, offset and pointing-chain queries
//! - layer based selection of nodes, edges and neighbours
//! - merging of graphs that share a tokenization
//! - builders and flat export views

pub mod builder;
pub mod export;
pub mod graph;
pub mod layers;
pub mod merge;
pub mod query;
pub mod select;
pub mod testing;
pub mod types;
pub mod util;

mod proptest_utils;

// Re-export commonly used types
pub use builder::{GraphBuilder, TokenizedTextBuilder, check_construction_contract};
pub use export::FlatGraph;
pub use graph::{
    AnnotationGraph, AttributeMap, EdgeData, EdgeKey, EdgeRecord, EdgeRef, EdgeType, GraphFormat,
    HasAttributes, LayerSet, LayerTarget, NodeData, NodeId, NodeRef,
};
pub use layers::{
    get_annotation_layers, get_edge_annotation_layers, get_node_annotation_layers,
    get_top_level_layers, layer2namespace,
};
pub use merge::{create_token_mapping, rename_tokens};
pub use query::{
    get_offsets, get_pointing_chains, get_span, get_text, Kwic, TokenMapper,
};
pub use select::{
    select_edges_by, select_edges_by_attribute, select_neighbors_by_edge_attribute,
    select_neighbors_by_layer, select_nodes_by_attribute, select_nodes_by_layer, LayerFilter,
    ValueFilter,
};
pub use types::Value;
pub use util::{convert_spanstring, natural_sort_key};
