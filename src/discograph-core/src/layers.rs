//! Aggregation over the annotation layers of a graph.
//!
//! These are full scans over all nodes and edges with no caching; exporters
//! call them once per document.

use std::collections::BTreeSet;

use crate::graph::{AnnotationGraph, LayerSet};

/// All layers used by at least one node.
pub fn get_node_annotation_layers(graph: &AnnotationGraph) -> LayerSet {
    graph
        .nodes()
        .flat_map(|node| node.data.layers.iter().cloned())
        .collect()
}

/// All layers used by at least one edge.
pub fn get_edge_annotation_layers(graph: &AnnotationGraph) -> LayerSet {
    graph
        .edges()
        .flat_map(|edge| edge.data.layers.iter().cloned())
        .collect()
}

/// All layers used by at least one node or edge.
pub fn get_annotation_layers(graph: &AnnotationGraph) -> LayerSet {
    let mut layers = get_node_annotation_layers(graph);
    layers.extend(get_edge_annotation_layers(graph));
    layers
}

/// Namespaces of all layers, e.g. `tiger` for `tiger:sentence:root`.
pub fn get_top_level_layers(graph: &AnnotationGraph) -> BTreeSet<String> {
    get_annotation_layers(graph)
        .iter()
        .map(|layer| layer2namespace(layer).to_string())
        .collect()
}

/// The part of a layer name before the first `:`.
pub fn layer2namespace(layer: &str) -> &str {
    layer.split_once(':').map_or(layer, |(namespace, _)| namespace)
}
