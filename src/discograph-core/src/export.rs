//! Flat views of annotation graphs for exporters.
//!
//! Interchange formats like GraphML or GEXF only carry scalar attributes.
//! A [`FlatGraph`] is a detached copy of a graph in which layers and
//! edge types are ordinary attributes; its coercion steps rewrite those
//! attributes without touching the source graph:
//!
//! ```rust
//! use discograph_core::export::FlatGraph;
//! use discograph_core::AnnotationGraph;
//!
//! let graph = AnnotationGraph::new("tiger");
//! let flat = FlatGraph::new(&graph)
//!     .layers_as_string()
//!     .attribute_lists_as_strings()
//!     .remove_root_metadata();
//! assert!(flat.is_scalar());
//! ```

use common_config::DEFAULT_NAMESPACE;
use serde::Serialize;

use crate::graph::{AnnotationGraph, AttributeMap, EdgeKey, LayerSet, METADATA_KEY, NodeId};
use crate::types::Value;

const LAYERS_KEY: &str = "layers";
const EDGE_TYPE_KEY: &str = "edge_type";

/// A node of a [`FlatGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatNode {
    /// Node ID.
    pub id: NodeId,
    /// Node attributes, with `layers` added.
    pub attributes: AttributeMap,
}

/// An edge of a [`FlatGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatEdge {
    /// Source node ID.
    pub source: NodeId,
    /// Target node ID.
    pub target: NodeId,
    /// Key distinguishing parallel edges between `source` and `target`.
    pub key: EdgeKey,
    /// Edge attributes, with `layers` and `edge_type` added.
    pub attributes: AttributeMap,
}

/// Detached node/edge lists with plain attribute maps.
///
/// Layers start out as a sorted `StringList` under `layers`; edge types are
/// stored as strings under `edge_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatGraph {
    /// Document name.
    pub name: String,
    /// Root node ID.
    pub root: NodeId,
    #[serde(skip)]
    merged_rootnodes: Vec<NodeId>,
    /// Nodes in insertion order.
    pub nodes: Vec<FlatNode>,
    /// Edges grouped by source in node insertion order.
    pub edges: Vec<FlatEdge>,
}

impl FlatGraph {
    /// Copy a graph into a flat view.
    pub fn new(graph: &AnnotationGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| {
                let mut attributes = node.data.attributes.clone();
                attributes.insert(LAYERS_KEY.to_string(), layer_list(&node.data.layers));
                FlatNode {
                    id: node.id.clone(),
                    attributes,
                }
            })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| {
                let mut attributes = edge.data.attributes.clone();
                attributes.insert(LAYERS_KEY.to_string(), layer_list(&edge.data.layers));
                if let Some(edge_type) = edge.data.edge_type {
                    attributes.insert(EDGE_TYPE_KEY.to_string(), Value::from(edge_type.as_str()));
                }
                FlatEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    key: edge.key,
                    attributes,
                }
            })
            .collect();
        Self {
            name: graph.name().to_string(),
            root: graph.root().clone(),
            merged_rootnodes: graph.merged_rootnodes().to_vec(),
            nodes,
            edges,
        }
    }

    /// Store layers as a list of strings.
    pub fn layers_as_list(mut self) -> Self {
        self.map_layers(|layers| match layers {
            Value::String(s) => Value::StringList(parse_layer_string(s)),
            other => other.clone(),
        });
        self
    }

    /// Store layers as a single string like `{'tiger', 'tiger:syntax'}`.
    pub fn layers_as_string(mut self) -> Self {
        self.map_layers(|layers| match layers {
            Value::StringList(items) => Value::String(format_layer_set(items)),
            other => other.clone(),
        });
        self
    }

    /// Turn every list or map valued attribute into its string form.
    pub fn attribute_lists_as_strings(mut self) -> Self {
        for attributes in self.attribute_maps_mut() {
            for value in attributes.values_mut() {
                if matches!(value, Value::StringList(_) | Value::Map(_)) {
                    *value = Value::String(value.to_string());
                }
            }
        }
        self
    }

    /// Drop the `metadata` attribute of the root, the default-namespace root
    /// and every root merged into the graph.
    pub fn remove_root_metadata(mut self) -> Self {
        let default_root = NodeId::from(format!("{DEFAULT_NAMESPACE}:root_node"));
        let mut roots = vec![self.root.clone(), default_root];
        roots.extend(self.merged_rootnodes.iter().cloned());
        for node in self.nodes.iter_mut().filter(|node| roots.contains(&node.id)) {
            node.attributes.remove(METADATA_KEY);
        }
        self
    }

    /// Check that no attribute holds a list or map.
    pub fn is_scalar(&self) -> bool {
        self.nodes
            .iter()
            .map(|node| &node.attributes)
            .chain(self.edges.iter().map(|edge| &edge.attributes))
            .flat_map(|attributes| attributes.values())
            .all(|value| !matches!(value, Value::StringList(_) | Value::Map(_)))
    }

    /// Look up a node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&FlatNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    fn attribute_maps_mut(&mut self) -> impl Iterator<Item = &mut AttributeMap> + '_ {
        self.nodes
            .iter_mut()
            .map(|node| &mut node.attributes)
            .chain(self.edges.iter_mut().map(|edge| &mut edge.attributes))
    }

    fn map_layers(&mut self, f: impl Fn(&Value) -> Value) {
        for attributes in self.attribute_maps_mut() {
            if let Some(layers) = attributes.get_mut(LAYERS_KEY) {
                *layers = f(layers);
            }
        }
    }
}

/// Flat view with layers stored as lists.
pub fn layers_as_list(graph: &AnnotationGraph) -> FlatGraph {
    FlatGraph::new(graph).layers_as_list()
}

/// Flat view with layers stored as single strings.
pub fn layers_as_string(graph: &AnnotationGraph) -> FlatGraph {
    FlatGraph::new(graph).layers_as_string()
}

/// Flat view with list and map attributes stored as strings.
pub fn attribute_lists_as_strings(graph: &AnnotationGraph) -> FlatGraph {
    FlatGraph::new(graph).attribute_lists_as_strings()
}

/// Flat view without root metadata.
pub fn remove_root_metadata(graph: &AnnotationGraph) -> FlatGraph {
    FlatGraph::new(graph).remove_root_metadata()
}

fn layer_list(layers: &LayerSet) -> Value {
    Value::StringList(layers.iter().cloned().collect())
}

fn format_layer_set(layers: &[String]) -> String {
    let quoted: Vec<String> = layers.iter().map(|layer| format!("'{layer}'")).collect();
    format!("{{{}}}", quoted.join(", "))
}

fn parse_layer_string(s: &str) -> Vec<String> {
    s.trim_start_matches('{')
        .trim_end_matches('}')
        .split(", ")
        .map(|layer| layer.trim_matches('\'').to_string())
        .filter(|layer| !layer.is_empty())
        .collect()
}
