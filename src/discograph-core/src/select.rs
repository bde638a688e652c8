//! Lazy selection of nodes, edges and neighbors.
//!
//! Every selector borrows the graph and yields matches in insertion order.
//! Layer and value constraints are expressed with [`LayerFilter`] and
//! [`ValueFilter`], which convert from the common shorthand forms:
//!
//! ```rust
//! use discograph_core::select::{LayerFilter, ValueFilter};
//! use discograph_core::Value;
//!
//! let any_layer = LayerFilter::from(None);
//! let one_layer = LayerFilter::from("tiger:syntax");
//! let some_layers = LayerFilter::from(["tiger", "rst"]);
//!
//! let any_value = ValueFilter::Any;
//! let exact = ValueFilter::from("NN");
//! let one_of = ValueFilter::OneOf(vec![Value::from("NN"), Value::from("NE")]);
//! ```

use crate::graph::{AnnotationGraph, EdgeRef, EdgeType, HasAttributes, LayerSet, NodeId, NodeRef};
use crate::types::Value;

/// Constraint on the layer set of a node or edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayerFilter {
    /// Every element matches.
    #[default]
    All,
    /// Elements in at least one of the given layers match.
    Any(Vec<String>),
}

impl LayerFilter {
    /// Check a layer set against the filter.
    pub fn matches(&self, layers: &LayerSet) -> bool {
        match self {
            Self::All => true,
            Self::Any(wanted) => wanted.iter().any(|layer| layers.contains(layer)),
        }
    }
}

impl From<&str> for LayerFilter {
    fn from(layer: &str) -> Self {
        Self::Any(vec![layer.to_string()])
    }
}

impl From<String> for LayerFilter {
    fn from(layer: String) -> Self {
        Self::Any(vec![layer])
    }
}

impl From<Option<&str>> for LayerFilter {
    fn from(layer: Option<&str>) -> Self {
        layer.map_or(Self::All, Self::from)
    }
}

impl<const N: usize> From<[&str; N]> for LayerFilter {
    fn from(layers: [&str; N]) -> Self {
        Self::Any(layers.iter().map(|l| (*l).to_string()).collect())
    }
}

impl From<Vec<String>> for LayerFilter {
    fn from(layers: Vec<String>) -> Self {
        Self::Any(layers)
    }
}

impl From<&LayerSet> for LayerFilter {
    fn from(layers: &LayerSet) -> Self {
        Self::Any(layers.iter().cloned().collect())
    }
}

/// Constraint on an attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueFilter {
    /// Any value, only presence of the attribute is required.
    #[default]
    Any,
    /// The value must equal the given one.
    Equals(Value),
    /// The value must equal one of the given ones.
    OneOf(Vec<Value>),
}

impl ValueFilter {
    /// Check a value against the filter.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Equals(expected) => expected == value,
            Self::OneOf(candidates) => candidates.contains(value),
        }
    }
}

impl From<Value> for ValueFilter {
    fn from(value: Value) -> Self {
        Self::Equals(value)
    }
}

impl From<&str> for ValueFilter {
    fn from(value: &str) -> Self {
        Self::Equals(Value::from(value))
    }
}

impl From<EdgeType> for ValueFilter {
    fn from(edge_type: EdgeType) -> Self {
        Self::Equals(Value::from(edge_type.as_str()))
    }
}

impl From<Vec<Value>> for ValueFilter {
    fn from(values: Vec<Value>) -> Self {
        Self::OneOf(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for ValueFilter {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Any, |v| Self::Equals(v.into()))
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Nodes whose layer set intersects the filter.
pub fn select_nodes_by_layer<'a>(
    graph: &'a AnnotationGraph,
    layer: impl Into<LayerFilter>,
) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    nodes_by_layer(graph, layer.into())
}

fn nodes_by_layer(graph: &AnnotationGraph, filter: LayerFilter) -> impl Iterator<Item = NodeRef<'_>> + '_ {
    graph
        .nodes()
        .filter(move |node| filter.matches(&node.data.layers))
}

/// Nodes that carry `attribute` with a value matching `value`.
///
/// `attribute == None` yields every node and ignores `value`.
pub fn select_nodes_by_attribute<'a>(
    graph: &'a AnnotationGraph,
    attribute: Option<&'a str>,
    value: impl Into<ValueFilter>,
) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    nodes_by_attribute(graph, attribute, value.into())
}

fn nodes_by_attribute<'a>(
    graph: &'a AnnotationGraph,
    attribute: Option<&'a str>,
    filter: ValueFilter,
) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    graph.nodes().filter(move |node| match attribute {
        None => true,
        Some(name) => node
            .data
            .get_attribute(name)
            .is_some_and(|v| filter.matches(v)),
    })
}

// ============================================================================
// Edges
// ============================================================================

/// Edges in a layer (and of a type, if given).
pub fn select_edges_by<'a>(
    graph: &'a AnnotationGraph,
    layer: impl Into<LayerFilter>,
    edge_type: Option<EdgeType>,
) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
    edges_by(graph, layer.into(), edge_type)
}

fn edges_by(
    graph: &AnnotationGraph,
    filter: LayerFilter,
    edge_type: Option<EdgeType>,
) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
    graph.edges().filter(move |edge| {
        filter.matches(&edge.data.layers) && edge_type.map_or(true, |t| edge.data.is_type(t))
    })
}

/// Edges that carry `attribute` with a value matching `value`.
///
/// `edge_type` can be queried like any other attribute, with its canonical
/// string as value. `attribute == None` yields every edge.
pub fn select_edges_by_attribute<'a>(
    graph: &'a AnnotationGraph,
    attribute: Option<&'a str>,
    value: impl Into<ValueFilter>,
) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
    edges_by_attribute(graph, attribute, value.into())
}

fn edges_by_attribute<'a>(
    graph: &'a AnnotationGraph,
    attribute: Option<&'a str>,
    filter: ValueFilter,
) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
    graph.edges().filter(move |edge| match attribute {
        None => true,
        Some(name) => edge
            .data
            .attribute_value(name)
            .is_some_and(|v| filter.matches(&v)),
    })
}

// ============================================================================
// Neighbors
// ============================================================================

/// Distinct successors of `node` whose layer set intersects the filter.
pub fn select_neighbors_by_layer<'a>(
    graph: &'a AnnotationGraph,
    node: &NodeId,
    layer: impl Into<LayerFilter>,
) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    neighbors_by_layer(graph, node, layer.into())
}

fn neighbors_by_layer<'a>(
    graph: &'a AnnotationGraph,
    node: &NodeId,
    filter: LayerFilter,
) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    graph
        .successors(node)
        .filter_map(move |id| graph.node(id).map(|data| NodeRef { id, data }))
        .filter(move |neighbor| filter.matches(&neighbor.data.layers))
}

/// Distinct successors of `source` connected by at least one edge whose
/// `attribute` matches `value`.
pub fn select_neighbors_by_edge_attribute<'a>(
    graph: &'a AnnotationGraph,
    source: &NodeId,
    attribute: &'a str,
    value: impl Into<ValueFilter>,
) -> impl Iterator<Item = &'a NodeId> + 'a {
    neighbors_by_edge_attribute(graph, source, attribute, value.into())
}

fn neighbors_by_edge_attribute<'a>(
    graph: &'a AnnotationGraph,
    source: &NodeId,
    attribute: &'a str,
    filter: ValueFilter,
) -> impl Iterator<Item = &'a NodeId> + 'a {
    let mut seen: Vec<&'a NodeId> = Vec::new();
    graph.out_edges(source).filter_map(move |edge| {
        let matches = edge
            .data
            .attribute_value(attribute)
            .is_some_and(|v| filter.matches(&v));
        if matches && !seen.contains(&edge.target) {
            seen.push(edge.target);
            Some(edge.target)
        } else {
            None
        }
    })
}
