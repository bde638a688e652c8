//! Annotation graph container - the canonical user-facing abstraction.
//!
//! An [`AnnotationGraph`] is a directed multigraph whose nodes and edges
//! carry annotation layers and attributes. It owns the ordered token list of
//! the annotated document and a root node holding document metadata.

use std::collections::{BTreeMap, HashMap};

use common_config::{DEFAULT_NAMESPACE, GraphConfig};
use common_error::{DiscographError, DiscographResult, contract_err};
use serde::{Deserialize, Serialize};

use super::attributes::{AttributeMap, collect_layers, validate_attribute_key, validate_attributes};
use super::edge::{EdgeData, EdgeRecord, EdgeRef};
use super::identifiers::{EdgeKey, EdgeType, GraphFormat, NodeId};
use super::node::{NodeData, NodeRef};
use super::snapshot::GraphSnapshot;
use crate::types::Value;

/// Attribute key of the metadata map on root nodes.
pub const METADATA_KEY: &str = "metadata";

/// Storage for a single node and its incident edges.
#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub(crate) data: NodeData,
    /// Successors in first-insertion order.
    pub(crate) targets: Vec<NodeId>,
    pub(crate) out: HashMap<NodeId, BTreeMap<EdgeKey, EdgeData>>,
    /// Predecessors in first-insertion order.
    pub(crate) sources: Vec<NodeId>,
}

impl NodeEntry {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            targets: Vec::new(),
            out: HashMap::new(),
            sources: Vec::new(),
        }
    }
}

/// Element whose layer set is extended by [`AnnotationGraph::add_layer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerTarget {
    /// A node.
    Node(NodeId),
    /// Edges from `source` to `target`. Without a key every parallel edge
    /// between the pair receives the layer.
    Edge {
        source: NodeId,
        target: NodeId,
        key: Option<EdgeKey>,
    },
}

/// A layer-aware directed multigraph over one annotated document.
///
/// ## Invariants
///
/// - every node and edge belongs to at least one layer
/// - layer sets only grow; re-adding an element unions layers
/// - the root node exists and carries a `metadata` map
/// - every ID in `tokens` and `sentences` is a node of the graph
///
/// ## Example
///
/// ```rust
/// use discograph_core::{AnnotationGraph, AttributeMap, EdgeType};
///
/// let mut graph = AnnotationGraph::new("tiger");
/// graph.add_node("s1", ["tiger", "tiger:sentence"], AttributeMap::new()).unwrap();
/// graph.add_edge(graph.root().clone(), "s1", ["tiger"], Some(EdgeType::Dominance)).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "GraphSnapshot", try_from = "GraphSnapshot")]
pub struct AnnotationGraph {
    name: String,
    namespace: String,
    root: NodeId,
    format: GraphFormat,
    /// Token node IDs in document order. Importers append as they go.
    pub tokens: Vec<NodeId>,
    /// Sentence node IDs in document order, if the format has sentences.
    pub sentences: Vec<NodeId>,
    renamed_nodes: HashMap<NodeId, NodeId>,
    merged_rootnodes: Vec<NodeId>,
    strict_edges: bool,
    token_attribute: String,
    /// Node IDs in insertion order.
    pub(crate) order: Vec<NodeId>,
    pub(crate) nodes: HashMap<NodeId, NodeEntry>,
}

impl AnnotationGraph {
    /// Create an empty graph in the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::from_config(&GraphConfig::with_namespace(namespace))
    }

    /// Create an empty, named graph in the given namespace.
    pub fn with_name(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::from_config(&GraphConfig {
            name: name.into(),
            ..GraphConfig::with_namespace(namespace)
        })
    }

    /// Create an empty graph from a config. Only the root node exists.
    pub fn from_config(config: &GraphConfig) -> Self {
        let root = NodeId::from(config.resolved_root_id());
        let mut graph = Self {
            name: config.name.clone(),
            namespace: config.namespace.clone(),
            root: root.clone(),
            format: GraphFormat::Generic,
            tokens: Vec::new(),
            sentences: Vec::new(),
            renamed_nodes: HashMap::new(),
            merged_rootnodes: Vec::new(),
            strict_edges: config.strict_edges,
            token_attribute: config.token_attribute.clone(),
            order: Vec::new(),
            nodes: HashMap::new(),
        };
        let data = NodeData::new([config.namespace.clone()])
            .with_attribute(METADATA_KEY, Value::empty_map());
        graph.insert_node(root, data);
        graph
    }

    /// Reassemble a graph from deserialized parts.
    pub(crate) fn from_parts(config: &GraphConfig, format: GraphFormat) -> Self {
        let mut graph = Self::from_config(config);
        graph.format = format;
        graph.order.clear();
        graph.nodes.clear();
        graph
    }

    // ========================================================================
    // Graph properties
    // ========================================================================

    /// Get the document name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the document name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the default namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the root node ID.
    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Get the format tag.
    pub fn format(&self) -> &GraphFormat {
        &self.format
    }

    /// Set the format tag.
    pub fn set_format(&mut self, format: GraphFormat) {
        self.format = format;
    }

    /// Whether edges to unknown nodes are rejected.
    pub fn strict_edges(&self) -> bool {
        self.strict_edges
    }

    /// Reject or allow edges to unknown nodes.
    pub fn set_strict_edges(&mut self, strict: bool) {
        self.strict_edges = strict;
    }

    /// Local name of the token string attribute.
    pub fn token_attribute(&self) -> &str {
        &self.token_attribute
    }

    /// Old-to-new node ID mapping accumulated by relabeling and merging.
    pub fn renamed_nodes(&self) -> &HashMap<NodeId, NodeId> {
        &self.renamed_nodes
    }

    pub(crate) fn renamed_nodes_mut(&mut self) -> &mut HashMap<NodeId, NodeId> {
        &mut self.renamed_nodes
    }

    /// Root node IDs of all graphs merged into this one.
    pub fn merged_rootnodes(&self) -> &[NodeId] {
        &self.merged_rootnodes
    }

    pub(crate) fn merged_rootnodes_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.merged_rootnodes
    }

    /// Construction parameters equivalent to this graph's.
    pub fn config(&self) -> GraphConfig {
        GraphConfig {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            root_id: Some(self.root.to_string()),
            strict_edges: self.strict_edges,
            token_attribute: self.token_attribute.clone(),
        }
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Get the number of edges, counting parallel edges separately.
    pub fn edge_count(&self) -> usize {
        self.nodes
            .values()
            .flat_map(|entry| entry.out.values())
            .map(BTreeMap::len)
            .sum()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Check if a node exists.
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node's data.
    pub fn node(&self, id: &NodeId) -> Option<&NodeData> {
        self.nodes.get(id).map(|entry| &entry.data)
    }

    /// Get a node's data or fail with `NodeNotFound`.
    pub fn node_data(&self, id: &NodeId) -> DiscographResult<&NodeData> {
        self.node(id)
            .ok_or_else(|| DiscographError::node_not_found(id))
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.order.iter().filter_map(move |id| {
            self.nodes
                .get(id)
                .map(|entry| NodeRef { id, data: &entry.data })
        })
    }

    /// Iterate over all node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.order.iter()
    }

    /// Add a node or extend an existing one.
    ///
    /// An empty `layers` iterator puts a new node into the default namespace
    /// layer. On an existing node the layers are unioned in and the
    /// attributes overwrite key by key.
    pub fn add_node<I, S>(
        &mut self,
        id: impl Into<NodeId>,
        layers: I,
        attributes: AttributeMap,
    ) -> DiscographResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layers = collect_layers(layers, &self.namespace)?;
        validate_attributes(&attributes)?;
        self.insert_node(id.into(), NodeData { layers, attributes });
        Ok(())
    }

    /// Add a node given as `NodeData`, with the same merge rules as [`add_node`].
    ///
    /// [`add_node`]: Self::add_node
    pub fn add_node_data(&mut self, id: impl Into<NodeId>, data: NodeData) -> DiscographResult<()> {
        self.add_node(id, data.layers, data.attributes)
    }

    /// Add several nodes.
    pub fn add_nodes_from<I, N>(&mut self, nodes: I) -> DiscographResult<()>
    where
        I: IntoIterator<Item = (N, NodeData)>,
        N: Into<NodeId>,
    {
        for (id, data) in nodes {
            self.add_node_data(id, data)?;
        }
        Ok(())
    }

    /// Set a single attribute on an existing node.
    pub fn set_node_attribute(
        &mut self,
        id: &NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> DiscographResult<()> {
        let key = key.into();
        validate_attribute_key(&key)?;
        let entry = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DiscographError::node_not_found(id))?;
        entry.data.attributes.insert(key, value.into());
        Ok(())
    }

    /// Remove a node together with all incident edges.
    ///
    /// The node is also dropped from `tokens` and `sentences`. The root node
    /// cannot be removed.
    pub fn remove_node(&mut self, id: &NodeId) -> DiscographResult<NodeData> {
        if *id == self.root {
            contract_err!("the root node '{}' cannot be removed", id);
        }
        let entry = self
            .nodes
            .remove(id)
            .ok_or_else(|| DiscographError::node_not_found(id))?;
        self.order.retain(|n| n != id);

        for target in entry.targets.iter().filter(|t| *t != id) {
            if let Some(neighbor) = self.nodes.get_mut(target) {
                neighbor.sources.retain(|s| s != id);
            }
        }
        for source in entry.sources.iter().filter(|s| *s != id) {
            if let Some(neighbor) = self.nodes.get_mut(source) {
                neighbor.out.remove(id);
                neighbor.targets.retain(|t| t != id);
            }
        }
        self.tokens.retain(|t| t != id);
        self.sentences.retain(|s| s != id);
        Ok(entry.data)
    }

    pub(crate) fn insert_node(&mut self, id: NodeId, data: NodeData) {
        match self.nodes.get_mut(&id) {
            Some(entry) => entry.data.absorb(data),
            None => {
                self.order.push(id.clone());
                self.nodes.insert(id, NodeEntry::new(data));
            }
        }
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Add an edge with a freshly allocated key.
    ///
    /// Returns the key of the new edge. Missing endpoints are created in the
    /// default namespace layer unless the graph is strict.
    pub fn add_edge<I, S>(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        layers: I,
        edge_type: Option<EdgeType>,
    ) -> DiscographResult<EdgeKey>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data = EdgeData {
            layers: collect_layers(layers, &self.namespace)?,
            edge_type,
            attributes: AttributeMap::new(),
        };
        self.add_edge_with(source, target, None, data)
    }

    /// Add an edge with full control over key and data.
    ///
    /// With `key == None` the key is allocated as the number of existing
    /// parallel edges, incremented until unused. With an explicit key that
    /// already exists, layers are unioned and attributes overwritten.
    pub fn add_edge_with(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        key: Option<EdgeKey>,
        data: EdgeData,
    ) -> DiscographResult<EdgeKey> {
        let source = source.into();
        let target = target.into();
        let layers = collect_layers(data.layers, &self.namespace)?;
        validate_attributes(&data.attributes)?;
        let data = EdgeData { layers, ..data };

        self.ensure_endpoint(&source)?;
        self.ensure_endpoint(&target)?;
        self.insert_edge(source, target, key, data)
    }

    /// Add several edges, returning their keys.
    pub fn add_edges_from(
        &mut self,
        edges: impl IntoIterator<Item = EdgeRecord>,
    ) -> DiscographResult<Vec<EdgeKey>> {
        edges
            .into_iter()
            .map(|record| self.add_edge_with(record.source, record.target, record.key, record.data))
            .collect()
    }

    fn ensure_endpoint(&mut self, id: &NodeId) -> DiscographResult<()> {
        if self.nodes.contains_key(id) {
            return Ok(());
        }
        if self.strict_edges {
            return Err(DiscographError::node_not_found(id));
        }
        log::debug!("implicitly adding edge endpoint '{id}' to graph '{}'", self.name);
        let data = NodeData::new([self.namespace.clone()]);
        self.insert_node(id.clone(), data);
        Ok(())
    }

    /// Insert an edge between existing nodes.
    pub(crate) fn insert_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        key: Option<EdgeKey>,
        data: EdgeData,
    ) -> DiscographResult<EdgeKey> {
        if !self.nodes.contains_key(&target) {
            return Err(DiscographError::node_not_found(&target));
        }
        let entry = self
            .nodes
            .get_mut(&source)
            .ok_or_else(|| DiscographError::node_not_found(&source))?;

        let new_pair = !entry.out.contains_key(&target);
        if new_pair {
            entry.targets.push(target.clone());
        }
        let keydict = entry.out.entry(target.clone()).or_default();
        let key = key.unwrap_or_else(|| next_free_key(keydict));
        match keydict.get_mut(&key) {
            Some(existing) => existing.absorb(data),
            None => {
                keydict.insert(key, data);
            }
        }

        if new_pair {
            if let Some(target_entry) = self.nodes.get_mut(&target) {
                target_entry.sources.push(source);
            }
        }
        Ok(key)
    }

    /// Remove one parallel edge.
    ///
    /// Without a key, the edge with the highest key is removed.
    pub fn remove_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        key: Option<EdgeKey>,
    ) -> DiscographResult<EdgeData> {
        let not_found = || DiscographError::edge_not_found(source, target);
        let entry = self.nodes.get_mut(source).ok_or_else(not_found)?;
        let keydict = entry.out.get_mut(target).ok_or_else(not_found)?;
        let key = match key {
            Some(key) => key,
            None => *keydict.keys().next_back().ok_or_else(not_found)?,
        };
        let data = keydict.remove(&key).ok_or_else(not_found)?;

        if keydict.is_empty() {
            entry.out.remove(target);
            entry.targets.retain(|t| t != target);
            if let Some(target_entry) = self.nodes.get_mut(target) {
                target_entry.sources.retain(|s| s != source);
            }
        }
        Ok(data)
    }

    /// Check if at least one edge runs from `source` to `target`.
    pub fn has_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.nodes
            .get(source)
            .is_some_and(|entry| entry.out.contains_key(target))
    }

    /// Get a single parallel edge.
    pub fn edge(&self, source: &NodeId, target: &NodeId, key: EdgeKey) -> Option<&EdgeData> {
        self.nodes
            .get(source)
            .and_then(|entry| entry.out.get(target))
            .and_then(|keydict| keydict.get(&key))
    }

    /// Iterate over the parallel edges from `source` to `target`.
    pub fn edges_between<'a>(
        &'a self,
        source: &NodeId,
        target: &NodeId,
    ) -> impl Iterator<Item = (EdgeKey, &'a EdgeData)> + 'a {
        self.nodes
            .get(source)
            .and_then(|entry| entry.out.get(target))
            .into_iter()
            .flat_map(|keydict| keydict.iter().map(|(key, data)| (*key, data)))
    }

    /// Iterate over all edges, grouped by source in node insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.order.iter().flat_map(move |id| self.out_edges(id))
    }

    /// Iterate over the outgoing edges of a node. Unknown nodes yield nothing.
    pub fn out_edges<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
        self.nodes
            .get_key_value(node)
            .into_iter()
            .flat_map(|(source, entry)| {
                entry.targets.iter().flat_map(move |target| {
                    entry.out.get(target).into_iter().flat_map(move |keydict| {
                        keydict.iter().map(move |(key, data)| EdgeRef {
                            source,
                            target,
                            key: *key,
                            data,
                        })
                    })
                })
            })
    }

    /// Iterate over the incoming edges of a node. Unknown nodes yield nothing.
    pub fn in_edges<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
        self.nodes
            .get_key_value(node)
            .into_iter()
            .flat_map(move |(target, entry)| {
                entry
                    .sources
                    .iter()
                    .filter_map(move |source| {
                        self.nodes
                            .get(source)
                            .and_then(|s| s.out.get(target))
                            .map(|keydict| (source, keydict))
                    })
                    .flat_map(move |(source, keydict)| {
                        keydict.iter().map(move |(key, data)| EdgeRef {
                            source,
                            target,
                            key: *key,
                            data,
                        })
                    })
            })
    }

    /// Distinct successors of a node in first-insertion order.
    pub fn successors<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|entry| entry.targets.iter())
    }

    /// Distinct predecessors of a node in first-insertion order.
    pub fn predecessors<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|entry| entry.sources.iter())
    }

    /// Number of outgoing edges.
    pub fn out_degree(&self, node: &NodeId) -> usize {
        self.out_edges(node).count()
    }

    /// Number of incoming edges.
    pub fn in_degree(&self, node: &NodeId) -> usize {
        self.in_edges(node).count()
    }

    // ========================================================================
    // Layers and metadata
    // ========================================================================

    /// Add a layer to an existing node or edge.
    pub fn add_layer(&mut self, target: &LayerTarget, layer: impl Into<String>) -> DiscographResult<()> {
        let layer = layer.into();
        if layer.trim().is_empty() {
            contract_err!("layer names must be non-empty strings");
        }
        match target {
            LayerTarget::Node(id) => {
                let entry = self
                    .nodes
                    .get_mut(id)
                    .ok_or_else(|| DiscographError::node_not_found(id))?;
                entry.data.layers.insert(layer);
            }
            LayerTarget::Edge {
                source,
                target,
                key,
            } => {
                let keydict = self
                    .nodes
                    .get_mut(source)
                    .and_then(|entry| entry.out.get_mut(target))
                    .filter(|keydict| !keydict.is_empty())
                    .ok_or_else(|| DiscographError::edge_not_found(source, target))?;
                match key {
                    Some(key) => {
                        let data = keydict
                            .get_mut(key)
                            .ok_or_else(|| DiscographError::edge_not_found(source, target))?;
                        data.layers.insert(layer);
                    }
                    None => {
                        for data in keydict.values_mut() {
                            data.layers.insert(layer.clone());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Metadata map of the root node.
    pub fn metadata(&self) -> Option<&BTreeMap<String, Value>> {
        self.node(&self.root)
            .and_then(|data| data.attributes.get(METADATA_KEY))
            .and_then(Value::as_map)
    }

    /// Set one metadata entry on the root node.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) -> DiscographResult<()> {
        self.metadata_mut()?.insert(key.into(), value.into());
        Ok(())
    }

    pub(crate) fn metadata_mut(&mut self) -> DiscographResult<&mut BTreeMap<String, Value>> {
        let root = self.root.clone();
        let entry = self
            .nodes
            .get_mut(&root)
            .ok_or_else(|| DiscographError::internal(format!("root node '{root}' is missing")))?;
        let metadata = entry
            .data
            .attributes
            .entry(METADATA_KEY.to_string())
            .or_insert_with(Value::empty_map);
        if !matches!(metadata, Value::Map(_)) {
            *metadata = Value::empty_map();
        }
        metadata
            .as_map_mut()
            .ok_or_else(|| DiscographError::internal("root metadata is not a map"))
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }
}

impl Default for AnnotationGraph {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

fn next_free_key(keydict: &BTreeMap<EdgeKey, EdgeData>) -> EdgeKey {
    let mut key = keydict.len() as EdgeKey;
    while keydict.contains_key(&key) {
        key += 1;
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::HasAttributes;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_graph_creation() {
        let graph = AnnotationGraph::new("tiger");
        assert_eq!(graph.namespace(), "tiger");
        assert_eq!(graph.root(), &id("tiger:root_node"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.metadata().is_some_and(BTreeMap::is_empty));
        assert!(graph.tokens.is_empty());

        let root = graph.node(graph.root()).unwrap();
        assert!(root.in_layer("tiger"));
    }

    #[test]
    fn test_default_graph() {
        let graph = AnnotationGraph::default();
        assert_eq!(graph.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(graph.root(), &id("discoursegraph:root_node"));
        assert_eq!(graph.format(), &GraphFormat::Generic);
    }

    #[test]
    fn test_add_node_default_layer() {
        let mut graph = AnnotationGraph::new("ns");
        graph
            .add_node("a", Vec::<String>::new(), AttributeMap::new())
            .unwrap();
        let layers: Vec<_> = graph.node(&id("a")).unwrap().layers.iter().collect();
        assert_eq!(layers, vec!["ns"]);
    }

    #[test]
    fn test_add_node_unions_layers() {
        let mut graph = AnnotationGraph::new("ns");
        let mut attrs = AttributeMap::new();
        attrs.insert("pos".to_string(), Value::from("NN"));
        graph.add_node("a", ["x"], attrs).unwrap();

        let mut attrs = AttributeMap::new();
        attrs.insert("pos".to_string(), Value::from("NE"));
        attrs.insert("lemma".to_string(), Value::from("Berlin"));
        graph.add_node("a", ["y"], attrs).unwrap();

        let data = graph.node(&id("a")).unwrap();
        assert!(data.in_layer("x") && data.in_layer("y"));
        assert_eq!(data.get_attribute("pos"), Some(&Value::from("NE")));
        assert_eq!(data.get_attribute("lemma"), Some(&Value::from("Berlin")));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_add_node_contract_violations() {
        let mut graph = AnnotationGraph::new("ns");
        let err = graph.add_node("a", [""], AttributeMap::new()).unwrap_err();
        assert!(err.is_contract_violation());

        let mut attrs = AttributeMap::new();
        attrs.insert("layers".to_string(), Value::from("x"));
        assert!(graph.add_node("a", ["x"], attrs).is_err());
        assert!(!graph.has_node(&id("a")));
    }

    #[test]
    fn test_edge_key_allocation() {
        let mut graph = AnnotationGraph::new("ns");
        let k0 = graph.add_edge("a", "b", ["ns"], None).unwrap();
        let k1 = graph.add_edge("a", "b", ["ns"], None).unwrap();
        assert_eq!((k0, k1), (0, 1));
        assert_eq!(graph.edge_count(), 2);

        // only key 1 exists: the next free key after len() == 1 is 2
        let mut graph = AnnotationGraph::new("ns");
        graph
            .add_edge_with("a", "b", Some(1), EdgeData::new(["ns"]))
            .unwrap();
        let key = graph.add_edge("a", "b", ["ns"], None).unwrap();
        assert_eq!(key, 2);
    }

    #[test]
    fn test_add_edge_same_key_unions_layers() {
        let mut graph = AnnotationGraph::new("ns");
        graph
            .add_edge_with("a", "b", Some(0), EdgeData::new(["x"]).with_attribute("w", 1i64))
            .unwrap();
        graph
            .add_edge_with("a", "b", Some(0), EdgeData::new(["y"]).with_attribute("w", 2i64))
            .unwrap();
        assert_eq!(graph.edge_count(), 1);
        let data = graph.edge(&id("a"), &id("b"), 0).unwrap();
        assert!(data.in_layer("x") && data.in_layer("y"));
        assert_eq!(data.get_attribute("w"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_implicit_and_strict_endpoints() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_edge("a", "b", ["x"], Some(EdgeType::Dominance)).unwrap();
        assert!(graph.node(&id("a")).unwrap().in_layer("ns"));

        graph.set_strict_edges(true);
        let err = graph.add_edge("a", "c", ["x"], None).unwrap_err();
        assert!(matches!(err, DiscographError::NodeNotFound(_)));
        assert!(!graph.has_node(&id("c")));
    }

    #[test]
    fn test_adjacency_queries() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_edge("a", "b", ["ns"], None).unwrap();
        graph.add_edge("a", "c", ["ns"], None).unwrap();
        graph.add_edge("a", "b", ["ns"], None).unwrap();
        graph.add_edge("c", "b", ["ns"], None).unwrap();

        let succ: Vec<_> = graph.successors(&id("a")).cloned().collect();
        assert_eq!(succ, vec![id("b"), id("c")]);
        let pred: Vec<_> = graph.predecessors(&id("b")).cloned().collect();
        assert_eq!(pred, vec![id("a"), id("c")]);
        assert_eq!(graph.out_degree(&id("a")), 3);
        assert_eq!(graph.in_degree(&id("b")), 3);
        assert_eq!(graph.edges().count(), 4);
        assert_eq!(graph.out_edges(&id("missing")).count(), 0);
        assert!(graph.has_edge(&id("c"), &id("b")));
        assert!(!graph.has_edge(&id("b"), &id("c")));
    }

    #[test]
    fn test_remove_node() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_edge("a", "b", ["ns"], None).unwrap();
        graph.add_edge("b", "c", ["ns"], None).unwrap();
        graph.add_edge("b", "b", ["ns"], None).unwrap();
        graph.tokens.push(id("b"));

        graph.remove_node(&id("b")).unwrap();
        assert!(!graph.has_node(&id("b")));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.successors(&id("a")).count(), 0);
        assert_eq!(graph.predecessors(&id("c")).count(), 0);
        assert!(graph.tokens.is_empty());

        let root = graph.root().clone();
        assert!(graph.remove_node(&root).unwrap_err().is_contract_violation());
        assert!(graph.remove_node(&id("zzz")).is_err());
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_edge("a", "b", ["ns"], None).unwrap();
        graph.add_edge("a", "b", ["ns"], Some(EdgeType::Pointing)).unwrap();

        let removed = graph.remove_edge(&id("a"), &id("b"), None).unwrap();
        assert!(removed.is_type(EdgeType::Pointing));
        assert!(graph.has_edge(&id("a"), &id("b")));

        graph.remove_edge(&id("a"), &id("b"), Some(0)).unwrap();
        assert!(!graph.has_edge(&id("a"), &id("b")));
        assert_eq!(graph.predecessors(&id("b")).count(), 0);
        assert!(matches!(
            graph.remove_edge(&id("a"), &id("b"), None),
            Err(DiscographError::EdgeNotFound { .. })
        ));
    }

    #[test]
    fn test_add_layer() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_node("n1", ["foo"], AttributeMap::new()).unwrap();
        graph.add_layer(&LayerTarget::Node(id("n1")), "bar").unwrap();
        assert!(graph.node(&id("n1")).unwrap().in_layer("bar"));

        let key = graph.add_edge("n1", "n2", ["foo"], None).unwrap();
        let target = LayerTarget::Edge {
            source: id("n1"),
            target: id("n2"),
            key: Some(key),
        };
        graph.add_layer(&target, "bar").unwrap();
        assert!(graph.edge(&id("n1"), &id("n2"), key).unwrap().in_layer("bar"));

        assert!(graph.add_layer(&LayerTarget::Node(id("n9")), "x").is_err());
        assert!(graph.add_layer(&LayerTarget::Node(id("n1")), "").is_err());
    }

    #[test]
    fn test_add_layer_to_all_parallel_edges() {
        let mut graph = AnnotationGraph::new("ns");
        let first = graph.add_edge("a", "b", ["ns"], None).unwrap();
        let second = graph.add_edge("a", "b", ["ns"], None).unwrap();
        assert_ne!(first, second);

        let target = LayerTarget::Edge {
            source: id("a"),
            target: id("b"),
            key: None,
        };
        graph.add_layer(&target, "fake").unwrap();
        let carrying: Vec<bool> = graph
            .edges_between(&id("a"), &id("b"))
            .map(|(_, data)| data.in_layer("fake"))
            .collect();
        assert_eq!(carrying, vec![true, true]);

        let missing = LayerTarget::Edge {
            source: id("b"),
            target: id("a"),
            key: None,
        };
        assert!(matches!(
            graph.add_layer(&missing, "fake"),
            Err(DiscographError::EdgeNotFound { .. })
        ));
        let unknown_key = LayerTarget::Edge {
            source: id("a"),
            target: id("b"),
            key: Some(9),
        };
        assert!(graph.add_layer(&unknown_key, "fake").is_err());
    }

    #[test]
    fn test_metadata() {
        let mut graph = AnnotationGraph::new("ns");
        graph.set_metadata("author", "Kennedy").unwrap();
        assert_eq!(
            graph.metadata().and_then(|m| m.get("author")),
            Some(&Value::from("Kennedy"))
        );
    }

    #[test]
    fn test_set_node_attribute() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_node("a", ["ns"], AttributeMap::new()).unwrap();
        graph.set_node_attribute(&id("a"), "ns:onset", 0i64).unwrap();
        assert!(graph.node(&id("a")).unwrap().has_attribute("ns:onset"));
        assert!(graph.set_node_attribute(&id("a"), "edge_type", 0i64).is_err());
        assert!(graph.set_node_attribute(&id("b"), "k", 0i64).is_err());
    }
}
