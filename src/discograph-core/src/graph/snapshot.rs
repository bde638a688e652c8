//! Serialized form of an annotation graph.
//!
//! Node IDs are not valid JSON object keys, so the graph is written as flat
//! node and edge lists and rebuilt, with validation, on the way back in.

use common_config::GraphConfig;
use common_error::{DiscographError, DiscographResult, ensure};
use serde::{Deserialize, Serialize};

use super::container::AnnotationGraph;
use super::edge::EdgeData;
use super::identifiers::{EdgeKey, GraphFormat, NodeId};
use super::node::NodeData;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    name: String,
    namespace: String,
    root: NodeId,
    #[serde(default)]
    format: GraphFormat,
    #[serde(default)]
    strict_edges: bool,
    token_attribute: String,
    #[serde(default)]
    tokens: Vec<NodeId>,
    #[serde(default)]
    sentences: Vec<NodeId>,
    #[serde(default)]
    renamed_nodes: Vec<(NodeId, NodeId)>,
    #[serde(default)]
    merged_rootnodes: Vec<NodeId>,
    nodes: Vec<SnapshotNode>,
    #[serde(default)]
    edges: Vec<SnapshotEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotNode {
    id: NodeId,
    #[serde(flatten)]
    data: NodeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotEdge {
    source: NodeId,
    target: NodeId,
    key: EdgeKey,
    #[serde(flatten)]
    data: EdgeData,
}

impl From<AnnotationGraph> for GraphSnapshot {
    fn from(graph: AnnotationGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| SnapshotNode {
                id: node.id.clone(),
                data: node.data.clone(),
            })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| SnapshotEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                key: edge.key,
                data: edge.data.clone(),
            })
            .collect();
        let mut renamed_nodes: Vec<_> = graph
            .renamed_nodes()
            .iter()
            .map(|(old, new)| (old.clone(), new.clone()))
            .collect();
        renamed_nodes.sort();

        Self {
            name: graph.name().to_string(),
            namespace: graph.namespace().to_string(),
            root: graph.root().clone(),
            format: graph.format().clone(),
            strict_edges: graph.strict_edges(),
            token_attribute: graph.token_attribute().to_string(),
            merged_rootnodes: graph.merged_rootnodes().to_vec(),
            tokens: graph.tokens,
            sentences: graph.sentences,
            renamed_nodes,
            nodes,
            edges,
        }
    }
}

impl TryFrom<GraphSnapshot> for AnnotationGraph {
    type Error = DiscographError;

    fn try_from(snapshot: GraphSnapshot) -> DiscographResult<Self> {
        let config = GraphConfig {
            namespace: snapshot.namespace,
            name: snapshot.name,
            root_id: None,
            strict_edges: true,
            token_attribute: snapshot.token_attribute,
        };
        let mut graph = Self::from_parts(&config, snapshot.format);
        graph.set_root(snapshot.root.clone());

        for node in snapshot.nodes {
            ensure!(
                !node.data.layers.is_empty(),
                ContractViolation: "node '{}' has no layers",
                node.id
            );
            graph.add_node_data(node.id, node.data)?;
        }
        ensure!(
            graph.has_node(&snapshot.root),
            GraphError: "root node '{}' is missing",
            snapshot.root
        );
        for edge in snapshot.edges {
            ensure!(
                !edge.data.layers.is_empty(),
                ContractViolation: "edge {} -> {} has no layers",
                edge.source,
                edge.target
            );
            graph.add_edge_with(edge.source, edge.target, Some(edge.key), edge.data)?;
        }
        for id in snapshot.tokens.iter().chain(&snapshot.sentences) {
            if !graph.has_node(id) {
                return Err(DiscographError::node_not_found(id));
            }
        }

        graph.tokens = snapshot.tokens;
        graph.sentences = snapshot.sentences;
        graph.renamed_nodes_mut().extend(snapshot.renamed_nodes);
        graph.merged_rootnodes_mut().extend(snapshot.merged_rootnodes);
        graph.set_strict_edges(snapshot.strict_edges);
        Ok(graph)
    }
}

impl AnnotationGraph {
    /// Serialize the graph to a JSON string.
    pub fn to_json(&self) -> DiscographResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the graph to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DiscographResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild a graph from JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> DiscographResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
