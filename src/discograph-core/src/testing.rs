//! Testing utilities and helpers for discograph-core.
//!
//! This module provides graph fixtures for common annotation scenarios and
//! chainable assertions over annotation graphs.

use crate::graph::{AnnotationGraph, AttributeMap, EdgeType, HasAttributes, NodeId};
use crate::types::Value;

/// Test fixture builder for creating common annotation graph scenarios.
pub struct GraphFixture {
    graph: AnnotationGraph,
}

impl GraphFixture {
    /// Create a new fixture holding an empty graph.
    pub fn new(namespace: &str) -> Self {
        Self {
            graph: AnnotationGraph::new(namespace),
        }
    }

    /// Create a fixture with bare token nodes `<ns>:t0`, `<ns>:t1`, ...
    ///
    /// Tokens live in the layers `<ns>` and `<ns>:token` and carry their
    /// string in `<ns>:token`. No edges are added.
    pub fn tokens(namespace: &str, tokens: &[&str]) -> Self {
        let mut fixture = Self::new(namespace);
        for (i, token) in tokens.iter().enumerate() {
            let id = NodeId::from(format!("{namespace}:t{i}"));
            fixture.add_token(id, namespace, token);
        }
        fixture
    }

    /// Create a fixture with one sentence `<ns>:s0` dominating all tokens.
    ///
    /// The root dominates the sentence, so the whole graph is a tree.
    pub fn sentence(namespace: &str, tokens: &[&str]) -> Self {
        let mut fixture = Self::tokens(namespace, tokens);
        let sentence = NodeId::from(format!("{namespace}:s0"));
        fixture.add_node(
            sentence.clone(),
            [namespace.to_string(), format!("{namespace}:sentence")],
        );
        let root = fixture.graph.root().clone();
        fixture.dominates(root, sentence.clone());
        for token in fixture.graph.tokens.clone() {
            fixture.dominates(sentence.clone(), token);
        }
        fixture.graph.sentences.push(sentence);
        fixture
    }

    /// Create the syntax tree of "I saw a cat ." in namespace `ns`.
    ///
    /// ```text
    /// s -> tok0, vp, tok4
    /// vp -> tok1, np
    /// np -> tok2, tok3
    /// ```
    ///
    /// The root is not connected to `s`.
    pub fn flat_tree() -> Self {
        let mut fixture = Self::new("ns");
        for (i, token) in ["I", "saw", "a", "cat", "."].iter().enumerate() {
            fixture.add_token(NodeId::from(format!("tok{i}")), "ns", token);
        }
        for node in ["s", "vp", "np"] {
            fixture.add_node(node, ["ns", "ns:cat"]);
        }
        for (source, target) in [
            ("s", "tok0"),
            ("s", "vp"),
            ("vp", "tok1"),
            ("vp", "np"),
            ("np", "tok2"),
            ("np", "tok3"),
            ("s", "tok4"),
        ] {
            fixture.dominates(source, target);
        }
        fixture
    }

    /// Add a token node and append it to the token list.
    pub fn add_token(&mut self, id: impl Into<NodeId>, namespace: &str, token: &str) {
        let id = id.into();
        let mut attributes = AttributeMap::new();
        attributes.insert(format!("{namespace}:token"), Value::from(token));
        self.graph
            .add_node(
                id.clone(),
                [namespace.to_string(), format!("{namespace}:token")],
                attributes,
            )
            .expect("fixture token is valid");
        self.graph.tokens.push(id);
    }

    /// Add an attribute-less node.
    pub fn add_node<I, S>(&mut self, id: impl Into<NodeId>, layers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.graph
            .add_node(id, layers, AttributeMap::new())
            .expect("fixture node is valid");
    }

    /// Add a dominance edge in the graph's namespace.
    pub fn dominates(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.relate(source, target, EdgeType::Dominance);
    }

    /// Add a pointing edge in the graph's namespace.
    pub fn points_to(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.relate(source, target, EdgeType::Pointing);
    }

    fn relate(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>, edge_type: EdgeType) {
        let namespace = self.graph.namespace().to_string();
        self.graph
            .add_edge(source, target, [namespace], Some(edge_type))
            .expect("fixture edge is valid");
    }

    /// Get the graph.
    pub const fn graph(&self) -> &AnnotationGraph {
        &self.graph
    }

    /// Get the graph mutably.
    pub fn graph_mut(&mut self) -> &mut AnnotationGraph {
        &mut self.graph
    }

    /// Consume the fixture, returning the graph.
    pub fn into_graph(self) -> AnnotationGraph {
        self.graph
    }
}

/// Assertion helpers for testing annotation graphs.
///
/// Every assertion returns the helper for chaining; bind the end of a chain
/// with `let _ =`.
pub struct GraphAssertions<'a> {
    graph: &'a AnnotationGraph,
}

impl<'a> GraphAssertions<'a> {
    /// Create new assertions for a graph.
    pub const fn new(graph: &'a AnnotationGraph) -> Self {
        Self { graph }
    }

    /// Assert that the graph has the expected number of nodes.
    #[must_use]
    pub fn assert_node_count(self, expected: usize) -> Self {
        assert_eq!(
            self.graph.node_count(),
            expected,
            "Expected {} nodes, found {}",
            expected,
            self.graph.node_count()
        );
        self
    }

    /// Assert that the graph has the expected number of edges.
    #[must_use]
    pub fn assert_edge_count(self, expected: usize) -> Self {
        assert_eq!(
            self.graph.edge_count(),
            expected,
            "Expected {} edges, found {}",
            expected,
            self.graph.edge_count()
        );
        self
    }

    /// Assert that a node belongs to a layer.
    #[must_use]
    pub fn assert_node_in_layer(self, id: &NodeId, layer: &str) -> Self {
        let data = self
            .graph
            .node(id)
            .unwrap_or_else(|| panic!("Node {id} should exist"));
        assert!(data.in_layer(layer), "Node {id} should be in layer '{layer}'");
        self
    }

    /// Assert that at least one edge of the given type connects two nodes.
    #[must_use]
    pub fn assert_has_edge_of_type(self, source: &NodeId, target: &NodeId, edge_type: EdgeType) -> Self {
        let found = self
            .graph
            .edges_between(source, target)
            .any(|(_, data)| data.is_type(edge_type));
        assert!(found, "Expected a '{edge_type}' edge {source} -> {target}");
        self
    }
}

impl Default for GraphFixture {
    fn default() -> Self {
        Self::new(common_config::DEFAULT_NAMESPACE)
    }
}
