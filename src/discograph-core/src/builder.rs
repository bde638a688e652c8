//! Populating annotation graphs from source formats.
//!
//! Every format is one [`GraphBuilder`]: it names its namespace and format
//! and fills an empty [`AnnotationGraph`]. [`AnnotationGraph::build`] wraps
//! this and checks the resulting graph against the construction contract.

use common_config::GraphConfig;
use common_error::{DiscographResult, ensure};

use crate::graph::{
    AnnotationGraph, EdgeData, EdgeType, GraphFormat, HasAttributes, LayerSet,
    METADATA_KEY, NodeData, NodeId,
};
use crate::layers::layer2namespace;
use crate::types::Value;

/// A source format that can populate an annotation graph.
pub trait GraphBuilder {
    /// Format tag of the produced graph.
    fn format(&self) -> GraphFormat;

    /// Namespace of the produced graph.
    fn namespace(&self) -> &str;

    /// Document name of the produced graph.
    fn name(&self) -> &str {
        ""
    }

    /// Add nodes, edges, tokens and sentences to an empty graph.
    fn populate(&self, graph: &mut AnnotationGraph) -> DiscographResult<()>;
}

impl AnnotationGraph {
    /// Build a graph with the given builder.
    pub fn build<B: GraphBuilder + ?Sized>(builder: &B) -> DiscographResult<Self> {
        let config = GraphConfig {
            name: builder.name().to_string(),
            ..GraphConfig::with_namespace(builder.namespace())
        };
        let mut graph = Self::from_config(&config);
        graph.set_format(builder.format());
        builder.populate(&mut graph)?;
        check_construction_contract(&graph)?;
        log::debug!(
            "built {:?} graph '{}' with {} nodes and {} edges",
            graph.format(),
            graph.name(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// Check that a freshly built graph is usable by the query layer.
///
/// The root must carry a metadata map, the token list must be non-empty and
/// refer to token nodes, every node and edge must have a layer in the
/// graph's namespace and every edge must have an edge type.
pub fn check_construction_contract(graph: &AnnotationGraph) -> DiscographResult<()> {
    let namespace = graph.namespace();
    ensure!(
        graph
            .node(graph.root())
            .and_then(|root| root.get_attribute(METADATA_KEY))
            .is_some_and(|metadata| metadata.as_map().is_some()),
        GraphError: "root node '{}' has no metadata map",
        graph.root()
    );
    ensure!(
        !graph.tokens.is_empty(),
        GraphError: "graph '{}' has no tokens",
        graph.name()
    );
    for token in &graph.tokens {
        graph.get_token(token)?;
    }

    let in_namespace = |layers: &LayerSet| {
        layers
            .iter()
            .any(|layer| layer2namespace(layer) == namespace)
    };
    for node in graph.nodes() {
        ensure!(
            in_namespace(&node.data.layers),
            GraphError: "node '{}' has no layer in namespace '{namespace}'",
            node.id
        );
    }
    for edge in graph.edges() {
        ensure!(
            in_namespace(&edge.data.layers),
            GraphError: "edge {} -> {} has no layer in namespace '{namespace}'",
            edge.source,
            edge.target
        );
        ensure!(
            edge.data.edge_type.is_some(),
            GraphError: "edge {} -> {} has no edge type",
            edge.source,
            edge.target
        );
    }
    Ok(())
}

/// Builds graphs from whitespace tokenized plain text, one sentence per line.
///
/// Produces `<ns>:token_<n>` token nodes numbered across the document,
/// `<ns>:sentence_<n>` nodes listing their token IDs in a `tokens`
/// attribute and dominance edges root → sentence → token.
#[derive(Debug, Clone)]
pub struct TokenizedTextBuilder {
    namespace: String,
    name: String,
    text: String,
}

impl TokenizedTextBuilder {
    /// Create a builder for `text` whose nodes and layers use `namespace`.
    pub fn new(namespace: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: String::new(),
            text: text.into(),
        }
    }

    /// Set the document name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl GraphBuilder for TokenizedTextBuilder {
    fn format(&self) -> GraphFormat {
        GraphFormat::Tokenized
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn populate(&self, graph: &mut AnnotationGraph) -> DiscographResult<()> {
        let ns = self.namespace.as_str();
        let token_key = graph.token_key();
        let root = graph.root().clone();
        let mut token_count = 0usize;

        let sentences = self.text.lines().filter(|line| !line.trim().is_empty());
        for (i, line) in sentences.enumerate() {
            let sentence = NodeId::from(format!("{ns}:sentence_{i}"));
            let mut token_ids = Vec::new();
            for token in line.split_whitespace() {
                let id = NodeId::from(format!("{ns}:token_{token_count}"));
                token_count += 1;
                let data = NodeData::new([ns.to_string(), format!("{ns}:token")])
                    .with_attribute(token_key.as_str(), token);
                graph.add_node_data(id.clone(), data)?;
                graph.tokens.push(id.clone());
                token_ids.push(id);
            }

            let id_strings: Vec<String> = token_ids.iter().map(ToString::to_string).collect();
            let data = NodeData::new([ns.to_string(), format!("{ns}:sentence")])
                .with_attribute("tokens", Value::StringList(id_strings));
            graph.add_node_data(sentence.clone(), data)?;
            graph.add_edge_with(root.clone(), sentence.clone(), None, dominance(ns))?;
            for token in token_ids {
                graph.add_edge_with(sentence.clone(), token, None, dominance(ns))?;
            }
            graph.sentences.push(sentence);
        }
        Ok(())
    }
}

fn dominance(ns: &str) -> EdgeData {
    EdgeData::new([ns.to_string()]).with_edge_type(EdgeType::Dominance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::get_span;
    use crate::testing::GraphAssertions;
    use common_error::DiscographError;

    struct NoTokens;

    impl GraphBuilder for NoTokens {
        fn format(&self) -> GraphFormat {
            GraphFormat::Generic
        }

        fn namespace(&self) -> &str {
            "empty"
        }

        fn populate(&self, _graph: &mut AnnotationGraph) -> DiscographResult<()> {
            Ok(())
        }
    }

    struct UntypedEdges;

    impl GraphBuilder for UntypedEdges {
        fn format(&self) -> GraphFormat {
            GraphFormat::Generic
        }

        fn namespace(&self) -> &str {
            "raw"
        }

        fn populate(&self, graph: &mut AnnotationGraph) -> DiscographResult<()> {
            let data = NodeData::new(["raw"]).with_attribute("raw:token", "x");
            graph.add_node_data("t", data)?;
            graph.tokens.push(NodeId::from("t"));
            let root = graph.root().clone();
            graph.add_edge(root, "t", ["raw"], None)?;
            Ok(())
        }
    }

    #[test]
    fn test_tokenized_text() {
        let builder = TokenizedTextBuilder::new("plain", "Ich bin ein Berliner .\nDanke .").with_name("jfk");
        let graph = AnnotationGraph::build(&builder).unwrap();

        assert_eq!(graph.name(), "jfk");
        assert_eq!(graph.format(), &GraphFormat::Tokenized);
        assert_eq!(graph.tokens.len(), 7);
        assert_eq!(graph.sentences.len(), 2);
        let _ = GraphAssertions::new(&graph)
            .assert_node_count(1 + 7 + 2)
            .assert_edge_count(2 + 7)
            .assert_node_in_layer(&NodeId::from("plain:sentence_1"), "plain:sentence")
            .assert_has_edge_of_type(graph.root(), &NodeId::from("plain:sentence_0"), EdgeType::Dominance);

        let second = NodeId::from("plain:sentence_1");
        assert_eq!(
            graph.node(&second).unwrap().get_attribute("tokens"),
            Some(&Value::from(vec!["plain:token_5", "plain:token_6"]))
        );
        assert_eq!(
            get_span(&graph, &second, false).unwrap(),
            vec![NodeId::from("plain:token_5"), NodeId::from("plain:token_6")]
        );
        assert_eq!(graph.get_token(&NodeId::from("plain:token_3")).unwrap(), "Berliner");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let builder = TokenizedTextBuilder::new("plain", "a b\n\n   \nc");
        let graph = AnnotationGraph::build(&builder).unwrap();
        assert_eq!(graph.sentences.len(), 2);
        assert_eq!(graph.token_strings().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_contract_requires_tokens() {
        assert!(matches!(
            AnnotationGraph::build(&NoTokens),
            Err(DiscographError::GraphError(_))
        ));
        assert!(AnnotationGraph::build(&TokenizedTextBuilder::new("plain", "")).is_err());
    }

    #[test]
    fn test_contract_requires_edge_types() {
        let err = AnnotationGraph::build(&UntypedEdges).unwrap_err();
        assert!(err.to_string().contains("no edge type"));
    }

    #[test]
    fn test_contract_requires_namespace_layer() {
        let mut graph = AnnotationGraph::build(&TokenizedTextBuilder::new("plain", "a")).unwrap();
        assert!(check_construction_contract(&graph).is_ok());
        graph.add_node("foreign", ["other:layer"], Default::default()).unwrap();
        assert!(check_construction_contract(&graph).is_err());
    }
}
