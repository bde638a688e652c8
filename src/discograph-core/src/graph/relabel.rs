//! Node relabeling.

use std::collections::HashMap;

use common_error::DiscographResult;

use super::container::AnnotationGraph;
use super::identifiers::NodeId;

impl AnnotationGraph {
    /// Rename nodes according to `mapping`; unmapped nodes keep their IDs.
    ///
    /// Edges, the root, `tokens` and `sentences` follow the renaming. Nodes
    /// that collapse onto the same new ID are merged with the usual
    /// layer-union rules; their edges stay distinct, a parallel edge whose key
    /// is already taken gets the next free key. Every applied rename is recorded in
    /// [`renamed_nodes`](Self::renamed_nodes), composing with earlier renames.
    pub fn relabel_nodes(&mut self, mapping: &HashMap<NodeId, NodeId>) -> DiscographResult<()> {
        let applied: HashMap<NodeId, NodeId> = mapping
            .iter()
            .filter(|(old, new)| old != new && self.has_node(old))
            .map(|(old, new)| (old.clone(), new.clone()))
            .collect();
        if applied.is_empty() {
            return Ok(());
        }
        log::debug!(
            "relabeling {} nodes of graph '{}'",
            applied.len(),
            self.name()
        );
        let rename = |id: &NodeId| applied.get(id).cloned().unwrap_or_else(|| id.clone());

        let edges: Vec<_> = self.edges().map(|edge| edge.to_record()).collect();
        let order = std::mem::take(&mut self.order);
        let mut nodes = std::mem::take(&mut self.nodes);

        for id in order {
            if let Some(entry) = nodes.remove(&id) {
                self.insert_node(rename(&id), entry.data);
            }
        }
        for record in edges {
            let source = rename(&record.source);
            let target = rename(&record.target);
            let key = record
                .key
                .filter(|key| self.edge(&source, &target, *key).is_none());
            self.insert_edge(source, target, key, record.data)?;
        }

        let root = rename(self.root());
        self.set_root(root);
        self.tokens = self.tokens.iter().map(rename).collect();
        self.sentences = self.sentences.iter().map(rename).collect();

        let renamed = self.renamed_nodes_mut();
        for new in renamed.values_mut() {
            if let Some(newer) = applied.get(new) {
                *new = newer.clone();
            }
        }
        renamed.extend(applied);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttributeMap, EdgeType, HasAttributes};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_relabel_moves_edges_and_tokens() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_node("a", ["x"], AttributeMap::new()).unwrap();
        graph.add_node("b", ["y"], AttributeMap::new()).unwrap();
        graph.add_edge("a", "b", ["x"], Some(EdgeType::Dominance)).unwrap();
        graph.tokens.push(id("b"));

        let mapping = HashMap::from([(id("b"), id("B"))]);
        graph.relabel_nodes(&mapping).unwrap();

        assert!(!graph.has_node(&id("b")));
        assert!(graph.node(&id("B")).unwrap().in_layer("y"));
        assert!(graph.has_edge(&id("a"), &id("B")));
        assert_eq!(graph.tokens, vec![id("B")]);
        assert_eq!(graph.renamed_nodes().get(&id("b")), Some(&id("B")));
    }

    #[test]
    fn test_relabel_composes_renames() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_node("a", ["x"], AttributeMap::new()).unwrap();
        graph.relabel_nodes(&HashMap::from([(id("a"), id("b"))])).unwrap();
        graph.relabel_nodes(&HashMap::from([(id("b"), id("c"))])).unwrap();

        assert_eq!(graph.renamed_nodes().get(&id("a")), Some(&id("c")));
        assert_eq!(graph.renamed_nodes().get(&id("b")), Some(&id("c")));
        assert!(graph.has_node(&id("c")));
    }

    #[test]
    fn test_relabel_collapsing_nodes_unions_layers() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_node("a", ["x"], AttributeMap::new()).unwrap();
        graph.add_node("b", ["y"], AttributeMap::new()).unwrap();
        graph.relabel_nodes(&HashMap::from([(id("a"), id("b"))])).unwrap();

        let data = graph.node(&id("b")).unwrap();
        assert!(data.in_layer("x") && data.in_layer("y"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_relabel_collapsing_nodes_keeps_parallel_edges() {
        let mut graph = AnnotationGraph::new("ns");
        graph.add_edge("a", "c", ["x"], Some(EdgeType::Dominance)).unwrap();
        graph.add_edge("b", "c", ["y"], Some(EdgeType::Pointing)).unwrap();
        graph.relabel_nodes(&HashMap::from([(id("a"), id("m")), (id("b"), id("m"))])).unwrap();

        let edges: Vec<_> = graph.edges_between(&id("m"), &id("c")).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(graph.edge_count(), 2);
        let keys: Vec<_> = edges.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![0, 1]);
        assert!(edges.iter().all(|(_, data)| data.layers.len() == 1));
        assert!(edges.iter().any(|(_, data)| data.is_type(EdgeType::Pointing)));
    }

    #[test]
    fn test_relabel_root() {
        let mut graph = AnnotationGraph::new("ns");
        let root = graph.root().clone();
        graph.relabel_nodes(&HashMap::from([(root, id("doc"))])).unwrap();
        assert_eq!(graph.root(), &id("doc"));
        assert!(graph.metadata().is_some());
    }
}
