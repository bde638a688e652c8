//! Chains of pointing relations, e.g. anaphoric or coreference chains.

use std::collections::HashMap;

use common_error::{DiscographError, DiscographResult};

use crate::graph::{AnnotationGraph, EdgeType, NodeId};
use crate::select::{LayerFilter, select_edges_by};

/// Maximal chains of nodes linked by `points_to` edges.
///
/// Each chain starts at a pointing source and follows pointing edges until
/// a node without outgoing pointing edges is reached. Branching yields one
/// chain per branch. A chain that occurs as a contiguous part of a longer
/// chain is dropped, as are duplicates. Self-loops are ignored; any other
/// cycle fails with `CycleDetected`.
pub fn get_pointing_chains(
    graph: &AnnotationGraph,
    layer: impl Into<LayerFilter>,
) -> DiscographResult<Vec<Vec<NodeId>>> {
    let mut relations: Vec<(&NodeId, Vec<&NodeId>)> = Vec::new();
    let mut index: HashMap<&NodeId, usize> = HashMap::new();
    for edge in select_edges_by(graph, layer, Some(EdgeType::Pointing)) {
        if edge.is_self_loop() {
            continue;
        }
        let slot = *index.entry(edge.source).or_insert_with(|| {
            relations.push((edge.source, Vec::new()));
            relations.len() - 1
        });
        let targets = &mut relations[slot].1;
        if !targets.contains(&edge.target) {
            targets.push(edge.target);
        }
    }

    let mut chains: Vec<Vec<&NodeId>> = Vec::new();
    for (start, _) in &relations {
        walk_chains(&relations, &index, *start, &mut chains)?;
    }

    let mut maximal: Vec<Vec<NodeId>> = Vec::new();
    for (i, chain) in chains.iter().enumerate() {
        let redundant = chains.iter().enumerate().any(|(j, other)| {
            (other.len() > chain.len() && is_subchain(chain, other)) || (j < i && other == chain)
        });
        if !redundant {
            maximal.push(chain.iter().map(|id| (*id).clone()).collect());
        }
    }
    Ok(maximal)
}

fn walk_chains<'a>(
    relations: &[(&'a NodeId, Vec<&'a NodeId>)],
    index: &HashMap<&NodeId, usize>,
    start: &'a NodeId,
    chains: &mut Vec<Vec<&'a NodeId>>,
) -> DiscographResult<()> {
    let mut stack = vec![vec![start]];
    while let Some(path) = stack.pop() {
        let Some(last) = path.last() else {
            continue;
        };
        let targets = index.get(last).map(|&slot| &relations[slot].1);
        match targets {
            Some(targets) if !targets.is_empty() => {
                for target in targets.iter().rev() {
                    if path.contains(target) {
                        return Err(DiscographError::cycle(target));
                    }
                    let mut next = path.clone();
                    next.push(*target);
                    stack.push(next);
                }
            }
            _ => chains.push(path),
        }
    }
    Ok(())
}

fn is_subchain(short: &[&NodeId], long: &[&NodeId]) -> bool {
    short.is_empty() || long.windows(short.len()).any(|window| window == short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttributeMap;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn pointing_graph(edges: &[(&str, &str)]) -> AnnotationGraph {
        let mut graph = AnnotationGraph::new("ns");
        for (source, target) in edges {
            graph
                .add_edge(*source, *target, ["ns", "ns:coreference"], Some(EdgeType::Pointing))
                .unwrap();
        }
        graph
    }

    fn chain(ids: &[&str]) -> Vec<NodeId> {
        ids.iter().map(|s| id(s)).collect()
    }

    #[test]
    fn test_linear_chain_drops_suffixes() {
        let graph = pointing_graph(&[("c", "b"), ("b", "a")]);
        let chains = get_pointing_chains(&graph, LayerFilter::All).unwrap();
        assert_eq!(chains, vec![chain(&["c", "b", "a"])]);
    }

    #[test]
    fn test_suffix_listed_first_is_dropped() {
        let graph = pointing_graph(&[("b", "a"), ("c", "b")]);
        let chains = get_pointing_chains(&graph, LayerFilter::All).unwrap();
        assert_eq!(chains, vec![chain(&["c", "b", "a"])]);
    }

    #[test]
    fn test_branches_are_kept() {
        let graph = pointing_graph(&[("a", "b"), ("a", "c"), ("x", "y")]);
        let chains = get_pointing_chains(&graph, LayerFilter::All).unwrap();
        assert_eq!(
            chains,
            vec![chain(&["a", "b"]), chain(&["a", "c"]), chain(&["x", "y"])]
        );
    }

    #[test]
    fn test_layer_filter_and_other_edges() {
        let mut graph = pointing_graph(&[("a", "b")]);
        graph
            .add_edge("p", "q", ["other"], Some(EdgeType::Pointing))
            .unwrap();
        graph
            .add_edge("b", "z", ["ns"], Some(EdgeType::Dominance))
            .unwrap();
        let chains = get_pointing_chains(&graph, "ns:coreference").unwrap();
        assert_eq!(chains, vec![chain(&["a", "b"])]);
    }

    #[test]
    fn test_cycle_detected() {
        let graph = pointing_graph(&[("a", "b"), ("b", "c"), ("c", "a")]);
        assert!(matches!(
            get_pointing_chains(&graph, LayerFilter::All),
            Err(DiscographError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut graph = pointing_graph(&[("a", "b")]);
        graph.add_node("s", ["ns"], AttributeMap::new()).unwrap();
        graph.add_edge("s", "s", ["ns"], Some(EdgeType::Pointing)).unwrap();
        let chains = get_pointing_chains(&graph, LayerFilter::All).unwrap();
        assert_eq!(chains, vec![chain(&["a", "b"])]);
    }

    #[test]
    fn test_no_pointing_relations() {
        let graph = AnnotationGraph::new("ns");
        assert!(get_pointing_chains(&graph, LayerFilter::All).unwrap().is_empty());
    }
}
