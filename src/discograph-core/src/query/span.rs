//! Token spans of annotation nodes.

use std::collections::{HashMap, HashSet, VecDeque};

use common_error::{DiscographError, DiscographResult};

use crate::graph::{AnnotationGraph, NodeId};
use crate::util::natural_sort;

struct Frame<'a> {
    node: &'a NodeId,
    children: Vec<&'a NodeId>,
    next: usize,
}

fn span_children<'a>(graph: &'a AnnotationGraph, node: &NodeId) -> Vec<&'a NodeId> {
    graph
        .out_edges(node)
        .filter(|edge| !edge.is_self_loop())
        .filter(|edge| edge.data.edge_type.is_some_and(|t| t.is_span_relation()))
        .map(|edge| edge.target)
        .collect()
}

/// Token IDs dominated or spanned by `node`, in natural sort order.
///
/// Only `dominates` and `spans` edges are followed; self-loops are skipped.
/// The start node is never part of its own span, so a token without outgoing
/// span relations has an empty span, as does any node from which no token is
/// reachable. A cycle of span relations fails with `CycleDetected`.
///
/// With `debug` set, a warning is logged when the graph as a whole is not
/// acyclic; the returned span is unaffected.
pub fn get_span(graph: &AnnotationGraph, node: &NodeId, debug: bool) -> DiscographResult<Vec<NodeId>> {
    let (node, _) = graph
        .nodes
        .get_key_value(node)
        .ok_or_else(|| DiscographError::node_not_found(node))?;
    if debug && !is_acyclic(graph) {
        log::warn!(
            "graph '{}' contains cycles; span of '{node}' follows span relations only",
            graph.name()
        );
    }
    let mut tokens: HashSet<&NodeId> = HashSet::new();
    let mut visited: HashSet<&NodeId> = HashSet::from([node]);
    let mut on_path: HashSet<&NodeId> = HashSet::from([node]);
    let mut stack = vec![Frame {
        node,
        children: span_children(graph, node),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.children.get(frame.next).copied() else {
            on_path.remove(frame.node);
            stack.pop();
            continue;
        };
        frame.next += 1;

        if graph.is_token(child) {
            tokens.insert(child);
        } else if on_path.contains(child) {
            return Err(DiscographError::cycle(child));
        } else if visited.insert(child) {
            on_path.insert(child);
            stack.push(Frame {
                node: child,
                children: span_children(graph, child),
                next: 0,
            });
        }
    }

    let mut span: Vec<NodeId> = tokens.into_iter().cloned().collect();
    natural_sort(&mut span);
    Ok(span)
}

/// Concatenated token strings of a node's span, separated by single spaces.
///
/// `node == None` returns the text of the whole document.
pub fn get_text(graph: &AnnotationGraph, node: Option<&NodeId>) -> DiscographResult<String> {
    match node {
        Some(node) => {
            let span = get_span(graph, node, false)?;
            tokens_to_text(graph, &span)
        }
        None => Ok(graph.token_strings()?.join(" ")),
    }
}

/// Join the token strings of the given token IDs with single spaces.
pub fn tokens_to_text(graph: &AnnotationGraph, tokens: &[NodeId]) -> DiscographResult<String> {
    let strings = tokens
        .iter()
        .map(|id| graph.get_token(id))
        .collect::<DiscographResult<Vec<_>>>()?;
    Ok(strings.join(" "))
}

/// Check whether the graph has no directed cycle, self-loops included.
pub fn is_acyclic(graph: &AnnotationGraph) -> bool {
    let mut in_degree: HashMap<&NodeId, usize> =
        graph.node_ids().map(|id| (id, graph.in_degree(id))).collect();
    let mut queue: VecDeque<&NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut seen = 0;

    while let Some(id) = queue.pop_front() {
        seen += 1;
        for edge in graph.out_edges(id) {
            if let Some(degree) = in_degree.get_mut(edge.target) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(edge.target);
                }
            }
        }
    }
    seen == graph.node_count()
}
