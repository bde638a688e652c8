//! Character offsets of tokens and spans.
//!
//! Offsets are computed lazily over the whole token list the first time
//! they are requested and stored on the token nodes as `<ns>:onset` and
//! `<ns>:offset`. Tokens are assumed to be separated by a single space: the
//! first token starts at 0, every following onset is the previous offset
//! plus one, and every offset is the onset plus the token's character count.

use common_error::{DiscographError, DiscographResult};

use super::span::get_span;
use crate::graph::{AnnotationGraph, NodeId};
use crate::types::Value;

fn offset_keys(namespace: &str) -> (String, String) {
    (format!("{namespace}:onset"), format!("{namespace}:offset"))
}

fn read_offsets(
    graph: &AnnotationGraph,
    token: &NodeId,
    keys: &(String, String),
) -> DiscographResult<Option<(usize, usize)>> {
    let attributes = &graph.node_data(token)?.attributes;
    let read = |key: &str| -> DiscographResult<Option<usize>> {
        let Some(value) = attributes.get(key) else {
            return Ok(None);
        };
        value
            .as_int()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                DiscographError::value_error(format!(
                    "token '{token}' has a non-offset value '{value}' in '{key}'"
                ))
            })
    };
    Ok(read(&keys.0)?.zip(read(&keys.1)?))
}

/// Compute and store onset/offset attributes for every token.
///
/// `namespace == None` uses the graph's namespace, both for reading token
/// strings and for the stored offset attributes.
pub fn add_offsets(graph: &mut AnnotationGraph, namespace: Option<&str>) -> DiscographResult<()> {
    let namespace = namespace.unwrap_or(graph.namespace()).to_string();
    let (onset_key, offset_key) = offset_keys(&namespace);

    let mut spans = Vec::with_capacity(graph.tokens.len());
    let mut onset = 0usize;
    for result in graph.get_tokens(Some(&namespace)) {
        let (id, token) = result?;
        let offset = onset + token.chars().count();
        spans.push((id.clone(), onset, offset));
        onset = offset + 1;
    }
    for (id, onset, offset) in spans {
        graph.set_node_attribute(&id, onset_key.as_str(), onset)?;
        graph.set_node_attribute(&id, offset_key.as_str(), offset)?;
    }
    log::debug!("added character offsets to graph '{}'", graph.name());
    Ok(())
}

/// Onset and offset of a single token, computing all offsets on first use.
pub fn get_offsets(
    graph: &mut AnnotationGraph,
    token: &NodeId,
    namespace: Option<&str>,
) -> DiscographResult<(usize, usize)> {
    let namespace = namespace.unwrap_or(graph.namespace()).to_string();
    let keys = offset_keys(&namespace);
    if let Some(offsets) = read_offsets(graph, token, &keys)? {
        return Ok(offsets);
    }
    add_offsets(graph, Some(&namespace))?;
    read_offsets(graph, token, &keys)?
        .ok_or_else(|| DiscographError::missing_attribute(token, keys.0.clone()))
}

/// `(token ID, onset, offset)` for every token in document order.
///
/// Offsets are computed first if any token lacks them. A token whose stored
/// offsets cannot be read yields an error item.
pub fn token_offsets<'a>(
    graph: &'a mut AnnotationGraph,
    namespace: Option<&str>,
) -> DiscographResult<impl Iterator<Item = DiscographResult<(&'a NodeId, usize, usize)>> + 'a> {
    let namespace = namespace.unwrap_or(graph.namespace()).to_string();
    let keys = offset_keys(&namespace);
    let mut complete = true;
    for token in &graph.tokens {
        if read_offsets(graph, token, &keys)?.is_none() {
            complete = false;
            break;
        }
    }
    if !complete {
        add_offsets(graph, Some(&namespace))?;
    }

    let graph: &'a AnnotationGraph = graph;
    Ok(graph.tokens.iter().map(move |id| {
        let (onset, offset) = read_offsets(graph, id, &keys)?
            .ok_or_else(|| DiscographError::missing_attribute(id, keys.0.clone()))?;
        Ok((id, onset, offset))
    }))
}

/// Character range covered by a node's span: minimum onset, maximum offset.
///
/// Fails with `EmptySpan` if the node spans no tokens.
pub fn get_span_offsets(graph: &mut AnnotationGraph, node: &NodeId) -> DiscographResult<(usize, usize)> {
    let span = get_span(graph, node, false)?;
    if span.is_empty() {
        return Err(DiscographError::empty_span(node));
    }
    let mut range: Option<(usize, usize)> = None;
    for token in &span {
        let (onset, offset) = get_offsets(graph, token, None)?;
        range = Some(match range {
            Some((lo, hi)) => (lo.min(onset), hi.max(offset)),
            None => (onset, offset),
        });
    }
    range.ok_or_else(|| DiscographError::empty_span(node))
}

/// Check whether a node's span covers one gap-free character range.
///
/// Adjacent tokens (next onset equal to previous offset plus one) count as
/// continuous. An empty span is continuous.
pub fn is_continuous(graph: &mut AnnotationGraph, node: &NodeId) -> DiscographResult<bool> {
    let span = get_span(graph, node, false)?;
    let mut ranges = span
        .iter()
        .map(|token| get_offsets(graph, token, None))
        .collect::<DiscographResult<Vec<_>>>()?;
    ranges.sort_unstable();

    let mut end: Option<usize> = None;
    for (onset, offset) in ranges {
        if let Some(prev) = end {
            if onset > prev + 1 {
                return Ok(false);
            }
        }
        end = Some(end.map_or(offset, |prev| prev.max(offset)));
    }
    Ok(true)
}
