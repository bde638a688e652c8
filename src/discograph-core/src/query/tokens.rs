//! Token index mapping, keyword-in-context windows and spanstrings.

use std::collections::HashMap;
use std::fmt;

use common_error::{DiscographError, DiscographResult};

use crate::graph::{AnnotationGraph, NodeId};
use crate::util::convert_spanstring;

/// Bidirectional mapping between token IDs and their document positions.
#[derive(Debug, Clone, Default)]
pub struct TokenMapper {
    id2index: HashMap<NodeId, usize>,
    index2id: Vec<NodeId>,
}

impl TokenMapper {
    /// Build the mapping from a graph's token list.
    pub fn new(graph: &AnnotationGraph) -> Self {
        Self::from_tokens(&graph.tokens)
    }

    /// Build the mapping from an ordered token list.
    pub fn from_tokens(tokens: &[NodeId]) -> Self {
        let index2id = tokens.to_vec();
        let id2index = index2id
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self { id2index, index2id }
    }

    /// Position of a token.
    pub fn index(&self, id: &NodeId) -> Option<usize> {
        self.id2index.get(id).copied()
    }

    /// Token at a position.
    pub fn id(&self, index: usize) -> Option<&NodeId> {
        self.index2id.get(index)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.index2id.len()
    }

    /// Check if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.index2id.is_empty()
    }
}

/// First and last position of a segment's tokens.
///
/// Token order in `tokens` does not matter. Unknown tokens and empty
/// segments are errors.
pub fn get_segment_token_offsets(
    tokens: &[NodeId],
    mapper: &TokenMapper,
) -> DiscographResult<(usize, usize)> {
    let mut range: Option<(usize, usize)> = None;
    for token in tokens {
        let index = mapper
            .index(token)
            .ok_or_else(|| DiscographError::node_not_found(token))?;
        range = Some(match range {
            Some((lo, hi)) => (lo.min(index), hi.max(index)),
            None => (index, index),
        });
    }
    range.ok_or_else(|| DiscographError::value_error("segment has no tokens"))
}

/// Keyword-in-context window around one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kwic<'a, T> {
    /// Up to `window` tokens before the keyword.
    pub left: &'a [T],
    /// The keyword itself.
    pub keyword: &'a T,
    /// Up to `window` tokens after the keyword.
    pub right: &'a [T],
}

/// Cut a window of `window` tokens on each side of `tokens[index]`.
///
/// Returns `None` if `index` is out of range. Windows are truncated at the
/// document boundaries.
pub fn get_kwic<T>(tokens: &[T], index: usize, window: usize) -> Option<Kwic<'_, T>> {
    let keyword = tokens.get(index)?;
    let start = index.saturating_sub(window);
    let end = tokens.len().min(index.saturating_add(1).saturating_add(window));
    Some(Kwic {
        left: &tokens[start..index],
        keyword,
        right: &tokens[index + 1..end],
    })
}

impl<T: fmt::Display> fmt::Display for Kwic<'_, T> {
    /// Formats as `Ich bin [[ein]] Berliner .`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.left {
            write!(f, "{token} ")?;
        }
        write!(f, "[[{}]]", self.keyword)?;
        for token in self.right {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

/// Resolve a spanstring against a graph's tokens.
///
/// IDs that were renamed by a merge are looked up in the graph's
/// `renamed_nodes`. Every resulting ID must be a token node.
pub fn spanstring_to_tokens(graph: &AnnotationGraph, span: &str) -> DiscographResult<Vec<NodeId>> {
    convert_spanstring(span)?
        .into_iter()
        .map(|raw| {
            let id = NodeId::from(raw);
            let id = if graph.is_token(&id) {
                id
            } else {
                graph.renamed_nodes().get(&id).cloned().unwrap_or(id)
            };
            if graph.is_token(&id) {
                Ok(id)
            } else {
                Err(DiscographError::node_not_found(&id))
            }
        })
        .collect()
}
