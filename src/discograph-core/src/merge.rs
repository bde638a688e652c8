//! Merging annotation graphs that share a tokenization.
//!
//! Independent annotation layers of one document (syntax, rhetorical
//! structure, coreference, ...) are built as separate graphs and fused with
//! [`AnnotationGraph::merge_graphs`]:
//!
//! 1. the token lists are aligned position by position; any difference in
//!    token strings aborts the merge before anything is modified
//! 2. the donor's token nodes are renamed to the receiver's token IDs
//! 3. nodes and edges are copied additively, so shared tokens end up in the
//!    layers of both graphs
//! 4. the donor root is folded into the receiver root
//!
//! ```rust
//! use common_config::MergeConfig;
//! use discograph_core::builder::TokenizedTextBuilder;
//! use discograph_core::AnnotationGraph;
//!
//! let mut syntax = AnnotationGraph::build(&TokenizedTextBuilder::new("tiger", "Ich bin ein Berliner .")).unwrap();
//! let coref = AnnotationGraph::build(&TokenizedTextBuilder::new("mmax", "Ich bin ein Berliner .")).unwrap();
//!
//! syntax.merge_graphs(coref, &MergeConfig::default()).unwrap();
//! assert_eq!(syntax.tokens.len(), 5);
//! ```

use std::collections::HashMap;

use common_config::MergeConfig;
use common_error::{DiscographError, DiscographResult, ensure};

use crate::graph::{AnnotationGraph, GraphFormat, METADATA_KEY, NodeData, NodeId};
use crate::query::get_kwic;

const END_OF_DOCUMENT: &str = "<end of document>";

/// Map the donor's token IDs onto the receiver's, position by position.
///
/// If either graph has no tokens the mapping is empty and the donor keeps
/// its token IDs. Otherwise both token lists must be string-identical;
/// the first difference fails with `TokenizationMismatch`.
pub fn create_token_mapping(
    receiver: &AnnotationGraph,
    donor: &AnnotationGraph,
    config: &MergeConfig,
) -> DiscographResult<HashMap<NodeId, NodeId>> {
    let receiver_tokens = receiver
        .get_tokens(None)
        .collect::<DiscographResult<Vec<_>>>()?;
    let donor_tokens = donor.get_tokens(None).collect::<DiscographResult<Vec<_>>>()?;
    if receiver_tokens.is_empty() || donor_tokens.is_empty() {
        return Ok(HashMap::new());
    }

    let receiver_strings: Vec<&str> = receiver_tokens.iter().map(|(_, tok)| *tok).collect();
    let donor_strings: Vec<&str> = donor_tokens.iter().map(|(_, tok)| *tok).collect();
    let length = receiver_strings.len().max(donor_strings.len());
    for position in 0..length {
        let expected = receiver_strings.get(position).copied();
        let found = donor_strings.get(position).copied();
        if expected != found {
            return Err(tokenization_mismatch(
                receiver,
                donor,
                (receiver_strings.as_slice(), donor_strings.as_slice()),
                position,
                config,
            ));
        }
    }

    Ok(donor_tokens
        .iter()
        .zip(&receiver_tokens)
        .map(|((old, _), (new, _))| ((*old).clone(), (*new).clone()))
        .collect())
}

fn tokenization_mismatch(
    receiver: &AnnotationGraph,
    donor: &AnnotationGraph,
    (receiver_strings, donor_strings): (&[&str], &[&str]),
    position: usize,
    config: &MergeConfig,
) -> DiscographError {
    let expected = receiver_strings
        .get(position)
        .copied()
        .unwrap_or(END_OF_DOCUMENT);
    let found = donor_strings.get(position).copied().unwrap_or(END_OF_DOCUMENT);
    let context = |strings: &[&str]| {
        get_kwic(strings, position, config.kwic_window)
            .map(|kwic| kwic.to_string())
            .unwrap_or_else(|| END_OF_DOCUMENT.to_string())
    };
    let left_context = context(receiver_strings);
    let right_context = context(donor_strings);

    let mut message = format!(
        "{} ({}) vs. {} ({})\n\t{expected} != {found}",
        receiver.name(),
        receiver.namespace(),
        donor.name(),
        donor.namespace(),
    );
    if config.verbose_mismatch {
        message.push_str(&format!("\n\t{left_context}\n\t{right_context}"));
    }
    DiscographError::TokenizationMismatch {
        position,
        expected: expected.to_string(),
        found: found.to_string(),
        left_context,
        right_context,
        message,
    }
}

/// Rename the donor's token nodes to the receiver's token IDs.
///
/// Returns the applied mapping, which is also recorded in the donor's
/// `renamed_nodes`.
pub fn rename_tokens(
    donor: &mut AnnotationGraph,
    receiver: &AnnotationGraph,
    config: &MergeConfig,
) -> DiscographResult<HashMap<NodeId, NodeId>> {
    let mapping = create_token_mapping(receiver, donor, config)?;
    donor.relabel_nodes(&mapping)?;
    Ok(mapping)
}

impl AnnotationGraph {
    /// Merge `other` into this graph.
    ///
    /// Fails without modifying `self` if the tokenizations differ or the
    /// donor root has incoming edges. Name, tokens and sentences of `self`
    /// are kept; the donor's are adopted only where `self` has none.
    pub fn merge_graphs(&mut self, mut other: AnnotationGraph, config: &MergeConfig) -> DiscographResult<()> {
        check_donor_root(&other)?;
        let receiver_was_empty = self.node_count() == 1 && self.tokens.is_empty();
        log::debug!(
            "merging graph '{}' ({}) into '{}' ({})",
            other.name(),
            other.namespace(),
            self.name(),
            self.namespace()
        );
        let mapping = rename_tokens(&mut other, self, config)?;
        log::trace!("renamed {} donor tokens", mapping.len());

        let other_root = other.root().clone();
        for node in other.nodes() {
            let mut data = node.data.clone();
            if *node.id == other_root {
                data.attributes.remove(METADATA_KEY);
            }
            self.insert_node(node.id.clone(), data);
        }

        let token_key = self.token_key();
        for token in &other.tokens {
            let present = self
                .node(token)
                .is_some_and(|data| data.attributes.contains_key(&token_key));
            if !present {
                let string = other.get_token(token)?;
                self.set_node_attribute(token, token_key.as_str(), string)?;
            }
        }

        for edge in other.edges() {
            self.insert_edge(edge.source.clone(), edge.target.clone(), None, edge.data.clone())?;
        }

        self.merge_rootnodes(&other)?;

        let renamed: Vec<(NodeId, NodeId)> = other
            .renamed_nodes()
            .iter()
            .map(|(old, new)| (old.clone(), new.clone()))
            .collect();
        self.renamed_nodes_mut().extend(renamed);
        self.merged_rootnodes_mut()
            .extend(other.merged_rootnodes().iter().cloned());

        if self.name().is_empty() && !other.name().is_empty() {
            self.set_name(other.name());
        }
        if self.tokens.is_empty() && !other.tokens.is_empty() {
            self.tokens = std::mem::take(&mut other.tokens);
        }
        if self.sentences.is_empty() && !other.sentences.is_empty() {
            self.sentences = std::mem::take(&mut other.sentences);
        }
        if self.format() != other.format() {
            let format = if receiver_was_empty && *self.format() == GraphFormat::Generic {
                other.format().clone()
            } else {
                GraphFormat::Merged
            };
            self.set_format(format);
        }
        Ok(())
    }

    /// Fold the root node of `other` into this graph's root.
    ///
    /// The donor's root metadata is merged into this root's metadata key by
    /// key, edges leaving the donor root are re-attached to this root and the
    /// donor root is removed, unless it is this graph's root. The donor root
    /// must not have incoming edges in `other`.
    pub fn merge_rootnodes(&mut self, other: &AnnotationGraph) -> DiscographResult<()> {
        check_donor_root(other)?;
        let other_root = other.root().clone();
        if let Some(metadata) = other.metadata() {
            let own = self.metadata_mut()?;
            for (key, value) in metadata {
                own.insert(key.clone(), value.clone());
            }
        }

        if other_root != *self.root() && self.has_node(&other_root) {
            let moved: Vec<_> = self
                .out_edges(&other_root)
                .filter(|edge| !edge.is_self_loop())
                .map(|edge| (edge.target.clone(), edge.data.clone()))
                .collect();
            let root = self.root().clone();
            for (target, data) in moved {
                self.insert_edge(root.clone(), target, None, data)?;
            }
            let removed: NodeData = self.remove_node(&other_root)?;
            log::debug!(
                "folded root '{other_root}' ({} layers) into '{root}'",
                removed.layers.len()
            );
        }
        self.merged_rootnodes_mut().push(other_root);
        Ok(())
    }
}

fn check_donor_root(other: &AnnotationGraph) -> DiscographResult<()> {
    ensure!(
        other.in_degree(other.root()) == 0,
        GraphError: "root node '{}' of graph '{}' has incoming edges",
        other.root(),
        other.name()
    );
    Ok(())
}
