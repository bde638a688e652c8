//! Token access on annotation graphs.

use common_error::{DiscographError, DiscographResult, ensure};

use super::container::AnnotationGraph;
use super::edge::EdgeData;
use super::identifiers::{EdgeType, NodeId};
use crate::types::Value;

impl AnnotationGraph {
    /// Attribute key holding token strings in this graph's namespace.
    pub fn token_key(&self) -> String {
        self.token_key_in(self.namespace())
    }

    /// Attribute key holding token strings in the given namespace.
    pub fn token_key_in(&self, namespace: &str) -> String {
        format!("{namespace}:{}", self.token_attribute())
    }

    /// Check whether a node carries a token string in this graph's namespace.
    pub fn is_token(&self, id: &NodeId) -> bool {
        let key = self.token_key();
        self.node(id)
            .is_some_and(|data| data.attributes.contains_key(&key))
    }

    /// Token string of a node in this graph's namespace.
    pub fn get_token(&self, id: &NodeId) -> DiscographResult<&str> {
        self.get_token_in(id, self.namespace())
    }

    /// Token string of a node in the given namespace.
    pub fn get_token_in(&self, id: &NodeId, namespace: &str) -> DiscographResult<&str> {
        let key = self.token_key_in(namespace);
        self.node_data(id)?
            .attributes
            .get(&key)
            .and_then(Value::as_str)
            .ok_or_else(|| DiscographError::missing_attribute(id, key))
    }

    /// Iterate over `(token ID, token string)` in document order.
    ///
    /// `namespace == None` reads the graph's own token attribute.
    pub fn get_tokens<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = DiscographResult<(&'a NodeId, &'a str)>> + 'a {
        let namespace = namespace.unwrap_or(self.namespace());
        self.tokens
            .iter()
            .map(move |id| self.get_token_in(id, namespace).map(|token| (id, token)))
    }

    /// Token strings in document order.
    pub fn token_strings(&self) -> DiscographResult<Vec<&str>> {
        self.get_tokens(None)
            .map(|result| result.map(|(_, token)| token))
            .collect()
    }

    /// Add `precedes` edges from the root to the first token and between
    /// every pair of consecutive tokens.
    ///
    /// The edges live in the namespace layer and `<namespace>:precedence`.
    /// Fails on documents with fewer than two tokens.
    pub fn add_precedence_relations(&mut self) -> DiscographResult<()> {
        ensure!(
            self.tokens.len() > 1,
            GraphError: "graph '{}' needs at least two tokens for precedence relations",
            self.name()
        );
        let namespace = self.namespace().to_string();
        let mut pairs: Vec<(NodeId, NodeId)> = vec![(self.root().clone(), self.tokens[0].clone())];
        pairs.extend(
            self.tokens
                .windows(2)
                .map(|pair| (pair[0].clone(), pair[1].clone())),
        );
        for (source, target) in pairs {
            let data = EdgeData::new([namespace.clone(), format!("{namespace}:precedence")])
                .with_edge_type(EdgeType::Precedence);
            self.add_edge_with(source, target, None, data)?;
        }
        Ok(())
    }
}
