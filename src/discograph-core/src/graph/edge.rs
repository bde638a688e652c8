//! Binary edge representation.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeMap, HasAttributes};
use super::identifiers::{EdgeKey, EdgeType, LayerSet, NodeId};
use crate::types::Value;

/// Data attached to an edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeData {
    /// Annotation layers the edge belongs to.
    pub layers: LayerSet,
    /// Semantic type of the edge. Importers always set it.
    pub edge_type: Option<EdgeType>,
    /// Edge attributes.
    pub attributes: AttributeMap,
}

impl EdgeData {
    /// Create edge data in the given layers.
    pub fn new(layers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            layers: layers.into_iter().map(Into::into).collect(),
            edge_type: None,
            attributes: AttributeMap::new(),
        }
    }

    /// Set the edge type.
    #[must_use]
    pub fn with_edge_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = Some(edge_type);
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check the edge type.
    pub fn is_type(&self, edge_type: EdgeType) -> bool {
        self.edge_type == Some(edge_type)
    }

    /// Look up an attribute, treating `edge_type` as a string attribute.
    pub fn attribute_value(&self, name: &str) -> Option<Cow<'_, Value>> {
        if name == "edge_type" {
            return self
                .edge_type
                .map(|t| Cow::Owned(Value::String(t.as_str().to_string())));
        }
        self.attributes.get(name).map(Cow::Borrowed)
    }

    /// Union another edge's layers and attributes into this one.
    ///
    /// A set edge type on `other` replaces the current one.
    pub(crate) fn absorb(&mut self, other: Self) {
        self.layers.extend(other.layers);
        if other.edge_type.is_some() {
            self.edge_type = other.edge_type;
        }
        self.attributes.extend(other.attributes);
    }
}

impl HasAttributes for EdgeData {
    fn layers(&self) -> &LayerSet {
        &self.layers
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Owned edge description used for bulk insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Explicit key; `None` allocates a fresh one.
    pub key: Option<EdgeKey>,
    /// Edge data.
    pub data: EdgeData,
}

impl EdgeRecord {
    /// Create a record with a freshly allocated key.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, data: EdgeData) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            key: None,
            data,
        }
    }

    /// Use an explicit key.
    #[must_use]
    pub fn with_key(mut self, key: EdgeKey) -> Self {
        self.key = Some(key);
        self
    }
}

/// Borrowed view of an edge in a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'a> {
    /// Source node.
    pub source: &'a NodeId,
    /// Target node.
    pub target: &'a NodeId,
    /// Parallel edge key.
    pub key: EdgeKey,
    /// Edge data.
    pub data: &'a EdgeData,
}

impl EdgeRef<'_> {
    /// True if source and target are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Clone into an owned record, keeping the key.
    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord {
            source: self.source.clone(),
            target: self.target.clone(),
            key: Some(self.key),
            data: self.data.clone(),
        }
    }
}
