//! Node representation.

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeMap, HasAttributes};
use super::identifiers::{LayerSet, NodeId};
use crate::types::Value;

/// Data attached to a node: its layers and its attributes.
///
/// Layers only ever grow. Re-adding a node unions the new layers into the
/// existing set and overwrites attributes key by key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeData {
    /// Annotation layers the node belongs to.
    pub layers: LayerSet,
    /// Node attributes.
    pub attributes: AttributeMap,
}

impl NodeData {
    /// Create node data in the given layers.
    pub fn new(layers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            layers: layers.into_iter().map(Into::into).collect(),
            attributes: AttributeMap::new(),
        }
    }

    /// Add a layer.
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layers.insert(layer.into());
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replace the attribute map.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Union another node's layers and attributes into this one.
    pub(crate) fn absorb(&mut self, other: Self) {
        self.layers.extend(other.layers);
        self.attributes.extend(other.attributes);
    }
}

impl HasAttributes for NodeData {
    fn layers(&self) -> &LayerSet {
        &self.layers
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Borrowed view of a node in a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRef<'a> {
    /// Node ID.
    pub id: &'a NodeId,
    /// Node data.
    pub data: &'a NodeData,
}
