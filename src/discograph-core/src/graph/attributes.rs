//! Attribute storage for graph elements.
//!
//! This module provides the `AttributeMap` type, the `HasAttributes` trait
//! shared by node and edge data, and the validation applied to caller
//! supplied layers and attribute keys.

use std::collections::BTreeMap;

use common_error::{DiscographResult, contract_err};

use super::identifiers::{LayerSet, RESERVED_ATTRIBUTE_KEYS};
use crate::types::Value;

/// Map of attribute names to values.
pub type AttributeMap = BTreeMap<String, Value>;

/// Trait for elements that carry layers and attributes.
pub trait HasAttributes {
    /// Get the layer set.
    fn layers(&self) -> &LayerSet;

    /// Get the attribute map.
    fn attributes(&self) -> &AttributeMap;

    /// Get an attribute value by name.
    fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().get(name)
    }

    /// Check if an attribute exists.
    fn has_attribute(&self, name: &str) -> bool {
        self.attributes().contains_key(name)
    }

    /// Check membership in a layer.
    fn in_layer(&self, layer: &str) -> bool {
        self.layers().contains(layer)
    }
}

/// Collect caller supplied layers, falling back to `default` when empty.
pub(crate) fn collect_layers<I, S>(layers: I, default: &str) -> DiscographResult<LayerSet>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set = LayerSet::new();
    for layer in layers {
        let layer = layer.into();
        if layer.trim().is_empty() {
            contract_err!("layer names must be non-empty strings");
        }
        set.insert(layer);
    }
    if set.is_empty() {
        set.insert(default.to_string());
    }
    Ok(set)
}

/// Reject empty and reserved attribute keys.
pub(crate) fn validate_attributes(attributes: &AttributeMap) -> DiscographResult<()> {
    for key in attributes.keys() {
        validate_attribute_key(key)?;
    }
    Ok(())
}

pub(crate) fn validate_attribute_key(key: &str) -> DiscographResult<()> {
    if key.is_empty() {
        contract_err!("attribute keys must be non-empty");
    }
    if RESERVED_ATTRIBUTE_KEYS.contains(&key) {
        contract_err!("attribute key '{}' is reserved", key);
    }
    Ok(())
}
