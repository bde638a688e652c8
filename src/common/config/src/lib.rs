//! Configuration management for discograph.
//!
//! Provides the construction defaults for annotation graphs and the knobs
//! used when two graphs are merged.

use serde::{Deserialize, Serialize};

/// Namespace used when a graph is created without an explicit one.
pub const DEFAULT_NAMESPACE: &str = "discoursegraph";

/// Global discograph configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscographConfig {
    /// Graph construction configuration.
    pub graph: GraphConfig,
    /// Merge configuration.
    pub merge: MergeConfig,
}

/// Construction parameters of a single annotation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Default namespace; qualifies attribute keys and serves as fallback layer.
    pub namespace: String,
    /// Document name.
    pub name: String,
    /// Root node ID. `None` means `<namespace>:root_node`.
    pub root_id: Option<String>,
    /// Reject edges whose endpoints were never added as nodes.
    pub strict_edges: bool,
    /// Local name of the token string attribute (`<namespace>:<token_attribute>`).
    pub token_attribute: String,
}

impl GraphConfig {
    /// Create a config for the given namespace, all other fields default.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// The root node ID this config resolves to.
    pub fn resolved_root_id(&self) -> String {
        self.root_id
            .clone()
            .unwrap_or_else(|| format!("{}:root_node", self.namespace))
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            name: String::new(),
            root_id: None,
            strict_edges: false,
            token_attribute: "token".to_string(),
        }
    }
}

/// Parameters of the graph merge engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Number of tokens shown on each side of a tokenization mismatch.
    pub kwic_window: usize,
    /// Include keyword-in-context windows in mismatch messages.
    pub verbose_mismatch: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            kwic_window: 5,
            verbose_mismatch: true,
        }
    }
}
