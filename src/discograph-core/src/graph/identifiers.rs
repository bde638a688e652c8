//! Identifiers and closed vocabularies for graph elements.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use common_error::DiscographError;
use serde::{Deserialize, Serialize};

/// Node identifier.
///
/// Importers produce either integer or string IDs; both live side by side
/// in one graph. Integer IDs sort before string IDs in derived orderings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Integer node ID.
    Int(i64),
    /// String node ID.
    Str(String),
}

impl NodeId {
    /// Try to get the string form without allocating.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for NodeId {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<usize> for NodeId {
    fn from(i: usize) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<&String> for NodeId {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

/// Key distinguishing parallel edges between the same ordered node pair.
pub type EdgeKey = u64;

/// Set of annotation layers a node or edge belongs to.
pub type LayerSet = BTreeSet<String>;

/// Attribute keys that are stored structurally and may not be set by callers.
pub const RESERVED_ATTRIBUTE_KEYS: [&str; 2] = ["layers", "edge_type"];

/// Closed vocabulary of edge semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeType {
    /// The source node points to (refers to) the target, e.g. anaphora.
    #[serde(rename = "points_to")]
    Pointing,
    /// The source node dominates the target in a tree.
    #[serde(rename = "dominates")]
    Dominance,
    /// The source node is dominated by the target.
    #[serde(rename = "is_dominated_by")]
    ReverseDominance,
    /// The source node spans the target without dominating it.
    #[serde(rename = "spans")]
    Spanning,
    /// The source token precedes the target token.
    #[serde(rename = "precedes")]
    Precedence,
}

impl EdgeType {
    /// All edge types, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Pointing,
        Self::Dominance,
        Self::ReverseDominance,
        Self::Spanning,
        Self::Precedence,
    ];

    /// Canonical string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pointing => "points_to",
            Self::Dominance => "dominates",
            Self::ReverseDominance => "is_dominated_by",
            Self::Spanning => "spans",
            Self::Precedence => "precedes",
        }
    }

    /// Edge types followed when computing the token span of a node.
    pub const fn is_span_relation(self) -> bool {
        matches!(self, Self::Dominance | Self::Spanning)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = DiscographError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DiscographError::value_error(format!("unknown edge type '{s}'")))
    }
}

/// Annotation format a graph was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphFormat {
    /// Plain graph without an importer.
    #[default]
    Generic,
    /// Whitespace tokenized plain text.
    Tokenized,
    /// TigerXML syntax trees.
    Tiger,
    /// RST trees in rs3 format.
    Rs3,
    /// RST trees in dis format.
    Dis,
    /// MMAX2 markables.
    Mmax2,
    /// ConAnno connective annotation.
    Conano,
    /// PAULA XML standoff.
    Paula,
    /// EXMARaLDA timelines.
    Exmaralda,
    /// Tüba-D/Z ExportXML.
    ExportXml,
    /// SaltXMI documents.
    SaltXmi,
    /// Penn Treebank bracketing.
    Ptb,
    /// CoNLL dependency columns.
    Conll,
    /// Anaphoricity annotation.
    Anaphoricity,
    /// brat standoff annotation.
    Brat,
    /// DeCour dialogue transcripts.
    Decour,
    /// Result of merging graphs of different formats.
    Merged,
}
