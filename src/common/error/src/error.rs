//! Core error types for discograph.

use thiserror::Error;

/// Result type alias using `DiscographError`.
pub type DiscographResult<T> = std::result::Result<T, DiscographError>;

/// Core error type for annotation graph operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiscographError {
    /// A caller broke an API contract (bad layer set, reserved attribute key, ...).
    #[error("ContractViolation: {0}")]
    ContractViolation(String),

    /// Node not present in the graph.
    #[error("NodeNotFound: {0}")]
    NodeNotFound(String),

    /// No edge between the given pair of nodes.
    #[error("EdgeNotFound: {from} -> {to}")]
    EdgeNotFound { from: String, to: String },

    /// Structural precondition violation.
    #[error("GraphError: {0}")]
    GraphError(String),

    /// Two graphs do not share the same tokenization.
    #[error("Tokenization mismatch at token {position}: {message}")]
    TokenizationMismatch {
        /// Index into the token lists where the graphs diverge.
        position: usize,
        /// Token string of the receiving graph.
        expected: String,
        /// Token string of the donor graph.
        found: String,
        /// Keyword-in-context window of the receiving graph.
        left_context: String,
        /// Keyword-in-context window of the donor graph.
        right_context: String,
        /// Human readable description including both graph names.
        message: String,
    },

    /// A walk that must terminate ran into a cycle.
    #[error("CycleDetected: node {node} is reachable from itself")]
    CycleDetected { node: String },

    /// A node does not dominate or span any token.
    #[error("EmptySpan: node '{0}' doesn't span any tokens")]
    EmptySpan(String),

    /// A node lacks an attribute the operation depends on.
    #[error("MissingAttribute: node '{node}' has no attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    /// Invalid value provided.
    #[error("ValueError: {0}")]
    ValueError(String),

    /// Internal error (bug in discograph).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl DiscographError {
    /// Create a new `ContractViolation`.
    pub fn contract<S: Into<String>>(msg: S) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Create a new `NodeNotFound` error.
    pub fn node_not_found(node: impl ToString) -> Self {
        Self::NodeNotFound(node.to_string())
    }

    /// Create a new `EdgeNotFound` error.
    pub fn edge_not_found(source: impl ToString, target: impl ToString) -> Self {
        Self::EdgeNotFound {
            from: source.to_string(),
            to: target.to_string(),
        }
    }

    /// Create a new `GraphError`.
    pub fn graph<S: Into<String>>(msg: S) -> Self {
        Self::GraphError(msg.into())
    }

    /// Create a new `CycleDetected` error.
    pub fn cycle(node: impl ToString) -> Self {
        Self::CycleDetected {
            node: node.to_string(),
        }
    }

    /// Create a new `EmptySpan` error.
    pub fn empty_span(node: impl ToString) -> Self {
        Self::EmptySpan(node.to_string())
    }

    /// Create a new `MissingAttribute` error.
    pub fn missing_attribute(node: impl ToString, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            node: node.to_string(),
            attribute: attribute.into(),
        }
    }

    /// Create a new `ValueError`.
    pub fn value_error<S: Into<String>>(msg: S) -> Self {
        Self::ValueError(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// True for the contract-violation class of errors.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation(_))
    }
}

/// Ensure a condition holds, returning a `GraphError` if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::DiscographError::$variant(format!($($msg)*)));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::DiscographError::GraphError($msg.to_string()));
        }
    };
}

/// Return early with a `ContractViolation`.
#[macro_export]
macro_rules! contract_err {
    ($($arg:tt)*) => {
        return Err($crate::DiscographError::ContractViolation(format!($($arg)*)))
    };
}
