use crate::graph::GraphError;
use crate::navigator::NavigationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced by the top-level tree operations.
///
/// Every variant is recoverable at the operation boundary: front ends turn
/// them into an [`ErrorEnvelope`] instead of aborting.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("PDF file not found: {path}")]
    DocumentAccess { path: String, details: Option<String> },

    #[error("Error parsing PDF: {0}")]
    Parsing(String),

    #[error("Invalid object ID format: {id}. Expected format: '{expected}'")]
    InvalidObjectId { id: String, expected: &'static str },

    #[error("Object {id} not found in PDF")]
    ObjectNotFound { id: String, details: String },

    #[error(transparent)]
    InvalidPath(#[from] NavigationError),

    #[error("Maximum nesting depth exceeded: {depth} (limit: {limit})")]
    RecursionLimit { depth: usize, limit: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TreeResult<T> = std::result::Result<T, TreeError>;

impl TreeError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TreeError::DocumentAccess { .. } => "document_access",
            TreeError::Parsing(_) => "parsing",
            TreeError::InvalidObjectId { .. } => "invalid_object_id",
            TreeError::ObjectNotFound { .. } => "object_not_found",
            TreeError::InvalidPath(_) => "invalid_path",
            TreeError::RecursionLimit { .. } => "recursion_limit",
            TreeError::Internal(_) => "internal",
        }
    }

    /// Diagnostic detail attached to the error, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            TreeError::DocumentAccess { details, .. } => details.clone(),
            TreeError::Parsing(message) => Some(message.clone()),
            TreeError::InvalidObjectId { .. } => None,
            TreeError::ObjectNotFound { details, .. } => Some(details.clone()),
            TreeError::InvalidPath(err) => Some(err.details()),
            TreeError::RecursionLimit { .. } => None,
            TreeError::Internal(message) => Some(message.clone()),
        }
    }

    /// Whether the error is one of the classified, expected failure kinds.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TreeError::Internal(_))
    }

    pub(crate) fn from_graph(id: impl Into<String>, err: GraphError) -> Self {
        match err {
            GraphError::ObjectNotFound { reason, .. } => TreeError::ObjectNotFound {
                id: id.into(),
                details: reason,
            },
            GraphError::InvalidStructure(message) => TreeError::Parsing(message),
            GraphError::Internal(message) => TreeError::Internal(message),
        }
    }
}

impl From<GraphError> for TreeError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::ObjectNotFound { id, reason } => TreeError::ObjectNotFound {
                id: id.to_string(),
                details: reason,
            },
            GraphError::InvalidStructure(message) => TreeError::Parsing(message),
            GraphError::Internal(message) => TreeError::Internal(message),
        }
    }
}

/// Error payload returned in place of a success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: Option<String>,
}

impl From<&TreeError> for ErrorEnvelope {
    fn from(err: &TreeError) -> Self {
        if let TreeError::Internal(message) = err {
            tracing::error!(error = %message, "unexpected failure while inspecting PDF");
            return ErrorEnvelope {
                error: "Internal server error".to_string(),
                details: None,
            };
        }

        ErrorEnvelope {
            error: err.to_string(),
            details: err.details(),
        }
    }
}

impl From<TreeError> for ErrorEnvelope {
    fn from(err: TreeError) -> Self {
        ErrorEnvelope::from(&err)
    }
}
