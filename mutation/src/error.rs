//! Mutation error types.

use arbor_core::{CoreError, Kind, NodeKey};
use arbor_label::LabelError;
use arbor_store::StoreError;
use thiserror::Error;

use crate::InsertPosition;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur during mutation.
///
/// Usage errors are raised before anything is written. Storage and label
/// errors can leave the transaction half-applied; it must then be rolled back
/// or closed without committing.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Node not found: {key} (during {operation})")]
    NodeNotFound {
        key: NodeKey,
        operation: &'static str,
    },

    #[error("Cannot {operation}: {kind} {key} does not accept a {position}")]
    InvalidPosition {
        key: NodeKey,
        kind: Kind,
        position: InsertPosition,
        operation: &'static str,
    },

    #[error("Cannot {operation}: {key} is a {kind}, expected a structural node")]
    NotStructural {
        key: NodeKey,
        kind: Kind,
        operation: &'static str,
    },

    #[error("Cannot {operation}: {key} is a {kind}, expected an element")]
    NotElement {
        key: NodeKey,
        kind: Kind,
        operation: &'static str,
    },

    #[error("Cannot {operation}: {key} is a {kind} and carries no value")]
    NotValueNode {
        key: NodeKey,
        kind: Kind,
        operation: &'static str,
    },

    #[error("Cannot {operation}: {key} is a {kind} and carries no name")]
    NotNameNode {
        key: NodeKey,
        kind: Kind,
        operation: &'static str,
    },

    #[error("Cannot {operation}: {kind} {key} cannot be replaced by a {found}")]
    KindMismatch {
        key: NodeKey,
        kind: Kind,
        found: Kind,
        operation: &'static str,
    },

    #[error("Cannot {operation}: text must not be empty")]
    EmptyText { operation: &'static str },

    #[error("Duplicate attribute {name} with identical value on {owner}")]
    DuplicateAttribute { owner: NodeKey, name: String },

    #[error("Duplicate namespace prefix '{prefix}' on {owner}")]
    DuplicateNamespace { owner: NodeKey, prefix: String },

    #[error("The document node cannot be removed or replaced")]
    RemoveDocument,

    #[error("The document node cannot be moved")]
    MoveDocument,

    #[error("Cannot move {key} onto itself")]
    MoveOntoSelf { key: NodeKey },

    #[error("Cannot move {key} below its own descendant {destination}")]
    MoveIntoSubtree { key: NodeKey, destination: NodeKey },

    #[error("Malformed subtree: {reason}")]
    MalformedSubtree { reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MutationError {
    pub fn node_not_found(key: NodeKey, operation: &'static str) -> Self {
        Self::NodeNotFound { key, operation }
    }

    pub fn invalid_position(
        key: NodeKey,
        kind: Kind,
        position: InsertPosition,
        operation: &'static str,
    ) -> Self {
        Self::InvalidPosition {
            key,
            kind,
            position,
            operation,
        }
    }

    pub fn not_structural(key: NodeKey, kind: Kind, operation: &'static str) -> Self {
        Self::NotStructural {
            key,
            kind,
            operation,
        }
    }

    pub fn not_element(key: NodeKey, kind: Kind, operation: &'static str) -> Self {
        Self::NotElement {
            key,
            kind,
            operation,
        }
    }

    pub fn not_value_node(key: NodeKey, kind: Kind, operation: &'static str) -> Self {
        Self::NotValueNode {
            key,
            kind,
            operation,
        }
    }

    pub fn not_name_node(key: NodeKey, kind: Kind, operation: &'static str) -> Self {
        Self::NotNameNode {
            key,
            kind,
            operation,
        }
    }

    pub fn duplicate_attribute(owner: NodeKey, name: impl Into<String>) -> Self {
        Self::DuplicateAttribute {
            owner,
            name: name.into(),
        }
    }

    pub fn duplicate_namespace(owner: NodeKey, prefix: impl Into<String>) -> Self {
        Self::DuplicateNamespace {
            owner,
            prefix: prefix.into(),
        }
    }

    pub fn malformed_subtree(reason: impl Into<String>) -> Self {
        Self::MalformedSubtree {
            reason: reason.into(),
        }
    }

    /// True when the caller violated a precondition and nothing was written.
    pub fn is_usage(&self) -> bool {
        match self {
            Self::Core(e) => e.is_usage(),
            Self::Label(_) | Self::Store(_) => false,
            _ => true,
        }
    }
}
