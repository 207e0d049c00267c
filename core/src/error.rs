//! Error types for the node model.

use thiserror::Error;

use crate::Kind;

/// Errors raised while validating or decoding node content.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A qualified name or processing-instruction target is malformed.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Node content violates the rules for its kind.
    #[error("Invalid {kind} content: {reason}")]
    InvalidContent { kind: Kind, reason: String },

    /// A stored value could not be compressed or decompressed.
    #[error("Value codec failure: {message}")]
    Codec { message: String },

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_content(kind: Kind, reason: impl Into<String>) -> Self {
        Self::InvalidContent {
            kind,
            reason: reason.into(),
        }
    }

    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the caller supplied bad input, as opposed to a storage fault.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidName { .. } | Self::InvalidContent { .. })
    }
}

/// Result type for node model operations.
pub type CoreResult<T> = Result<T, CoreError>;
