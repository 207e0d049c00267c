//! Label error types.

use thiserror::Error;

/// Errors raised while synthesizing labels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    /// Neighbours are equal or out of order.
    #[error("Labels out of order: {left} is not before {right}")]
    Unordered { left: String, right: String },

    /// A neighbour does not live in the requested region of the parent.
    #[error("Label {label} is not inside region of {parent}")]
    OutsideRegion { label: String, parent: String },

    /// No label fits after the given neighbour.
    #[error("Label space exhausted after {label}")]
    Exhausted { label: String },
}

impl LabelError {
    pub fn unordered(left: impl ToString, right: impl ToString) -> Self {
        Self::Unordered {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn outside_region(label: impl ToString, parent: impl ToString) -> Self {
        Self::OutsideRegion {
            label: label.to_string(),
            parent: parent.to_string(),
        }
    }

    pub fn exhausted(label: impl ToString) -> Self {
        Self::Exhausted {
            label: label.to_string(),
        }
    }
}

/// Result type for label synthesis.
pub type LabelResult<T> = Result<T, LabelError>;
