//! Arbor Core
//!
//! Shared node model for the arbor tree store.
//!
//! Responsibilities:
//! - Define node, name and revision identifiers
//! - Define the tagged-union node record and its kind-specific fields
//! - Validate qualified names and node content
//! - Provide the read-only `NodeReader` view used by every other crate
//! - Hold resource-level configuration

mod config;
mod error;
mod id;
mod kind;
mod name;
mod node;
mod reader;
mod value;

pub use arbor_label::OrderLabel;
pub use config::{HashKind, ResourceConfig};
pub use error::{CoreError, CoreResult};
pub use id::{NameKey, NodeKey, PathNodeKey, Revision};
pub use kind::Kind;
pub use name::{validate_comment, validate_pi_content, validate_pi_target, QName};
pub use node::{NameRef, Node, NodeKind, StructLinks};
pub use reader::{ancestors, children, resolve_name, subtree_keys, Children, NodeReader};
pub use value::Value;
