//! Resource configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// How subtree hashes are maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    /// No hashes are stored.
    None,
    /// Hashes are adjusted incrementally along the ancestor chain.
    #[default]
    Rolling,
    /// Touched subtrees and ancestor chains are recomputed bottom-up.
    Postorder,
}

/// Settings fixed when a resource is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub hash_kind: HashKind,
    /// Store order labels (DeweyIDs) on every node.
    pub order_labels: bool,
    /// Maintain path summary references on named nodes.
    pub path_summary: bool,
    /// Deflate stored values.
    pub text_compression: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            hash_kind: HashKind::Rolling,
            order_labels: true,
            path_summary: true,
            text_compression: false,
        }
    }
}

impl ResourceConfig {
    pub fn from_toml_str(raw: &str) -> CoreResult<Self> {
        toml::from_str(raw).map_err(|e| CoreError::config(e.to_string()))
    }

    pub fn with_hash_kind(mut self, hash_kind: HashKind) -> Self {
        self.hash_kind = hash_kind;
        self
    }
}
