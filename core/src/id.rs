//! Identity types for arbor records.
//!
//! All identifiers are opaque integers that are:
//! - Unique within their namespace
//! - Never reassigned within a resource's revision lineage

use std::fmt;

/// Unique identifier for a node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// Key of the document root, present in every revision.
    pub const DOCUMENT: NodeKey = NodeKey(0);

    /// Create a new NodeKey from a raw value.
    pub fn new(key: u64) -> Self {
        Self(key)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Key of an entry in the shared name dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(pub u32);

impl NameKey {
    /// Create a new NameKey from a raw value.
    pub fn new(key: u32) -> Self {
        Self(key)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Reference into the path summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathNodeKey(pub u64);

impl PathNodeKey {
    /// Create a new PathNodeKey from a raw value.
    pub fn new(key: u64) -> Self {
        Self(key)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PathNodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Number of a committed revision. Revision 0 holds only the document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(pub u32);

impl Revision {
    /// Create a new Revision from a raw value.
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// The revision that follows this one.
    pub fn next(&self) -> Revision {
        Revision(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
