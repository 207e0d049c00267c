//! Node kinds.

use std::fmt;

/// The kind of a node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Document,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    Attribute,
    Namespace,
}

impl Kind {
    /// Structural kinds take part in the parent/child/sibling tree.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Kind::Attribute | Kind::Namespace)
    }

    /// Kinds that carry a qualified name.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Kind::Element | Kind::Attribute | Kind::Namespace | Kind::ProcessingInstruction
        )
    }

    /// Kinds that carry a value.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            Kind::Text | Kind::Comment | Kind::ProcessingInstruction | Kind::Attribute
        )
    }

    /// Kinds that may own structural children.
    pub fn accepts_children(&self) -> bool {
        matches!(self, Kind::Document | Kind::Element)
    }

    /// Stable tag byte used when hashing node content.
    pub fn tag(&self) -> u8 {
        match self {
            Kind::Document => 1,
            Kind::Element => 2,
            Kind::Text => 3,
            Kind::Comment => 4,
            Kind::ProcessingInstruction => 5,
            Kind::Attribute => 6,
            Kind::Namespace => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Document => "document",
            Kind::Element => "element",
            Kind::Text => "text",
            Kind::Comment => "comment",
            Kind::ProcessingInstruction => "processing-instruction",
            Kind::Attribute => "attribute",
            Kind::Namespace => "namespace",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
