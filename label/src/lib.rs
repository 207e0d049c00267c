//! Arbor Label
//!
//! Hierarchical, order-preserving node labels (DeweyIDs).
//!
//! Responsibilities:
//! - Represent labels as division sequences compared lexicographically
//! - Synthesize a label for the first node of a region
//! - Synthesize a label strictly between two neighbours, or past an open end
//!
//! # Encoding
//!
//! A label is its parent's label followed by a division run. Odd divisions
//! terminate a run, even divisions are carets that only exist to make room
//! between two odd neighbours. The document is `1`. Under an element the
//! namespace area starts with `1`, the attribute area with `3`, and
//! structural children use runs starting at 4 or above, so namespaces sort
//! before attributes and attributes before children.

mod error;
mod label;

pub use error::{LabelError, LabelResult};
pub use label::{OrderLabel, Region};
