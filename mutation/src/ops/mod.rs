//! Mutation operation implementations.
//!
//! Each operation is implemented in its own module and works directly on the
//! engine's fields. `link` holds the sibling-chain plumbing they share.

mod attribute;
mod copy;
mod insert;
mod link;
mod move_subtree;
mod relabel;
mod remove;
mod replace;
mod value;

pub(crate) use attribute::{insert_attribute, insert_namespace};
pub(crate) use copy::{capture, insert_events, insert_subtree};
pub(crate) use insert::{insert_structural, NewNode};
pub(crate) use move_subtree::move_subtree;
pub(crate) use remove::remove;
pub(crate) use replace::{replace, Replacement, REPLACE};
pub(crate) use value::{set_name, set_value};
