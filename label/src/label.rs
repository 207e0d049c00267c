//! Label value type and synthesis.

use std::cmp::max;
use std::fmt;

use crate::error::{LabelError, LabelResult};

/// Division assigned to the first node of an empty region.
const FIRST: u32 = 17;

/// Gap left between consecutively appended siblings.
const DISTANCE: u32 = 16;

const NAMESPACE_MARKER: u32 = 1;
const ATTRIBUTE_MARKER: u32 = 3;

/// Lowest division allowed at the start of a child run.
const CHILD_FLOOR: u32 = 4;

/// The area of a parent's label space a node is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Namespaces,
    Attributes,
    Children,
}

impl Region {
    fn prefix(self, parent: &OrderLabel) -> Vec<u32> {
        let mut prefix = parent.0.clone();
        match self {
            Region::Namespaces => prefix.push(NAMESPACE_MARKER),
            Region::Attributes => prefix.push(ATTRIBUTE_MARKER),
            Region::Children => {}
        }
        prefix
    }

    fn floor(self) -> u32 {
        match self {
            Region::Children => CHILD_FLOOR,
            Region::Namespaces | Region::Attributes => 0,
        }
    }
}

/// An order label. Label order is document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderLabel(Vec<u32>);

impl OrderLabel {
    /// Label of the document node.
    pub fn root() -> Self {
        Self(vec![1])
    }

    pub fn from_divisions(divisions: Vec<u32>) -> Self {
        Self(divisions)
    }

    pub fn divisions(&self) -> &[u32] {
        &self.0
    }

    /// Label for the first node placed in `region` of `parent`.
    pub fn first_in(parent: &OrderLabel, region: Region) -> Self {
        let mut divisions = region.prefix(parent);
        divisions.push(FIRST);
        Self(divisions)
    }

    pub fn new_child(&self) -> Self {
        Self::first_in(self, Region::Children)
    }

    pub fn new_attribute(&self) -> Self {
        Self::first_in(self, Region::Attributes)
    }

    pub fn new_namespace(&self) -> Self {
        Self::first_in(self, Region::Namespaces)
    }

    /// Whether `other` lies in the subtree labelled by `self`.
    pub fn is_ancestor_of(&self, other: &OrderLabel) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    /// Synthesize a label strictly between `left` and `right` inside `region`
    /// of `parent`. Either neighbour may be absent.
    pub fn between(
        parent: &OrderLabel,
        region: Region,
        left: Option<&OrderLabel>,
        right: Option<&OrderLabel>,
    ) -> LabelResult<Self> {
        let prefix = region.prefix(parent);
        let floor = region.floor();
        let run_of = |label: &OrderLabel| -> LabelResult<Vec<u32>> {
            match label.0.strip_prefix(prefix.as_slice()) {
                Some(run) if !run.is_empty() && run[0] >= floor => Ok(run.to_vec()),
                _ => Err(LabelError::outside_region(label, parent)),
            }
        };

        let run = match (left, right) {
            (None, None) => vec![FIRST],
            (Some(l), None) => after(&run_of(l)?).ok_or_else(|| LabelError::exhausted(l))?,
            (None, Some(r)) => before(&run_of(r)?, floor),
            (Some(l), Some(r)) => {
                if l >= r {
                    return Err(LabelError::unordered(l, r));
                }
                mid(&run_of(l)?, &run_of(r)?).ok_or_else(|| LabelError::unordered(l, r))?
            }
        };

        let mut divisions = prefix;
        divisions.extend(run);
        Ok(Self(divisions))
    }
}

impl fmt::Display for OrderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for division in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", division)?;
            first = false;
        }
        Ok(())
    }
}

/// A run sorting after `run` that shares everything but its last division.
fn after(run: &[u32]) -> Option<Vec<u32>> {
    let (last, init) = run.split_last()?;
    let mut out = init.to_vec();
    if let Some(next) = last.checked_add(DISTANCE) {
        out.push(next);
    } else if *last < u32::MAX {
        out.push(last + 1);
        out.push(FIRST);
    } else {
        return None;
    }
    Some(out)
}

/// A run sorting before `run`, whose first division stays at or above `floor`.
fn before(run: &[u32], floor: u32) -> Vec<u32> {
    let Some((last, init)) = run.split_last() else {
        return vec![FIRST];
    };
    let floor = if init.is_empty() { floor } else { 0 };
    let mut out = init.to_vec();
    if *last >= floor + 3 {
        out.push(max(last.saturating_sub(DISTANCE), floor + 1));
    } else {
        // No odd division fits below; open a caret at the floor.
        out.push(floor);
        out.push(FIRST);
    }
    out
}

/// A run strictly between `a` and `b`, given `a < b`.
fn mid(a: &[u32], b: &[u32]) -> Option<Vec<u32>> {
    let i = a.iter().zip(b).position(|(x, y)| x != y)?;
    let (x, y) = (a[i], b[i]);
    let mut out = a[..i].to_vec();

    if let Some(z) = odd_between(x, y) {
        out.push(z);
    } else if y - x >= 2 {
        out.push(x + 1);
        out.push(FIRST);
    } else if x % 2 == 0 {
        out.push(x);
        out.extend(after(&a[i + 1..])?);
    } else {
        out.push(y);
        out.extend(before(&b[i + 1..], 0));
    }
    Some(out)
}

fn odd_between(x: u32, y: u32) -> Option<u32> {
    if y <= x || y - x < 2 {
        return None;
    }
    let middle = x + (y - x) / 2;
    let candidate = if middle % 2 == 1 {
        middle
    } else if middle + 1 < y {
        middle + 1
    } else {
        middle - 1
    };
    (candidate > x && candidate < y && candidate % 2 == 1).then_some(candidate)
}
