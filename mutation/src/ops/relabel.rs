//! Order label regeneration for a moved subtree.

use std::collections::VecDeque;

use arbor_core::{children, NodeKey, OrderLabel};
use arbor_label::Region;

use crate::engine::MutationEngine;
use crate::error::MutationResult;

const OP: &str = "relabel";

/// Give `root` a label between its current neighbours, then relabel every
/// node below it in level order.
pub(crate) fn relabel(engine: &mut MutationEngine, root: NodeKey) -> MutationResult<()> {
    if !engine.config.order_labels {
        return Ok(());
    }
    let node = engine.node(root, OP)?;
    let Some(parent) = node.parent else {
        return Ok(());
    };
    let (left, right) = (node.left_sibling(), node.right_sibling());
    let label = engine.new_label(parent, Region::Children, left, right)?;
    engine.modify(root)?.label = label;

    let mut queue = VecDeque::from([root]);
    while let Some(key) = queue.pop_front() {
        let node = engine.node(key, OP)?;
        let Some(owner) = node.label.clone() else {
            continue;
        };
        let namespaces = node.namespaces().to_vec();
        let attributes = node.attributes().to_vec();
        let kids: Vec<NodeKey> = children(&*engine.page, key).map(|c| c.key).collect();
        relabel_run(engine, &owner, Region::Namespaces, &namespaces)?;
        relabel_run(engine, &owner, Region::Attributes, &attributes)?;
        relabel_run(engine, &owner, Region::Children, &kids)?;
        queue.extend(kids);
    }
    Ok(())
}

/// Label `keys` left to right as a fresh run inside `region` of `owner`.
fn relabel_run(
    engine: &mut MutationEngine,
    owner: &OrderLabel,
    region: Region,
    keys: &[NodeKey],
) -> MutationResult<()> {
    let mut previous: Option<OrderLabel> = None;
    for &key in keys {
        let label = match &previous {
            None => OrderLabel::first_in(owner, region),
            Some(prev) => OrderLabel::between(owner, region, Some(prev), None)?,
        };
        engine.modify(key)?.label = Some(label.clone());
        previous = Some(label);
    }
    Ok(())
}
