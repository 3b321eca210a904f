//! `SortExec`: partition count passes through (each partition sorts
//! independently); the declared expression list becomes the known ordering.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::{expr, PlanNode};

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["expr", "preserve_partitioning"]);
    let chain = common::layout_chain(
        s,
        node,
        x,
        y,
        &node.operator,
        &details,
        InputMode::AtLeastOne,
    )?;

    let count = chain.input_total;
    let positions = common::passthrough_positions(&chain.node_box, count, chain.children.first());
    let (columns, _) = common::inherit_columns(&chain.children);
    let sort_order = sort_keys(node);

    Ok(common::chain_result(chain, count, positions, columns, sort_order))
}

/// The columns a sort declares, in key order: `expr=[a@0 ASC, b@1 DESC]`
/// (or the key-less bracket form) -> `[a, b]`.
pub(super) fn sort_keys(node: &PlanNode) -> Vec<String> {
    node.property_or_bare("expr", |frag| frag.starts_with('['))
        .and_then(expr::bracket_list)
        .map(|items| {
            items
                .into_iter()
                .map(|i| expr::sort_column(i).to_string())
                .collect()
        })
        .unwrap_or_default()
}
