//! `GlobalLimitExec` / `LocalLimitExec`: row-count plumbing. Partition
//! count, schema and ordering pass through; skip/fetch show in the box.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::PlanNode;

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["skip", "fetch"]);
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
    let (columns, sort_order) = common::inherit_columns(&chain.children);

    Ok(common::chain_result(chain, count, positions, columns, sort_order))
}
