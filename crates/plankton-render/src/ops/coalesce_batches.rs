//! `CoalesceBatchesExec`: batch-size plumbing only; partition count, schema
//! and ordering all pass through.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::PlanNode;

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["target_batch_size", "fetch"]);
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
