//! `CoalescePartitionsExec`: collapses however many partitions feed it into
//! a single output stream.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::PlanNode;

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["fetch"]);
    let chain = common::layout_chain(
        s,
        node,
        x,
        y,
        &node.operator,
        &details,
        InputMode::AtLeastOne,
    )?;

    let positions = vec![chain.node_box.center_x()];
    let (columns, sort_order) = common::inherit_columns(&chain.children);

    Ok(common::chain_result(chain, 1, positions, columns, sort_order))
}
