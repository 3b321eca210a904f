//! `SortPreservingMergeExec`: n sorted partitions in, exactly one out. The
//! merge-key list is the declared ordering on the way up.

use super::common::{self, InputMode};
use super::sort::sort_keys;
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::PlanNode;

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["expr", "fetch"]);
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
    let (columns, _) = common::inherit_columns(&chain.children);
    let sort_order = sort_keys(node);

    Ok(common::chain_result(chain, 1, positions, columns, sort_order))
}
