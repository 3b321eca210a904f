//! Default strategy for operators without a registered layout: the node
//! still renders (name + an "Unimplemented" marker) and cardinality follows
//! the simple aggregation rule, so an unknown operator only degrades detail,
//! never the whole diagram.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::text::text_block_height;
use crate::Result;
use plankton_core::PlanNode;

const MARKER_COLOR: &str = "#e03131";

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let chain = common::layout_chain(s, node, x, y, &node.operator, &[], InputMode::AtLeastOne)?;

    let title_bottom = chain.node_box.y + 12.0
        + text_block_height(&node.operator, s.cfg.operator_label_size());
    s.add_centered_text(
        chain.node_box.center_x(),
        title_bottom + 6.0,
        "Unimplemented",
        s.cfg.detail_label_size(),
        MARKER_COLOR,
    );

    let count = chain.input_total;
    let positions = common::passthrough_positions(&chain.node_box, count, chain.children.first());
    let (columns, sort_order) = common::inherit_columns(&chain.children);

    Ok(common::chain_result(chain, count, positions, columns, sort_order))
}
