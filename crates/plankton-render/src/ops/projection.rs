//! `ProjectionExec`: partition count passes through; the declared expression
//! list becomes the output schema.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::{expr, PlanNode};

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["expr"]);
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
    let (inherited, sort_order) = common::inherit_columns(&chain.children);
    let columns = match node.property("expr").and_then(expr::bracket_list) {
        Some(items) => items
            .into_iter()
            .map(|i| expr::output_name(i).to_string())
            .collect(),
        None => inherited,
    };

    Ok(common::chain_result(chain, count, positions, columns, sort_order))
}
