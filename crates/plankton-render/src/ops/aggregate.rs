//! `AggregateExec`: partition count passes through. The outbound edge labels
//! keep the child's column list and highlight the group-by/aggregate output
//! names, which is what the sort-order slot drives downstream.

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::{expr, PlanNode};

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["mode", "gby", "aggr"]);
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

    let mut emphasis: Vec<String> = Vec::new();
    for key in ["gby", "aggr"] {
        if let Some(items) = node.property(key).and_then(expr::bracket_list) {
            for item in items {
                let name = expr::output_name(item).to_string();
                if !emphasis.contains(&name) {
                    emphasis.push(name);
                }
            }
        }
    }

    Ok(common::chain_result(chain, count, positions, columns, emphasis))
}
