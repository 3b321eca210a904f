//! `UnionExec`: n-ary fan-in. Children are generated first at provisional
//! positions to learn their true rendered widths, then the row is shifted to
//! sit centered under the union box; output cardinality is the sum of the
//! inputs.

use super::common::{self, draw_operator_box, segment_bottom};
use crate::arrows::draw_child_edge;
use crate::geom::{self, ELLIPSIS_THRESHOLD};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::PlanNode;

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let node_box = draw_operator_box(s, &node.operator, &[], x, y);

    if node.children.is_empty() {
        return Ok(NodeLayout {
            x: node_box.x,
            y: node_box.y,
            width: node_box.width,
            height: node_box.height,
            subtree_min_x: node_box.x,
            subtree_max_x: node_box.right(),
            subtree_bottom: node_box.bottom(),
            anchor_id: node_box.id,
            output_arrow_count: 0,
            output_arrow_positions: Vec::new(),
            output_columns: Vec::new(),
            output_sort_order: Vec::new(),
        });
    }

    let top_y = node_box.bottom() + s.cfg.vertical_spacing;
    let row = common::layout_children_row(
        s,
        &node.children,
        node_box.x,
        node_box.center_x(),
        top_y,
        2.0,
    )?;

    let mut total = 0usize;
    let segments = segment_bottom(&node_box, row.children.len());
    for (child, (left, right)) in row.children.iter().zip(segments) {
        let count = child.output_arrow_count.max(1);
        total += count;
        draw_child_edge(s, child, count, &node_box.id, node_box.bottom(), left, right);
    }

    let positions = if total <= ELLIPSIS_THRESHOLD {
        geom::distribute_in_band(total, node_box.x, node_box.right())
    } else {
        Vec::new()
    };
    let (columns, sort_order) = common::inherit_columns(&row.children);

    Ok(NodeLayout {
        x: node_box.x,
        y: node_box.y,
        width: node_box.width,
        height: node_box.height,
        subtree_min_x: node_box.x.min(row.min_x),
        subtree_max_x: node_box.right().max(row.max_x),
        subtree_bottom: row.bottom,
        anchor_id: node_box.id,
        output_arrow_count: total,
        output_arrow_positions: positions,
        output_columns: columns,
        output_sort_order: sort_order,
    })
}
