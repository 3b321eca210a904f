//! `SortMergeJoinExec`: exactly two sorted inputs that must agree on
//! partition count; a mismatch is a malformed plan, not something a diagram
//! can paper over. Each side's arrows converge on its half of the join box.

use super::common::{detail_lines, draw_operator_box, BoxShape};
use crate::geom::{self, point, ELLIPSIS_THRESHOLD};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::{Error, Result};
use plankton_core::{expr, PlanNode};

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    if node.children.len() != 2 {
        return Err(Error::JoinArity {
            operator: node.operator.clone(),
            found: node.children.len(),
        });
    }

    let details = detail_lines(node, &["join_type", "on", "filter"]);
    let node_box = draw_operator_box(s, &node.operator, &details, x, y);

    let children_top = node_box.bottom() + s.cfg.vertical_spacing;
    let offset = s.cfg.box_width + s.cfg.horizontal_spacing;

    let left_mark = s.mark();
    let left = super::layout_node(s, &node.children[0], node_box.x - offset, children_top, false)?;
    let limit = node_box.x - s.cfg.horizontal_spacing / 2.0;
    let left = if left.subtree_max_x > limit {
        let dx = limit - left.subtree_max_x;
        s.translate_x(left_mark, dx);
        left.translated_x(dx)
    } else {
        left
    };

    let right_mark = s.mark();
    let right = super::layout_node(s, &node.children[1], node_box.x + offset, children_top, false)?;
    let limit = node_box.right() + s.cfg.horizontal_spacing / 2.0;
    let right = if right.subtree_min_x < limit {
        let dx = limit - right.subtree_min_x;
        s.translate_x(right_mark, dx);
        right.translated_x(dx)
    } else {
        right
    };

    if left.output_arrow_count != right.output_arrow_count {
        return Err(Error::MergeJoinPartitionMismatch {
            left: left.output_arrow_count,
            right: right.output_arrow_count,
        });
    }
    let count = left.output_arrow_count;

    let mid = node_box.center_x();
    draw_side(s, &left, count.max(1), &node_box, node_box.x, mid);
    draw_side(s, &right, count.max(1), &node_box, mid, node_box.right());

    let positions = if count > 0 && count <= ELLIPSIS_THRESHOLD {
        geom::distribute_in_band(count, node_box.x, node_box.right())
    } else {
        Vec::new()
    };

    let mut columns = left.output_columns.clone();
    for col in &right.output_columns {
        if !columns.contains(col) {
            columns.push(col.clone());
        }
    }
    let sort_order = join_keys(node);

    Ok(NodeLayout {
        x: node_box.x,
        y: node_box.y,
        width: node_box.width,
        height: node_box.height,
        subtree_min_x: left.subtree_min_x.min(node_box.x),
        subtree_max_x: right.subtree_max_x.max(node_box.right()),
        subtree_bottom: left.subtree_bottom.max(right.subtree_bottom),
        anchor_id: node_box.id,
        output_arrow_count: count,
        output_arrow_positions: positions,
        output_columns: columns,
        output_sort_order: sort_order,
    })
}

/// One side's bundle, attached along its half of the box bottom edge.
fn draw_side(
    s: &mut Session,
    child: &NodeLayout,
    count: usize,
    node_box: &BoxShape,
    left: f64,
    right: f64,
) {
    let (start_xs, end_xs, ellipsis) = if count <= ELLIPSIS_THRESHOLD {
        let starts = if child.output_arrow_positions.len() == count {
            child.output_arrow_positions.clone()
        } else {
            geom::distribute_in_band(count, child.x, child.x + child.width)
        };
        (starts, geom::distribute_in_band(count, left, right), None)
    } else {
        let start = geom::ellipsis_split(count, child.x, child.x + child.width);
        let end = geom::ellipsis_split(count, left, right);
        let glyph = start.ellipsis_at;
        (start.positions, end.positions, glyph)
    };

    for (&sx, &ex) in start_xs.iter().zip(end_xs.iter()) {
        s.add_arrow(
            point(sx, child.y),
            point(ex, node_box.bottom()),
            Some(&child.anchor_id),
            Some(&node_box.id),
        );
    }

    if let Some(x) = ellipsis {
        let size = s.cfg.font_size;
        let y = (child.y + node_box.bottom()) / 2.0;
        let color = s.cfg.arrow_stroke_color.clone();
        s.add_centered_text(x, y - size * 0.6, "…", size, &color);
    }

    let gap_mid = (child.y + node_box.bottom()) / 2.0;
    crate::arrows::draw_column_labels(s, child, &start_xs, gap_mid);
}

/// Sort keys implied by the join: the left column of each `on` pair.
fn join_keys(node: &PlanNode) -> Vec<String> {
    node.property("on")
        .and_then(expr::bracket_list)
        .map(|pairs| {
            pairs
                .into_iter()
                .filter_map(|pair| {
                    let inner = pair.trim().strip_prefix('(')?.strip_suffix(')')?;
                    let first = expr::split_top_level(inner, ',').into_iter().next()?;
                    Some(expr::strip_index(first).to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}
