//! `HashJoinExec`: exactly two inputs, asymmetric in role. The build side is
//! consumed into a hash table (drawn as an ellipse under the join box) and
//! the probe side streams against it, so the node's output cardinality is
//! the probe side's. Arrows from both children terminate on the ellipse.

use super::common::{detail_lines, draw_operator_box};
use crate::arrows::draw_converging_edge;
use crate::geom::{self, point, ELLIPSIS_THRESHOLD};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::{Error, Result};
use plankton_core::{expr, PlanNode};

const HASH_LABEL: &str = "hash table";

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    if node.children.len() != 2 {
        return Err(Error::JoinArity {
            operator: node.operator.clone(),
            found: node.children.len(),
        });
    }

    let details = detail_lines(node, &["mode", "join_type", "on", "filter"]);
    let node_box = draw_operator_box(s, &node.operator, &details, x, y);

    let ew = s.cfg.box_width * 0.6;
    let eh = s.cfg.box_height * 0.55;
    let ellipse_x = node_box.center_x() - ew / 2.0;
    let ellipse_y = node_box.bottom() + 10.0;
    let ellipse_id = s.add_ellipse(ellipse_x, ellipse_y, ew, eh);
    let ellipse_center = point(node_box.center_x(), ellipse_y + eh / 2.0);
    {
        let size = s.cfg.detail_label_size();
        let color = s.cfg.box_stroke_color.clone();
        s.add_centered_text(ellipse_center.x, ellipse_center.y - size * 0.6, HASH_LABEL, size, &color);
    }

    let children_top = ellipse_y + eh + s.cfg.vertical_spacing;
    let offset = s.cfg.box_width + s.cfg.horizontal_spacing;

    let build_mark = s.mark();
    let build = super::layout_node(s, &node.children[0], node_box.x - offset, children_top, false)?;
    // Keep the build subtree clear of the center column.
    let limit = ellipse_x - s.cfg.horizontal_spacing / 2.0;
    let build = if build.subtree_max_x > limit {
        let dx = limit - build.subtree_max_x;
        s.translate_x(build_mark, dx);
        build.translated_x(dx)
    } else {
        build
    };

    let probe_mark = s.mark();
    let probe = super::layout_node(s, &node.children[1], node_box.x + offset, children_top, false)?;
    let limit = ellipse_x + ew + s.cfg.horizontal_spacing / 2.0;
    let probe = if probe.subtree_min_x < limit {
        let dx = limit - probe.subtree_min_x;
        s.translate_x(probe_mark, dx);
        probe.translated_x(dx)
    } else {
        probe
    };

    let build_count = build.output_arrow_count.max(1);
    draw_converging_edge(s, &build, build_count, ellipse_center, ew, eh, &ellipse_id);
    let probe_count = probe.output_arrow_count.max(1);
    draw_converging_edge(s, &probe, probe_count, ellipse_center, ew, eh, &ellipse_id);

    let count = probe.output_arrow_count;
    let positions = if count > 0 && count <= ELLIPSIS_THRESHOLD {
        geom::distribute_in_band(count, node_box.x, node_box.right())
    } else {
        Vec::new()
    };
    let columns = node
        .property("projection")
        .and_then(expr::bracket_list)
        .map(|items| {
            items
                .into_iter()
                .map(|i| expr::output_name(i).to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(NodeLayout {
        x: node_box.x,
        y: node_box.y,
        width: node_box.width,
        height: node_box.height,
        subtree_min_x: build.subtree_min_x.min(node_box.x),
        subtree_max_x: probe.subtree_max_x.max(node_box.right()),
        subtree_bottom: build.subtree_bottom.max(probe.subtree_bottom),
        anchor_id: node_box.id,
        output_arrow_count: count,
        output_arrow_positions: positions,
        output_columns: columns,
        output_sort_order: probe.output_sort_order,
    })
}
