//! Arrow bundles between a node and one of its children, including ellipsis
//! collapsing and the column labels rendered beside the bundle.

use crate::geom::{self, point, ELLIPSIS_THRESHOLD};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::text::estimate_text_width;

const LABEL_PADDING: f64 = 12.0;

/// Draws the data-flow arrows for one parent/child edge.
///
/// `count` is the true cardinality of the edge; the caller has already
/// applied its family's input rule (`max(1, ..)` or exact). Positions the
/// child supplied are reused so stacked operators get straight, end-to-end
/// aligned arrows; otherwise both ends fall back to balanced fans. Fans past
/// the ellipsis threshold render two arrows per side plus a glyph while the
/// propagated cardinality stays `count`.
pub(crate) fn draw_child_edge(
    s: &mut Session,
    child: &NodeLayout,
    count: usize,
    parent_anchor: &str,
    parent_bottom: f64,
    parent_left: f64,
    parent_right: f64,
) {
    if count == 0 {
        return;
    }

    let child_left = child.x;
    let child_right = child.x + child.width;
    let gap_mid = (parent_bottom + child.y) / 2.0;

    let reuse = child.output_arrow_positions.len() == count
        && count <= ELLIPSIS_THRESHOLD
        && child
            .output_arrow_positions
            .iter()
            .all(|&p| p >= parent_left && p <= parent_right);

    let (start_xs, end_xs, ellipsis_x) = if reuse {
        let xs = child.output_arrow_positions.clone();
        (xs.clone(), xs, None)
    } else if count <= ELLIPSIS_THRESHOLD {
        (
            geom::distribute_in_band(count, child_left, child_right),
            geom::distribute_in_band(count, parent_left, parent_right),
            None,
        )
    } else {
        let start = geom::ellipsis_split(count, child_left, child_right);
        let end = geom::ellipsis_split(count, parent_left, parent_right);
        let glyph = match (start.ellipsis_at, end.ellipsis_at) {
            (Some(a), Some(b)) => Some((a + b) / 2.0),
            _ => None,
        };
        (start.positions, end.positions, glyph)
    };

    for (&sx, &ex) in start_xs.iter().zip(end_xs.iter()) {
        s.add_arrow(
            point(sx, child.y),
            point(ex, parent_bottom),
            Some(&child.anchor_id),
            Some(parent_anchor),
        );
    }

    if let Some(x) = ellipsis_x {
        let size = s.cfg.font_size;
        let color = s.cfg.arrow_stroke_color.clone();
        s.add_centered_text(x, gap_mid - size * 0.6, "…", size, &color);
    }

    draw_column_labels(s, child, &end_xs, gap_mid);
}

/// Renders the child's output columns beside the bundle, grouping
/// consecutive columns with the same highlight state into single text runs
/// (highlight = column known to be sorted).
pub(crate) fn draw_column_labels(
    s: &mut Session,
    child: &NodeLayout,
    arrow_xs: &[f64],
    gap_mid: f64,
) {
    if child.output_columns.is_empty() {
        return;
    }

    let runs = label_runs(&child.output_columns, &child.output_sort_order);
    let size = s.cfg.detail_label_size();
    let rightmost = arrow_xs.iter().fold(child.x + child.width, |a, &b| a.max(b));
    let mut x = rightmost + LABEL_PADDING;
    let y = gap_mid - size * 0.7;

    let total = runs.len();
    for (i, (text, highlighted)) in runs.into_iter().enumerate() {
        let fragment = if i + 1 < total {
            format!("{text}, ")
        } else {
            text
        };
        let color = if highlighted {
            s.cfg.highlight_color.clone()
        } else {
            s.cfg.box_stroke_color.clone()
        };
        s.add_text(x, y, &fragment, size, &color);
        x += estimate_text_width(&fragment, size);
    }
}

/// Draws a join-side bundle: arrows leave the child's top edge and converge
/// on the boundary of an ellipse (the hash-table shape), each endpoint
/// computed from the ray toward the ellipse center.
pub(crate) fn draw_converging_edge(
    s: &mut Session,
    child: &NodeLayout,
    count: usize,
    target_center: crate::geom::Point,
    target_width: f64,
    target_height: f64,
    target_anchor: &str,
) {
    if count == 0 {
        return;
    }

    let child_left = child.x;
    let child_right = child.x + child.width;

    let (start_xs, ellipsis_x) = if count <= ELLIPSIS_THRESHOLD {
        let xs = if child.output_arrow_positions.len() == count {
            child.output_arrow_positions.clone()
        } else {
            geom::distribute_in_band(count, child_left, child_right)
        };
        (xs, None)
    } else {
        let fan = geom::ellipsis_split(count, child_left, child_right);
        (fan.positions, fan.ellipsis_at)
    };

    for &sx in &start_xs {
        let start = point(sx, child.y);
        let end = geom::ellipse_edge_intersection(start, target_center, target_width, target_height);
        s.add_arrow(start, end, Some(&child.anchor_id), Some(target_anchor));
    }

    if let Some(x) = ellipsis_x {
        let size = s.cfg.font_size;
        let y = (child.y + target_center.y) / 2.0;
        let color = s.cfg.arrow_stroke_color.clone();
        s.add_centered_text(x, y - size * 0.6, "…", size, &color);
    }

    let label_mid = (child.y + target_center.y) / 2.0;
    draw_column_labels(s, child, &start_xs, label_mid);
}

pub(crate) fn label_runs(columns: &[String], sort_order: &[String]) -> Vec<(String, bool)> {
    let mut runs: Vec<(String, bool)> = Vec::new();
    for col in columns {
        let highlighted = sort_order.contains(col);
        match runs.last_mut() {
            Some((text, state)) if *state == highlighted => {
                text.push_str(", ");
                text.push_str(col);
            }
            _ => runs.push((col.clone(), highlighted)),
        }
    }
    runs
}
