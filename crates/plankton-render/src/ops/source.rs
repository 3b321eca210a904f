//! Leaf scan operators (`DataSourceExec` and the older per-format execs).
//!
//! Each declared file group renders as an ellipse feeding the scan box, and
//! becomes one output partition. A source that declares no groups (or only a
//! memory partition count) still reports its cardinality, it just has no
//! file shapes to show.

use super::common::{detail_lines, draw_operator_box};
use crate::geom::{self, ellipse_edge_intersection, point, ELLIPSIS_THRESHOLD};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::text::clip_detail;
use crate::Result;
use plankton_core::{expr, PlanNode};

const GROUP_LABEL_CLIP: usize = 18;

pub(super) fn layout(s: &mut Session, node: &PlanNode, x: f64, y: f64) -> Result<NodeLayout> {
    let details = detail_lines(node, &["file_type", "predicate", "limit"]);
    let node_box = draw_operator_box(s, &node.operator, &details, x, y);

    let groups = file_groups(node);
    let count = output_count(node, &groups);

    let mut subtree_min_x = node_box.x;
    let mut subtree_max_x = node_box.right();
    let mut subtree_bottom = node_box.bottom();

    if !groups.is_empty() {
        let ew = s.cfg.box_width * 0.55;
        let eh = s.cfg.box_height * 0.5;
        let gap = s.cfg.horizontal_spacing * 0.5;
        let top = node_box.bottom() + s.cfg.chain_gap();

        // Which groups get drawn: all of them, or two per side of a glyph.
        let drawn: Vec<usize> = if groups.len() > ELLIPSIS_THRESHOLD {
            vec![0, 1, groups.len() - 2, groups.len() - 1]
        } else {
            (0..groups.len()).collect()
        };

        let slots = if groups.len() > ELLIPSIS_THRESHOLD {
            drawn.len() + 1
        } else {
            drawn.len()
        };
        let row_width = slots as f64 * ew + (slots - 1) as f64 * gap;
        let row_start = node_box.center_x() - row_width / 2.0;
        let attach_xs = geom::distribute_in_band(slots, node_box.x, node_box.right());

        let mut slot = 0usize;
        for (i, &group_idx) in drawn.iter().enumerate() {
            // Leave the middle slot for the glyph in collapsed rows.
            if groups.len() > ELLIPSIS_THRESHOLD && i == drawn.len() / 2 {
                let glyph_x = row_start + slot as f64 * (ew + gap) + ew / 2.0;
                let size = s.cfg.font_size;
                let color = s.cfg.arrow_stroke_color.clone();
                s.add_centered_text(glyph_x, top + eh / 2.0 - size * 0.6, "…", size, &color);
                slot += 1;
            }

            let ex = row_start + slot as f64 * (ew + gap);
            let ellipse_id = s.add_ellipse(ex, top, ew, eh);
            let center = point(ex + ew / 2.0, top + eh / 2.0);

            let label = group_label(&groups[group_idx]);
            if !label.is_empty() {
                let size = s.cfg.detail_label_size();
                let color = s.cfg.box_stroke_color.clone();
                s.add_centered_text(center.x, center.y - size * 0.6, &label, size, &color);
            }

            let attach = point(attach_xs[slot], node_box.bottom());
            let start = ellipse_edge_intersection(attach, center, ew, eh);
            s.add_arrow(start, attach, Some(&ellipse_id), Some(&node_box.id));
            slot += 1;
        }

        subtree_min_x = subtree_min_x.min(row_start);
        subtree_max_x = subtree_max_x.max(row_start + row_width);
        subtree_bottom = top + eh;
    }

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
    let sort_order = node
        .property("output_ordering")
        .and_then(expr::bracket_list)
        .map(|items| {
            items
                .into_iter()
                .map(|i| expr::sort_column(i).to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(NodeLayout {
        x: node_box.x,
        y: node_box.y,
        width: node_box.width,
        height: node_box.height,
        subtree_min_x,
        subtree_max_x,
        subtree_bottom,
        anchor_id: node_box.id,
        output_arrow_count: count,
        output_arrow_positions: positions,
        output_columns: columns,
        output_sort_order: sort_order,
    })
}

/// Parses `file_groups={2 groups: [[a.parquet], [b.parquet, c.parquet]]}`
/// into the per-group file lists.
fn file_groups(node: &PlanNode) -> Vec<Vec<String>> {
    let Some(value) = node.property("file_groups") else {
        return Vec::new();
    };
    let Some(inner) = value
        .trim()
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
    else {
        return Vec::new();
    };
    let Some((_, lists)) = inner.split_once(':') else {
        return Vec::new();
    };
    let Some(groups) = expr::bracket_list(lists) else {
        return Vec::new();
    };
    groups
        .into_iter()
        .filter_map(|g| {
            expr::bracket_list(g)
                .map(|files| files.into_iter().map(str::to_string).collect())
        })
        .collect()
}

/// Declared output partitions: one per file group, else a bare
/// `partitions=N` count (in-memory sources), else zero.
fn output_count(node: &PlanNode, groups: &[Vec<String>]) -> usize {
    if !groups.is_empty() {
        return groups.len();
    }
    if let Some(head) = node
        .property("file_groups")
        .and_then(|v| v.trim().strip_prefix('{'))
        .and_then(|v| v.split_whitespace().next())
    {
        if let Ok(n) = head.parse::<usize>() {
            return n;
        }
    }
    node.property("partitions")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0)
}

/// `[a/b/part-0.parquet, ...]` -> `part-0.parquet (+1)`.
fn group_label(files: &[String]) -> String {
    let Some(first) = files.first() else {
        return String::new();
    };
    let base = first.rsplit('/').next().unwrap_or(first);
    let mut label = clip_detail(base, GROUP_LABEL_CLIP);
    if files.len() > 1 {
        label.push_str(&format!(" (+{})", files.len() - 1));
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use plankton_core::{parse_plan, ParseOptions};

    fn node(line: &str) -> PlanNode {
        parse_plan(line, ParseOptions::default())
            .expect("parse ok")
            .expect("root present")
    }

    #[test]
    fn parses_file_groups() {
        let n = node(
            "DataSourceExec: file_groups={2 groups: [[a/x.parquet], [y.parquet, z.parquet]]}, file_type=parquet\n",
        );
        let groups = file_groups(&n);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec!["a/x.parquet"]);
        assert_eq!(groups[1], vec!["y.parquet", "z.parquet"]);
        assert_eq!(output_count(&n, &groups), 2);
    }

    #[test]
    fn memory_partitions_still_count() {
        let n = node("DataSourceExec: partitions=4, partition_sizes=[1, 1, 1, 1]\n");
        assert!(file_groups(&n).is_empty());
        assert_eq!(output_count(&n, &[]), 4);
    }

    #[test]
    fn group_labels_use_basenames() {
        assert_eq!(group_label(&["data/part-0.csv".to_string()]), "part-0.csv");
        assert_eq!(
            group_label(&["a.csv".to_string(), "b.csv".to_string()]),
            "a.csv (+1)"
        );
    }
}
