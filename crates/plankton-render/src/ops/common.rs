//! Shared building blocks for the per-operator strategies.

use crate::arrows::draw_child_edge;
use crate::geom;
use crate::model::NodeLayout;
use crate::session::Session;
use crate::text::{clip_detail, estimate_text_width, text_block_height};
use crate::Result;
use plankton_core::PlanNode;

const BOX_PADDING_X: f64 = 24.0;
const BOX_PADDING_Y: f64 = 12.0;
const TITLE_DETAIL_GAP: f64 = 6.0;
const DETAIL_CLIP: usize = 60;

/// The node's own rectangle plus its label elements.
pub(crate) struct BoxShape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxShape {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Detail lines for the box body: bare annotation fragments first (that is
/// where predicates and `TopK(..)` markers live), then the requested
/// `key=value` properties, everything clipped for display.
pub(crate) fn detail_lines(node: &PlanNode, keys: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = node
        .bare_properties()
        .map(|frag| clip_detail(frag, DETAIL_CLIP))
        .collect();
    for key in keys {
        if let Some(value) = node.property(key) {
            out.push(clip_detail(&format!("{key}={value}"), DETAIL_CLIP));
        }
    }
    out
}

/// Draws the operator box with a centered title and optional detail block.
/// The box grows beyond the configured size when the text needs it.
pub(crate) fn draw_operator_box(
    s: &mut Session,
    title: &str,
    details: &[String],
    x: f64,
    y: f64,
) -> BoxShape {
    let title_size = s.cfg.operator_label_size();
    let detail_size = s.cfg.detail_label_size();

    let detail_text = details.join("\n");
    let mut text_width = estimate_text_width(title, title_size);
    if !detail_text.is_empty() {
        text_width = text_width.max(estimate_text_width(&detail_text, detail_size));
    }

    let mut text_height = text_block_height(title, title_size);
    if !detail_text.is_empty() {
        text_height += TITLE_DETAIL_GAP + text_block_height(&detail_text, detail_size);
    }

    let width = s.cfg.box_width.max(text_width + BOX_PADDING_X);
    let height = s.cfg.box_height.max(text_height + BOX_PADDING_Y * 2.0);

    let id = s.add_box(x, y, width, height);
    let center = x + width / 2.0;
    let title_y = y + BOX_PADDING_Y;
    let color = s.cfg.box_stroke_color.clone();
    s.add_centered_text(center, title_y, title, title_size, &color);
    if !detail_text.is_empty() {
        let detail_y = title_y + text_block_height(title, title_size) + TITLE_DETAIL_GAP;
        s.add_centered_text(center, detail_y, &detail_text, detail_size, &color);
    }

    BoxShape {
        id,
        x,
        y,
        width,
        height,
    }
}

/// How a family counts the arrows arriving from one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// `max(1, child.output_arrow_count)`, the aggregation default.
    AtLeastOne,
    /// The child's declared count verbatim (repartition).
    Exact,
}

impl InputMode {
    pub fn count(self, child: &NodeLayout) -> usize {
        match self {
            InputMode::AtLeastOne => child.output_arrow_count.max(1),
            InputMode::Exact => child.output_arrow_count,
        }
    }
}

pub(crate) struct RowLayout {
    pub children: Vec<NodeLayout>,
    pub min_x: f64,
    pub max_x: f64,
    pub bottom: f64,
}

/// Lays the children out left to right below the parent.
///
/// A single child sits directly beneath the parent at the same x. Several
/// children are generated first at provisional positions to learn their true
/// rendered widths, then the whole row is shifted so it is centered under
/// the parent. The shift moves every element already emitted for the
/// subtrees (and the base coordinate of their bound arrows, never the point
/// deltas).
pub(crate) fn layout_children_row(
    s: &mut Session,
    children: &[PlanNode],
    parent_x: f64,
    parent_center: f64,
    top_y: f64,
    spacing_mult: f64,
) -> Result<RowLayout> {
    if children.len() == 1 {
        let child = super::layout_node(s, &children[0], parent_x, top_y, false)?;
        return Ok(RowLayout {
            min_x: child.subtree_min_x,
            max_x: child.subtree_max_x,
            bottom: child.subtree_bottom,
            children: vec![child],
        });
    }

    let row_mark = s.mark();
    let spacing = s.cfg.horizontal_spacing * spacing_mult;
    let mut laid: Vec<NodeLayout> = Vec::with_capacity(children.len());
    let mut cursor = parent_x;

    for child in children {
        let mark = s.mark();
        let layout = super::layout_node(s, child, cursor, top_y, false)?;
        // Re-anchor the subtree so it starts exactly at the cursor; joins can
        // extend left of their own box.
        let dx = cursor - layout.subtree_min_x;
        s.translate_x(mark, dx);
        let layout = layout.translated_x(dx);
        cursor = layout.subtree_max_x + spacing;
        laid.push(layout);
    }

    let min_x = laid.first().map(|c| c.subtree_min_x).unwrap_or(parent_x);
    let max_x = laid.last().map(|c| c.subtree_max_x).unwrap_or(parent_x);
    let dx = parent_center - (min_x + max_x) / 2.0;
    s.translate_x(row_mark, dx);
    let laid: Vec<NodeLayout> = laid.into_iter().map(|c| c.translated_x(dx)).collect();

    let bottom = laid
        .iter()
        .map(|c| c.subtree_bottom)
        .fold(top_y, f64::max);
    Ok(RowLayout {
        min_x: min_x + dx,
        max_x: max_x + dx,
        bottom,
        children: laid,
    })
}

pub(crate) struct ChainLayout {
    pub node_box: BoxShape,
    pub children: Vec<NodeLayout>,
    pub input_total: usize,
    pub subtree_min_x: f64,
    pub subtree_max_x: f64,
    pub subtree_bottom: f64,
}

/// The linear-chain skeleton every non-join, non-union family shares: own
/// box, children beneath (reduced gap for a single input), one arrow bundle
/// per child attached along the box bottom.
pub(crate) fn layout_chain(
    s: &mut Session,
    node: &PlanNode,
    x: f64,
    y: f64,
    title: &str,
    details: &[String],
    mode: InputMode,
) -> Result<ChainLayout> {
    let node_box = draw_operator_box(s, title, details, x, y);

    if node.children.is_empty() {
        return Ok(ChainLayout {
            subtree_min_x: node_box.x,
            subtree_max_x: node_box.right(),
            subtree_bottom: node_box.bottom(),
            input_total: 0,
            children: Vec::new(),
            node_box,
        });
    }

    let gap = if node.children.len() == 1 {
        s.cfg.chain_gap()
    } else {
        s.cfg.vertical_spacing
    };
    let top_y = node_box.bottom() + gap;
    let row = layout_children_row(
        s,
        &node.children,
        node_box.x,
        node_box.center_x(),
        top_y,
        1.0,
    )?;

    let mut input_total = 0usize;
    let segments = segment_bottom(&node_box, row.children.len());
    for (child, (left, right)) in row.children.iter().zip(segments) {
        let count = mode.count(child);
        input_total += count;
        draw_child_edge(s, child, count, &node_box.id, node_box.bottom(), left, right);
    }

    Ok(ChainLayout {
        subtree_min_x: node_box.x.min(row.min_x),
        subtree_max_x: node_box.right().max(row.max_x),
        subtree_bottom: row.bottom,
        input_total,
        children: row.children,
        node_box,
    })
}

/// Splits the box bottom edge into one attachment segment per child so
/// bundles from different children never interleave.
pub(crate) fn segment_bottom(node_box: &BoxShape, n: usize) -> Vec<(f64, f64)> {
    if n <= 1 {
        return vec![(node_box.x, node_box.right())];
    }
    let step = node_box.width / n as f64;
    (0..n)
        .map(|i| {
            (
                node_box.x + step * i as f64,
                node_box.x + step * (i + 1) as f64,
            )
        })
        .collect()
}

/// Output positions for a pass-through operator: reuse the first child's
/// fan when it matches (keeps stacked arrows straight), otherwise balance
/// across the box; large fans degrade to the empty fallback.
pub(crate) fn passthrough_positions(
    node_box: &BoxShape,
    count: usize,
    first_child: Option<&NodeLayout>,
) -> Vec<f64> {
    if count == 0 || count > geom::ELLIPSIS_THRESHOLD {
        return Vec::new();
    }
    if let Some(child) = first_child {
        if child.output_arrow_positions.len() == count
            && child
                .output_arrow_positions
                .iter()
                .all(|&p| p >= node_box.x && p <= node_box.right())
        {
            return child.output_arrow_positions.clone();
        }
    }
    geom::distribute_in_band(count, node_box.x, node_box.right())
}

/// Columns/sort metadata inherited from the first child, the rule for every
/// operator that does not alter the schema.
pub(crate) fn inherit_columns(children: &[NodeLayout]) -> (Vec<String>, Vec<String>) {
    match children.first() {
        Some(c) => (c.output_columns.clone(), c.output_sort_order.clone()),
        None => (Vec::new(), Vec::new()),
    }
}

/// Assembles the `NodeLayout` for a chain-shaped strategy.
pub(crate) fn chain_result(
    chain: ChainLayout,
    output_arrow_count: usize,
    output_arrow_positions: Vec<f64>,
    output_columns: Vec<String>,
    output_sort_order: Vec<String>,
) -> NodeLayout {
    NodeLayout {
        x: chain.node_box.x,
        y: chain.node_box.y,
        width: chain.node_box.width,
        height: chain.node_box.height,
        subtree_min_x: chain.subtree_min_x,
        subtree_max_x: chain.subtree_max_x,
        subtree_bottom: chain.subtree_bottom,
        anchor_id: chain.node_box.id,
        output_arrow_count,
        output_arrow_positions,
        output_columns,
        output_sort_order,
    }
}
