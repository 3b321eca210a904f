//! `RepartitionExec`: the one chain operator that changes fan-out. The
//! output count comes from the partitioning declaration; ordering survives
//! only when the shuffle cannot interleave (single input partition or an
//! explicit preserve-order marker).

use super::common::{self, InputMode};
use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::{expr, PlanNode};
use regex::Regex;
use std::sync::OnceLock;

pub(super) fn layout(
    s: &mut Session,
    node: &PlanNode,
    x: f64,
    y: f64,
    is_root: bool,
) -> Result<NodeLayout> {
    let details = common::detail_lines(node, &["partitioning", "input_partitions", "preserve_order"]);
    let chain = common::layout_chain(s, node, x, y, &node.operator, &details, InputMode::Exact)?;

    let count = if is_root {
        0
    } else {
        node.property("partitioning")
            .map(partition_count)
            .unwrap_or(0)
    };
    let positions = if count > 0 {
        common::passthrough_positions(&chain.node_box, count, None)
    } else {
        Vec::new()
    };

    let (columns, inherited_sort) = common::inherit_columns(&chain.children);
    let sort_order = if preserves_order(node) {
        inherited_sort
    } else {
        Vec::new()
    };

    Ok(common::chain_result(chain, count, positions, columns, sort_order))
}

/// Target partition count of a partitioning declaration:
/// `Hash([c1@0], 4)` or `RoundRobinBatch(8)`. Anything else falls back to a
/// best-effort scrape of a trailing number and may legitimately come up
/// empty-handed.
fn partition_count(partitioning: &str) -> usize {
    if let Some((name, args)) = expr::function_call(partitioning) {
        match name {
            "Hash" => {
                if let Some(last) = expr::split_top_level(args, ',').last() {
                    if let Ok(n) = last.parse::<usize>() {
                        return n;
                    }
                }
            }
            "RoundRobinBatch" => {
                if let Ok(n) = args.trim().parse::<usize>() {
                    return n;
                }
            }
            _ => {}
        }
    }

    static TRAILING: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING.get_or_init(|| Regex::new(r"(\d+)\s*\)?\s*$").expect("valid regex"));
    let scraped = re
        .captures(partitioning)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .unwrap_or(0);
    if scraped == 0 {
        tracing::warn!(partitioning, "could not extract a partition count");
    }
    scraped
}

fn preserves_order(node: &PlanNode) -> bool {
    if node.property("preserve_order") == Some("true") {
        return true;
    }
    node.property("input_partitions")
        .and_then(|v| v.parse::<usize>().ok())
        == Some(1)
}
