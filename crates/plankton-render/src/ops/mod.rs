//! Per-operator layout strategies and the dispatch registry.

use crate::model::NodeLayout;
use crate::session::Session;
use crate::Result;
use plankton_core::PlanNode;

mod aggregate;
mod coalesce_batches;
mod coalesce_partitions;
pub(crate) mod common;
mod fallback;
mod filter;
mod hash_join;
mod limit;
mod projection;
mod repartition;
mod sort;
mod sort_merge_join;
mod sort_preserving_merge;
mod source;
mod union;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Source,
    Filter,
    CoalesceBatches,
    Aggregate,
    Limit,
    Projection,
    Sort,
    SortPreservingMerge,
    CoalescePartitions,
    Repartition,
    HashJoin,
    SortMergeJoin,
    Union,
    Fallback,
}

/// Exact-name registry. Operators not listed here degrade to the fallback
/// strategy instead of failing the generation.
const REGISTRY: &[(&str, Strategy)] = &[
    ("DataSourceExec", Strategy::Source),
    ("ParquetExec", Strategy::Source),
    ("CsvExec", Strategy::Source),
    ("MemoryExec", Strategy::Source),
    ("FilterExec", Strategy::Filter),
    ("CoalesceBatchesExec", Strategy::CoalesceBatches),
    ("AggregateExec", Strategy::Aggregate),
    ("GlobalLimitExec", Strategy::Limit),
    ("LocalLimitExec", Strategy::Limit),
    ("ProjectionExec", Strategy::Projection),
    ("SortExec", Strategy::Sort),
    ("SortPreservingMergeExec", Strategy::SortPreservingMerge),
    ("CoalescePartitionsExec", Strategy::CoalescePartitions),
    ("RepartitionExec", Strategy::Repartition),
    ("HashJoinExec", Strategy::HashJoin),
    ("SortMergeJoinExec", Strategy::SortMergeJoin),
    ("SortMergeJoin", Strategy::SortMergeJoin),
    ("UnionExec", Strategy::Union),
];

fn resolve(operator: &str) -> Strategy {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == operator)
        .map(|&(_, strategy)| strategy)
        .unwrap_or(Strategy::Fallback)
}

/// Lays out `node` with its box top-left corner at `(x, y)` and its whole
/// subtree beneath it. Children finish before the parent's result exists:
/// a parent's arrow fan depends on what its children report back.
pub(crate) fn layout_node(
    s: &mut Session,
    node: &PlanNode,
    x: f64,
    y: f64,
    is_root: bool,
) -> Result<NodeLayout> {
    let strategy = resolve(&node.operator);
    if strategy == Strategy::Fallback {
        tracing::debug!(operator = %node.operator, "no layout strategy, using fallback");
    }
    match strategy {
        Strategy::Source => source::layout(s, node, x, y),
        Strategy::Filter => filter::layout(s, node, x, y),
        Strategy::CoalesceBatches => coalesce_batches::layout(s, node, x, y),
        Strategy::Aggregate => aggregate::layout(s, node, x, y),
        Strategy::Limit => limit::layout(s, node, x, y),
        Strategy::Projection => projection::layout(s, node, x, y),
        Strategy::Sort => sort::layout(s, node, x, y),
        Strategy::SortPreservingMerge => sort_preserving_merge::layout(s, node, x, y),
        Strategy::CoalescePartitions => coalesce_partitions::layout(s, node, x, y),
        Strategy::Repartition => repartition::layout(s, node, x, y, is_root),
        Strategy::HashJoin => hash_join::layout(s, node, x, y),
        Strategy::SortMergeJoin => sort_merge_join::layout(s, node, x, y),
        Strategy::Union => union::layout(s, node, x, y),
        Strategy::Fallback => fallback::layout(s, node, x, y),
    }
}
