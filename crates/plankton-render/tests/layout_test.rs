use plankton_core::{parse_plan, ParseOptions, PlanNode};
use plankton_render::{generate, layout_plan, DiagramConfig, Element, ElementKind, Error};

fn parse(text: &str) -> PlanNode {
    parse_plan(text, ParseOptions::default())
        .expect("parse ok")
        .expect("plan detected")
}

fn elements(text: &str) -> Vec<Element> {
    let root = parse(text);
    layout_plan(&root, &DiagramConfig::default())
        .expect("layout ok")
        .elements
}

fn of_kind(elements: &[Element], kind: ElementKind) -> Vec<&Element> {
    elements.iter().filter(|e| e.kind == kind).collect()
}

fn arrows_into<'a>(elements: &'a [Element], anchor: &str) -> Vec<&'a Element> {
    elements
        .iter()
        .filter(|e| {
            e.kind == ElementKind::Arrow
                && e.end_binding
                    .as_ref()
                    .is_some_and(|b| b.element_id == anchor)
        })
        .collect()
}

#[test]
fn linear_chain_has_one_box_per_node_and_one_arrow_per_edge() {
    let els = elements(
        "\
SortExec: expr=[a@0 ASC], preserve_partitioning=[false]
  FilterExec: b@1 > 10
    DataSourceExec: partitions=1, output_ordering=[a@0 ASC], projection=[a, b]
",
    );

    assert_eq!(of_kind(&els, ElementKind::Rectangle).len(), 3);
    assert_eq!(of_kind(&els, ElementKind::Arrow).len(), 2);
    assert!(of_kind(&els, ElementKind::Ellipse).is_empty());
}

#[test]
fn filter_inherits_source_sort_order_and_schema() {
    let root = parse(
        "\
FilterExec: b@1 > 10
  DataSourceExec: partitions=1, output_ordering=[a@0 ASC], projection=[a, b]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 1);
    assert_eq!(laid.root.output_columns, vec!["a", "b"]);
    assert_eq!(laid.root.output_sort_order, vec!["a"]);
}

#[test]
fn coalesce_batches_changes_nothing_but_batch_size() {
    let root = parse(
        "\
CoalesceBatchesExec: target_batch_size=8192
  DataSourceExec: partitions=3, projection=[a], output_ordering=[a@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 3);
    assert_eq!(laid.root.output_columns, vec!["a"]);
    assert_eq!(laid.root.output_sort_order, vec!["a"]);
}

#[test]
fn stacked_pass_through_operators_keep_arrows_straight() {
    let els = elements(
        "\
FilterExec: a@0 > 1
  FilterExec: a@0 > 2
    DataSourceExec: partitions=4
",
    );

    let arrows = of_kind(&els, ElementKind::Arrow);
    assert_eq!(arrows.len(), 8);
    for arrow in arrows {
        let points = arrow.points.as_ref().expect("arrow points");
        assert_eq!(points.len(), 2);
        assert!(
            points[1][0].abs() < 1e-9,
            "pass-through arrows should be vertical, got dx={}",
            points[1][0]
        );
    }
}

#[test]
fn repartition_declares_hash_target_count() {
    let els = elements(
        "\
CoalescePartitionsExec
  RepartitionExec: partitioning=Hash([a@0], 4), input_partitions=1
    DataSourceExec: partitions=1
",
    );

    let root_box = &of_kind(&els, ElementKind::Rectangle)[0];
    assert_eq!(arrows_into(&els, &root_box.id).len(), 4);
}

#[test]
fn repartition_declares_round_robin_target_count() {
    let els = elements(
        "\
CoalescePartitionsExec
  RepartitionExec: partitioning=RoundRobinBatch(6), input_partitions=1
    DataSourceExec: partitions=1
",
    );

    let root_box = &of_kind(&els, ElementKind::Rectangle)[0];
    assert_eq!(arrows_into(&els, &root_box.id).len(), 6);
}

#[test]
fn repartition_at_the_root_has_no_output() {
    let root = parse(
        "\
RepartitionExec: partitioning=Hash([a@0], 4), input_partitions=1
  DataSourceExec: partitions=1, output_ordering=[a@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 0);
    // Single input partition: the shuffle cannot interleave, order survives.
    assert_eq!(laid.root.output_sort_order, vec!["a"]);
}

#[test]
fn multi_partition_repartition_drops_sort_order() {
    let root = parse(
        "\
RepartitionExec: partitioning=Hash([a@0], 4), input_partitions=2
  DataSourceExec: partitions=2, output_ordering=[a@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert!(laid.root.output_sort_order.is_empty());
}

#[test]
fn coalesce_partitions_always_outputs_one() {
    let root = parse(
        "\
CoalescePartitionsExec
  DataSourceExec: partitions=8
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert_eq!(laid.root.output_arrow_count, 1);
    assert_eq!(laid.root.output_arrow_positions.len(), 1);
}

#[test]
fn sort_preserving_merge_outputs_one_with_merge_keys() {
    let root = parse(
        "\
SortPreservingMergeExec: [a@0 ASC]
  DataSourceExec: partitions=8, output_ordering=[a@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 1);
    assert_eq!(laid.root.output_sort_order, vec!["a"]);

    // All eight declared inputs render: below the threshold nothing collapses.
    let arrows = laid
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Arrow)
        .count();
    assert_eq!(arrows, 8);
}

#[test]
fn sort_declares_its_own_order() {
    let root = parse(
        "\
SortExec: expr=[a@0 ASC, b@1 DESC NULLS LAST], preserve_partitioning=[false]
  DataSourceExec: partitions=1, projection=[a, b, c]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert_eq!(laid.root.output_sort_order, vec!["a", "b"]);
    assert_eq!(laid.root.output_columns, vec!["a", "b", "c"]);
}

#[test]
fn limits_pass_everything_through() {
    let root = parse(
        "\
GlobalLimitExec: skip=0, fetch=10
  LocalLimitExec: fetch=10
    DataSourceExec: partitions=2, projection=[a], output_ordering=[a@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 2);
    assert_eq!(laid.root.output_columns, vec!["a"]);
    assert_eq!(laid.root.output_sort_order, vec!["a"]);
}

#[test]
fn projection_rewrites_the_schema() {
    let root = parse(
        "\
ProjectionExec: expr=[a@0 as x, b@1]
  DataSourceExec: partitions=1, projection=[a, b, c], output_ordering=[a@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert_eq!(laid.root.output_columns, vec!["x", "b"]);
    assert_eq!(laid.root.output_sort_order, vec!["a"]);
}

#[test]
fn aggregate_emphasizes_its_group_and_aggregate_outputs() {
    let root = parse(
        "\
AggregateExec: mode=Partial, gby=[c1@0 as c1], aggr=[count(1)]
  DataSourceExec: partitions=1, projection=[c1, c2]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert_eq!(laid.root.output_columns, vec!["c1", "c2"]);
    assert_eq!(laid.root.output_sort_order, vec!["c1", "count(1)"]);
}

#[test]
fn sort_merge_join_partition_mismatch_is_fatal() {
    let root = parse(
        "\
SortMergeJoin: join_type=Inner, on=[(a@0, b@0)]
  DataSourceExec: partitions=2
  DataSourceExec: partitions=3
",
    );
    match layout_plan(&root, &DiagramConfig::default()) {
        Err(Error::MergeJoinPartitionMismatch { left, right }) => {
            assert_eq!(left, 2);
            assert_eq!(right, 3);
        }
        other => panic!("expected MergeJoinPartitionMismatch, got {other:?}"),
    }

    // No partial document either.
    assert!(generate(Some(&root), &DiagramConfig::default()).is_err());
}

#[test]
fn sort_merge_join_combines_schemas_and_join_keys() {
    let root = parse(
        "\
SortMergeJoin: join_type=Inner, on=[(a@0, b@0)]
  DataSourceExec: partitions=2, projection=[a, x]
  DataSourceExec: partitions=2, projection=[b, x]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 2);
    assert_eq!(laid.root.output_columns, vec!["a", "x", "b"]);
    assert_eq!(laid.root.output_sort_order, vec!["a"]);
}

#[test]
fn join_arity_is_enforced() {
    let root = parse(
        "\
HashJoinExec: join_type=Inner, on=[(a@0, b@0)]
  DataSourceExec: partitions=1
",
    );
    match layout_plan(&root, &DiagramConfig::default()) {
        Err(Error::JoinArity { operator, found }) => {
            assert_eq!(operator, "HashJoinExec");
            assert_eq!(found, 1);
        }
        other => panic!("expected JoinArity, got {other:?}"),
    }
}

#[test]
fn hash_join_children_flank_the_node_and_feed_the_hash_ellipse() {
    let els = elements(
        "\
HashJoinExec: mode=Partitioned, join_type=Inner, on=[(a@0, b@0)]
  DataSourceExec: partitions=1
  DataSourceExec: partitions=1
",
    );

    let rects = of_kind(&els, ElementKind::Rectangle);
    assert_eq!(rects.len(), 3);
    let join = rects[0];
    let build = rects[1];
    let probe = rects[2];

    assert_eq!(build.y, probe.y, "join inputs sit at the same height");
    let join_center = join.x + join.width / 2.0;
    let build_center = build.x + build.width / 2.0;
    let probe_center = probe.x + probe.width / 2.0;
    assert!(
        ((build_center + probe_center) / 2.0 - join_center).abs() < 1e-6,
        "inputs should flank the join symmetrically"
    );

    let ellipses = of_kind(&els, ElementKind::Ellipse);
    assert_eq!(ellipses.len(), 1);
    let hash_table = ellipses[0];

    let arrows = of_kind(&els, ElementKind::Arrow);
    assert_eq!(arrows.len(), 2);
    for arrow in arrows {
        let end = arrow.end_binding.as_ref().expect("bound end");
        assert_eq!(end.element_id, hash_table.id);
    }
}

#[test]
fn hash_join_output_follows_the_probe_side() {
    let root = parse(
        "\
HashJoinExec: mode=Partitioned, join_type=Inner, on=[(a@0, b@0)], projection=[a, c]
  DataSourceExec: partitions=1
  DataSourceExec: partitions=4, output_ordering=[b@0 ASC]
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 4);
    assert_eq!(laid.root.output_columns, vec!["a", "c"]);
    assert_eq!(laid.root.output_sort_order, vec!["b"]);
}

#[test]
fn large_fans_collapse_to_an_ellipsis_but_keep_their_cardinality() {
    let root = parse(
        "\
FilterExec: a@0 > 1
  DataSourceExec: partitions=16
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    let arrows = laid
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Arrow)
        .count();
    assert_eq!(arrows, 4, "two kept per side of the ellipsis");

    let glyphs = laid
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Text && e.text.as_deref() == Some("…"))
        .count();
    assert_eq!(glyphs, 1);

    // The rendered subset never leaks into the propagated cardinality.
    assert_eq!(laid.root.output_arrow_count, 16);
    assert!(laid.root.output_arrow_positions.is_empty());
}

#[test]
fn union_sums_inputs_and_centers_its_children() {
    let root = parse(
        "\
UnionExec
  DataSourceExec: partitions=1
  DataSourceExec: partitions=1
  DataSourceExec: partitions=1
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert_eq!(laid.root.output_arrow_count, 3);

    let rects = laid
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Rectangle)
        .collect::<Vec<_>>();
    assert_eq!(rects.len(), 4);
    let union = rects[0];
    let children = &rects[1..];

    let first_y = children[0].y;
    for child in children {
        assert_eq!(child.y, first_y, "union children share a row");
    }

    let row_min = children.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
    let row_max = children
        .iter()
        .map(|c| c.x + c.width)
        .fold(f64::NEG_INFINITY, f64::max);
    let union_center = union.x + union.width / 2.0;
    assert!(
        ((row_min + row_max) / 2.0 - union_center).abs() < 1e-6,
        "child row should be centered under the union box"
    );

    assert_eq!(arrows_into(&laid.elements, &union.id).len(), 3);
}

#[test]
fn source_file_groups_become_ellipses_feeding_the_scan() {
    let els = elements(
        "DataSourceExec: file_groups={2 groups: [[data/a.parquet], [data/b.parquet]]}, file_type=parquet\n",
    );

    let rects = of_kind(&els, ElementKind::Rectangle);
    assert_eq!(rects.len(), 1);
    let ellipses = of_kind(&els, ElementKind::Ellipse);
    assert_eq!(ellipses.len(), 2);

    let scan = rects[0];
    let arrows = arrows_into(&els, &scan.id);
    assert_eq!(arrows.len(), 2);
    for arrow in &arrows {
        let start = arrow.start_binding.as_ref().expect("bound start");
        assert!(ellipses.iter().any(|e| e.id == start.element_id));
    }

    // File shapes sit below the scan box.
    for ellipse in &ellipses {
        assert!(ellipse.y > scan.y + scan.height);
    }

    let labels: Vec<&str> = els
        .iter()
        .filter_map(|e| e.text.as_deref())
        .collect();
    assert!(labels.contains(&"a.parquet"));
    assert!(labels.contains(&"b.parquet"));
}

#[test]
fn source_partition_count_comes_from_file_groups() {
    let root = parse(
        "DataSourceExec: file_groups={2 groups: [[a.csv], [b.csv]]}, projection=[a], file_type=csv\n",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");
    assert_eq!(laid.root.output_arrow_count, 2);
    assert_eq!(laid.root.output_arrow_positions.len(), 2);
    assert_eq!(laid.root.output_columns, vec!["a"]);
}

#[test]
fn edge_labels_group_runs_by_highlight_state() {
    let els = elements(
        "\
FilterExec: a@0 > 1
  DataSourceExec: partitions=1, projection=[a, b, c], output_ordering=[b@1 ASC]
",
    );

    let config = DiagramConfig::default();
    let texts: Vec<&Element> = of_kind(&els, ElementKind::Text);
    let highlighted: Vec<&&Element> = texts
        .iter()
        .filter(|t| t.stroke_color == config.highlight_color)
        .collect();
    assert_eq!(highlighted.len(), 1);
    assert_eq!(highlighted[0].text.as_deref(), Some("b, "));

    assert!(texts
        .iter()
        .any(|t| t.text.as_deref() == Some("a, ") && t.stroke_color == config.box_stroke_color));
    assert!(texts
        .iter()
        .any(|t| t.text.as_deref() == Some("c") && t.stroke_color == config.box_stroke_color));
}

#[test]
fn unknown_operators_degrade_to_an_unimplemented_box() {
    let root = parse(
        "\
FrobnicateExec: whatever=1
  DataSourceExec: partitions=2
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    assert_eq!(laid.root.output_arrow_count, 2);
    assert!(laid
        .elements
        .iter()
        .any(|e| e.text.as_deref() == Some("Unimplemented")));
}

#[test]
fn bindings_are_symmetric() {
    let els = elements(
        "\
UnionExec
  FilterExec: a@0 > 1
    DataSourceExec: partitions=1
  DataSourceExec: file_groups={1 group: [[x.csv]]}, file_type=csv
",
    );

    for arrow in of_kind(&els, ElementKind::Arrow) {
        for binding in [&arrow.start_binding, &arrow.end_binding]
            .into_iter()
            .flatten()
        {
            let target = els
                .iter()
                .find(|e| e.id == binding.element_id)
                .expect("binding targets an emitted element");
            assert!(
                target.bound_elements.iter().any(|b| b.id == arrow.id),
                "element {} should back-reference arrow {}",
                target.id,
                arrow.id
            );
        }
    }
}

#[test]
fn empty_input_yields_an_empty_valid_document() {
    let doc = generate(None, &DiagramConfig::default()).expect("generate ok");
    assert!(doc.elements.is_empty());

    let value = serde_json::to_value(&doc).expect("serialize");
    assert_eq!(value["type"], "excalidraw");
    assert_eq!(value["version"], 2);
    assert_eq!(value["appState"]["viewBackgroundColor"], "#ffffff");
}

#[test]
fn documents_serialize_with_viewer_compatible_field_names() {
    let root = parse(
        "\
FilterExec: a@0 > 1
  DataSourceExec: partitions=1, projection=[a]
",
    );
    let doc = generate(Some(&root), &DiagramConfig::default()).expect("generate ok");
    let value = serde_json::to_value(&doc).expect("serialize");

    let elements = value["elements"].as_array().expect("elements array");
    let rect = &elements[0];
    assert_eq!(rect["type"], "rectangle");
    assert!(rect["strokeColor"].is_string());
    assert!(rect["boundElements"].is_array());

    let arrow = elements
        .iter()
        .find(|e| e["type"] == "arrow")
        .expect("an arrow element");
    assert!(arrow["points"].is_array());
    assert!(arrow["startBinding"]["elementId"].is_string());
    assert!(arrow["endBinding"]["elementId"].is_string());
}

#[test]
fn independent_generations_are_identical() {
    let root = parse(
        "\
SortExec: expr=[a@0 ASC]
  DataSourceExec: partitions=2, projection=[a, b]
",
    );
    let config = DiagramConfig::default();
    let first = generate(Some(&root), &config).expect("generate ok");
    let second = generate(Some(&root), &config).expect("generate ok");
    assert_eq!(first, second);
}

#[test]
fn node_boxes_never_overlap_their_children() {
    let root = parse(
        "\
SortPreservingMergeExec: [a@0 ASC]
  SortExec: expr=[a@0 ASC], preserve_partitioning=[true]
    RepartitionExec: partitioning=Hash([a@0], 3), input_partitions=1
      DataSourceExec: file_groups={1 group: [[t.parquet]]}, output_ordering=[a@0 ASC], file_type=parquet
",
    );
    let laid = layout_plan(&root, &DiagramConfig::default()).expect("layout ok");

    let rects: Vec<&Element> = laid
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Rectangle)
        .collect();
    assert_eq!(rects.len(), 4);
    for pair in rects.windows(2) {
        assert!(
            pair[0].y + pair[0].height <= pair[1].y,
            "parent box must end above its child"
        );
    }
    assert!(laid.root.subtree_bottom >= rects.last().expect("rects").y);
}
