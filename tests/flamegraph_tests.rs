use heap_flame::aggregator::{build_collapsed_stacks, calculate_hot_frames, CollapsedStack};
use heap_flame::analysis::analyse;
use heap_flame::flamegraph::{generate_flamegraph, generate_text_summary, FlamegraphConfig};
use heap_flame::model::DataTree;
use heap_flame::utils::error::FlamegraphError;
use pretty_assertions::assert_eq;

fn fixture_tree() -> DataTree {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/app.heapprofile");
    let mut tree = DataTree::new(analyse(path).unwrap());
    tree.update();
    tree
}

#[test]
fn test_collapsed_stacks_skip_hidden_frames() {
    let tree = fixture_tree();
    let lines: Vec<String> = build_collapsed_stacks(&tree)
        .iter()
        .map(CollapsedStack::to_line)
        .collect();

    assert_eq!(
        lines,
        vec![
            "Application;main /srv/app/index.js:1:1 100",
            "Application;main /srv/app/index.js:1:1;get /srv/app/node_modules/lodash/get.js:1:1 300",
            "Application;main /srv/app/index.js:1:1;get /srv/app/node_modules/lodash/get.js:1:1;Buffer.alloc node:buffer:1:1 400",
            "Application;main /srv/app/index.js:1:1;inner /srv/app/lib.js:1:1 150",
        ]
    );
}

#[test]
fn test_collapsed_stacks_follow_visibility() {
    let mut tree = fixture_tree();
    tree.show("all-v8:v8");
    tree.hide("core");

    let stacks = build_collapsed_stacks(&tree);
    let total: u64 = stacks.iter().map(|s| s.weight).sum();

    assert_eq!(total, 100 + 300 + 50 + 150);
    assert!(stacks.iter().any(|s| s.stack.ends_with(";(anonymous)")));
    assert!(!stacks.iter().any(|s| s.stack.contains("Buffer.alloc")));
}

#[test]
fn test_collapsed_stacks_empty_when_everything_hidden() {
    let mut tree = fixture_tree();
    for key in ["app", "deps", "core"] {
        tree.hide(key);
    }
    assert!(build_collapsed_stacks(&tree).is_empty());
}

#[test]
fn test_generate_flamegraph_svg() {
    let tree = fixture_tree();
    let stacks = build_collapsed_stacks(&tree);
    let config = FlamegraphConfig::new()
        .with_title("Fixture Allocations")
        .with_width(800);

    let svg = generate_flamegraph(&stacks, Some(&config)).unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("Fixture Allocations"));
}

#[test]
fn test_generate_flamegraph_empty() {
    let result = generate_flamegraph(&[], None);
    assert!(matches!(result, Err(FlamegraphError::EmptyStacks)));
}

#[test]
fn test_text_summary_lists_ranked_frames() {
    let tree = fixture_tree();
    let hot_frames = calculate_hot_frames(&tree, 10).unwrap();

    assert_eq!(hot_frames.len(), 4);
    assert_eq!(hot_frames[0].rank, 1);
    assert_eq!(hot_frames[0].type_key, "core:core");
    assert!((hot_frames[0].percentage - 40.0).abs() < 1e-9);
    assert_eq!(hot_frames[1].type_key, "deps:lodash");

    let summary = generate_text_summary(&hot_frames, 2);
    assert!(summary.contains("TOP ALLOCATIONS"));
    assert!(summary.contains("Buffer.alloc"));
    assert!(!summary.contains("inner /srv/app/lib.js"));
    assert!(summary.contains("Showing top 2 of 4 frames"));
}

#[test]
fn test_text_summary_without_frames() {
    let summary = generate_text_summary(&[], 10);
    assert!(summary.contains("(no visible frames)"));
}
