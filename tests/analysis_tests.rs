use heap_flame::analysis::{
    analyse, analyse_profile, categorise, Category, Classification, FrameIndex, FrameTree,
};
use heap_flame::parser::parse_heap_profile;
use heap_flame::utils::error::AnalysisError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;

fn fixture() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/app.heapprofile"))
}

/// Profile JSON nesting `depth` frames, each allocating one byte
fn deep_profile_json(depth: usize) -> String {
    let mut raw = String::from(r#"{"head":"#);
    for id in 1..=depth {
        raw.push_str(&format!(
            r#"{{"callFrame":{{"functionName":"f{}","url":"/srv/deep.js","lineNumber":0,"columnNumber":0}},"id":{},"selfSize":1,"children":["#,
            id, id
        ));
    }
    for _ in 0..depth {
        raw.push_str("]}");
    }
    raw.push_str(r#","samples":[]}"#);
    raw
}

fn max_depth(tree: &FrameTree) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(FrameIndex::ROOT, 0usize)];
    while let Some((index, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(tree.children(index).iter().map(|child| (*child, depth + 1)));
    }
    deepest
}

fn class(frame_type: &str, category: Category) -> Classification {
    Classification {
        frame_type: frame_type.to_string(),
        category,
    }
}

#[test]
fn test_categorise_examples() {
    assert_eq!(categorise("wasm [WASM:ABC]", "app"), class("wasm", Category::Wasm));
    assert_eq!(categorise("regexp [CODE:RegExp]", "app"), class("regexp", Category::Regexp));
    assert_eq!(categorise("whatever [CODE:Whatever]", "app"), class("v8", Category::AllV8));
    assert_eq!(categorise("v8::internal::function [CPP]", "app"), class("v8", Category::AllV8));
    assert_eq!(categorise("fs.", "app"), class("core", Category::Core));
    assert_eq!(categorise("cFunction [CPP]", "app"), class("cpp", Category::AllV8));
    assert_eq!(categorise("libFunction [SHARED_LIB]", "app"), class("cpp", Category::AllV8));
    assert_eq!(categorise("[eval]", "app"), class("native", Category::AllV8));
    assert_eq!(categorise("other", "app"), class("v8", Category::AllV8));
    assert_eq!(categorise("index.mjs native other", "app"), class("native", Category::AllV8));
    assert_eq!(categorise(" index.mjs", "app"), class("core", Category::Core));
    assert_eq!(
        categorise("clearBuffer node:internal/streams/writable:529:21", "app"),
        class("core", Category::Core)
    );
}

#[test]
fn test_categorise_dependency_and_app() {
    assert_eq!(
        categorise("fn /a/b/node_modules/foo/c/node_modules/bar/x.js:1:1", "app"),
        class("bar", Category::Deps)
    );
    assert_eq!(
        categorise("main /srv/app/index.js:1:1", "my-app"),
        class("my-app", Category::App)
    );
}

#[test]
fn test_categorise_is_deterministic() {
    let names = ["fs.", "main /srv/x.js:1:1", "get /n/node_modules/a/b.js:1:1", "x [WASM:f]"];
    for name in names {
        assert_eq!(categorise(name, "app"), categorise(name, "app"));
    }
}

#[test]
fn test_analyse_fixture() {
    let envelope = analyse(fixture()).unwrap();

    assert_eq!(envelope.app_name, "Application");
    assert_eq!(envelope.dependencies, vec!["lodash"]);
    // The sampler frame is dropped
    assert_eq!(envelope.data.len(), 6);
    assert_eq!(envelope.data.root().value, 1000);

    let types: Vec<String> = envelope
        .data
        .iter()
        .map(|(_, node)| node.type_key())
        .collect();
    assert_eq!(
        types,
        vec![
            "app:Application",
            "app:Application",
            "deps:lodash",
            "core:core",
            "all-v8:v8",
            "app:Application",
        ]
    );
}

#[test]
fn test_value_invariant_holds_everywhere() {
    let envelope = analyse(fixture()).unwrap();
    let tree = &envelope.data;

    for (index, node) in tree.iter() {
        let children: u64 = tree
            .children(index)
            .iter()
            .map(|child| tree.node(*child).unwrap().value)
            .sum();
        assert_eq!(node.children_value, children);
        assert_eq!(node.value, node.self_value + children);
    }
}

#[test]
fn test_missing_file_is_read_error() {
    let result = analyse("/definitely/not/here.heapprofile");
    assert!(matches!(result, Err(AnalysisError::Read { .. })));
}

#[test]
fn test_invalid_content_is_parse_error() {
    let temp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "{\"head\": 42}").unwrap();

    let result = analyse(temp.path());
    assert!(matches!(result, Err(AnalysisError::Parse(_))));
}

#[test]
fn test_flatten_length_matches_raw_count() {
    let raw = json!({
        "head": {
            "callFrame": {"functionName": "(root)", "url": ""},
            "id": 1, "selfSize": 0,
            "children": [
                {"callFrame": {"functionName": "a", "url": "/x.js"}, "id": 2, "selfSize": 1, "children": [
                    {"callFrame": {"functionName": "b", "url": "/x.js"}, "id": 3, "selfSize": 2, "children": []},
                    {"callFrame": {"functionName": "c", "url": "/x.js"}, "id": 4, "selfSize": 3, "children": []}
                ]},
                {"callFrame": {"functionName": "d", "url": "/x.js"}, "id": 5, "selfSize": 4, "children": []}
            ]
        },
        "samples": []
    });
    let profile = parse_heap_profile(&raw.to_string()).unwrap();
    let envelope = analyse_profile(&profile, "app");

    let flattened = envelope.data.descendants(FrameIndex::ROOT);
    assert_eq!(flattened.len(), profile.head.count_nodes() - 1);
    assert_eq!(envelope.data.root().value, 10);
}

#[test]
fn test_deep_tree_translates_without_recursion() {
    let depth = 100_000;
    let mut head = heap_flame::parser::RawFrameNode {
        call_frame: Default::default(),
        children: Vec::new(),
        id: depth as u64,
        self_size: 1,
    };
    for id in (0..depth).rev() {
        head = heap_flame::parser::RawFrameNode {
            call_frame: heap_flame::parser::CallFrame {
                function_name: format!("f{}", id),
                url: "/srv/deep.js".to_string(),
                line_number: 0,
                column_number: 0,
            },
            children: vec![head],
            id: id as u64,
            self_size: 1,
        };
    }

    let profile = heap_flame::parser::RawProfile {
        head,
        samples: Vec::new(),
    };
    let envelope = analyse_profile(&profile, "app");

    assert_eq!(envelope.data.len(), depth + 1);
    assert_eq!(max_depth(&envelope.data), depth);
    assert_eq!(envelope.data.root().value, depth as u64 + 1);
}

#[test]
fn test_deep_profile_file_analyses() {
    let depth = 50_000;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deep.heapprofile");
    std::fs::write(&path, deep_profile_json(depth)).unwrap();

    let envelope = analyse(&path).unwrap();

    assert_eq!(envelope.data.len(), depth);
    assert_eq!(max_depth(&envelope.data), depth - 1);
    assert_eq!(envelope.data.root().value, depth as u64);
}

#[test]
fn test_envelope_serializes_nested_tree() {
    let envelope = analyse(fixture()).unwrap();
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json["appName"], "Application");
    assert_eq!(json["codeAreas"][1]["children"][0]["excludeKey"], "deps:lodash");
    assert_eq!(json["data"]["isRoot"], true);
    assert_eq!(json["data"]["value"], 1000);
    assert_eq!(json["data"]["children"][0]["name"], "main /srv/app/index.js:1:1");
    assert_eq!(json["data"]["children"][0]["children"][0]["type"], "lodash");
    assert_eq!(json["data"]["children"][0]["children"][0]["category"], "deps");
    assert_eq!(json["data"]["children"][0]["children"][1]["functionName"], "(anonymous)");
}
