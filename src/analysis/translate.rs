//! Translation of the raw sampled call tree into a categorized `FrameTree`.

use super::categorise::{categorise, regexp_display_name, REGEXP_MARKER};
use super::tree::{Category, CategorizedNode, FrameIndex, FrameTree};
use crate::parser::schema::RawFrameNode;
use crate::utils::config::INSTRUMENTATION_MARKER;
use log::debug;
use std::collections::HashSet;

/// Translate a raw call tree into a categorized tree
///
/// **Public** - main entry point for tree translation
///
/// Every dependency encountered is added to `deps`.
///
/// # Algorithm
/// 1. Walk the raw tree depth-first with an explicit stack, laying nodes
///    out in pre-order and skipping the profiler's own frames
/// 2. Classify each non-root frame from its display name
/// 3. Sum `children_value` bottom-up by visiting the arena in reverse
pub fn translate(head: &RawFrameNode, app_name: &str, deps: &mut HashSet<String>) -> FrameTree {
    let mut nodes: Vec<CategorizedNode> = Vec::new();
    let mut skipped = 0usize;

    // (raw node, parent index); the root has no parent
    let mut stack: Vec<(&RawFrameNode, Option<FrameIndex>)> = vec![(head, None)];

    while let Some((raw, parent)) = stack.pop() {
        let index = FrameIndex::new(nodes.len());
        let node = translate_frame(raw, parent.is_none(), app_name, deps);
        nodes.push(node);

        if let Some(parent) = parent {
            nodes[parent.index()].children.push(index);
        }

        for child in raw.children.iter().rev() {
            if is_instrumentation(child) {
                skipped += child.count_nodes();
                continue;
            }
            stack.push((child, Some(index)));
        }
    }

    // Children always sit after their parent in pre-order
    for i in (0..nodes.len()).rev() {
        let children_value: u64 = nodes[i]
            .children
            .iter()
            .map(|child| nodes[child.index()].value)
            .sum();
        let node = &mut nodes[i];
        node.children_value = children_value;
        node.value = node.self_value + children_value;
    }

    debug!(
        "Translated {} frames ({} instrumentation frames skipped, {} dependencies)",
        nodes.len(),
        skipped,
        deps.len()
    );

    FrameTree::from_preorder(nodes)
}

/// Build one categorized node without its children
fn translate_frame(
    raw: &RawFrameNode,
    is_root: bool,
    app_name: &str,
    deps: &mut HashSet<String>,
) -> CategorizedNode {
    let frame = &raw.call_frame;

    let (mut function_name, mut file_name, line_number, column_number) = if is_root {
        (String::new(), String::new(), None, None)
    } else {
        let function_name = if frame.function_name.is_empty() {
            "(anonymous)".to_string()
        } else {
            frame.function_name.clone()
        };
        (
            function_name,
            frame.url.clone(),
            Some(frame.line_number + 1),
            Some(frame.column_number + 1),
        )
    };

    let location = match (line_number, column_number) {
        (Some(line), Some(column)) if line != 0 && column != 0 => format!(":{}:{}", line, column),
        _ => String::new(),
    };
    let name = format!("{} {}{}", function_name, file_name, location)
        .trim()
        .to_string();

    let (frame_type, category) = if is_root {
        (app_name.to_string(), Category::App)
    } else {
        let class = categorise(&name, app_name);
        (class.frame_type, class.category)
    };

    if category == Category::Regexp {
        function_name = regexp_display_name(&name);
        file_name = REGEXP_MARKER.to_string();
    }

    if category == Category::Deps {
        deps.insert(frame_type.clone());
    }

    CategorizedNode {
        id: raw.id,
        name,
        file_name,
        function_name,
        line_number,
        column_number,
        frame_type,
        category,
        self_value: raw.self_size,
        children_value: 0,
        value: raw.self_size,
        children: Vec::new(),
        is_root,
        is_init: false,
        is_inlinable: false,
    }
}

fn is_instrumentation(node: &RawFrameNode) -> bool {
    node.call_frame.url.contains(INSTRUMENTATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::CallFrame;

    fn raw(id: u64, function: &str, url: &str, size: u64, children: Vec<RawFrameNode>) -> RawFrameNode {
        RawFrameNode {
            call_frame: CallFrame {
                function_name: function.to_string(),
                url: url.to_string(),
                line_number: 9,
                column_number: 4,
            },
            children,
            id,
            self_size: size,
        }
    }

    #[test]
    fn test_root_is_application() {
        let head = raw(1, "(root)", "", 5, vec![]);
        let mut deps = HashSet::new();
        let tree = translate(&head, "my-app", &mut deps);

        let root = tree.root();
        assert!(root.is_root);
        assert_eq!(root.frame_type, "my-app");
        assert_eq!(root.category, Category::App);
        assert_eq!(root.name, "");
        assert_eq!(root.line_number, None);
        assert_eq!(root.value, 5);
    }

    #[test]
    fn test_location_is_one_based() {
        let head = raw(1, "(root)", "", 0, vec![raw(2, "main", "/srv/app.js", 3, vec![])]);
        let tree = translate(&head, "app", &mut HashSet::new());

        let main = tree.node(FrameIndex::new(1)).unwrap();
        assert_eq!(main.line_number, Some(10));
        assert_eq!(main.column_number, Some(5));
        assert_eq!(main.name, "main /srv/app.js:10:5");
        assert_eq!(main.category, Category::App);
    }

    #[test]
    fn test_anonymous_function_name() {
        let head = raw(1, "(root)", "", 0, vec![raw(2, "", "/srv/app.js", 0, vec![])]);
        let tree = translate(&head, "app", &mut HashSet::new());
        assert_eq!(tree.node(FrameIndex::new(1)).unwrap().function_name, "(anonymous)");
    }

    #[test]
    fn test_unknown_location_omitted_from_name() {
        let mut child = raw(2, "gc", "", 0, vec![]);
        child.call_frame.line_number = -1;
        child.call_frame.column_number = -1;
        let head = raw(1, "(root)", "", 0, vec![child]);

        let tree = translate(&head, "app", &mut HashSet::new());
        assert_eq!(tree.node(FrameIndex::new(1)).unwrap().name, "gc");
    }

    #[test]
    fn test_regexp_rewrite() {
        let head = raw(1, "(root)", "", 0, vec![raw(2, "^ab+", "[CODE:RegExp]", 0, vec![])]);
        let mut child = head.clone();
        child.children[0].call_frame.line_number = -1;
        child.children[0].call_frame.column_number = -1;

        let tree = translate(&child, "app", &mut HashSet::new());
        let node = tree.node(FrameIndex::new(1)).unwrap();
        assert_eq!(node.category, Category::Regexp);
        assert_eq!(node.function_name, "/^ab+/");
        assert_eq!(node.file_name, "[CODE:RegExp]");
    }

    #[test]
    fn test_instrumentation_subtree_skipped() {
        let sampler = raw(
            3,
            "sample",
            "/srv/node_modules/@clinic/heap-profiler/src/injects/sampler.js",
            100,
            vec![raw(4, "inner", "/srv/app.js", 100, vec![])],
        );
        let head = raw(1, "(root)", "", 0, vec![raw(2, "main", "/srv/app.js", 1, vec![]), sampler]);

        let tree = translate(&head, "app", &mut HashSet::new());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().value, 1);
    }

    #[test]
    fn test_dependencies_collected() {
        let head = raw(
            1,
            "(root)",
            "",
            0,
            vec![
                raw(2, "a", "/srv/node_modules/lodash/a.js", 1, vec![]),
                raw(3, "b", "/srv/node_modules/@hapi/hoek/b.js", 1, vec![]),
                raw(4, "c", "/srv/node_modules/lodash/c.js", 1, vec![]),
            ],
        );
        let mut deps = HashSet::new();
        translate(&head, "app", &mut deps);

        let mut deps: Vec<_> = deps.into_iter().collect();
        deps.sort();
        assert_eq!(deps, vec!["@hapi/hoek", "lodash"]);
    }

    #[test]
    fn test_preorder_layout() {
        let head = raw(
            1,
            "(root)",
            "",
            0,
            vec![
                raw(2, "a", "/x.js", 1, vec![raw(3, "a1", "/x.js", 1, vec![])]),
                raw(4, "b", "/x.js", 1, vec![]),
            ],
        );
        let tree = translate(&head, "app", &mut HashSet::new());

        let ids: Vec<u64> = tree.iter().map(|(_, n)| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(tree.children(FrameIndex::ROOT), &[FrameIndex::new(1), FrameIndex::new(3)]);
    }
}
