//! Build collapsed stack format from the visible frame tree.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "Application;main /srv/app.js:3:1;Buffer.alloc node:buffer:1:1 4096"
//! This means: main called Buffer.alloc, which allocated 4096 bytes itself.

use crate::analysis::FrameIndex;
use crate::model::DataTree;
use log::debug;
use serde::{Deserialize, Serialize};

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight (bytes allocated by the last frame of the stack)
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as a `stack weight` line
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from the frames visible in a data tree
///
/// **Public** - main entry point for stack building
///
/// # Algorithm
/// 1. Walk the tree from the root, descending through hidden frames to
///    their nearest visible descendants
/// 2. Extend the parent's stack string with each visible frame
/// 3. Emit one line per visible frame with a non-zero self allocation
///
/// Hidden frames drop out of the stack strings and their own
/// allocations are not emitted, matching the model's effective values.
pub fn build_collapsed_stacks(model: &DataTree) -> Vec<CollapsedStack> {
    let tree = model.active_tree();
    let mut stacks = Vec::new();

    let root_label = sanitize_frame(&model.app_name);
    let root = tree.root();
    if root.self_value > 0 && !model.is_node_excluded(FrameIndex::ROOT) {
        stacks.push(CollapsedStack::new(root_label.clone(), root.self_value));
    }

    let mut pending: Vec<(FrameIndex, String)> = model
        .get_visible_children(FrameIndex::ROOT)
        .into_iter()
        .rev()
        .map(|child| (child, root_label.clone()))
        .collect();

    while let Some((index, prefix)) = pending.pop() {
        let Some(node) = tree.node(index) else {
            continue;
        };

        let stack = format!("{};{}", prefix, sanitize_frame(&node.name));
        if node.self_value > 0 {
            stacks.push(CollapsedStack::new(stack.clone(), node.self_value));
        }

        for child in model.get_visible_children(index).into_iter().rev() {
            pending.push((child, stack.clone()));
        }
    }

    debug!("Built {} collapsed stacks", stacks.len());

    stacks
}

/// Collapsed stacks use `;` as the frame separator
fn sanitize_frame(name: &str) -> String {
    if name.is_empty() {
        "(root)".to_string()
    } else {
        name.replace(';', ",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("app;main;alloc".to_string(), 1000);
        assert_eq!(stack.to_line(), "app;main;alloc 1000");
    }

    #[test]
    fn test_sanitize_frame() {
        assert_eq!(sanitize_frame("a;b"), "a,b");
        assert_eq!(sanitize_frame(""), "(root)");
    }
}
