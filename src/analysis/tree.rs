//! Categorized frame tree.
//!
//! The tree is stored as an arena in depth-first pre-order: index 0 is
//! the synthetic root and every node's descendants follow it
//! contiguously. Children are referenced by `FrameIndex`, so walking or
//! dropping a very deep tree never recurses.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::fmt;

/// Coarse classification bucket used for bulk show/hide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "app")]
    App,
    #[serde(rename = "deps")]
    Deps,
    #[serde(rename = "core")]
    Core,
    #[serde(rename = "wasm")]
    Wasm,
    #[serde(rename = "regexp")]
    Regexp,
    #[serde(rename = "all-v8")]
    AllV8,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Deps => "deps",
            Self::Core => "core",
            Self::Wasm => "wasm",
            Self::Regexp => "regexp",
            Self::AllV8 => "all-v8",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a node inside a `FrameTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameIndex(usize);

impl FrameIndex {
    /// The synthetic root is always stored first
    pub const ROOT: FrameIndex = FrameIndex(0);

    /// Stands in for the placeholder shown when no frame is visible
    pub const NO_DATA: FrameIndex = FrameIndex(usize::MAX);

    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_no_data(self) -> bool {
        self == Self::NO_DATA
    }
}

/// One categorized frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedNode {
    pub id: u64,

    /// Display string: function, file and location
    pub name: String,

    pub file_name: String,
    pub function_name: String,

    /// 1-based; `None` for the root
    pub line_number: Option<i64>,
    pub column_number: Option<i64>,

    /// Fine-grained origin (dependency name, v8 subtype, app name...)
    #[serde(rename = "type")]
    pub frame_type: String,

    pub category: Category,

    /// Bytes attributed directly to this frame
    pub self_value: u64,

    /// Sum of `value` over all children
    pub children_value: u64,

    /// Always `self_value + children_value`
    pub value: u64,

    #[serde(skip)]
    pub children: Vec<FrameIndex>,

    pub is_root: bool,

    pub is_init: bool,
    pub is_inlinable: bool,
}

impl CategorizedNode {
    /// Placeholder substituted when every frame is excluded
    pub fn no_data() -> Self {
        Self {
            id: 0,
            name: String::from("No data"),
            file_name: String::new(),
            function_name: String::new(),
            line_number: None,
            column_number: None,
            frame_type: crate::utils::config::NO_DATA_TYPE.to_string(),
            category: Category::App,
            self_value: 0,
            children_value: 0,
            value: 0,
            children: Vec::new(),
            is_root: false,
            is_init: false,
            is_inlinable: false,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.frame_type == crate::utils::config::NO_DATA_TYPE
    }

    /// `category:type` composite key
    pub fn type_key(&self) -> String {
        format!("{}:{}", self.category, self.frame_type)
    }
}

/// Arena-backed categorized call tree
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTree {
    nodes: Vec<CategorizedNode>,
}

impl FrameTree {
    /// Build from nodes already laid out in pre-order with the root first
    pub(crate) fn from_preorder(nodes: Vec<CategorizedNode>) -> Self {
        debug_assert!(nodes.first().map_or(false, |root| root.is_root));
        Self { nodes }
    }

    pub fn root(&self) -> &CategorizedNode {
        &self.nodes[0]
    }

    pub fn node(&self, index: FrameIndex) -> Option<&CategorizedNode> {
        self.nodes.get(index.0)
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &CategorizedNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (FrameIndex(i), node))
    }

    pub fn children(&self, index: FrameIndex) -> &[FrameIndex] {
        self.node(index).map_or(&[], |node| node.children.as_slice())
    }

    /// All descendants of `index` in depth-first pre-order, excluding `index`
    pub fn descendants(&self, index: FrameIndex) -> Vec<FrameIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<FrameIndex> = self.children(index).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }

        out
    }
}

/// Serializes as the nested `{..., children: [...]}` shape renderers expect
///
/// Nesting follows call depth; `output::write_report` runs it under `serde_stacker`.
impl Serialize for FrameTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NestedFrame::new(self, FrameIndex::ROOT).serialize(serializer)
    }
}

#[derive(Serialize)]
struct NestedFrame<'a> {
    #[serde(flatten)]
    node: &'a CategorizedNode,
    children: NestedChildren<'a>,
}

impl<'a> NestedFrame<'a> {
    fn new(tree: &'a FrameTree, index: FrameIndex) -> Self {
        Self {
            node: &tree.nodes[index.0],
            children: NestedChildren { tree, index },
        }
    }
}

struct NestedChildren<'a> {
    tree: &'a FrameTree,
    index: FrameIndex,
}

impl Serialize for NestedChildren<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.tree.children(self.index);
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for child in children {
            seq.serialize_element(&NestedFrame::new(self.tree, *child))?;
        }
        seq.end()
    }
}
