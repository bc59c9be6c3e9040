//! Input schema for heap-sampling profiles.
//!
//! Mirrors the JSON written by the V8 sampling heap profiler:
//! a tree of call frames rooted at `head`, plus the raw samples.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level heap profile as read from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfile {
    /// Root of the sampled call tree
    pub head: RawFrameNode,

    /// Individual allocation samples
    ///
    /// Parsed and kept for a future sample-based sizing mode; the
    /// categorization pass sizes frames from `selfSize` only.
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl RawProfile {
    /// Index sample sizes by node id (later samples for the same node win)
    pub fn sample_sizes(&self) -> HashMap<u64, u64> {
        self.samples.iter().map(|s| (s.node_id, s.size)).collect()
    }
}

/// One node of the raw sampled call tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrameNode {
    pub call_frame: CallFrame,

    #[serde(default)]
    pub children: Vec<RawFrameNode>,

    pub id: u64,

    /// Bytes allocated directly by this frame
    #[serde(default)]
    pub self_size: u64,
}

/// Function and location of a raw frame (0-based line and column)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    #[serde(default)]
    pub function_name: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub line_number: i64,

    #[serde(default)]
    pub column_number: i64,
}

/// A single allocation sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub node_id: u64,
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u64>,
}

impl RawFrameNode {
    /// Count this node and all of its descendants
    pub fn count_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Frees descendants from a work list rather than recursively
impl Drop for RawFrameNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
