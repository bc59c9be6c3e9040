//! Interactive data tree behind the flamegraph viewer.
//!
//! Wraps a translated frame tree together with the set of hidden
//! categories. Visibility changes are cheap; the aggregates that depend
//! on them (allocation ranking, mean share, heat bounds) are only
//! recomputed by an explicit `update()`, so a burst of toggles costs one
//! recomputation. Reading aggregates before that fails with
//! `ModelError::StaleModel`.

use super::exclusion::ExclusionSet;
use super::heat::{flame_gradient, HeatColor};
use crate::analysis::{CategorizedNode, CodeArea, Envelope, FrameIndex, FrameTree};
use crate::utils::config::{FilterPreset, HEAT_CEILING, MAX_APP_NAME_CHARS};
use crate::utils::error::ModelError;
use log::debug;
use std::cmp::Ordering;

/// How far a frame's share of the total sits from the mean share
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deviation {
    Above(f64),
    Below(f64),
    AtMean,
}

impl Deviation {
    /// Square-root compressed distance from the mean
    pub fn adjusted_percentage(self) -> f64 {
        match self {
            Self::Above(adjusted) | Self::Below(adjusted) => adjusted,
            Self::AtMean => 0.0,
        }
    }
}

/// Aggregates valid for one exclusion state
#[derive(Debug, Clone)]
struct Aggregates {
    sorted_allocations: Vec<FrameIndex>,
    mean: f64,
    max_above_adjusted: f64,
    max_below_adjusted: f64,
    /// Indexed by arena position, root included
    deviations: Vec<Deviation>,
}

/// Stateful view over a categorized frame tree
#[derive(Debug, Clone)]
pub struct DataTree {
    /// Application name, truncated for display
    pub app_name: String,
    pub path_separator: String,
    pub code_areas: Vec<CodeArea>,

    tree: FrameTree,
    data_nodes: Vec<FrameIndex>,
    total: u64,
    exclude: ExclusionSet,
    no_data: CategorizedNode,

    /// `None` while stale
    aggregates: Option<Aggregates>,
}

impl DataTree {
    /// Wrap an analysis result with the default exclusions
    pub fn new(envelope: Envelope) -> Self {
        Self::with_exclusions(envelope, ExclusionSet::default())
    }

    pub fn with_exclusions(envelope: Envelope, exclude: ExclusionSet) -> Self {
        let tree = envelope.data;
        // The tree shape never changes, so the flat index is built once
        let data_nodes = tree.descendants(FrameIndex::ROOT);
        let total = tree.root().value;

        debug!(
            "Data tree built: {} frames, {} bytes total",
            data_nodes.len(),
            total
        );

        Self {
            app_name: truncate_app_name(&envelope.app_name),
            path_separator: envelope.path_separator,
            code_areas: envelope.code_areas,
            tree,
            data_nodes,
            total,
            exclude,
            no_data: CategorizedNode::no_data(),
            aggregates: None,
        }
    }

    /// Recompute aggregates over the whole tree
    pub fn update(&mut self) {
        self.recompute(self.sort_allocations(None));
    }

    /// Recompute aggregates with the ranking limited to one subtree
    ///
    /// Used for drill-down views; the mean share is still relative to
    /// the whole profile.
    pub fn update_subtree(&mut self, subtree_root: FrameIndex) -> Result<(), ModelError> {
        self.tree
            .node(subtree_root)
            .ok_or(ModelError::UnknownFrame(subtree_root.index()))?;
        self.recompute(self.sort_allocations(Some(subtree_root)));
        Ok(())
    }

    pub fn is_fresh(&self) -> bool {
        self.aggregates.is_some()
    }

    /// Make `key` visible; true if anything changed
    pub fn show(&mut self, key: &str) -> bool {
        let changed = self.exclude.show(key);
        if changed {
            self.aggregates = None;
        }
        changed
    }

    /// Hide `key`; true if anything changed
    pub fn hide(&mut self, key: &str) -> bool {
        let changed = self.exclude.hide(key);
        if changed {
            self.aggregates = None;
        }
        changed
    }

    /// Apply a preset's show then hide lists, returning how many keys changed
    pub fn apply_preset(&mut self, preset: &FilterPreset) -> usize {
        let shown = preset.show.iter().filter(|key| self.show(key)).count();
        let hidden = preset.hide.iter().filter(|key| self.hide(key)).count();
        shown + hidden
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclude
    }

    pub fn active_tree(&self) -> &FrameTree {
        &self.tree
    }

    /// Every frame except the root, depth-first pre-order
    pub fn active_nodes(&self) -> &[FrameIndex] {
        &self.data_nodes
    }

    /// Resolve an index, including the no-data placeholder
    pub fn node(&self, index: FrameIndex) -> Option<&CategorizedNode> {
        if index.is_no_data() {
            Some(&self.no_data)
        } else {
            self.tree.node(index)
        }
    }

    /// Number of ranked frames (1 when only the placeholder remains)
    pub fn count_frames(&self) -> Result<usize, ModelError> {
        Ok(self.aggregates()?.sorted_allocations.len())
    }

    pub fn get_node_by_id(&self, id: u64) -> Option<FrameIndex> {
        self.data_nodes
            .iter()
            .copied()
            .find(|index| self.tree.node(*index).map_or(false, |node| node.id == id))
    }

    /// Effective self value under the current exclusions
    ///
    /// A hidden frame contributes nothing itself; its value is that of
    /// its nearest visible descendants.
    pub fn get_node_value(&self, index: FrameIndex) -> u64 {
        let mut total = 0;
        let mut stack = vec![index];

        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            if self.exclude.excludes(node) {
                stack.extend(node.children.iter().copied());
            } else {
                total += node.self_value;
            }
        }

        total
    }

    pub fn get_type_key(&self, node: &CategorizedNode) -> String {
        node.type_key()
    }

    /// Visible frames of `nodes`, sorted stably by `sorter`
    ///
    /// Falls back to the single no-data placeholder when nothing is visible.
    pub fn get_flattened_sorted<F>(&self, mut sorter: F, nodes: &[FrameIndex]) -> Vec<FrameIndex>
    where
        F: FnMut(&CategorizedNode, &CategorizedNode) -> Ordering,
    {
        let mut filtered: Vec<FrameIndex> = nodes
            .iter()
            .copied()
            .filter(|index| !self.is_node_excluded(*index))
            .collect();

        if filtered.is_empty() {
            return vec![FrameIndex::NO_DATA];
        }

        filtered.sort_by(|a, b| match (self.tree.node(*a), self.tree.node(*b)) {
            (Some(a), Some(b)) => sorter(a, b),
            _ => Ordering::Equal,
        });
        filtered
    }

    /// Largest self allocation first
    pub fn allocations_sorter() -> impl Fn(&CategorizedNode, &CategorizedNode) -> Ordering {
        |a: &CategorizedNode, b: &CategorizedNode| b.self_value.cmp(&a.self_value)
    }

    /// Rank visible frames by self allocation
    ///
    /// With `subtree_root` the candidates are that frame and its
    /// descendants, otherwise every non-root frame.
    pub fn sort_allocations(&self, subtree_root: Option<FrameIndex>) -> Vec<FrameIndex> {
        match subtree_root {
            Some(root) => {
                let mut frames = vec![root];
                frames.extend(self.tree.descendants(root));
                self.get_flattened_sorted(Self::allocations_sorter(), &frames)
            }
            None => self.get_flattened_sorted(Self::allocations_sorter(), &self.data_nodes),
        }
    }

    /// Position of a frame in the allocation ranking
    pub fn get_sort_position(&self, index: FrameIndex) -> Result<Option<usize>, ModelError> {
        Ok(self
            .aggregates()?
            .sorted_allocations
            .iter()
            .position(|ranked| *ranked == index))
    }

    pub fn get_frame_by_rank(&self, rank: usize) -> Result<Option<FrameIndex>, ModelError> {
        Ok(self.aggregates()?.sorted_allocations.get(rank).copied())
    }

    /// Ranked frames, hottest first
    pub fn sorted_allocations(&self) -> Result<&[FrameIndex], ModelError> {
        Ok(&self.aggregates()?.sorted_allocations)
    }

    /// Mean share of the total over the ranked frames
    pub fn mean(&self) -> Result<f64, ModelError> {
        Ok(self.aggregates()?.mean)
    }

    pub fn max_above_adjusted(&self) -> Result<f64, ModelError> {
        Ok(self.aggregates()?.max_above_adjusted)
    }

    pub fn max_below_adjusted(&self) -> Result<f64, ModelError> {
        Ok(self.aggregates()?.max_below_adjusted)
    }

    pub fn deviation(&self, index: FrameIndex) -> Result<Deviation, ModelError> {
        let aggregates = self.aggregates()?;
        if index.is_no_data() {
            return Ok(Deviation::AtMean);
        }
        aggregates
            .deviations
            .get(index.index())
            .copied()
            .ok_or(ModelError::UnknownFrame(index.index()))
    }

    pub fn adjusted_percentage(&self, index: FrameIndex) -> Result<f64, ModelError> {
        self.deviation(index).map(Deviation::adjusted_percentage)
    }

    /// Heat color for a frame
    ///
    /// Black for the root, hidden frames, the placeholder and empty
    /// profiles. Otherwise the frame's deviation from the mean is placed
    /// on the gradient relative to a pivot at the mean.
    ///
    /// # Errors
    /// * `ModelError::StaleModel` - `update()` has not run since the last change
    /// * `ModelError::Computation` - `index` does not name a frame
    pub fn get_heat_color(&self, index: FrameIndex) -> Result<HeatColor, ModelError> {
        let aggregates = self.aggregates()?;
        let node = self
            .node(index)
            .ok_or_else(|| ModelError::Computation(format!("unknown frame index {}", index.index())))?;

        if node.is_no_data() || node.is_root || self.is_node_excluded(index) || aggregates.mean == 0.0
        {
            return Ok(HeatColor::BLACK);
        }

        let deviation = aggregates
            .deviations
            .get(index.index())
            .copied()
            .ok_or_else(|| ModelError::Computation(format!("no deviation for frame {}", node.id)))?;

        let mean = aggregates.mean;
        let max_above = aggregates.max_above_adjusted;
        let max_below = aggregates.max_below_adjusted;
        let pivot = mean / (mean + max_above + max_below);

        let decimal = match deviation {
            Deviation::AtMean => pivot,
            // A zero maximum means nothing sits on that side of the mean
            Deviation::Above(adjusted) if max_above > 0.0 => {
                pivot + (adjusted / max_above) * (HEAT_CEILING - pivot)
            }
            Deviation::Below(adjusted) if max_below > 0.0 => {
                pivot - (adjusted / max_below) * pivot
            }
            Deviation::Above(_) | Deviation::Below(_) => pivot,
        };

        if !decimal.is_finite() {
            return Err(ModelError::Computation(format!(
                "non-finite gradient position for frame {}",
                node.id
            )));
        }

        Ok(flame_gradient(decimal))
    }

    /// Nearest visible descendants of a frame, in order
    ///
    /// Hidden children are replaced by their own visible children so
    /// the rendered hierarchy has no gaps.
    pub fn get_visible_children(&self, index: FrameIndex) -> Vec<FrameIndex> {
        let mut visible = Vec::new();
        let mut stack: Vec<FrameIndex> = self.tree.children(index).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if self.is_node_excluded(current) {
                stack.extend(self.tree.children(current).iter().rev());
            } else {
                visible.push(current);
            }
        }

        visible
    }

    pub fn is_node_excluded(&self, index: FrameIndex) -> bool {
        if index.is_no_data() {
            return false;
        }
        self.tree
            .node(index)
            .map_or(false, |node| self.exclude.excludes(node))
    }

    fn aggregates(&self) -> Result<&Aggregates, ModelError> {
        self.aggregates.as_ref().ok_or(ModelError::StaleModel)
    }

    fn recompute(&mut self, sorted_allocations: Vec<FrameIndex>) {
        let share = |value: u64| {
            if self.total == 0 {
                0.0
            } else {
                value as f64 / self.total as f64
            }
        };

        let mean = sorted_allocations
            .iter()
            .map(|index| self.node(*index).map_or(0.0, |node| share(node.self_value)))
            .sum::<f64>()
            / sorted_allocations.len().max(1) as f64;

        // Square roots keep a few outliers from flattening the contrast
        // among everything else
        let mut max_above_adjusted: f64 = 0.0;
        let mut max_below_adjusted: f64 = 0.0;
        let deviations: Vec<Deviation> = self
            .tree
            .iter()
            .map(|(_, node)| {
                let percentage = share(node.self_value);
                if percentage > mean {
                    let adjusted = (percentage - mean).sqrt();
                    max_above_adjusted = max_above_adjusted.max(adjusted);
                    Deviation::Above(adjusted)
                } else if percentage < mean {
                    let adjusted = (mean - percentage).sqrt();
                    max_below_adjusted = max_below_adjusted.max(adjusted);
                    Deviation::Below(adjusted)
                } else {
                    Deviation::AtMean
                }
            })
            .collect();

        debug!(
            "Aggregates updated: {} ranked frames, mean share {:.6}",
            sorted_allocations.len(),
            mean
        );

        self.aggregates = Some(Aggregates {
            sorted_allocations,
            mean,
            max_above_adjusted,
            max_below_adjusted,
            deviations,
        });
    }
}

fn truncate_app_name(name: &str) -> String {
    if name.chars().count() > MAX_APP_NAME_CHARS {
        let mut truncated: String = name.chars().take(MAX_APP_NAME_CHARS).collect();
        truncated.push('…');
        truncated
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_app_name() {
        assert_eq!(truncate_app_name("Application"), "Application");

        let long = "a".repeat(31);
        let truncated = truncate_app_name(&long);
        assert_eq!(truncated.chars().count(), MAX_APP_NAME_CHARS + 1);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_deviation_adjusted_percentage() {
        assert_eq!(Deviation::Above(0.5).adjusted_percentage(), 0.5);
        assert_eq!(Deviation::Below(0.25).adjusted_percentage(), 0.25);
        assert_eq!(Deviation::AtMean.adjusted_percentage(), 0.0);
    }
}
