//! Allocation rankings and distribution statistics from a data tree.
//!
//! Hot frames are the frames allocating the most memory themselves.
//! These are the primary targets for optimization.

use crate::model::{DataTree, HeatColor};
use crate::utils::error::ModelError;
use log::debug;
use serde::{Deserialize, Serialize};

/// A ranked frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotFrame {
    pub rank: usize,
    pub id: u64,
    pub name: String,
    pub type_key: String,
    pub self_value: u64,

    /// Percentage of total allocated bytes
    pub percentage: f64,

    pub heat_color: HeatColor,
}

/// Top `top_n` visible frames by self allocation
///
/// **Public** - main entry point for metrics calculation
///
/// # Errors
/// * `ModelError::StaleModel` - the model has not been updated
pub fn calculate_hot_frames(model: &DataTree, top_n: usize) -> Result<Vec<HotFrame>, ModelError> {
    let total = model.active_tree().root().value;
    debug!("Calculating top {} hot frames of {} bytes", top_n, total);

    model
        .sorted_allocations()?
        .iter()
        .filter(|index| !index.is_no_data())
        .take(top_n)
        .enumerate()
        .filter_map(|(rank, index)| model.node(*index).map(|node| (rank, *index, node)))
        .map(|(rank, index, node)| -> Result<HotFrame, ModelError> {
            Ok(HotFrame {
                rank: rank + 1,
                id: node.id,
                name: node.name.clone(),
                type_key: node.type_key(),
                self_value: node.self_value,
                percentage: percentage_of(node.self_value, total),
                heat_color: model.get_heat_color(index)?,
            })
        })
        .collect()
}

/// Allocation distribution statistics
///
/// **Public** - returned from calculate_allocation_distribution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationDistribution {
    /// Total bytes in the profile
    pub total_bytes: u64,

    /// Bytes allocated by visible frames
    pub visible_bytes: u64,

    /// Number of frames in the tree, root excluded
    pub frame_count: usize,

    /// Number of visible frames
    pub visible_frame_count: usize,

    /// Mean share of the total per visible frame
    pub mean_share: f64,

    /// Percentage of total bytes in the top 10% of visible frames
    pub top_10_percent_percentage: f64,
}

/// Calculate allocation distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_allocation_distribution(
    model: &DataTree,
) -> Result<AllocationDistribution, ModelError> {
    let sorted = model.sorted_allocations()?;
    let total = model.active_tree().root().value;

    let visible: Vec<u64> = sorted
        .iter()
        .filter(|index| !index.is_no_data())
        .filter_map(|index| model.node(*index).map(|node| node.self_value))
        .collect();

    let visible_bytes: u64 = visible.iter().sum();
    let top_count = (visible.len() as f64 * 0.1).ceil() as usize;
    let top_bytes: u64 = visible.iter().take(top_count).sum();

    Ok(AllocationDistribution {
        total_bytes: total,
        visible_bytes,
        frame_count: model.active_nodes().len(),
        visible_frame_count: visible.len(),
        mean_share: model.mean()?,
        top_10_percent_percentage: percentage_of(top_bytes, total),
    })
}

impl AllocationDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {} B | Visible: {} B | Frames: {}/{} | Mean share: {:.4}% | Top 10%: {:.1}%",
            self.total_bytes,
            self.visible_bytes,
            self.visible_frame_count,
            self.frame_count,
            self.mean_share * 100.0,
            self.top_10_percent_percentage
        )
    }
}

fn percentage_of(value: u64, total: u64) -> f64 {
    if total > 0 {
        (value as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
