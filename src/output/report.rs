//! Report schema written by the `analyse` command.
//!
//! The report is the analysis envelope plus summary statistics.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{AllocationDistribution, HotFrame};
use crate::analysis::{CodeArea, FrameTree};
use crate::model::DataTree;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
///
/// Borrows the frame tree and filter menu from the model it describes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport<'a> {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Keys hidden when the statistics were computed
    pub hidden_keys: Vec<String>,

    pub distribution: AllocationDistribution,

    /// Top frames (ranked by self allocation)
    pub hot_frames: Vec<HotFrame>,

    pub app_name: &'a str,
    pub path_separator: &'a str,
    pub code_areas: &'a [CodeArea],

    /// Nested categorized frame tree
    pub data: &'a FrameTree,
}

impl<'a> AnalysisReport<'a> {
    /// Report on `model` under its current exclusions
    pub fn new(
        model: &'a DataTree,
        generated_at: impl Into<String>,
        distribution: AllocationDistribution,
        hot_frames: Vec<HotFrame>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: generated_at.into(),
            hidden_keys: model
                .exclusions()
                .keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            distribution,
            hot_frames,
            app_name: &model.app_name,
            path_separator: &model.path_separator,
            code_areas: &model.code_areas,
            data: model.active_tree(),
        }
    }
}

/// Report fields needed to validate a written file
///
/// The frame tree is skipped while reading.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub version: String,
    pub generated_at: String,
    pub app_name: String,
    pub path_separator: String,
    pub code_areas: Vec<CodeArea>,

    #[serde(default)]
    pub hidden_keys: Vec<String>,

    pub distribution: AllocationDistribution,
}

impl ReportHeader {
    /// Dependencies listed in the `deps` filter menu entry
    pub fn dependencies(&self) -> Vec<&str> {
        self.code_areas
            .iter()
            .filter(|area| area.id == "deps")
            .flat_map(|area| area.children.iter().flatten())
            .map(|child| child.id.as_str())
            .collect()
    }
}
