//! Analysis output envelope consumed by the filter UI and renderers.

use super::translate::translate;
use super::tree::FrameTree;
use crate::parser::{read_heap_profile, RawProfile};
use crate::utils::config::DEFAULT_APP_NAME;
use crate::utils::error::AnalysisError;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, MAIN_SEPARATOR};

/// Entry of the filter menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeArea {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CodeArea>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_visibility_toggle: Option<bool>,

    /// Key passed to `show`/`hide` for this entry
    pub exclude_key: String,
}

impl CodeArea {
    fn leaf(id: &str, exclude_key: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            children: None,
            children_visibility_toggle: None,
            exclude_key: exclude_key.into(),
        }
    }

    fn group(id: &str, children: Vec<CodeArea>, toggle: bool) -> Self {
        Self {
            id: id.to_string(),
            children: Some(children),
            children_visibility_toggle: Some(toggle),
            exclude_key: id.to_string(),
        }
    }
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub app_name: String,
    pub path_separator: String,
    pub code_areas: Vec<CodeArea>,
    pub data: FrameTree,

    /// Dependencies seen in the profile, sorted
    #[serde(skip)]
    pub dependencies: Vec<String>,
}

/// Build the fixed filter menu for a set of dependencies
///
/// The order of the five top-level areas is fixed; dependencies are
/// listed lexicographically.
pub fn code_areas(deps: &HashSet<String>) -> Vec<CodeArea> {
    let mut sorted: Vec<&String> = deps.iter().collect();
    sorted.sort();

    let dep_entries = sorted
        .into_iter()
        .map(|dep| CodeArea::leaf(dep, format!("deps:{}", dep)))
        .collect();

    let v8_entries = ["v8", "native", "cpp", "regexp"]
        .iter()
        .map(|id| CodeArea::leaf(id, format!("all-v8:{}", id)))
        .collect();

    vec![
        CodeArea::group("app", Vec::new(), false),
        CodeArea::group("deps", dep_entries, true),
        CodeArea::leaf("wasm", "wasm"),
        CodeArea::leaf("core", "core"),
        CodeArea::group("all-v8", v8_entries, true),
    ]
}

/// Analyse an already-parsed profile
pub fn analyse_profile(profile: &RawProfile, app_name: &str) -> Envelope {
    let mut deps = HashSet::new();
    let tree = translate(&profile.head, app_name, &mut deps);

    let code_areas = code_areas(&deps);
    let mut dependencies: Vec<String> = deps.into_iter().collect();
    dependencies.sort();

    Envelope {
        app_name: app_name.to_string(),
        path_separator: MAIN_SEPARATOR.to_string(),
        code_areas,
        data: tree,
        dependencies,
    }
}

/// Read a heap profile from disk and analyse it
///
/// **Public** - main entry point for analysis
///
/// # Errors
/// * `AnalysisError::Read` - File cannot be read
/// * `AnalysisError::Parse` - File is not a valid heap profile
pub fn analyse(input: impl AsRef<Path>) -> Result<Envelope, AnalysisError> {
    let input = input.as_ref();
    let profile = read_heap_profile(input)?;
    let envelope = analyse_profile(&profile, DEFAULT_APP_NAME);

    info!(
        "Analysed {}: {} frames, {} bytes, {} dependencies",
        input.display(),
        envelope.data.len(),
        envelope.data.root().value,
        envelope.dependencies.len()
    );

    Ok(envelope)
}
