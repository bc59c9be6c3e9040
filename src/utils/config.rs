//! Configuration and constants for the analysis engine and CLI.

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Display name given to user application frames
pub const DEFAULT_APP_NAME: &str = "Application";

/// Longest application name the model shows before truncating
pub const MAX_APP_NAME_CHARS: usize = 30;

// Frames whose url contains this belong to the profiler's own injected
// sampler and are dropped with their whole subtree
pub const INSTRUMENTATION_MARKER: &str = "node_modules/@clinic/heap-profiler";

/// Exclusion keys hidden when a model is first built
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "all-v8:v8",
    "all-v8:cpp",
    "all-v8:native",
    "all-v8:regexp",
    INIT_KEY,
];

/// Synthetic exclusion key for initialization frames
pub const INIT_KEY: &str = "is:init";

/// Synthetic exclusion key for inlinable frames
pub const INLINABLE_KEY: &str = "is:inlinable";

/// Type tag of the placeholder returned when nothing is visible
pub const NO_DATA_TYPE: &str = "no-data";

/// Upper bound of the heat gradient for the hottest frame
pub const HEAT_CEILING: f64 = 0.95;

/// Default SVG flamegraph width in pixels
pub const DEFAULT_FLAMEGRAPH_WIDTH: usize = 1200;

/// Visibility overrides loaded from a TOML file
///
/// ```toml
/// show = ["all-v8:v8"]
/// hide = ["deps:lodash"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterPreset {
    /// Keys to make visible
    #[serde(default)]
    pub show: Vec<String>,

    /// Keys to hide
    #[serde(default)]
    pub hide: Vec<String>,
}

impl FilterPreset {
    /// Merge command-line overrides on top of this preset
    pub fn with_overrides(mut self, show: &[String], hide: &[String]) -> Self {
        self.show.extend(show.iter().cloned());
        self.hide.extend(hide.iter().cloned());
        self
    }
}

/// Load a filter preset from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
pub fn load_filter_preset(path: impl AsRef<Path>) -> Result<FilterPreset, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let preset: FilterPreset = toml::from_str(&contents)?;
    Ok(preset)
}
