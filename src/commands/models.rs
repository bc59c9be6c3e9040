use crate::flamegraph::FlamegraphConfig;
use std::path::PathBuf;

/// Arguments for the analyse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyseArgs {
    /// Heap profile to analyse
    pub input: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Number of top frames to include in the report
    pub top_frames: usize,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// TOML filter preset applied before the overrides below
    pub filter_config: Option<PathBuf>,

    /// Keys to make visible
    pub show: Vec<String>,

    /// Keys to hide
    pub hide: Vec<String>,
}

impl Default for AnalyseArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: PathBuf::from("heap-profile.json"),
            output_svg: None,
            top_frames: 20,
            flamegraph_config: None,
            print_summary: false,
            filter_config: None,
            show: Vec::new(),
            hide: Vec::new(),
        }
    }
}
