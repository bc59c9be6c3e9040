//! SVG flamegraph and terminal summary generation.
//!
//! SVG rendering is delegated to inferno; the terminal summary is a
//! ranked table of the hottest visible frames.

use crate::aggregator::metrics::HotFrame;
use crate::aggregator::stack_builder::CollapsedStack;
use crate::utils::config::DEFAULT_FLAMEGRAPH_WIDTH;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::color::{BasicPalette, Palette};
use inferno::flamegraph::{self, Options};
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Heap Allocation Profile".to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Generate SVG flamegraph from collapsed stacks
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", stacks.len());

    let mut options = Options::default();
    options.title = config.title.clone();
    options.count_name = "bytes".to_string();
    options.image_width = Some(config.width);
    options.colors = Palette::Basic(BasicPalette::Mem);

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();
    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::Render(e.to_string()))?;

    let svg_content =
        String::from_utf8(svg).map_err(|e| FlamegraphError::Render(e.to_string()))?;

    info!(
        "Flamegraph generated successfully ({} bytes)",
        svg_content.len()
    );
    Ok(svg_content)
}

fn get_ansi_color(type_key: &str) -> &'static str {
    match type_key.split(':').next().unwrap_or_default() {
        "app" => "\x1b[32m",    // Green
        "deps" => "\x1b[34m",   // Blue
        "core" => "\x1b[33m",   // Yellow
        "wasm" => "\x1b[35m",   // Magenta
        "regexp" => "\x1b[36m", // Cyan
        _ => "\x1b[90m",        // Gray
    }
}

/// Create a text summary table of the hottest frames
pub fn generate_text_summary(hot_frames: &[HotFrame], max_lines: usize) -> String {
    let mut lines = Vec::new();
    let reset = "\x1b[0m";

    lines.push("  TOP ALLOCATIONS".to_string());
    lines.push(format!(
        "  {:>4}  {:<48}  {:<20}  {:>12}  {:>7}  {}",
        "#", "Frame", "Type", "Bytes", "%", "Heat"
    ));
    lines.push(format!("  {}", "-".repeat(112)));

    if hot_frames.is_empty() {
        lines.push("  (no visible frames)".to_string());
    }

    for frame in hot_frames.iter().take(max_lines) {
        let color = get_ansi_color(&frame.type_key);
        lines.push(format!(
            "  {:>4}  {}{:<48}{}  {:<20}  {:>12}  {:>6.1}%  {}",
            frame.rank,
            color,
            truncate_name(&frame.name, 48),
            reset,
            truncate_name(&frame.type_key, 20),
            frame.self_value,
            frame.percentage,
            frame.heat_color
        ));
    }

    if hot_frames.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} frames)",
            max_lines,
            hot_frames.len()
        ));
    }

    lines.join("\n")
}

/// Keep the tail of long names, which carries the file and location
fn truncate_name(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count > max_len {
        let tail: String = s.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("abcdefghijkl", 8), "...hijkl");
    }

    #[test]
    fn test_empty_stacks_rejected() {
        assert!(matches!(
            generate_flamegraph(&[], None),
            Err(FlamegraphError::EmptyStacks)
        ));
    }
}
