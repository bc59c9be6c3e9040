//! Flamegraph generation using the inferno library.
//!
//! This module converts collapsed stacks into SVG flamegraphs and
//! renders terminal summaries of the hottest frames.

pub mod generator;

// Re-export main types
pub use generator::{generate_flamegraph, generate_text_summary, FlamegraphConfig};
