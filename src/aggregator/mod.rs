//! Aggregation of the data tree into collapsed stacks and metrics.
//!
//! This module transforms the visible part of a data tree into:
//! - Collapsed stack format (for flamegraph generation)
//! - Hot frame ranking (top allocators)
//! - Allocation distribution statistics

pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use metrics::{
    calculate_allocation_distribution, calculate_hot_frames, AllocationDistribution, HotFrame,
};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
