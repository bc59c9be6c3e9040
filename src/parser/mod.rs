//! Heap profile parsing and input schema definitions.
//!
//! This module handles:
//! - Reading raw `.heapprofile` JSON from disk
//! - Deserializing the sampled call tree

pub mod heap_profile;
pub mod schema;

// Re-export main types
pub use heap_profile::{parse_heap_profile, read_heap_profile};
pub use schema::{CallFrame, RawFrameNode, RawProfile, Sample};
