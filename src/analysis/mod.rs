//! Frame classification and call tree translation.
//!
//! This module transforms a raw heap profile into:
//! - A categorized, arena-backed frame tree
//! - The set of third-party dependencies seen
//! - The filter menu describing the categories

pub mod categorise;
pub mod envelope;
pub mod translate;
pub mod tree;

// Re-export main types and functions
pub use categorise::{categorise, Classification};
pub use envelope::{analyse, analyse_profile, code_areas, CodeArea, Envelope};
pub use translate::translate;
pub use tree::{Category, CategorizedNode, FrameIndex, FrameTree};
