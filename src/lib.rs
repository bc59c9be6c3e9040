//! Heap Flame
//!
//! Categorized flamegraph analysis for heap-sampling allocation
//! profiles.
//!
//! The pipeline has two halves:
//! - [`analysis`] reads a raw `.heapprofile`, classifies every frame
//!   (application, dependency, core, wasm, regexp or engine internal)
//!   and builds a categorized frame tree plus the filter menu.
//! - [`model`] wraps that tree in a [`model::DataTree`] that tracks which
//!   categories are hidden and, on `update()`, ranks allocations and
//!   computes heat colors for a renderer.
//!
//! ```ignore
//! let envelope = heap_flame::analysis::analyse("app.heapprofile")?;
//! let mut tree = heap_flame::model::DataTree::new(envelope);
//! tree.show("all-v8:v8");
//! tree.update();
//! let hottest = tree.get_frame_by_rank(0)?;
//! ```

pub mod aggregator;
pub mod analysis;
pub mod commands;
pub mod flamegraph;
pub mod model;
pub mod output;
pub mod parser;
pub mod utils;
