//! Interactive tree model: visibility filtering, allocation ranking and
//! heat coloring over a categorized frame tree.

pub mod data_tree;
pub mod exclusion;
pub mod heat;

pub use data_tree::{DataTree, Deviation};
pub use exclusion::ExclusionSet;
pub use heat::{flame_gradient, HeatColor};
