//! Set of category and type keys hidden from aggregate views.

use crate::analysis::CategorizedNode;
use crate::utils::config::{DEFAULT_EXCLUSIONS, INIT_KEY, INLINABLE_KEY};
use std::collections::HashSet;

/// Keys currently hidden
///
/// A key is either a category (`deps`), a `category:type` composite
/// (`deps:lodash`, `all-v8:cpp`) or one of the synthetic `is:` keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    keys: HashSet<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self {
            keys: DEFAULT_EXCLUSIONS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ExclusionSet {
    /// Set with nothing hidden
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Make `key` visible; false if it already was
    pub fn show(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }

    /// Hide `key`; false if it already was hidden
    pub fn hide(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Hidden keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Whether `node` is hidden by any key in the set
    ///
    /// Types are namespaced by category so a dependency named `cpp` is
    /// not hidden together with `all-v8:cpp`.
    pub fn excludes(&self, node: &CategorizedNode) -> bool {
        (node.is_init && self.contains(INIT_KEY))
            || (node.is_inlinable && self.contains(INLINABLE_KEY))
            || self.contains(node.category.as_str())
            || self.contains(&node.type_key())
    }
}
