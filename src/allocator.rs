//! Unique key allocation for entries entering the index.

use std::collections::HashSet;

use crate::document::RetrievableUnit;

/// Allocates globally unique index keys from lineage-key bases.
///
/// The allocator owns the set of keys already handed out; callers pass it
/// explicitly wherever uniqueness must span multiple batches. Processing
/// is strictly ordered: re-running a fresh allocator over the same input
/// sequence reproduces the same assignment.
#[derive(Debug, Clone, Default)]
pub struct KeyAllocator {
    used: HashSet<String>,
}

impl KeyAllocator {
    /// Create an allocator with no keys in use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a unique key for `base`.
    ///
    /// Returns `base` itself if unused, otherwise `{base}_1`, `{base}_2`, …
    /// until an unused candidate is found. The winning candidate is
    /// recorded as used.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 1u64;
        loop {
            let candidate = format!("{base}_{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Allocate unique keys for an ordered sequence of units.
    ///
    /// Each unit's `doc_id` is the candidate base; collisions resolve in
    /// first-seen order.
    pub fn allocate_all(
        &mut self,
        units: impl IntoIterator<Item = RetrievableUnit>,
    ) -> Vec<(String, RetrievableUnit)> {
        units.into_iter().map(|unit| (self.allocate(&unit.doc_id), unit)).collect()
    }

    /// Whether a key has already been handed out.
    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(key)
    }

    /// Number of keys handed out so far.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether no keys have been handed out yet.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
