#![forbid(unsafe_code)]

//! Generic three-way keyed set diff.
//!
//! Given the keys currently on screen (`C`) and the keys that should be on
//! screen next (`N`):
//!
//! - persisting = C ∩ N, in `N` order
//! - entering   = N \ C, in `N` order
//! - exiting    = C \ N, in `C` order
//!
//! The three sets are disjoint and their union is C ∪ N. Duplicate keys in
//! either input are counted once, at their first position.

use std::hash::Hash;

use ahash::AHashSet;

/// Outcome of [`keyed_diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDiff<K> {
    pub persisting: Vec<K>,
    pub entering: Vec<K>,
    pub exiting: Vec<K>,
}

impl<K> KeyedDiff<K> {
    /// No key changed membership.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }

    /// Total number of keys touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.persisting.len() + self.entering.len() + self.exiting.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for KeyedDiff<K> {
    fn default() -> Self {
        Self {
            persisting: Vec::new(),
            entering: Vec::new(),
            exiting: Vec::new(),
        }
    }
}

/// Partition `next` against `current` by key membership.
pub fn keyed_diff<K>(current: &[K], next: &[K]) -> KeyedDiff<K>
where
    K: Copy + Eq + Hash,
{
    let current_set: AHashSet<K> = current.iter().copied().collect();
    let mut next_set: AHashSet<K> = AHashSet::with_capacity(next.len());
    let mut diff = KeyedDiff::default();

    for &key in next {
        if !next_set.insert(key) {
            continue;
        }
        if current_set.contains(&key) {
            diff.persisting.push(key);
        } else {
            diff.entering.push(key);
        }
    }

    let mut exited: AHashSet<K> = AHashSet::new();
    for &key in current {
        if !next_set.contains(&key) && exited.insert(key) {
            diff.exiting.push(key);
        }
    }
    diff
}
