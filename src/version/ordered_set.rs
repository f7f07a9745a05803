//! Keyed collection holding one value per key in insertion order

use std::cmp::Ordering;

use indexmap::IndexMap;

/// Deduplicates values by key. Re-inserting a key replaces its value but keeps
/// the position of the first insertion.
#[derive(Debug, Clone)]
pub struct UniqueOrderedSet<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for UniqueOrderedSet<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Clone> UniqueOrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the value for `key`
    pub fn add(&mut self, key: impl Into<String>, value: T) {
        self.items.insert(key.into(), value);
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, T)>,
    {
        for (key, value) in entries {
            self.add(key, value);
        }
    }

    /// Current values in insertion order
    pub fn values(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the values sorted by `compare`, leaving the set untouched
    pub fn sort<F>(&self, compare: F) -> Vec<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut values = self.values();
        values.sort_by(compare);
        values
    }
}
