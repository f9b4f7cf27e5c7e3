//! Metadata-filter selections used to scope backend queries.

use std::collections::{BTreeMap, BTreeSet};

/// Mapping from filter-category id to the set of selected value ids.
///
/// Categories with no selected value are never stored, so `is_empty` means
/// "no filtering".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MetadataFilters(BTreeMap<i32, BTreeSet<i32>>);

impl MetadataFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one value in a category. Returns the new selection state of the value.
    pub fn toggle(&mut self, category: i32, value: i32) -> bool {
        let set = self.0.entry(category).or_default();
        let selected = if set.remove(&value) {
            false
        } else {
            set.insert(value);
            true
        };
        if set.is_empty() {
            self.0.remove(&category);
        }
        selected
    }

    /// Replace the selection of one category. Returns false if nothing changed.
    pub fn set(&mut self, category: i32, values: impl IntoIterator<Item = i32>) -> bool {
        let values: BTreeSet<i32> = values.into_iter().collect();
        if values.is_empty() {
            return self.0.remove(&category).is_some();
        }
        if self.0.get(&category) == Some(&values) {
            return false;
        }
        self.0.insert(category, values);
        true
    }

    pub fn clear_category(&mut self, category: i32) -> bool {
        self.0.remove(&category).is_some()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.0.is_empty();
        self.0.clear();
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_selected(&self, category: i32, value: i32) -> bool {
        self.0.get(&category).is_some_and(|s| s.contains(&value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&i32, &BTreeSet<i32>)> {
        self.0.iter()
    }

    /// Category id -> selected values, in the list form the backend accepts.
    pub fn to_lists(&self) -> BTreeMap<i32, Vec<i32>> {
        self.0
            .iter()
            .map(|(k, v)| (*k, v.iter().copied().collect()))
            .collect()
    }
}
