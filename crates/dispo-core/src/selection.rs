//! Selection tracking for bulk operations
//!
//! A selection is an ephemeral set of buyer ids, never persisted, and
//! always kept a subset of the currently visible collection by the
//! state container (`crate::state`).

use std::collections::BTreeSet;

/// An ordered set of selected buyer ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Select one id (idempotent)
    pub fn select(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    /// Select many ids (idempotent)
    pub fn select_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.ids.insert(id.into());
        }
    }

    /// If every visible id is already selected, clear; otherwise select
    /// exactly the visible ids.
    pub fn toggle_all<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: BTreeSet<String> = visible_ids.into_iter().map(|id| id.to_string()).collect();
        if !visible.is_empty() && self.ids == visible {
            self.ids.clear();
        } else {
            self.ids = visible;
        }
    }

    /// Drop any selected id not in the visible set
    pub fn retain<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: BTreeSet<&str> = visible_ids.into_iter().collect();
        self.ids.retain(|id| visible.contains(id.as_str()));
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// True when the selection covers the whole (non-empty) visible set
    pub fn all_selected<'a, I>(&self, visible_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: BTreeSet<&str> = visible_ids.into_iter().collect();
        !visible.is_empty()
            && self.ids.len() == visible.len()
            && self.ids.iter().all(|id| visible.contains(id.as_str()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in stable (sorted) order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|id| id.as_str())
    }

    /// Selected ids collected into a vector
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}
