//! Multi-select state scoped to the rendered page.

use std::collections::BTreeSet;

use crate::models::Job;

/// Selected job ids. Only ids present on the current page can be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Flips `id` if it is on `page`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str, page: &[Job]) -> bool {
        if !page.iter().any(|job| job.id == id) {
            return false;
        }
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Selects exactly the ids of `page`, replacing the previous selection.
    pub fn select_all(&mut self, page: &[Job]) {
        self.ids = page.iter().map(|job| job.id.clone()).collect();
    }

    /// True when every job on `page` is selected (and the page is non-empty).
    pub fn covers(&self, page: &[Job]) -> bool {
        !page.is_empty() && page.iter().all(|job| self.ids.contains(&job.id))
    }

    /// Drops ids that are not on `page`.
    pub fn retain_page(&mut self, page: &[Job]) {
        self.ids.retain(|id| page.iter().any(|job| &job.id == id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
