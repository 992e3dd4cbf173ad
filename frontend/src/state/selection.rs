use std::collections::HashSet;

use leptos::*;

/// The set of session ids checked for a bulk action. Ids are kept even when
/// the row scrolls out of the rendered window or the collection is refetched;
/// the server rejects ids it no longer knows.
#[derive(Clone, Copy)]
pub struct SelectionState {
    selected: RwSignal<HashSet<String>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            selected: create_rw_signal(HashSet::new()),
        }
    }

    pub fn toggle(&self, id: &str) {
        self.selected.update(|selected| {
            if !selected.remove(id) {
                selected.insert(id.to_string());
            }
        });
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.with(|selected| selected.contains(id))
    }

    pub fn clear(&self) {
        self.selected.update(|selected| selected.clear());
    }

    pub fn len(&self) -> usize {
        self.selected.with(|selected| selected.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted for a stable request payload.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .selected
            .with(|selected| selected.iter().cloned().collect());
        ids.sort();
        ids
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
