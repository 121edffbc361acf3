//! Active filter selection for the ticket list.

use crate::types::FilterSet;

/// Holds the currently selected facets for the lifetime of a list view.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    current: FilterSet,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> FilterSet {
        self.current.clone()
    }

    /// Replace the selection wholesale. Values are not validated here; the
    /// backend answers unknown terms with an empty listing.
    pub fn set(&mut self, next: FilterSet) {
        self.current = next;
    }
}
