//! Item catalog collaborator.

use std::collections::HashMap;

use loot_core::{ItemId, ItemSnapshot};

/// Read-only access to the external item catalog.
///
/// `snapshot` captures the item's display attributes at lookup time; the
/// returned copy stays valid even if the catalog entry later changes.
pub trait ItemCatalog: Send + Sync {
    fn snapshot(&self, id: &ItemId) -> Option<ItemSnapshot>;
}

/// [`ItemCatalog`] backed by an in-memory map.
#[derive(Default)]
pub struct InMemoryCatalog {
    entries: HashMap<ItemId, ItemSnapshot>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog entry.
    pub fn add_entry(&mut self, id: ItemId, snapshot: ItemSnapshot) {
        self.entries.insert(id, snapshot);
    }

    /// Builder-style variant of [`Self::add_entry`].
    pub fn with_entry(mut self, id: ItemId, snapshot: ItemSnapshot) -> Self {
        self.add_entry(id, snapshot);
        self
    }
}

impl ItemCatalog for InMemoryCatalog {
    fn snapshot(&self, id: &ItemId) -> Option<ItemSnapshot> {
        self.entries.get(id).cloned()
    }
}
