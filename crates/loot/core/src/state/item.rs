//! Item stacks and their captured catalog snapshots.

use super::ItemId;

/// Captured copy of a catalog item's attributes at drop/add time.
///
/// The snapshot makes a granted copy independent of the catalog entry it came
/// from: later catalog edits do not affect loot already on the table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSnapshot {
    /// Display name shown in pickup notices.
    pub name: String,
    /// Image path shown on tokens and in notices.
    pub image: String,
    /// Opaque host attribute payload, carried verbatim.
    pub data: serde_json::Value,
}

impl ItemSnapshot {
    pub fn new(name: impl Into<String>, image: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            data,
        }
    }
}

/// A quantity of one catalog item held by a loot token.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub source: ItemId,
    pub count: u32,
    pub snapshot: ItemSnapshot,
}

impl ItemStack {
    pub fn new(source: ItemId, count: u32, snapshot: ItemSnapshot) -> Self {
        Self {
            source,
            count,
            snapshot,
        }
    }

    /// Zero-count stacks are pruned from container state.
    pub fn is_depleted(&self) -> bool {
        self.count == 0
    }
}
