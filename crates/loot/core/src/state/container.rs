//! The loot flag bag persisted on a token.

use crate::error::StateError;

use super::{CurrencyBag, ItemId, ItemSnapshot, ItemStack};

/// How a loot token behaves when interacted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TokenKind {
    /// A single pickup item: interacting transfers it and removes the token.
    SingleItem,
    /// An openable container that holds items and currency.
    Container,
}

/// Image paths for the token in each visual state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenImages {
    /// Image captured from the dropped item.
    pub original: String,
    /// Container image while open; falls back to `original`.
    pub open: Option<String>,
    /// Container image while closed; falls back to `original`.
    pub closed: Option<String>,
}

impl TokenImages {
    pub fn single(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            open: None,
            closed: None,
        }
    }

    pub fn container(
        original: impl Into<String>,
        open: impl Into<String>,
        closed: impl Into<String>,
    ) -> Self {
        Self {
            original: original.into(),
            open: Some(open.into()),
            closed: Some(closed.into()),
        }
    }

    /// Resolves the image to display for the given open state.
    pub fn current(&self, is_open: bool) -> &str {
        let preferred = if is_open { &self.open } else { &self.closed };
        preferred.as_deref().unwrap_or(&self.original)
    }
}

/// Full loot state of a token: container flags, held items, and currency.
///
/// Persisted as a namespaced attribute bag on the host-owned token. Mutation
/// goes through the guarded methods so the lock/open invariant can never be
/// observed violated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootState {
    pub kind: TokenKind,
    pub is_open: bool,
    pub can_close: bool,
    pub is_locked: bool,
    /// Held items, insertion order preserved.
    pub items: Vec<ItemStack>,
    pub currency: CurrencyBag,
    pub images: TokenImages,
}

impl LootState {
    /// State for a freshly dropped single pickup item.
    pub fn single_item(stack: ItemStack) -> Self {
        let images = TokenImages::single(stack.snapshot.image.clone());
        Self {
            kind: TokenKind::SingleItem,
            is_open: false,
            can_close: false,
            is_locked: false,
            items: vec![stack],
            currency: CurrencyBag::new(),
            images,
        }
    }

    /// State for a closed, unlocked container.
    pub fn container(images: TokenImages, can_close: bool) -> Self {
        Self {
            kind: TokenKind::Container,
            is_open: false,
            can_close,
            is_locked: false,
            items: Vec::new(),
            currency: CurrencyBag::new(),
            images,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind == TokenKind::Container
    }

    /// True when the token holds neither items nor currency.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.currency.is_empty()
    }

    /// Adds one unit of an item: merges into an existing stack for the same
    /// source, otherwise appends a new stack.
    pub fn add_stack(&mut self, source: ItemId, snapshot: ItemSnapshot) {
        match self.items.iter_mut().find(|stack| stack.source == source) {
            Some(stack) => stack.count += 1,
            None => self.items.push(ItemStack::new(source, 1, snapshot)),
        }
    }

    /// Removes depleted stacks.
    pub fn prune(&mut self) {
        self.items.retain(|stack| !stack.is_depleted());
    }

    /// Opens or closes the container. Opening a locked container is rejected.
    pub fn set_open(&mut self, open: bool) -> Result<(), StateError> {
        if open && self.is_locked {
            return Err(StateError::OpenWhileLocked);
        }
        self.is_open = open;
        Ok(())
    }

    /// Locks or unlocks the token. Locking an open container is rejected so
    /// the invariant stays a guard rather than a silent close.
    pub fn set_locked(&mut self, locked: bool) -> Result<(), StateError> {
        if locked && self.is_open {
            return Err(StateError::LockWhileOpen);
        }
        self.is_locked = locked;
        Ok(())
    }

    /// Checks the lock/open invariant.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.is_open && self.is_locked {
            return Err(StateError::OpenWhileLocked);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> ItemSnapshot {
        ItemSnapshot::new(name, format!("icons/{name}.png"), serde_json::json!({}))
    }

    #[test]
    fn add_stack_merges_same_source() {
        let mut state = LootState::container(
            TokenImages::container("chest.png", "open.png", "closed.png"),
            true,
        );
        state.add_stack(ItemId::from("sword"), snapshot("sword"));
        state.add_stack(ItemId::from("sword"), snapshot("sword"));
        state.add_stack(ItemId::from("shield"), snapshot("shield"));

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].count, 2);
        assert_eq!(state.items[1].count, 1);
    }

    #[test]
    fn cannot_open_while_locked() {
        let mut state = LootState::container(
            TokenImages::container("chest.png", "open.png", "closed.png"),
            true,
        );
        state.set_locked(true).unwrap();

        assert_eq!(state.set_open(true), Err(StateError::OpenWhileLocked));
        assert!(!state.is_open);
    }

    #[test]
    fn cannot_lock_while_open() {
        let mut state = LootState::container(
            TokenImages::container("chest.png", "open.png", "closed.png"),
            true,
        );
        state.set_open(true).unwrap();

        assert_eq!(state.set_locked(true), Err(StateError::LockWhileOpen));
        assert!(!state.is_locked);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn image_resolution_falls_back_to_original() {
        let images = TokenImages::single("item.png");
        assert_eq!(images.current(true), "item.png");
        assert_eq!(images.current(false), "item.png");

        let images = TokenImages::container("chest.png", "open.png", "closed.png");
        assert_eq!(images.current(true), "open.png");
        assert_eq!(images.current(false), "closed.png");
    }
}
