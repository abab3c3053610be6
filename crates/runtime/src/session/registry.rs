//! Session-scoped registry of tracked loot tokens.

use std::collections::HashSet;

use loot_core::TokenId;

/// The set of tokens the loot layer owns in the current session.
///
/// Lifecycle is tied to the owning [`super::LootSession`]; nothing here
/// outlives the session it was built for.
#[derive(Debug, Default)]
pub struct LootRegistry {
    tokens: HashSet<TokenId>,
}

impl LootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a token. Returns false if it was already tracked.
    pub fn register(&mut self, token: TokenId) -> bool {
        self.tokens.insert(token)
    }

    /// Stops tracking a token.
    pub fn unregister(&mut self, token: &TokenId) -> bool {
        self.tokens.remove(token)
    }

    pub fn contains(&self, token: &TokenId) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenId> {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_registration_state() {
        let mut registry = LootRegistry::new();
        let token = TokenId::from("tok-1");

        assert!(registry.register(token.clone()));
        assert!(!registry.register(token.clone()));
        assert!(registry.contains(&token));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(&token));
        assert!(!registry.contains(&token));
        assert!(registry.is_empty());
    }
}
