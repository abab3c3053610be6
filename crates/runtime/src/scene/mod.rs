//! Scene persistence contracts.
//!
//! The scene is the host-owned play surface. The engine never mutates it
//! directly: every write goes through [`ScenePersistence`], and loot state
//! rides along as a namespaced attribute bag on the token it describes.
//! Reads are unsynchronized snapshots; anything read before an `await` may
//! be stale after it.

mod memory;

pub use memory::{ActorRecord, InMemoryScene};

use async_trait::async_trait;
use tokio::sync::broadcast;

use loot_core::{ActorId, CurrencyBag, ItemGrant, ItemId, LootState, Point, TokenId};

use crate::error::PersistenceError;
use crate::relay::CorrelationId;

/// Scope under which the engine's attribute bag is stored on a token.
pub const FLAG_SCOPE: &str = "loot-stash";
/// Key of the bag inside the scope (fixed two-level layout).
pub const FLAG_KEY: &str = "loot-stash";

/// Blueprint for a token to create on the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenSpec {
    pub name: String,
    pub image: String,
    pub position: Point,
    /// Neutral disposition; loot belongs to no faction.
    pub disposition: i8,
    pub loot: LootState,
}

/// Partial update to an existing token.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenPatch {
    pub image: Option<String>,
    pub loot: Option<LootState>,
}

impl TokenPatch {
    pub fn image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            loot: None,
        }
    }

    pub fn loot(loot: LootState) -> Self {
        Self {
            image: None,
            loot: Some(loot),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Partial update to an actor.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActorPatch {
    /// Replacement currency balances.
    pub currency: Option<CurrencyBag>,
    /// Remove one owned item (the drop-from-inventory path).
    pub remove_item: Option<ItemId>,
}

/// A token as read back from the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenRecord {
    pub id: TokenId,
    pub name: String,
    pub image: String,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Actor this token represents, if any.
    pub actor: Option<ActorId>,
    /// The token's full attribute bag.
    pub flags: serde_json::Value,
}

impl TokenRecord {
    /// Decodes the engine's loot state from the attribute bag, if present.
    pub fn loot(&self) -> Option<LootState> {
        decode_flags(&self.flags)
    }

    /// Whether `point` falls inside the token's footprint.
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.position.x
            && point.x < self.position.x + self.width
            && point.y > self.position.y
            && point.y < self.position.y + self.height
    }
}

/// Encodes loot state into the fixed two-level attribute layout.
pub fn encode_flags(state: &LootState) -> serde_json::Value {
    serde_json::json!({
        FLAG_SCOPE: {
            FLAG_KEY: serde_json::to_value(state).expect("loot state serializes")
        }
    })
}

/// Decodes loot state back out of a token attribute bag.
pub fn decode_flags(flags: &serde_json::Value) -> Option<LootState> {
    let bag = flags.get(FLAG_SCOPE)?.get(FLAG_KEY)?;
    serde_json::from_value(bag.clone()).ok()
}

/// Scene lifecycle notifications, fanned out to every participant's client.
#[derive(Clone, Debug)]
pub enum SceneEvent {
    /// A token was created. Creations requested through the relay carry the
    /// originating correlation id so the requester can pair confirmation to
    /// request.
    TokenCreated {
        token: TokenId,
        correlation: Option<CorrelationId>,
    },
    TokenUpdated { token: TokenId },
    TokenDeleted { token: TokenId },
}

/// The host persistence collaborator.
///
/// Each mutating method corresponds to exactly one relay operation kind.
/// Mutations are async (they cross into the host and may suspend the
/// caller); reads are sync snapshots of whatever the local client currently
/// sees.
#[async_trait]
pub trait ScenePersistence: Send + Sync {
    async fn create_token(
        &self,
        spec: TokenSpec,
        correlation: Option<CorrelationId>,
    ) -> std::result::Result<TokenId, PersistenceError>;

    async fn update_token(
        &self,
        token: &TokenId,
        patch: TokenPatch,
    ) -> std::result::Result<(), PersistenceError>;

    async fn delete_token(&self, token: &TokenId) -> std::result::Result<(), PersistenceError>;

    async fn update_actor(
        &self,
        actor: &ActorId,
        patch: ActorPatch,
    ) -> std::result::Result<(), PersistenceError>;

    async fn grant_items(
        &self,
        actor: &ActorId,
        items: Vec<ItemGrant>,
    ) -> std::result::Result<(), PersistenceError>;

    fn token(&self, token: &TokenId) -> Option<TokenRecord>;

    /// First token whose footprint contains `position`.
    fn token_at(&self, position: Point) -> Option<TokenRecord>;

    /// Tokens carrying the engine's attribute bag.
    fn loot_tokens(&self) -> Vec<TokenId>;

    fn actor_currency(&self, actor: &ActorId) -> Option<CurrencyBag>;

    /// Subscribes to scene lifecycle events.
    fn events(&self) -> broadcast::Receiver<SceneEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use loot_core::{ItemSnapshot, ItemStack, LootState};

    #[test]
    fn flags_round_trip_through_the_namespaced_bag() {
        let stack = ItemStack::new(
            ItemId::from("sword"),
            1,
            ItemSnapshot::new("Sword", "sword.png", serde_json::json!({"damage": "1d8"})),
        );
        let state = LootState::single_item(stack);

        let flags = encode_flags(&state);
        assert!(flags[FLAG_SCOPE][FLAG_KEY].is_object());
        assert_eq!(decode_flags(&flags), Some(state));
    }

    #[test]
    fn foreign_flags_decode_to_none() {
        assert_eq!(decode_flags(&serde_json::json!({})), None);
        assert_eq!(
            decode_flags(&serde_json::json!({"other-module": {"state": 1}})),
            None
        );
    }
}
