//! In-memory [`ScenePersistence`] used by the integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use loot_core::{ActorId, CurrencyBag, ItemGrant, Point, TokenId};

use crate::error::PersistenceError;
use crate::relay::CorrelationId;

use super::{
    ActorPatch, SceneEvent, ScenePersistence, TokenPatch, TokenRecord, TokenSpec, encode_flags,
};

/// An actor as stored by the in-memory scene.
#[derive(Clone, Debug, Default)]
pub struct ActorRecord {
    pub currency: CurrencyBag,
    pub items: Vec<ItemGrant>,
}

#[derive(Default)]
struct SceneInner {
    tokens: HashMap<TokenId, TokenRecord>,
    actors: HashMap<ActorId, ActorRecord>,
}

/// Single shared scene standing in for the host: every participant's relay
/// and session in a test points at the same instance, the way every client
/// sees the same authoritative world.
pub struct InMemoryScene {
    inner: Mutex<SceneInner>,
    events: broadcast::Sender<SceneEvent>,
    next_id: AtomicU64,
    token_size: f64,
}

impl InMemoryScene {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(SceneInner::default()),
            events,
            next_id: AtomicU64::new(1),
            token_size: 100.0,
        }
    }

    /// Registers an actor with the given starting currency.
    pub fn add_actor(&self, id: ActorId, currency: CurrencyBag) {
        self.inner.lock().unwrap().actors.insert(
            id,
            ActorRecord {
                currency,
                items: Vec::new(),
            },
        );
    }

    /// Places a pre-existing token directly (bypassing the relay), for test
    /// setup.
    pub fn place_token(&self, record: TokenRecord) {
        self.inner
            .lock()
            .unwrap()
            .tokens
            .insert(record.id.clone(), record);
    }

    /// Snapshot of an actor's stored record, for assertions.
    pub fn actor(&self, id: &ActorId) -> Option<ActorRecord> {
        self.inner.lock().unwrap().actors.get(id).cloned()
    }

    pub fn token_count(&self) -> usize {
        self.inner.lock().unwrap().tokens.len()
    }

    fn publish(&self, event: SceneEvent) {
        // Best-effort; a test without subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for InMemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScenePersistence for InMemoryScene {
    async fn create_token(
        &self,
        spec: TokenSpec,
        correlation: Option<CorrelationId>,
    ) -> Result<TokenId, PersistenceError> {
        let id = TokenId::new(format!("tok-{}", self.next_id.fetch_add(1, Ordering::Relaxed)));
        let record = TokenRecord {
            id: id.clone(),
            name: spec.name,
            image: spec.image,
            position: spec.position,
            width: self.token_size,
            height: self.token_size,
            actor: None,
            flags: encode_flags(&spec.loot),
        };
        self.inner
            .lock()
            .unwrap()
            .tokens
            .insert(id.clone(), record);
        self.publish(SceneEvent::TokenCreated {
            token: id.clone(),
            correlation,
        });
        Ok(id)
    }

    async fn update_token(
        &self,
        token: &TokenId,
        patch: TokenPatch,
    ) -> Result<(), PersistenceError> {
        {
            let mut inner = self.inner.lock().unwrap();
            let record = inner
                .tokens
                .get_mut(token)
                .ok_or_else(|| PersistenceError::MissingToken(token.clone()))?;
            if let Some(image) = patch.image {
                record.image = image;
            }
            if let Some(loot) = patch.loot {
                record.flags = encode_flags(&loot);
            }
        }
        self.publish(SceneEvent::TokenUpdated {
            token: token.clone(),
        });
        Ok(())
    }

    async fn delete_token(&self, token: &TokenId) -> Result<(), PersistenceError> {
        self.inner
            .lock()
            .unwrap()
            .tokens
            .remove(token)
            .ok_or_else(|| PersistenceError::MissingToken(token.clone()))?;
        self.publish(SceneEvent::TokenDeleted {
            token: token.clone(),
        });
        Ok(())
    }

    async fn update_actor(
        &self,
        actor: &ActorId,
        patch: ActorPatch,
    ) -> Result<(), PersistenceError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .actors
            .get_mut(actor)
            .ok_or_else(|| PersistenceError::MissingActor(actor.clone()))?;
        if let Some(currency) = patch.currency {
            record.currency = currency;
        }
        if let Some(source) = patch.remove_item {
            if let Some(index) = record.items.iter().position(|item| item.source == source) {
                record.items.remove(index);
            }
        }
        Ok(())
    }

    async fn grant_items(
        &self,
        actor: &ActorId,
        items: Vec<ItemGrant>,
    ) -> Result<(), PersistenceError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .actors
            .get_mut(actor)
            .ok_or_else(|| PersistenceError::MissingActor(actor.clone()))?;
        record.items.extend(items);
        Ok(())
    }

    fn token(&self, token: &TokenId) -> Option<TokenRecord> {
        self.inner.lock().unwrap().tokens.get(token).cloned()
    }

    fn token_at(&self, position: Point) -> Option<TokenRecord> {
        self.inner
            .lock()
            .unwrap()
            .tokens
            .values()
            .find(|record| record.contains(position))
            .cloned()
    }

    fn loot_tokens(&self) -> Vec<TokenId> {
        self.inner
            .lock()
            .unwrap()
            .tokens
            .values()
            .filter(|record| record.loot().is_some())
            .map(|record| record.id.clone())
            .collect()
    }

    fn actor_currency(&self, actor: &ActorId) -> Option<CurrencyBag> {
        self.inner
            .lock()
            .unwrap()
            .actors
            .get(actor)
            .map(|record| record.currency.clone())
    }

    fn events(&self) -> broadcast::Receiver<SceneEvent> {
        self.events.subscribe()
    }
}
