//! Session facade.
//!
//! [`LootSession`] is what an embedding host drives: it owns the
//! session-scoped token registry and the event bus, reads through the scene
//! collaborator, and routes every mutation through the authority-gated
//! relay. Handlers run to completion between awaits; state read before an
//! await may be stale when the handler resumes, and no lock is taken around
//! read-transition-write (see DESIGN.md on concurrent interactions).

mod drop;
mod interact;
mod registry;

pub use drop::{DropOutcome, DropRequest, DropSource};
pub use interact::InteractionReport;
pub use registry::LootRegistry;

use std::sync::{Arc, RwLock};

use tracing::debug;

use loot_core::{LootState, TokenId};

use crate::catalog::ItemCatalog;
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, InteractionEvent};
use crate::relay::{MutationRelay, Operation};
use crate::scene::{ScenePersistence, TokenPatch};

/// One participant's view of the loot layer for one session.
pub struct LootSession {
    config: RuntimeConfig,
    catalog: Arc<dyn ItemCatalog>,
    scene: Arc<dyn ScenePersistence>,
    relay: Arc<MutationRelay>,
    registry: RwLock<LootRegistry>,
    bus: EventBus,
}

impl LootSession {
    pub fn new(
        config: RuntimeConfig,
        catalog: Arc<dyn ItemCatalog>,
        scene: Arc<dyn ScenePersistence>,
        relay: Arc<MutationRelay>,
    ) -> Self {
        let bus = EventBus::with_capacity(config.event_buffer_size);
        Self {
            config,
            catalog,
            scene,
            relay,
            registry: RwLock::new(LootRegistry::new()),
            bus,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn relay(&self) -> &Arc<MutationRelay> {
        &self.relay
    }

    /// Whether the registry tracks `token`.
    pub fn tracks(&self, token: &TokenId) -> bool {
        self.registry.read().unwrap().contains(token)
    }

    pub fn tracked_count(&self) -> usize {
        self.registry.read().unwrap().len()
    }

    /// Scans the scene for tokens carrying the loot attribute bag and
    /// registers them. Run once when the session comes up.
    pub fn adopt_scene(&self) {
        let tokens = self.scene.loot_tokens();
        let mut registry = self.registry.write().unwrap();
        for token in tokens {
            if registry.register(token.clone()) {
                debug!(target: "loot::session", %token, "adopted loot token from scene");
            }
        }
    }

    /// Reconfigures a tracked token's loot state (container conversion,
    /// artwork, close policy, currency). Authority only.
    pub async fn configure_token(&self, token: &TokenId, loot: LootState) -> Result<()> {
        if !self.relay.is_authority() {
            return Err(RuntimeError::NotAuthority);
        }
        self.read_loot(token)?;
        loot.validate()?;
        let image = loot.images.current(loot.is_open).to_owned();
        // Replaces the whole bag; partial merges drift between participants.
        self.relay
            .execute(Operation::UpdateToken {
                token: token.clone(),
                patch: TokenPatch::loot(loot).with_image(image),
            })
            .await?;
        Ok(())
    }

    /// Toggles the token's lock flag. Authority only. Returns the new state.
    pub async fn toggle_lock(&self, token: &TokenId) -> Result<bool> {
        if !self.relay.is_authority() {
            return Err(RuntimeError::NotAuthority);
        }
        let mut loot = self.read_loot(token)?;
        let locked = !loot.is_locked;
        loot.set_locked(locked)?;
        self.relay
            .execute(Operation::UpdateToken {
                token: token.clone(),
                patch: TokenPatch::loot(loot),
            })
            .await?;
        self.bus.publish(Event::Interaction(InteractionEvent::LockToggled {
            token: token.clone(),
            locked,
        }));
        Ok(locked)
    }

    /// Reads the loot state of a tracked token.
    fn read_loot(&self, token: &TokenId) -> Result<LootState> {
        if !self.tracks(token) {
            return Err(RuntimeError::UnknownToken(token.clone()));
        }
        self.scene
            .token(token)
            .and_then(|record| record.loot())
            .ok_or_else(|| RuntimeError::UnknownToken(token.clone()))
    }

    fn register(&self, token: TokenId) {
        self.registry.write().unwrap().register(token);
    }

    fn unregister(&self, token: &TokenId) {
        self.registry.write().unwrap().unregister(token);
    }
}
