//! Handling of items dropped onto the play surface.

use tracing::debug;

use loot_core::{ActorId, ItemGrant, ItemId, ItemSnapshot, ItemStack, LootState, Point, TokenId};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, InteractionEvent};
use crate::relay::Operation;
use crate::scene::{ActorPatch, TokenPatch, TokenSpec};

use super::LootSession;

/// Where a dropped item came from.
#[derive(Clone, Debug, PartialEq)]
pub enum DropSource {
    /// Dropped from the item directory or a compendium.
    Catalog { item: ItemId },
    /// Dropped out of an actor's inventory; the item data travels with the
    /// drop and the source actor gives the item up.
    ActorInventory {
        actor: ActorId,
        item: ItemId,
        snapshot: ItemSnapshot,
    },
}

/// A drop descriptor as delivered by the host's drop hook.
#[derive(Clone, Debug, PartialEq)]
pub struct DropRequest {
    pub source: DropSource,
    /// Raw drop location; snapped to the grid before token creation.
    pub position: Point,
}

/// What the drop turned into.
#[derive(Clone, Debug, PartialEq)]
pub enum DropOutcome {
    /// A new single-item loot token.
    Created(TokenId),
    /// The item was merged into an existing container token.
    MergedInto(TokenId),
    /// The drop landed on an actor-backed token; the item went straight to
    /// that actor's inventory.
    GrantedTo(ActorId),
}

impl LootSession {
    /// Handles a drop descriptor: resolves the item, routes it into a target
    /// container or actor when the drop lands on one, and otherwise creates
    /// a fresh loot token at the snapped position.
    pub async fn handle_drop(&self, request: DropRequest) -> Result<DropOutcome> {
        let (item, snapshot) = match request.source {
            DropSource::Catalog { item } => {
                let snapshot = self
                    .catalog
                    .snapshot(&item)
                    .ok_or_else(|| RuntimeError::UnknownItem(item.clone()))?;
                (item, snapshot)
            }
            DropSource::ActorInventory {
                actor,
                item,
                snapshot,
            } => {
                // The source actor gives the item up before it lands anywhere.
                self.relay
                    .execute(Operation::UpdateActor {
                        actor: actor.clone(),
                        patch: ActorPatch {
                            currency: None,
                            remove_item: Some(item.clone()),
                        },
                    })
                    .await?;
                (item, snapshot)
            }
        };

        if let Some(target) = self.scene.token_at(request.position) {
            if let Some(mut loot) = target.loot() {
                if loot.is_container() {
                    debug!(
                        target: "loot::session",
                        token = %target.id,
                        %item,
                        "drop landed on a container; merging stack"
                    );
                    loot.add_stack(item, snapshot);
                    self.relay
                        .execute(Operation::UpdateToken {
                            token: target.id.clone(),
                            patch: TokenPatch::loot(loot),
                        })
                        .await?;
                    return Ok(DropOutcome::MergedInto(target.id));
                }
            } else if let Some(actor) = target.actor {
                debug!(
                    target: "loot::session",
                    %actor,
                    %item,
                    "drop landed on an actor token; granting directly"
                );
                self.relay
                    .execute(Operation::GrantItems {
                        actor: actor.clone(),
                        items: vec![ItemGrant {
                            source: item,
                            snapshot,
                        }],
                    })
                    .await?;
                return Ok(DropOutcome::GrantedTo(actor));
            }
        }

        let anchor = self.config.grid.drop_anchor(request.position);
        let loot = LootState::single_item(ItemStack::new(item, 1, snapshot.clone()));
        let spec = TokenSpec {
            name: snapshot.name,
            image: snapshot.image,
            position: anchor,
            disposition: 0,
            loot,
        };

        let correlation = self.relay.next_correlation();
        let outcome = self
            .relay
            .execute(Operation::CreateToken { spec, correlation })
            .await?;
        let token = outcome
            .created()
            .expect("creation operations resolve to a token id");

        self.register(token.clone());
        self.bus
            .publish(Event::Interaction(InteractionEvent::TokenCreated {
                token: token.clone(),
            }));
        debug!(target: "loot::session", %token, "created loot token from drop");

        Ok(DropOutcome::Created(token))
    }
}
