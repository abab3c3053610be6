//! Click handling and loot takes.

use tracing::debug;

use loot_core::{
    ActorId, CurrencyBag, InteractOutcome, InteractionError, InteractionRequest, ItemId, LootState,
    PickupNotice, TokenId, TransferPlan, plan_currency_take, plan_item_take, plan_transfer,
    validate_request,
};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, InteractionEvent, LootEvent};
use crate::relay::Operation;
use crate::scene::TokenPatch;

use super::LootSession;

/// What a handled interaction did, for the caller's benefit.
///
/// Notices are also published on the event bus; they ride along here so the
/// immediate caller can render feedback without subscribing.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionReport {
    pub outcome: InteractOutcome,
    pub notices: Vec<PickupNotice>,
    pub currency: Option<CurrencyBag>,
}

impl InteractionReport {
    fn bare(outcome: InteractOutcome) -> Self {
        Self {
            outcome,
            notices: Vec::new(),
            currency: None,
        }
    }

    fn from_plan(outcome: InteractOutcome, plan: &TransferPlan) -> Self {
        Self {
            outcome,
            notices: plan.notices.clone(),
            currency: plan
                .currency_notice
                .as_ref()
                .map(|notice| notice.amounts.clone()),
        }
    }
}

impl LootSession {
    /// Handles a click on a loot token.
    ///
    /// Validation order: exactly one controlled token, proximity within one
    /// grid cell, then the state machine (which turns a locked target into
    /// the lock-denied cue). Transfers run when the transition warrants one.
    pub async fn handle_click(&self, request: InteractionRequest) -> Result<InteractionReport> {
        let record = self
            .scene
            .token(&request.token)
            .filter(|_| self.tracks(&request.token))
            .ok_or_else(|| RuntimeError::UnknownToken(request.token.clone()))?;

        let controller = validate_request(&request, record.position, &self.config.grid)?.clone();

        let mut loot = record
            .loot()
            .ok_or_else(|| RuntimeError::UnknownToken(request.token.clone()))?;
        let outcome = loot.interact();

        debug!(
            target: "loot::session",
            token = %request.token,
            actor = %controller.actor,
            ?outcome,
            "interaction resolved"
        );

        match outcome {
            InteractOutcome::LockDenied => {
                self.bus
                    .publish(Event::Interaction(InteractionEvent::LockDenied {
                        token: request.token.clone(),
                    }));
                Ok(InteractionReport::bare(outcome))
            }

            InteractOutcome::RemainsOpen => Ok(InteractionReport::bare(outcome)),

            InteractOutcome::Closed => {
                let image = loot.images.current(false).to_owned();
                self.relay
                    .execute(Operation::UpdateToken {
                        token: request.token.clone(),
                        patch: TokenPatch::loot(loot).with_image(image),
                    })
                    .await?;
                self.bus
                    .publish(Event::Interaction(InteractionEvent::ContainerClosed {
                        token: request.token.clone(),
                    }));
                Ok(InteractionReport::bare(outcome))
            }

            InteractOutcome::Opened => {
                let actor_currency = self
                    .scene
                    .actor_currency(&controller.actor)
                    .unwrap_or_default();
                let plan = plan_transfer(&loot, &actor_currency, self.config.currency_enabled);

                loot.items = plan.container_items.clone();
                loot.currency = plan.container_currency.clone();
                let image = loot.images.current(true).to_owned();
                self.relay
                    .execute(Operation::UpdateToken {
                        token: request.token.clone(),
                        patch: TokenPatch::loot(loot).with_image(image),
                    })
                    .await?;

                self.apply_plan(&controller.actor, &plan).await?;
                self.bus
                    .publish(Event::Interaction(InteractionEvent::ContainerOpened {
                        token: request.token.clone(),
                    }));
                Ok(InteractionReport::from_plan(outcome, &plan))
            }

            InteractOutcome::Pickup => {
                let plan = plan_transfer(&loot, &CurrencyBag::new(), false);

                self.relay
                    .execute(Operation::DeleteToken {
                        token: request.token.clone(),
                    })
                    .await?;
                self.apply_plan(&controller.actor, &plan).await?;

                self.unregister(&request.token);
                self.bus
                    .publish(Event::Interaction(InteractionEvent::TokenRemoved {
                        token: request.token.clone(),
                    }));
                Ok(InteractionReport::from_plan(outcome, &plan))
            }
        }
    }

    /// Takes one unit of one item out of an open container.
    pub async fn take_item(
        &self,
        token: &TokenId,
        actor: &ActorId,
        source: &ItemId,
    ) -> Result<InteractionReport> {
        let loot = self.read_open_container(token)?;
        let plan = plan_item_take(&loot, source);
        self.apply_take(token, actor, loot, &plan).await
    }

    /// Takes the currency out of an open container.
    pub async fn take_currency(
        &self,
        token: &TokenId,
        actor: &ActorId,
    ) -> Result<InteractionReport> {
        let loot = self.read_open_container(token)?;
        if !self.config.currency_enabled {
            return Ok(InteractionReport::bare(InteractOutcome::RemainsOpen));
        }
        let actor_currency = self.scene.actor_currency(actor).unwrap_or_default();
        let plan = plan_currency_take(&loot, &actor_currency);
        self.apply_take(token, actor, loot, &plan).await
    }

    fn read_open_container(&self, token: &TokenId) -> Result<LootState> {
        let loot = self.read_loot(token)?;
        if loot.is_locked {
            return Err(InteractionError::Locked.into());
        }
        if !loot.is_container() {
            return Err(RuntimeError::UnknownToken(token.clone()));
        }
        Ok(loot)
    }

    /// Writes back a selective take and grants its plan.
    async fn apply_take(
        &self,
        token: &TokenId,
        actor: &ActorId,
        mut loot: LootState,
        plan: &TransferPlan,
    ) -> Result<InteractionReport> {
        if plan.is_empty() {
            return Ok(InteractionReport::bare(InteractOutcome::RemainsOpen));
        }

        loot.items = plan.container_items.clone();
        loot.currency = plan.container_currency.clone();
        self.relay
            .execute(Operation::UpdateToken {
                token: token.clone(),
                patch: TokenPatch::loot(loot),
            })
            .await?;
        self.apply_plan(actor, plan).await?;

        Ok(InteractionReport::from_plan(
            InteractOutcome::RemainsOpen,
            plan,
        ))
    }

    /// Applies a transfer plan's grants and currency through the relay and
    /// publishes the matching loot events.
    async fn apply_plan(&self, actor: &ActorId, plan: &TransferPlan) -> Result<()> {
        if !plan.grants.is_empty() {
            self.relay
                .execute(Operation::GrantItems {
                    actor: actor.clone(),
                    items: plan.grants.clone(),
                })
                .await?;
            for notice in &plan.notices {
                self.bus.publish(Event::Loot(LootEvent::ItemCollected {
                    actor: actor.clone(),
                    notice: notice.clone(),
                }));
            }
        }

        if let Some(currency) = &plan.actor_currency {
            self.relay
                .execute(Operation::UpdateActor {
                    actor: actor.clone(),
                    patch: crate::scene::ActorPatch {
                        currency: Some(currency.clone()),
                        remove_item: None,
                    },
                })
                .await?;
            if let Some(notice) = &plan.currency_notice {
                self.bus.publish(Event::Loot(LootEvent::CurrencyCollected {
                    actor: actor.clone(),
                    amounts: notice.amounts.clone(),
                }));
            }
        }

        Ok(())
    }
}
