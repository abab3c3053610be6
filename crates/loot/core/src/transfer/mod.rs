//! Loot transfer planning.
//!
//! Given a transition into the open state (or a single-item pickup), the
//! planner computes the concrete mutation set to apply: item grants for the
//! requesting actor, the actor's merged currency, and the depleted container
//! contents. Planning is pure; the runtime applies the result through the
//! mutation relay. Planning against an already-emptied container yields an
//! empty plan, which is what keeps a replayed interaction from duplicating
//! loot.

use crate::state::{CurrencyBag, ItemId, ItemSnapshot, ItemStack, LootState};

/// One item copy to create in the receiving actor's inventory.
///
/// Grants are issued per unit of quantity and carry the captured snapshot, so
/// the created copy is independent of the original catalog entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemGrant {
    pub source: ItemId,
    pub snapshot: ItemSnapshot,
}

/// Human-readable pickup announcement, one per item type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickupNotice {
    pub name: String,
    pub image: String,
    pub count: u32,
}

/// Announcement for collected currency (non-zero amounts only).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyNotice {
    pub amounts: CurrencyBag,
}

/// Mutation set produced by planning a transfer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferPlan {
    /// Item copies to create on the actor, one per unit.
    pub grants: Vec<ItemGrant>,
    /// The actor's currency after the additive merge; `None` when no
    /// currency moves.
    pub actor_currency: Option<CurrencyBag>,
    /// Container items after the transfer.
    pub container_items: Vec<ItemStack>,
    /// Container currency after the transfer (codes preserved).
    pub container_currency: CurrencyBag,
    /// One announcement per transferred item type.
    pub notices: Vec<PickupNotice>,
    /// Announcement for transferred currency, if any moved.
    pub currency_notice: Option<CurrencyNotice>,
}

impl TransferPlan {
    /// True when applying this plan would mutate nothing.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.actor_currency.is_none()
    }
}

fn grants_for(stack: &ItemStack) -> impl Iterator<Item = ItemGrant> + '_ {
    (0..stack.count).map(|_| ItemGrant {
        source: stack.source.clone(),
        snapshot: stack.snapshot.clone(),
    })
}

fn notice_for(stack: &ItemStack) -> PickupNotice {
    PickupNotice {
        name: stack.snapshot.name.clone(),
        image: stack.snapshot.image.clone(),
        count: stack.count,
    }
}

/// Plans moving the container's whole contents to the requesting actor.
///
/// All-or-nothing: everything moves, or (for an empty container) nothing
/// does. With `currency_enabled == false` the container's currency is left
/// untouched.
pub fn plan_transfer(
    container: &LootState,
    actor_currency: &CurrencyBag,
    currency_enabled: bool,
) -> TransferPlan {
    let mut plan = TransferPlan {
        container_items: Vec::new(),
        container_currency: container.currency.clone(),
        ..TransferPlan::default()
    };

    for stack in &container.items {
        if stack.is_depleted() {
            continue;
        }
        plan.grants.extend(grants_for(stack));
        plan.notices.push(notice_for(stack));
    }

    if currency_enabled && !container.currency.is_empty() {
        let taken = plan.container_currency.drain();
        let mut merged = actor_currency.clone();
        merged.merge(&taken);
        plan.actor_currency = Some(merged);
        plan.currency_notice = Some(CurrencyNotice { amounts: taken });
    }

    plan
}

/// Plans taking a single unit of one stack out of the container.
///
/// The grant carries the stack's snapshot; the stack's count is decremented
/// and the stack pruned when depleted. An unknown source yields an empty
/// plan.
pub fn plan_item_take(container: &LootState, source: &ItemId) -> TransferPlan {
    let mut plan = TransferPlan {
        container_items: container.items.clone(),
        container_currency: container.currency.clone(),
        ..TransferPlan::default()
    };

    let Some(stack) = plan
        .container_items
        .iter_mut()
        .find(|stack| stack.source == *source && !stack.is_depleted())
    else {
        return plan;
    };

    stack.count -= 1;
    plan.grants.push(ItemGrant {
        source: stack.source.clone(),
        snapshot: stack.snapshot.clone(),
    });
    plan.notices.push(PickupNotice {
        name: stack.snapshot.name.clone(),
        image: stack.snapshot.image.clone(),
        count: 1,
    });
    plan.container_items.retain(|stack| !stack.is_depleted());

    plan
}

/// Plans taking only the container's currency.
pub fn plan_currency_take(container: &LootState, actor_currency: &CurrencyBag) -> TransferPlan {
    let mut plan = TransferPlan {
        container_items: container.items.clone(),
        container_currency: container.currency.clone(),
        ..TransferPlan::default()
    };

    if container.currency.is_empty() {
        return plan;
    }

    let taken = plan.container_currency.drain();
    let mut merged = actor_currency.clone();
    merged.merge(&taken);
    plan.actor_currency = Some(merged);
    plan.currency_notice = Some(CurrencyNotice { amounts: taken });

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemSnapshot, TokenImages};

    fn snapshot(name: &str) -> ItemSnapshot {
        ItemSnapshot::new(name, format!("icons/{name}.png"), serde_json::json!({}))
    }

    fn chest() -> LootState {
        let mut state = LootState::container(
            TokenImages::container("chest.png", "open.png", "closed.png"),
            true,
        );
        state
            .items
            .push(ItemStack::new(ItemId::from("sword"), 2, snapshot("sword")));
        state.currency.set("gp", 10);
        state
    }

    #[test]
    fn transfer_moves_everything_to_the_actor() {
        let container = chest();
        let mut actor_currency = CurrencyBag::new();
        actor_currency.set("gp", 5);

        let plan = plan_transfer(&container, &actor_currency, true);

        assert_eq!(plan.grants.len(), 2);
        assert!(plan.grants.iter().all(|g| g.source == ItemId::from("sword")));
        assert_eq!(plan.actor_currency.as_ref().unwrap().get("gp"), 15);
        assert!(plan.container_items.is_empty());
        assert_eq!(plan.container_currency.get("gp"), 0);
        assert_eq!(plan.notices.len(), 1);
        assert_eq!(plan.notices[0].count, 2);
        assert_eq!(
            plan.currency_notice.as_ref().unwrap().amounts.get("gp"),
            10
        );
    }

    #[test]
    fn replanning_an_emptied_container_is_a_no_op() {
        let container = chest();
        let actor_currency = CurrencyBag::new();

        let first = plan_transfer(&container, &actor_currency, true);

        let mut emptied = container.clone();
        emptied.items = first.container_items.clone();
        emptied.currency = first.container_currency.clone();
        let second = plan_transfer(&emptied, &first.actor_currency.clone().unwrap(), true);

        assert!(second.is_empty());
        assert!(second.grants.is_empty());
        assert!(second.currency_notice.is_none());
    }

    #[test]
    fn disabled_currency_stays_in_the_container() {
        let container = chest();
        let plan = plan_transfer(&container, &CurrencyBag::new(), false);

        assert_eq!(plan.grants.len(), 2);
        assert!(plan.actor_currency.is_none());
        assert_eq!(plan.container_currency.get("gp"), 10);
    }

    #[test]
    fn item_take_moves_one_unit_and_prunes_depleted_stacks() {
        let mut container = chest();
        container
            .items
            .push(ItemStack::new(ItemId::from("gem"), 1, snapshot("gem")));

        let plan = plan_item_take(&container, &ItemId::from("gem"));
        assert_eq!(plan.grants.len(), 1);
        assert_eq!(plan.notices[0].count, 1);
        // The depleted gem stack is pruned; the sword stack is untouched.
        assert_eq!(plan.container_items.len(), 1);
        assert_eq!(plan.container_items[0].source, ItemId::from("sword"));

        let plan = plan_item_take(&container, &ItemId::from("sword"));
        assert_eq!(plan.container_items[0].count, 1);
    }

    #[test]
    fn item_take_of_unknown_source_is_empty() {
        let container = chest();
        let plan = plan_item_take(&container, &ItemId::from("wand"));

        assert!(plan.is_empty());
        assert_eq!(plan.container_items, container.items);
    }

    #[test]
    fn currency_take_leaves_items_alone() {
        let container = chest();
        let mut actor_currency = CurrencyBag::new();
        actor_currency.set("gp", 5);

        let plan = plan_currency_take(&container, &actor_currency);

        assert!(plan.grants.is_empty());
        assert_eq!(plan.actor_currency.as_ref().unwrap().get("gp"), 15);
        assert_eq!(plan.container_items, container.items);
        assert!(plan.container_currency.is_empty());
    }
}
