//! Container state machine and interaction validation.
//!
//! The four observable phases collapse the container flags so that "locked
//! and open" is unrepresentable, and the guards below are the single source
//! of truth for what an interaction may do:
//!
//! | From       | Trigger  | To                | Guard                       |
//! |------------|----------|-------------------|-----------------------------|
//! | Locked     | interact | Locked (no-op)    | `is_locked`                 |
//! | Closed     | interact | Open              | `!is_locked`                |
//! | Open       | interact | Closed            | `!is_locked && can_close`   |
//! | Open       | interact | Open (no-op)      | `!can_close`                |
//! | SingleItem | interact | *(token deleted)* | transfer, then removal      |

use crate::error::InteractionError;
use crate::state::{ActorId, Grid, LootState, Point, TokenId, TokenKind};

/// Observable phase of a loot token, derived from its flag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerPhase {
    SingleItem,
    Closed,
    Open,
    Locked,
}

/// Result of running one interaction through the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractOutcome {
    /// Locked: nothing changed; play the lock-denied cue.
    LockDenied,
    /// Closed container transitioned to open.
    Opened,
    /// Open container transitioned back to closed.
    Closed,
    /// Open container that cannot be re-closed: nothing changed.
    RemainsOpen,
    /// Single pickup item: transfer it and remove the token.
    Pickup,
}

impl InteractOutcome {
    /// Whether this outcome hands the token's contents to the actor.
    pub fn triggers_transfer(&self) -> bool {
        matches!(self, Self::Opened | Self::Pickup)
    }

    /// Whether the token's persisted state changed.
    pub fn changes_state(&self) -> bool {
        !matches!(self, Self::LockDenied | Self::RemainsOpen)
    }
}

impl LootState {
    /// Derives the current phase from the flag set.
    pub fn phase(&self) -> ContainerPhase {
        if self.is_locked {
            ContainerPhase::Locked
        } else if self.kind == TokenKind::SingleItem {
            ContainerPhase::SingleItem
        } else if self.is_open {
            ContainerPhase::Open
        } else {
            ContainerPhase::Closed
        }
    }

    /// Runs one interaction through the transition table, mutating the open
    /// flag where the guards allow it.
    pub fn interact(&mut self) -> InteractOutcome {
        let outcome = match self.phase() {
            ContainerPhase::Locked => InteractOutcome::LockDenied,
            ContainerPhase::SingleItem => InteractOutcome::Pickup,
            ContainerPhase::Closed => {
                self.is_open = true;
                InteractOutcome::Opened
            }
            ContainerPhase::Open if self.can_close => {
                self.is_open = false;
                InteractOutcome::Closed
            }
            ContainerPhase::Open => InteractOutcome::RemainsOpen,
        };
        debug_assert!(self.validate().is_ok());
        outcome
    }
}

/// One token under a participant's control at interaction time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlledToken {
    pub token: TokenId,
    pub actor: ActorId,
    pub position: Point,
}

/// A participant's attempt to interact with a loot token.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionRequest {
    /// The loot token that was clicked.
    pub token: TokenId,
    /// Every token the requesting participant currently controls.
    pub controlled: Vec<ControlledToken>,
}

/// Validates the control and proximity preconditions, returning the sole
/// controlling token on success.
pub fn validate_request<'a>(
    request: &'a InteractionRequest,
    target: Point,
    grid: &Grid,
) -> Result<&'a ControlledToken, InteractionError> {
    let controller = match request.controlled.as_slice() {
        [sole] => sole,
        other => {
            return Err(InteractionError::ControlRequired {
                found: other.len(),
            });
        }
    };

    let distance = controller.position.distance(target);
    let max = grid.reach();
    if distance > max {
        return Err(InteractionError::OutOfRange { distance, max });
    }

    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemId, ItemSnapshot, ItemStack, TokenImages};

    fn container(can_close: bool) -> LootState {
        let mut state = LootState::container(
            TokenImages::container("chest.png", "open.png", "closed.png"),
            can_close,
        );
        state.items.push(ItemStack::new(
            ItemId::from("sword"),
            1,
            ItemSnapshot::new("Sword", "sword.png", serde_json::json!({})),
        ));
        state.currency.set("gp", 10);
        state
    }

    #[test]
    fn locked_container_never_changes() {
        let mut state = container(true);
        state.set_locked(true).unwrap();
        let before = state.clone();

        for _ in 0..3 {
            assert_eq!(state.interact(), InteractOutcome::LockDenied);
            assert_eq!(state, before);
        }
    }

    #[test]
    fn closed_opens_and_open_closes() {
        let mut state = container(true);

        assert_eq!(state.interact(), InteractOutcome::Opened);
        assert!(state.is_open);

        assert_eq!(state.interact(), InteractOutcome::Closed);
        assert!(!state.is_open);
    }

    #[test]
    fn open_container_without_can_close_stays_open() {
        let mut state = container(false);

        assert_eq!(state.interact(), InteractOutcome::Opened);
        assert_eq!(state.interact(), InteractOutcome::RemainsOpen);
        assert!(state.is_open);
    }

    #[test]
    fn single_item_requests_pickup() {
        let stack = ItemStack::new(
            ItemId::from("gem"),
            1,
            ItemSnapshot::new("Gem", "gem.png", serde_json::json!({})),
        );
        let mut state = LootState::single_item(stack);

        assert_eq!(state.interact(), InteractOutcome::Pickup);
    }

    #[test]
    fn open_and_locked_is_never_observable() {
        let mut state = container(true);
        // Walk every trigger a few times and check the invariant throughout.
        for _ in 0..4 {
            state.interact();
            assert!(state.validate().is_ok());
            if !state.is_open {
                state.set_locked(true).unwrap();
                assert!(state.validate().is_ok());
                state.interact();
                assert!(state.validate().is_ok());
                state.set_locked(false).unwrap();
            }
        }
    }

    fn request(controlled: Vec<ControlledToken>) -> InteractionRequest {
        InteractionRequest {
            token: TokenId::from("chest-1"),
            controlled,
        }
    }

    fn controller(position: Point) -> ControlledToken {
        ControlledToken {
            token: TokenId::from("hero-token"),
            actor: ActorId::from("hero"),
            position,
        }
    }

    #[test]
    fn requires_exactly_one_controller() {
        let grid = Grid::new(100);
        let target = Point::new(0.0, 0.0);

        let none = request(vec![]);
        assert_eq!(
            validate_request(&none, target, &grid),
            Err(InteractionError::ControlRequired { found: 0 })
        );

        let two = request(vec![
            controller(Point::new(0.0, 0.0)),
            controller(Point::new(100.0, 0.0)),
        ]);
        assert_eq!(
            validate_request(&two, target, &grid),
            Err(InteractionError::ControlRequired { found: 2 })
        );
    }

    #[test]
    fn rejects_out_of_reach_controllers() {
        let grid = Grid::new(100);
        let target = Point::new(0.0, 0.0);

        let near = request(vec![controller(Point::new(100.0, 100.0))]);
        assert!(validate_request(&near, target, &grid).is_ok());

        let far = request(vec![controller(Point::new(200.0, 200.0))]);
        assert!(matches!(
            validate_request(&far, target, &grid),
            Err(InteractionError::OutOfRange { .. })
        ));
    }
}
