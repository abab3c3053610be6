//! Topic-based session events.
//!
//! Interaction outcomes and loot announcements are published on the bus so
//! observers (chat log, sound cues, HUD refresh) subscribe to what they care
//! about without the session knowing who is listening.

mod bus;

pub use bus::{Event, EventBus, Topic};

use loot_core::{ActorId, CurrencyBag, PickupNotice, TokenId};

/// Token lifecycle and container-state notifications.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InteractionEvent {
    /// A loot token landed on the scene.
    TokenCreated { token: TokenId },
    /// A loot token was picked up or deleted.
    TokenRemoved { token: TokenId },
    ContainerOpened { token: TokenId },
    ContainerClosed { token: TokenId },
    /// Interaction hit a locked container; play the lock-denied cue.
    LockDenied { token: TokenId },
    LockToggled { token: TokenId, locked: bool },
}

/// Loot announcements intended for the session log.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LootEvent {
    /// One notice per collected item type.
    ItemCollected {
        actor: ActorId,
        notice: PickupNotice,
    },
    /// Collected currency, non-zero amounts only.
    CurrencyCollected {
        actor: ActorId,
        amounts: CurrencyBag,
    },
}
