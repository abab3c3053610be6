//! Host-independent loot interaction rules.
//!
//! `loot-core` defines the canonical loot-token model (container flags, item
//! stacks, currency) and exposes pure APIs reused by the session runtime and
//! offline tools: the container state machine and the transfer planner. All
//! state mutation flows through [`state::LootState`]'s guarded methods; the
//! runtime layers persistence and relaying on top of the plain data returned
//! here.
pub mod error;
pub mod interact;
pub mod state;
pub mod transfer;

pub use error::{CoreError, ErrorSeverity, InteractionError, StateError};
pub use interact::{
    ContainerPhase, ControlledToken, InteractOutcome, InteractionRequest, validate_request,
};
pub use state::{
    ActorId, CurrencyBag, Grid, ItemId, ItemSnapshot, ItemStack, LootState, ParticipantId, Point,
    TokenId, TokenImages, TokenKind,
};
pub use transfer::{
    CurrencyNotice, ItemGrant, PickupNotice, TransferPlan, plan_currency_take, plan_item_take,
    plan_transfer,
};
