//! Session runtime for the loot interaction engine.
//!
//! This crate wires the pure rules from `loot-core` to a multiplayer
//! session: catalog and scene-persistence collaborators, the relay channel
//! with its authority-gated mutation path, a topic-based event bus, and the
//! session facade consumers embed to handle drops, clicks, and loot takes.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the facade and the session-scoped token registry
//! - [`relay`] applies or forwards mutations depending on authority
//! - [`events`] provides a topic-based event bus for flexible event routing
//! - [`catalog`] and [`scene`] define the host collaborator contracts plus
//!   in-memory implementations used by the tests
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod relay;
pub mod scene;
pub mod session;

pub use catalog::{InMemoryCatalog, ItemCatalog};
pub use config::RuntimeConfig;
pub use error::{PersistenceError, RelayError, Result, RuntimeError};
pub use events::{Event, EventBus, InteractionEvent, LootEvent, Topic};
pub use relay::{
    CorrelationId, Envelope, LoopbackChannel, MutationRelay, Operation, Participant, RelayChannel,
    RelayOutcome, SessionRoster,
};
pub use scene::{
    ActorPatch, InMemoryScene, SceneEvent, ScenePersistence, TokenPatch, TokenRecord, TokenSpec,
    decode_flags, encode_flags,
};
pub use session::{
    DropOutcome, DropRequest, DropSource, InteractionReport, LootRegistry, LootSession,
};
