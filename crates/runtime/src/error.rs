//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from interaction validation, the relay, and the scene
//! persistence collaborator so session entry points can bubble them up with
//! consistent context.

use std::time::Duration;

use thiserror::Error;

use loot_core::{ActorId, InteractionError, ItemId, StateError, TokenId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("item '{0}' is not present in the catalog")]
    UnknownItem(ItemId),

    #[error("token '{0}' is not tracked as loot")]
    UnknownToken(TokenId),

    #[error("only the session authority may perform this operation")]
    NotAuthority,

    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Failures on the relay path.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A relayed token creation received no confirmation in time. No partial
    /// cleanup is attempted; a half-created token is the authority's to
    /// remove.
    #[error("token creation was not confirmed within {timeout:?}")]
    CreationTimeout { timeout: Duration },

    #[error("relay channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Failures reported by the scene persistence collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("token '{0}' does not exist in the scene")]
    MissingToken(TokenId),

    #[error("actor '{0}' does not exist in the scene")]
    MissingActor(ActorId),
}
