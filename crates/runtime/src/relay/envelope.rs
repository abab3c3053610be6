//! Relay message types.

use loot_core::{ActorId, ItemGrant, ParticipantId, TokenId};

use crate::scene::{ActorPatch, TokenPatch, TokenSpec};

/// Identifier pairing a relayed creation request with its confirmation
/// event. Allocated per request by the relay, never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CorrelationId(pub u64);

/// A state mutation to be executed by the session authority.
///
/// Each kind maps to exactly one [`crate::scene::ScenePersistence`] call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
    DeleteToken {
        token: TokenId,
    },
    UpdateToken {
        token: TokenId,
        patch: TokenPatch,
    },
    UpdateActor {
        actor: ActorId,
        patch: ActorPatch,
    },
    GrantItems {
        actor: ActorId,
        items: Vec<ItemGrant>,
    },
    CreateToken {
        spec: TokenSpec,
        correlation: CorrelationId,
    },
}

impl Operation {
    /// Kind label for logging.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Envelope relayed between participants over the named channel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Envelope {
    /// Participant the message originated from.
    pub sender: ParticipantId,
    pub operation: Operation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_kind_labels_are_kebab_case() {
        let op = Operation::DeleteToken {
            token: TokenId::from("tok-1"),
        };
        assert_eq!(op.kind(), "delete-token");

        let op = Operation::GrantItems {
            actor: ActorId::from("hero"),
            items: vec![],
        };
        assert_eq!(op.kind(), "grant-items");
    }
}
