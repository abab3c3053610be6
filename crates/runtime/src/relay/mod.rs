//! Authority-gated mutation relay.
//!
//! Every state-mutating operation in the engine funnels through
//! [`MutationRelay::execute`]: the elected authority applies it directly
//! against the scene, every other participant packages it into an
//! [`Envelope`] and hands it to the relay channel. On the receiving side a
//! participant ignores its own echoes and, unless it is the authority,
//! ignores inbound envelopes entirely — which is what makes each mutation
//! apply exactly once.

mod channel;
mod envelope;
mod roster;

pub use channel::{LoopbackChannel, RelayChannel};
pub use envelope::{CorrelationId, Envelope, Operation};
pub use roster::{Participant, SessionRoster};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use loot_core::{ParticipantId, TokenId};

use crate::error::RelayError;
use crate::scene::{SceneEvent, ScenePersistence};

/// How an operation handed to [`MutationRelay::execute`] was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Applied locally by the authority.
    Applied,
    /// A token was created (locally or via confirmed relay).
    Created(TokenId),
    /// Accepted for delivery to the authority; application is not awaited.
    Forwarded,
}

impl RelayOutcome {
    /// The created token id, for creation operations.
    pub fn created(self) -> Option<TokenId> {
        match self {
            Self::Created(token) => Some(token),
            _ => None,
        }
    }
}

/// Applies mutations when authoritative, forwards them otherwise.
pub struct MutationRelay {
    local: ParticipantId,
    roster: RwLock<SessionRoster>,
    channel: Arc<dyn RelayChannel>,
    scene: Arc<dyn ScenePersistence>,
    pending: Mutex<HashMap<CorrelationId, oneshot::Sender<TokenId>>>,
    next_correlation: AtomicU64,
    creation_timeout: Duration,
}

impl MutationRelay {
    pub fn new(
        local: ParticipantId,
        roster: SessionRoster,
        channel: Arc<dyn RelayChannel>,
        scene: Arc<dyn ScenePersistence>,
        creation_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            local,
            roster: RwLock::new(roster),
            channel,
            scene,
            pending: Mutex::new(HashMap::new()),
            next_correlation: AtomicU64::new(1),
            creation_timeout,
        })
    }

    pub fn local(&self) -> &ParticipantId {
        &self.local
    }

    /// Whether the local participant is the elected authority.
    pub fn is_authority(&self) -> bool {
        self.roster.read().unwrap().is_authority(&self.local)
    }

    /// Applies a roster change (join/leave/role update).
    pub fn update_roster(&self, update: impl FnOnce(&mut SessionRoster)) {
        update(&mut self.roster.write().unwrap());
    }

    /// Allocates a correlation id for a creation request.
    pub fn next_correlation(&self) -> CorrelationId {
        CorrelationId(self.next_correlation.fetch_add(1, Ordering::Relaxed))
    }

    /// Executes a mutation: applies it when authoritative, forwards it
    /// otherwise.
    ///
    /// Forwarded operations are fire-and-forget except token creation, which
    /// waits (bounded by the configured timeout) for the confirmation event
    /// matching its correlation id.
    pub async fn execute(&self, operation: Operation) -> Result<RelayOutcome, RelayError> {
        if self.is_authority() {
            return self.apply(operation).await;
        }

        if self.roster.read().unwrap().authority().is_none() {
            // Known gap: with nobody to apply it, the mutation is dropped.
            warn!(
                target: "loot::relay",
                kind = operation.kind(),
                "no active authority; relayed mutation will be dropped"
            );
        }

        match operation {
            Operation::CreateToken { spec, correlation } => {
                let token = self.forward_creation(spec, correlation).await?;
                Ok(RelayOutcome::Created(token))
            }
            operation => {
                debug!(
                    target: "loot::relay",
                    kind = operation.kind(),
                    "forwarding mutation to authority"
                );
                self.channel
                    .emit(Envelope {
                        sender: self.local.clone(),
                        operation,
                    })
                    .await?;
                Ok(RelayOutcome::Forwarded)
            }
        }
    }

    /// Maps an operation onto its persistence call. Authority-side only.
    async fn apply(&self, operation: Operation) -> Result<RelayOutcome, RelayError> {
        match operation {
            Operation::DeleteToken { token } => {
                self.scene.delete_token(&token).await?;
                Ok(RelayOutcome::Applied)
            }
            Operation::UpdateToken { token, patch } => {
                self.scene.update_token(&token, patch).await?;
                Ok(RelayOutcome::Applied)
            }
            Operation::UpdateActor { actor, patch } => {
                self.scene.update_actor(&actor, patch).await?;
                Ok(RelayOutcome::Applied)
            }
            Operation::GrantItems { actor, items } => {
                self.scene.grant_items(&actor, items).await?;
                Ok(RelayOutcome::Applied)
            }
            Operation::CreateToken { spec, correlation } => {
                let token = self.scene.create_token(spec, Some(correlation)).await?;
                Ok(RelayOutcome::Created(token))
            }
        }
    }

    /// Relays a creation request and waits for its confirmation event.
    async fn forward_creation(
        &self,
        spec: crate::scene::TokenSpec,
        correlation: CorrelationId,
    ) -> Result<TokenId, RelayError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(correlation, tx);

        self.channel
            .emit(Envelope {
                sender: self.local.clone(),
                operation: Operation::CreateToken { spec, correlation },
            })
            .await?;

        match tokio::time::timeout(self.creation_timeout, rx).await {
            Ok(Ok(token)) => Ok(token),
            // Timed out or the confirmation listener went away. The pending
            // entry is abandoned; no cleanup of a half-created token.
            _ => {
                self.pending.lock().unwrap().remove(&correlation);
                Err(RelayError::CreationTimeout {
                    timeout: self.creation_timeout,
                })
            }
        }
    }

    /// Spawns the inbound-envelope and creation-confirmation listeners.
    ///
    /// Both tasks end when their source channel closes.
    pub fn spawn_listeners(self: Arc<Self>) -> (JoinHandle<()>, JoinHandle<()>) {
        let inbound = {
            let relay = Arc::clone(&self);
            let rx = relay.channel.incoming();
            tokio::spawn(async move { relay.run_inbound(rx).await })
        };
        let confirmations = {
            let relay = self;
            let rx = relay.scene.events();
            tokio::spawn(async move { relay.run_confirmations(rx).await })
        };
        (inbound, confirmations)
    }

    async fn run_inbound(&self, mut rx: broadcast::Receiver<Envelope>) {
        loop {
            match rx.recv().await {
                Ok(envelope) => {
                    if envelope.sender == self.local {
                        trace!(target: "loot::relay", "ignoring own echoed envelope");
                        continue;
                    }
                    if !self.is_authority() {
                        continue;
                    }
                    let kind = envelope.operation.kind();
                    if let Err(error) = self.apply(envelope.operation).await {
                        // No retry, no queueing: failed relayed mutations drop.
                        warn!(
                            target: "loot::relay",
                            kind,
                            %error,
                            "dropping relayed mutation"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        target: "loot::relay",
                        skipped,
                        "relay receiver lagged; envelopes lost"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    async fn run_confirmations(&self, mut rx: broadcast::Receiver<SceneEvent>) {
        loop {
            match rx.recv().await {
                Ok(SceneEvent::TokenCreated {
                    token,
                    correlation: Some(correlation),
                }) => {
                    if let Some(tx) = self.pending.lock().unwrap().remove(&correlation) {
                        // The requester may have timed out already.
                        let _ = tx.send(token);
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
