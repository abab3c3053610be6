//! Relay channel collaborator.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::RelayError;

use super::Envelope;

/// Best-effort message path between session participants.
///
/// Delivery is at-most-once with no ordering guarantee across envelopes.
/// `emit` returns once the envelope is accepted for delivery, not once it is
/// applied anywhere.
#[async_trait]
pub trait RelayChannel: Send + Sync {
    async fn emit(&self, envelope: Envelope) -> Result<(), RelayError>;

    /// Subscribes to inbound envelopes.
    fn incoming(&self) -> broadcast::Receiver<Envelope>;
}

/// In-process channel that echoes every envelope to all subscribers, the
/// sender included — the same fan-out a tabletop host applies to module
/// socket messages.
pub struct LoopbackChannel {
    tx: broadcast::Sender<Envelope>,
}

impl LoopbackChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for LoopbackChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl RelayChannel for LoopbackChannel {
    async fn emit(&self, envelope: Envelope) -> Result<(), RelayError> {
        // No subscribers just means nobody is listening yet; best-effort.
        let _ = self.tx.send(envelope);
        Ok(())
    }

    fn incoming(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }
}
