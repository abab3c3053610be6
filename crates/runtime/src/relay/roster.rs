//! Session participant roster and authority election.

use loot_core::ParticipantId;

/// A connected session participant as seen by the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    /// Whether this participant holds the privileged role.
    pub is_gm: bool,
    pub active: bool,
}

impl Participant {
    pub fn gm(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            is_gm: true,
            active: true,
        }
    }

    pub fn player(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            is_gm: false,
            active: true,
        }
    }
}

/// Roster of session participants.
///
/// The elected authority is the first active privileged participant; only it
/// applies relayed mutations.
#[derive(Clone, Debug, Default)]
pub struct SessionRoster {
    participants: Vec<Participant>,
}

impl SessionRoster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// Adds a participant, replacing any previous entry with the same id.
    pub fn join(&mut self, participant: Participant) {
        if let Some(existing) = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant.id)
        {
            *existing = participant;
        } else {
            self.participants.push(participant);
        }
    }

    /// Marks a participant inactive; it keeps its roster slot.
    pub fn leave(&mut self, id: &ParticipantId) {
        if let Some(participant) = self.participants.iter_mut().find(|p| p.id == *id) {
            participant.active = false;
        }
    }

    /// The elected authority, if any privileged participant is active.
    pub fn authority(&self) -> Option<&ParticipantId> {
        self.participants
            .iter()
            .find(|p| p.is_gm && p.active)
            .map(|p| &p.id)
    }

    pub fn is_authority(&self, id: &ParticipantId) -> bool {
        self.authority() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_active_gm_is_elected() {
        let mut roster = SessionRoster::new(vec![
            Participant::player("alice"),
            Participant::gm("gm-1"),
            Participant::gm("gm-2"),
        ]);

        assert_eq!(roster.authority(), Some(&ParticipantId::new("gm-1")));
        assert!(roster.is_authority(&ParticipantId::new("gm-1")));
        assert!(!roster.is_authority(&ParticipantId::new("gm-2")));

        roster.leave(&ParticipantId::new("gm-1"));
        assert_eq!(roster.authority(), Some(&ParticipantId::new("gm-2")));
    }

    #[test]
    fn no_active_gm_means_no_authority() {
        let mut roster = SessionRoster::new(vec![Participant::player("alice")]);
        assert_eq!(roster.authority(), None);

        roster.join(Participant::gm("gm-1"));
        roster.leave(&ParticipantId::new("gm-1"));
        assert_eq!(roster.authority(), None);
    }
}
