//! Session context
//!
//! One viewer's view of the session: which session it is and who the local
//! participant is. Passed explicitly to every binding instead of living in a
//! global.

use crate::types::{Participant, PlayerId, SessionId};

/// Identity of the local participant inside one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: SessionId,
    pub local: Participant,
}

impl SessionContext {
    /// Context for a freshly started session
    pub fn new(local: Participant) -> Self {
        Self {
            session_id: SessionId::generate(),
            local,
        }
    }

    /// Join an existing session
    pub fn join(session_id: SessionId, local: Participant) -> Self {
        Self { session_id, local }
    }

    /// ID of the local participant
    pub fn local_id(&self) -> PlayerId {
        self.local.id
    }

    /// Whether `participant` is the local participant
    pub fn is_local(&self, participant: &Participant) -> bool {
        participant.id == self.local.id
    }
}
