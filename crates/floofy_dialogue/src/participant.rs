// SPDX-License-Identifier: MIT OR Apache-2.0
//! Speakers within a dialogue.

use crate::id::ParticipantId;
use crate::registry::Record;
use serde::{Deserialize, Serialize};

/// A named speaker owned by one dialogue. Names need not be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    /// Display name
    pub name: String,
}

impl Participant {
    pub(crate) fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Identifier within the owning dialogue
    pub fn id(&self) -> ParticipantId {
        self.id
    }
}

impl Record for Participant {
    type Key = ParticipantId;

    fn key(&self) -> ParticipantId {
        self.id
    }

    fn rekey(&mut self, key: ParticipantId) {
        self.id = key;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
