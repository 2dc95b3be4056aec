// SPDX-License-Identifier: MIT OR Apache-2.0
//! Choice edges between entries.

use crate::guid::Guid;
use crate::id::{DialogueChoiceId, EntryId};
use crate::registry::Record;

/// An edge from a source entry to an optional destination entry.
///
/// A missing destination means the dialogue ends after this choice.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueChoice {
    id: DialogueChoiceId,
    /// Display text
    pub text: String,
    src: EntryId,
    dst: Option<EntryId>,
    guid: Option<Guid>,
}

impl DialogueChoice {
    pub(crate) fn new(
        id: DialogueChoiceId,
        src: EntryId,
        text: impl Into<String>,
        dst: Option<EntryId>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            src,
            dst,
            guid: None,
        }
    }

    /// Identifier within the owning dialogue
    pub fn id(&self) -> DialogueChoiceId {
        self.id
    }

    /// Entry this choice leaves from
    pub fn source(&self) -> EntryId {
        self.src
    }

    /// Entry this choice leads to
    pub fn destination(&self) -> Option<EntryId> {
        self.dst
    }

    /// Point the choice at another entry, or at nothing
    pub fn set_destination(&mut self, dst: Option<EntryId>) {
        self.dst = dst;
    }

    /// Stable identifier, if one was assigned
    pub fn guid(&self) -> Option<Guid> {
        self.guid
    }

    /// Whether a stable identifier was assigned
    pub fn guid_assigned(&self) -> bool {
        self.guid.is_some()
    }

    /// Assign a stable identifier. Assignment happens once; later calls
    /// return the existing value.
    pub fn assign_guid(&mut self) -> Guid {
        *self.guid.get_or_insert_with(Guid::new_random)
    }

    pub(crate) fn restore_guid(&mut self, guid: Guid) {
        if guid.is_valid() {
            self.guid = Some(guid);
        }
    }
}

impl Record for DialogueChoice {
    type Key = DialogueChoiceId;

    fn key(&self) -> DialogueChoiceId {
        self.id
    }

    fn rekey(&mut self, key: DialogueChoiceId) {
        self.id = key;
    }

    fn name(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_is_assigned_once() {
        let mut choice = DialogueChoice::new(DialogueChoiceId::new(1), EntryId::new(1), "Go", None);
        assert!(!choice.guid_assigned());
        assert_eq!(choice.guid(), None);

        let first = choice.assign_guid();
        assert!(first.is_valid());
        assert!(choice.guid_assigned());
        assert_eq!(choice.assign_guid(), first);
    }

    #[test]
    fn test_restoring_nil_guid_leaves_unassigned() {
        let mut choice = DialogueChoice::new(DialogueChoiceId::new(1), EntryId::new(1), "Go", None);
        choice.restore_guid(Guid::nil());
        assert!(!choice.guid_assigned());
    }
}
