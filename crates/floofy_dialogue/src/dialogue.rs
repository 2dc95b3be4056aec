// SPDX-License-Identifier: MIT OR Apache-2.0
//! A single dialogue graph: participants, entries and the choices between them.

use crate::choice::DialogueChoice;
use crate::entry::DialogueEntry;
use crate::id::{DialogueChoiceId, DialogueId, EntryId, ParticipantId};
use crate::participant::Participant;
use crate::registry::{Record, Registry};

/// A dialogue tree.
///
/// The dialogue owns its participants, entries and choices. References
/// between them are ids, so an entry whose speaker was removed keeps the
/// stale id and [`active_participant`](Self::active_participant) returns
/// `None` for it.
#[derive(Debug, Clone)]
pub struct Dialogue {
    id: DialogueId,
    name: String,
    participants: Registry<Participant>,
    entries: Registry<DialogueEntry>,
    choices: Registry<DialogueChoice>,
}

/// What a removal took out of the dialogue
enum Removed<'a> {
    Participants(&'a [Participant]),
    Entry(&'a DialogueEntry),
    Choices(&'a [DialogueChoice]),
}

impl Dialogue {
    pub(crate) fn new(id: DialogueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            participants: Registry::new(),
            entries: Registry::new(),
            choices: Registry::new(),
        }
    }

    /// Identifier within the owning manager
    pub fn id(&self) -> DialogueId {
        self.id
    }

    /// Dialogue name, unique within its manager
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // Participants

    /// Add a participant. Names are not checked for uniqueness.
    pub fn add_participant(&mut self, name: impl Into<String>) -> ParticipantId {
        self.participants
            .insert_with(|id| Participant::new(id, name))
            .id()
    }

    /// Number of participants
    pub fn num_participants(&self) -> usize {
        self.participants.len()
    }

    /// Get a participant by id
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Get a mutable participant by id
    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(id)
    }

    /// First participant with this name
    pub fn participant_named(&self, name: &str) -> Option<&Participant> {
        self.participants.find_by_name(name)
    }

    /// Participant by position
    pub fn participant_at(&self, index: usize) -> Option<&Participant> {
        self.participants.get_index(index)
    }

    /// All participants in insertion order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Remove every participant with this name, returning how many went
    pub fn remove_participant(&mut self, name: &str) -> usize {
        let removed = self.participants.remove_all_named(name);
        self.settle_references(Removed::Participants(&removed));
        removed.len()
    }

    // Entries

    /// Add an entry spoken by `participant`, which should belong to this dialogue
    pub fn add_entry(&mut self, participant: ParticipantId, text: impl Into<String>) -> EntryId {
        self.entries
            .insert_with(|id| DialogueEntry::new(id, participant, text))
            .id()
    }

    /// Number of entries
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Get an entry by id
    pub fn entry(&self, id: EntryId) -> Option<&DialogueEntry> {
        self.entries.get(id)
    }

    /// Get a mutable entry by id
    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut DialogueEntry> {
        self.entries.get_mut(id)
    }

    /// Entry by position
    pub fn entry_at(&self, index: usize) -> Option<&DialogueEntry> {
        self.entries.get_index(index)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &DialogueEntry> {
        self.entries.iter()
    }

    /// Remove the entry at `index`. Choices leaving or reaching it are kept.
    pub fn remove_entry_at(&mut self, index: usize) -> Option<DialogueEntry> {
        let removed = self.entries.remove_index(index)?;
        self.settle_references(Removed::Entry(&removed));
        Some(removed)
    }

    /// Resolve an entry's speaker
    pub fn active_participant(&self, entry: EntryId) -> Option<&Participant> {
        let entry = self.entries.get(entry)?;
        self.participants.get(entry.active_participant)
    }

    // Choices

    /// Add a choice leaving `src`, optionally leading to `dst`.
    ///
    /// The choice is also appended to the source entry's outgoing list.
    /// Returns `None` when `src` is not an entry of this dialogue.
    pub fn add_choice(
        &mut self,
        src: EntryId,
        text: impl Into<String>,
        dst: Option<EntryId>,
    ) -> Option<DialogueChoiceId> {
        let source = self.entries.get_mut(src)?;
        let id = self
            .choices
            .insert_with(|id| DialogueChoice::new(id, src, text, dst))
            .id();
        source.choices.push(id);
        Some(id)
    }

    /// Number of choices
    pub fn num_choices(&self) -> usize {
        self.choices.len()
    }

    /// Get a choice by id
    pub fn choice(&self, id: DialogueChoiceId) -> Option<&DialogueChoice> {
        self.choices.get(id)
    }

    /// Get a mutable choice by id
    pub fn choice_mut(&mut self, id: DialogueChoiceId) -> Option<&mut DialogueChoice> {
        self.choices.get_mut(id)
    }

    /// First choice with this text
    pub fn choice_named(&self, text: &str) -> Option<&DialogueChoice> {
        self.choices.find_by_name(text)
    }

    /// Choice by position
    pub fn choice_at(&self, index: usize) -> Option<&DialogueChoice> {
        self.choices.get_index(index)
    }

    /// All choices in insertion order
    pub fn choices(&self) -> impl Iterator<Item = &DialogueChoice> {
        self.choices.iter()
    }

    /// Resolve the `index`th outgoing choice of an entry
    pub fn entry_choice(&self, entry: EntryId, index: usize) -> Option<&DialogueChoice> {
        let id = self.entries.get(entry)?.choice_at(index)?;
        self.choices.get(id)
    }

    /// Remove every choice with this text, returning how many went.
    /// Source entries keep the ids in their outgoing lists.
    pub fn remove_choice(&mut self, text: &str) -> usize {
        let removed = self.choices.remove_all_named(text);
        self.settle_references(Removed::Choices(&removed));
        removed.len()
    }

    // Loading with file-given ids

    pub(crate) fn insert_loaded_participant(&mut self, participant: Participant) -> Result<(), Participant> {
        self.participants.insert_keyed(participant).map(|_| ())
    }

    pub(crate) fn insert_loaded_entry(&mut self, entry: DialogueEntry) -> Result<(), DialogueEntry> {
        self.entries.insert_keyed(entry).map(|_| ())
    }

    pub(crate) fn insert_loaded_choice(&mut self, choice: DialogueChoice) -> Result<(), DialogueChoice> {
        let (id, src) = (choice.id(), choice.source());
        self.choices.insert_keyed(choice)?;
        if let Some(source) = self.entries.get_mut(src) {
            source.choices.push(id);
        }
        Ok(())
    }

    /// Every removal ends here. References held by the remaining entities
    /// are left untouched; this only reports how many now dangle.
    fn settle_references(&self, removed: Removed<'_>) {
        let (kind, dangling) = match removed {
            Removed::Participants(participants) => (
                "participant",
                self.entries
                    .iter()
                    .filter(|entry| participants.iter().any(|p| p.key() == entry.active_participant))
                    .count(),
            ),
            Removed::Entry(entry) => (
                "entry",
                self.choices
                    .iter()
                    .filter(|c| c.source() == entry.id() || c.destination() == Some(entry.id()))
                    .count(),
            ),
            Removed::Choices(choices) => (
                "choice",
                self.entries
                    .iter()
                    .flat_map(|entry| entry.choices())
                    .filter(|id| choices.iter().any(|c| c.id() == **id))
                    .count(),
            ),
        };

        if dangling > 0 {
            tracing::debug!(
                dialogue = %self.name,
                kind,
                dangling,
                "Removed {kind} is still referenced"
            );
        }
    }
}

impl Record for Dialogue {
    type Key = DialogueId;

    fn key(&self) -> DialogueId {
        self.id
    }

    fn rekey(&mut self, key: DialogueId) {
        self.id = key;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Reaction, ViewPosition};

    fn dialogue() -> Dialogue {
        Dialogue::new(DialogueId::new(1), "A new dialogue")
    }

    #[test]
    fn test_new_dialogue_is_empty() {
        let dlg = dialogue();
        assert_eq!(dlg.name(), "A new dialogue");
        assert_eq!(dlg.num_participants(), 0);
        assert_eq!(dlg.num_entries(), 0);
        assert_eq!(dlg.num_choices(), 0);
    }

    #[test]
    fn test_participant_lookup() {
        let mut dlg = dialogue();
        let bob = dlg.add_participant("Bob");
        let sue = dlg.add_participant("Sue");

        assert_eq!(dlg.num_participants(), 2);
        assert_eq!(dlg.participant_named("Bob").map(Participant::id), Some(bob));
        assert_eq!(dlg.participant_at(1).map(Participant::id), Some(sue));
        assert_eq!(dlg.participant(sue).map(|p| p.name.as_str()), Some("Sue"));
        assert!(dlg.participant_named("bob").is_none());
        assert!(dlg.participant_at(2).is_none());
    }

    #[test]
    fn test_remove_participant_removes_all_matches() {
        let mut dlg = dialogue();
        dlg.add_participant("1");
        assert_eq!(dlg.remove_participant("1"), 1);
        assert_eq!(dlg.num_participants(), 0);

        dlg.add_participant("2");
        dlg.add_participant("3");
        dlg.add_participant("2");
        assert_eq!(dlg.remove_participant("2"), 2);
        assert_eq!(dlg.num_participants(), 1);
        assert_eq!(dlg.remove_participant("missing"), 0);
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut dlg = dialogue();
        let first = dlg.add_participant("a");
        dlg.remove_participant("a");
        let second = dlg.add_participant("a");
        assert!(second > first);
    }

    #[test]
    fn test_entries() {
        let mut dlg = dialogue();
        let part = dlg.add_participant("Part");
        let e1 = dlg.add_entry(part, "1");
        let e2 = dlg.add_entry(part, "2");

        assert_eq!(dlg.num_entries(), 2);
        assert_eq!(dlg.entry_at(0).map(DialogueEntry::id), Some(e1));
        assert_eq!(dlg.entry(e2).map(|e| e.text.as_str()), Some("2"));
        assert_eq!(dlg.active_participant(e1).map(Participant::id), Some(part));

        let removed = dlg.remove_entry_at(1).unwrap();
        assert_eq!(removed.id(), e2);
        assert_eq!(dlg.num_entries(), 1);
        assert!(dlg.remove_entry_at(3).is_none());
    }

    #[test]
    fn test_entry_mutators() {
        let mut dlg = dialogue();
        let a = dlg.add_participant("A");
        let b = dlg.add_participant("B");
        let entry = dlg.add_entry(a, "Hello");

        let e = dlg.entry_mut(entry).unwrap();
        e.text = "Bye".into();
        e.active_participant = b;
        e.position = ViewPosition::new(10.5, -3.0);
        e.left_reaction = Reaction::Angry;
        e.right_reaction = Reaction::Surprised;

        let e = dlg.entry(entry).unwrap();
        assert_eq!(e.text, "Bye");
        assert_eq!(e.position, ViewPosition::new(10.5, -3.0));
        assert_eq!(e.left_reaction, Reaction::Angry);
        assert_eq!(dlg.active_participant(entry).map(Participant::id), Some(b));
    }

    #[test]
    fn test_choices_link_source_entry() {
        let mut dlg = dialogue();
        let part = dlg.add_participant("Part");
        let e1 = dlg.add_entry(part, "1");
        let e2 = dlg.add_entry(part, "2");

        let c1 = dlg.add_choice(e1, "A choice", Some(e2)).unwrap();
        let c2 = dlg.add_choice(e1, "Another choice", None).unwrap();

        assert_eq!(dlg.num_choices(), 2);
        assert_eq!(dlg.entry(e1).map(DialogueEntry::num_choices), Some(2));
        assert_eq!(dlg.entry_choice(e1, 0).map(DialogueChoice::id), Some(c1));
        assert_eq!(dlg.entry_choice(e1, 1).map(DialogueChoice::id), Some(c2));
        assert_eq!(dlg.choice(c1).and_then(DialogueChoice::destination), Some(e2));
        assert_eq!(dlg.choice(c2).and_then(DialogueChoice::destination), None);
        assert_eq!(dlg.choice_named("A choice").map(DialogueChoice::source), Some(e1));
        assert!(dlg.choice_at(2).is_none());
    }

    #[test]
    fn test_choice_requires_known_source() {
        let mut dlg = dialogue();
        assert!(dlg.add_choice(EntryId::new(7), "Nowhere", None).is_none());
        assert_eq!(dlg.num_choices(), 0);
    }

    #[test]
    fn test_removals_leave_references_dangling() {
        let mut dlg = dialogue();
        let part = dlg.add_participant("Part");
        let e1 = dlg.add_entry(part, "1");
        let e2 = dlg.add_entry(part, "2");
        let choice = dlg.add_choice(e1, "Go", Some(e2)).unwrap();

        assert_eq!(dlg.remove_choice("Go"), 1);
        assert_eq!(dlg.num_choices(), 0);
        // The source entry still lists the removed choice
        assert_eq!(dlg.entry(e1).map(DialogueEntry::choices), Some(&[choice][..]));
        assert!(dlg.entry_choice(e1, 0).is_none());

        dlg.remove_participant("Part");
        assert_eq!(dlg.entry(e1).map(|e| e.active_participant), Some(part));
        assert!(dlg.active_participant(e1).is_none());
    }
}
