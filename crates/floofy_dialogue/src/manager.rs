// SPDX-License-Identifier: MIT OR Apache-2.0
//! The top-level registry of uniquely named dialogues.

use crate::dialogue::Dialogue;
use crate::error::Result;
use crate::format::{self, WriteOptions};
use crate::registry::Registry;
use std::io::{Read, Write};
use std::path::Path;

/// Owns a set of dialogues with unique names.
///
/// Dialogues are boxed so their address stays put while the manager grows,
/// and so a removed dialogue can be handed out and adopted back unchanged.
#[derive(Debug, Clone, Default)]
pub struct DialogueManager {
    dialogues: Registry<Box<Dialogue>>,
}

impl DialogueManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dialogue. Returns `None` without inserting if the name is taken.
    pub fn add_dialogue(&mut self, name: impl Into<String>) -> Option<&mut Dialogue> {
        let name = name.into();
        let dialogue = self
            .dialogues
            .insert_unique_with(&name, |id| Box::new(Dialogue::new(id, name.as_str())))?;
        Some(&mut **dialogue)
    }

    /// Re-insert a detached dialogue. On a name clash the dialogue is handed
    /// back untouched.
    pub fn adopt_dialogue(&mut self, dialogue: Box<Dialogue>) -> std::result::Result<&mut Dialogue, Box<Dialogue>> {
        self.dialogues.adopt(dialogue).map(|d| &mut **d)
    }

    /// Get a dialogue by name
    pub fn dialogue(&self, name: &str) -> Option<&Dialogue> {
        self.dialogues.find_by_name(name).map(|d| &**d)
    }

    /// Get a mutable dialogue by name
    pub fn dialogue_mut(&mut self, name: &str) -> Option<&mut Dialogue> {
        self.dialogues.find_by_name_mut(name).map(|d| &mut **d)
    }

    /// Dialogue by position
    pub fn dialogue_at(&self, index: usize) -> Option<&Dialogue> {
        self.dialogues.get_index(index).map(|d| &**d)
    }

    /// Mutable dialogue by position
    pub fn dialogue_at_mut(&mut self, index: usize) -> Option<&mut Dialogue> {
        self.dialogues.get_index_mut(index).map(|d| &mut **d)
    }

    /// Detach a dialogue and hand ownership to the caller
    pub fn remove_dialogue(&mut self, name: &str) -> Option<Box<Dialogue>> {
        self.dialogues.remove_first_named(name)
    }

    /// Rename a dialogue. Fails if `old` is missing or `new` is taken.
    pub fn rename_dialogue(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return self.dialogue(old).is_some();
        }
        if self.dialogues.contains_name(new) {
            return false;
        }
        match self.dialogues.find_by_name_mut(old) {
            Some(dialogue) => {
                dialogue.set_name(new);
                true
            }
            None => false,
        }
    }

    /// Number of dialogues
    pub fn num_dialogues(&self) -> usize {
        self.dialogues.len()
    }

    /// All dialogues in insertion order
    pub fn dialogues(&self) -> impl Iterator<Item = &Dialogue> {
        self.dialogues.iter().map(|d| &**d)
    }

    // Persistence

    /// Read a dialogue file
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            tracing::warn!("Failed to open dialogue file {:?}: {}", path, e);
            e
        })?;
        let manager = Self::read_from_str(&contents)?;
        tracing::info!(
            "Loaded {} dialogues from {:?}",
            manager.num_dialogues(),
            path
        );
        Ok(manager)
    }

    /// Read a dialogue document held in memory
    pub fn read_from_str(contents: &str) -> Result<Self> {
        format::read_dialogues(contents)
    }

    /// Read a dialogue document from raw bytes
    pub fn read_from_slice(contents: &[u8]) -> Result<Self> {
        let contents = std::str::from_utf8(contents).map_err(|e| {
            tracing::warn!("Failed to read dialogue document: {}", e);
            e
        })?;
        Self::read_from_str(contents)
    }

    /// Read a whole dialogue document from a reader
    pub fn read_from_reader(mut reader: impl Read) -> Result<Self> {
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        Self::read_from_slice(&contents)
    }

    /// Write to a file in the current format version
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_to_file_with(path, &WriteOptions::default())
    }

    /// Write to a file with explicit options
    pub fn write_to_file_with(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
        let path = path.as_ref();
        let contents = self.write_to_string_with(options)?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved {} dialogues to {:?}", self.num_dialogues(), path);
        Ok(())
    }

    /// Serialize to a string in the current format version
    pub fn write_to_string(&self) -> Result<String> {
        self.write_to_string_with(&WriteOptions::default())
    }

    /// Serialize to a string with explicit options
    pub fn write_to_string_with(&self, options: &WriteOptions) -> Result<String> {
        format::write_dialogues(self, options)
    }

    /// Serialize into a writer
    pub fn write_to_writer(&self, mut writer: impl Write, options: &WriteOptions) -> Result<()> {
        writer.write_all(self.write_to_string_with(options)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_manager_begins_empty() {
        let mgr = DialogueManager::new();
        assert_eq!(mgr.num_dialogues(), 0);
        assert!(mgr.dialogue_at(0).is_none());
        assert!(mgr.dialogue("Not A Name").is_none());
    }

    #[test]
    fn test_added_dialogue_equals_retrieved() {
        let mut mgr = DialogueManager::new();
        let id = mgr.add_dialogue("A new dialogue").unwrap().id();
        assert_eq!(mgr.dialogue("A new dialogue").map(Dialogue::id), Some(id));
        assert_eq!(mgr.dialogue_at(0).map(Dialogue::id), Some(id));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut mgr = DialogueManager::new();
        assert!(mgr.add_dialogue("Same").is_some());
        assert!(mgr.add_dialogue("Same").is_none());
        assert_eq!(mgr.num_dialogues(), 1);
    }

    #[test]
    fn test_removed_dialogue_no_longer_retrieved() {
        let mut mgr = DialogueManager::new();
        mgr.add_dialogue("New Dialogue 1");
        mgr.add_dialogue("New Dialogue 2");

        let removed = mgr.remove_dialogue("New Dialogue 1").unwrap();
        assert_eq!(removed.name(), "New Dialogue 1");
        assert_eq!(mgr.num_dialogues(), 1);
        assert!(mgr.dialogue("New Dialogue 1").is_none());
        assert!(mgr.remove_dialogue("New Dialogue 1").is_none());
    }

    #[test]
    fn test_adopt_round_trip_keeps_address() {
        let mut mgr = DialogueManager::new();
        mgr.add_dialogue("Roaming").unwrap().add_participant("Bob");

        let removed = mgr.remove_dialogue("Roaming").unwrap();
        let address: *const Dialogue = &*removed;
        let adopted = mgr.adopt_dialogue(removed).unwrap();
        assert_eq!(adopted as *const Dialogue, address);
        assert_eq!(adopted.num_participants(), 1);
    }

    #[test]
    fn test_adopt_rejects_name_clash() {
        let mut mgr = DialogueManager::new();
        mgr.add_dialogue("Twin");
        let detached = mgr.remove_dialogue("Twin").unwrap();
        mgr.add_dialogue("Twin");

        let returned = mgr.adopt_dialogue(detached).unwrap_err();
        assert_eq!(returned.name(), "Twin");
        assert_eq!(mgr.num_dialogues(), 1);
    }

    #[test]
    fn test_non_utf8_bytes_are_malformed() {
        assert!(matches!(
            DialogueManager::read_from_slice(&[0xff, 0xfe]),
            Err(FormatError::Encoding(_))
        ));
        assert!(matches!(
            DialogueManager::read_from_reader(&b"{\"dialogues\": [\xff]}"[..]),
            Err(FormatError::Encoding(_))
        ));
    }

    #[test]
    fn test_rename_enforces_uniqueness() {
        let mut mgr = DialogueManager::new();
        mgr.add_dialogue("A");
        mgr.add_dialogue("B");

        assert!(!mgr.rename_dialogue("A", "B"));
        assert!(mgr.rename_dialogue("A", "C"));
        assert!(mgr.dialogue("C").is_some());
        assert!(!mgr.rename_dialogue("A", "D"));
    }
}
