// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat registry of named player choices.
//!
//! Unlike dialogue choices these are not edges in a graph: they are records
//! a game can reference by name or id, such as an action taken in the world.

use crate::error::Result;
use crate::format::{self, WriteOptions};
use crate::id::ChoiceId;
use crate::registry::{Record, Registry};
use std::io::{Read, Write};
use std::path::Path;

/// A named choice the player can make
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    id: ChoiceId,
    /// Name, unique within its manager
    pub name: String,
}

impl Choice {
    pub(crate) fn new(id: ChoiceId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Identifier within the owning manager
    pub fn id(&self) -> ChoiceId {
        self.id
    }
}

impl Record for Choice {
    type Key = ChoiceId;

    fn key(&self) -> ChoiceId {
        self.id
    }

    fn rekey(&mut self, key: ChoiceId) {
        self.id = key;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Owns a set of uniquely named choices
#[derive(Debug, Clone, Default)]
pub struct ChoiceManager {
    choices: Registry<Box<Choice>>,
}

impl ChoiceManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a choice. Returns `None` without inserting if the name is taken.
    pub fn add_choice(&mut self, name: impl Into<String>) -> Option<&mut Choice> {
        let name = name.into();
        let choice = self
            .choices
            .insert_unique_with(&name, |id| Box::new(Choice::new(id, name.as_str())))?;
        Some(&mut **choice)
    }

    /// Re-insert a detached choice. On a name clash it is handed back.
    pub fn adopt_choice(&mut self, choice: Box<Choice>) -> std::result::Result<&mut Choice, Box<Choice>> {
        self.choices.adopt(choice).map(|c| &mut **c)
    }

    /// Get a choice by name
    pub fn choice(&self, name: &str) -> Option<&Choice> {
        self.choices.find_by_name(name).map(|c| &**c)
    }

    /// Get a mutable choice by name
    pub fn choice_mut(&mut self, name: &str) -> Option<&mut Choice> {
        self.choices.find_by_name_mut(name).map(|c| &mut **c)
    }

    /// Get a choice by id
    pub fn choice_by_id(&self, id: ChoiceId) -> Option<&Choice> {
        self.choices.get(id).map(|c| &**c)
    }

    /// Choice by position
    pub fn choice_at(&self, index: usize) -> Option<&Choice> {
        self.choices.get_index(index).map(|c| &**c)
    }

    /// Mutable choice by position
    pub fn choice_at_mut(&mut self, index: usize) -> Option<&mut Choice> {
        self.choices.get_index_mut(index).map(|c| &mut **c)
    }

    /// Detach a choice and hand ownership to the caller
    pub fn remove_choice(&mut self, name: &str) -> Option<Box<Choice>> {
        self.choices.remove_first_named(name)
    }

    /// Rename a choice. Fails if `old` is missing or `new` is taken.
    pub fn rename_choice(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return self.choice(old).is_some();
        }
        if self.choices.contains_name(new) {
            return false;
        }
        match self.choices.find_by_name_mut(old) {
            Some(choice) => {
                choice.name = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Number of choices
    pub fn num_choices(&self) -> usize {
        self.choices.len()
    }

    /// All choices in insertion order
    pub fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().map(|c| &**c)
    }

    pub(crate) fn insert_loaded(&mut self, choice: Choice) -> std::result::Result<(), Box<Choice>> {
        self.choices.insert_keyed(Box::new(choice)).map(|_| ())
    }

    // Persistence

    /// Read a choice file
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            tracing::warn!("Failed to open choice file {:?}: {}", path, e);
            e
        })?;
        let manager = Self::read_from_str(&contents)?;
        tracing::info!("Loaded {} choices from {:?}", manager.num_choices(), path);
        Ok(manager)
    }

    /// Read a choice document held in memory
    pub fn read_from_str(contents: &str) -> Result<Self> {
        format::read_choices(contents)
    }

    /// Read a choice document from raw bytes
    pub fn read_from_slice(contents: &[u8]) -> Result<Self> {
        let contents = std::str::from_utf8(contents).map_err(|e| {
            tracing::warn!("Failed to read choice document: {}", e);
            e
        })?;
        Self::read_from_str(contents)
    }

    /// Read a whole choice document from a reader
    pub fn read_from_reader(mut reader: impl Read) -> Result<Self> {
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        Self::read_from_slice(&contents)
    }

    /// Write to a file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.write_to_string()?)?;
        tracing::info!("Saved {} choices to {:?}", self.num_choices(), path);
        Ok(())
    }

    /// Serialize to a string
    pub fn write_to_string(&self) -> Result<String> {
        self.write_to_string_with(&WriteOptions::default())
    }

    /// Serialize to a string with explicit options
    pub fn write_to_string_with(&self, options: &WriteOptions) -> Result<String> {
        format::write_choices(self, options)
    }

    /// Serialize into a writer
    pub fn write_to_writer(&self, mut writer: impl Write, options: &WriteOptions) -> Result<()> {
        writer.write_all(self.write_to_string_with(options)?.as_bytes())?;
        Ok(())
    }
}
