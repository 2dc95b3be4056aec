// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue entries: one spoken line and its outgoing choices.

use crate::id::{DialogueChoiceId, EntryId, ParticipantId};
use crate::registry::Record;
use serde::{Deserialize, Serialize};

/// Emotional reaction shown beside an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Reaction {
    /// No reaction
    #[default]
    None,
    /// Happy
    Happy,
    /// Sad
    Sad,
    /// Angry
    Angry,
    /// Surprised
    Surprised,
}

impl Reaction {
    /// Every reaction, in code order
    pub fn all() -> &'static [Reaction] {
        &[
            Reaction::None,
            Reaction::Happy,
            Reaction::Sad,
            Reaction::Angry,
            Reaction::Surprised,
        ]
    }

    /// Integer code used on disk and across the C boundary
    pub fn code(self) -> i32 {
        match self {
            Reaction::None => 0,
            Reaction::Happy => 1,
            Reaction::Sad => 2,
            Reaction::Angry => 3,
            Reaction::Surprised => 4,
        }
    }

    /// Inverse of [`code`](Self::code)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Reaction::None),
            1 => Some(Reaction::Happy),
            2 => Some(Reaction::Sad),
            3 => Some(Reaction::Angry),
            4 => Some(Reaction::Surprised),
            _ => None,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Reaction::None => "None",
            Reaction::Happy => "Happy",
            Reaction::Sad => "Sad",
            Reaction::Angry => "Angry",
            Reaction::Surprised => "Surprised",
        }
    }
}

/// Where the editor draws an entry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewPosition {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl ViewPosition {
    /// Create a position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A line of dialogue spoken by one participant
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueEntry {
    id: EntryId,
    /// Spoken text
    pub text: String,
    /// Speaker; resolved through the owning dialogue
    pub active_participant: ParticipantId,
    pub(crate) choices: Vec<DialogueChoiceId>,
    /// Editor position
    pub position: ViewPosition,
    /// Reaction on the left side
    pub left_reaction: Reaction,
    /// Reaction on the right side
    pub right_reaction: Reaction,
}

impl DialogueEntry {
    pub(crate) fn new(id: EntryId, active_participant: ParticipantId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            active_participant,
            choices: Vec::new(),
            position: ViewPosition::default(),
            left_reaction: Reaction::None,
            right_reaction: Reaction::None,
        }
    }

    /// Identifier within the owning dialogue
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Outgoing choices in the order they were added.
    ///
    /// Removing a choice from the dialogue does not drop it from this list.
    pub fn choices(&self) -> &[DialogueChoiceId] {
        &self.choices
    }

    /// Number of outgoing choices
    pub fn num_choices(&self) -> usize {
        self.choices.len()
    }

    /// Outgoing choice by position
    pub fn choice_at(&self, index: usize) -> Option<DialogueChoiceId> {
        self.choices.get(index).copied()
    }
}

impl Record for DialogueEntry {
    type Key = EntryId;

    fn key(&self) -> EntryId {
        self.id
    }

    fn rekey(&mut self, key: EntryId) {
        self.id = key;
    }

    fn name(&self) -> &str {
        &self.text
    }
}
