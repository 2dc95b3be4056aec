// SPDX-License-Identifier: MIT OR Apache-2.0
//! Versioned JSON file format for dialogues and choice registries.
//!
//! A dialogue document looks like:
//!
//! ```json
//! {
//!   "version": 2,
//!   "eReactionVersion": 1,
//!   "dialogues": [{
//!     "name": "Intro",
//!     "participants": [{ "id": 1, "name": "Bob" }],
//!     "entries": [{
//!       "id": 1, "entry": "Hello", "activeParticipant": 1,
//!       "position": { "x": 0.0, "y": 0.0 }, "lReaction": 0, "rReaction": 0
//!     }],
//!     "choices": [{ "id": 1, "choice": "Bye", "src": 1, "dst": -1 }]
//!   }]
//! }
//! ```
//!
//! Which entry fields are required depends on `version`, per the revision table.
//! Readers accept every revision up to [`FORMAT_VERSION`]; writers always
//! emit the newest.

use crate::choice::DialogueChoice;
use crate::choices::{Choice, ChoiceManager};
use crate::dialogue::Dialogue;
use crate::entry::{DialogueEntry, Reaction, ViewPosition};
use crate::error::{FormatError, Result};
use crate::guid::Guid;
use crate::id::{ChoiceId, DialogueChoiceId, EntryId, Id, ParticipantId};
use crate::manager::DialogueManager;
use crate::participant::Participant;
use serde::{Deserialize, Serialize};

/// Current dialogue file format version
pub const FORMAT_VERSION: u32 = 2;

/// Current encoding of reaction codes
pub const REACTION_ENCODING_VERSION: u32 = 1;

/// Current choice registry file format version
pub const CHOICE_FORMAT_VERSION: u32 = 1;

/// On-disk value of a missing destination
const NO_DESTINATION: i64 = -1;

/// Writer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Indent the output for humans
    pub pretty: bool,
}

impl WriteOptions {
    /// Indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Entry fields carried by one format version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Revision {
    version: u32,
    positions: bool,
    reactions: bool,
}

/// Every dialogue format version this reader understands
const REVISIONS: &[Revision] = &[
    Revision { version: 0, positions: false, reactions: false },
    Revision { version: 1, positions: true, reactions: false },
    Revision { version: 2, positions: true, reactions: true },
];

impl Revision {
    fn lookup(version: u32) -> Result<&'static Revision> {
        REVISIONS
            .iter()
            .find(|revision| revision.version == version)
            .ok_or(FormatError::UnsupportedVersion(version))
    }
}

/// Mapping between stored reaction codes and [`Reaction`]
struct ReactionEncoding {
    version: u32,
    decode: fn(i32) -> Option<Reaction>,
}

/// Known reaction encodings. Version 0 covers files that predate the field.
const REACTION_ENCODINGS: &[ReactionEncoding] = &[
    ReactionEncoding { version: 0, decode: Reaction::from_code },
    ReactionEncoding { version: 1, decode: Reaction::from_code },
];

impl ReactionEncoding {
    fn lookup(version: u32) -> Result<&'static ReactionEncoding> {
        REACTION_ENCODINGS
            .iter()
            .find(|encoding| encoding.version == version)
            .ok_or(FormatError::UnsupportedReactionVersion(version))
    }
}

// Dialogue documents

#[derive(Debug, Serialize, Deserialize)]
struct DialogueFile {
    #[serde(default)]
    version: u32,
    #[serde(rename = "eReactionVersion", default)]
    reaction_version: u32,
    dialogues: Vec<DialogueRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DialogueRecord {
    name: String,
    participants: Vec<ParticipantRecord>,
    entries: Vec<EntryRecord>,
    choices: Vec<ChoiceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ParticipantRecord {
    id: ParticipantId,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    id: EntryId,
    entry: String,
    #[serde(rename = "activeParticipant")]
    active_participant: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<ViewPosition>,
    #[serde(rename = "lReaction", default, skip_serializing_if = "Option::is_none")]
    left_reaction: Option<i64>,
    #[serde(rename = "rReaction", default, skip_serializing_if = "Option::is_none")]
    right_reaction: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChoiceRecord {
    id: DialogueChoiceId,
    choice: String,
    src: EntryId,
    #[serde(default = "no_destination")]
    dst: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    guid: Option<Guid>,
}

fn no_destination() -> i64 {
    NO_DESTINATION
}

pub(crate) fn read_dialogues(contents: &str) -> Result<DialogueManager> {
    if contents.trim().is_empty() {
        return Ok(DialogueManager::new());
    }

    let result = serde_json::from_str::<DialogueFile>(contents)
        .map_err(FormatError::from)
        .and_then(decode_dialogues);
    if let Err(e) = &result {
        tracing::warn!("Failed to read dialogue document: {}", e);
    }
    result
}

fn decode_dialogues(file: DialogueFile) -> Result<DialogueManager> {
    let revision = Revision::lookup(file.version)?;
    // The encoding field only means something once reactions are stored
    let reactions = if revision.reactions {
        Some(ReactionEncoding::lookup(file.reaction_version)?)
    } else {
        None
    };

    let mut manager = DialogueManager::new();
    for record in file.dialogues {
        let Some(dialogue) = manager.add_dialogue(record.name.as_str()) else {
            tracing::warn!("Skipping dialogue {:?}: the name is already loaded", record.name);
            continue;
        };
        decode_dialogue(dialogue, record, revision, reactions)?;
        tracing::debug!(
            "Decoded dialogue {:?}: {} participants, {} entries, {} choices",
            dialogue.name(),
            dialogue.num_participants(),
            dialogue.num_entries(),
            dialogue.num_choices()
        );
    }
    Ok(manager)
}

fn decode_dialogue(
    dialogue: &mut Dialogue,
    record: DialogueRecord,
    revision: &Revision,
    reactions: Option<&ReactionEncoding>,
) -> Result<()> {
    let scope = record.name;
    let duplicate = |kind: &'static str, id: u64| FormatError::DuplicateId {
        scope: scope.clone(),
        kind,
        id,
    };

    for participant in record.participants {
        check_range(&scope, "participant", participant.id.value())?;
        dialogue
            .insert_loaded_participant(Participant::new(participant.id, participant.name))
            .map_err(|p| duplicate("participant", p.id().value()))?;
    }

    for item in record.entries {
        check_range(&scope, "entry", item.id.value())?;
        if dialogue.participant(item.active_participant).is_none() {
            return Err(FormatError::UnresolvedParticipant {
                dialogue: scope.clone(),
                entry: item.id.value(),
                participant: item.active_participant.value(),
            });
        }

        let mut entry = DialogueEntry::new(item.id, item.active_participant, item.entry);
        if revision.positions {
            entry.position = item.position.ok_or_else(|| FormatError::MissingField {
                dialogue: scope.clone(),
                entry: item.id.value(),
                field: "position",
            })?;
        }
        if let Some(encoding) = reactions {
            entry.left_reaction = decode_reaction(encoding, &scope, item.id, item.left_reaction, "lReaction")?;
            entry.right_reaction = decode_reaction(encoding, &scope, item.id, item.right_reaction, "rReaction")?;
        }

        dialogue
            .insert_loaded_entry(entry)
            .map_err(|e| duplicate("entry", e.id().value()))?;
    }

    for item in record.choices {
        check_range(&scope, "choice", item.id.value())?;
        if dialogue.entry(item.src).is_none() {
            return Err(FormatError::UnresolvedSource {
                dialogue: scope.clone(),
                choice: item.id.value(),
                source_entry: item.src.value(),
            });
        }

        let dst = u64::try_from(item.dst).ok().map(EntryId::new);
        let resolved = dst.filter(|dst| dialogue.entry(*dst).is_some());
        if let (Some(dst), None) = (dst, resolved) {
            tracing::warn!(
                "Choice {} in dialogue {:?} points at missing entry {}; loading it without a destination",
                item.id,
                scope,
                dst
            );
        }

        let mut choice = DialogueChoice::new(item.id, item.src, item.choice, resolved);
        if let Some(guid) = item.guid {
            choice.restore_guid(guid);
        }
        dialogue
            .insert_loaded_choice(choice)
            .map_err(|c| duplicate("choice", c.id().value()))?;
    }

    Ok(())
}

fn check_range(scope: &str, kind: &'static str, id: u64) -> Result<()> {
    if Id::new(id).in_range() {
        Ok(())
    } else {
        Err(FormatError::IdOutOfRange {
            scope: scope.to_string(),
            kind,
            id,
        })
    }
}

fn decode_reaction(
    encoding: &ReactionEncoding,
    dialogue: &str,
    entry: EntryId,
    code: Option<i64>,
    field: &'static str,
) -> Result<Reaction> {
    let code = code.ok_or_else(|| FormatError::MissingField {
        dialogue: dialogue.to_string(),
        entry: entry.value(),
        field,
    })?;
    i32::try_from(code)
        .ok()
        .and_then(encoding.decode)
        .ok_or_else(|| FormatError::InvalidReaction {
            dialogue: dialogue.to_string(),
            entry: entry.value(),
            code,
        })
}

pub(crate) fn write_dialogues(manager: &DialogueManager, options: &WriteOptions) -> Result<String> {
    let file = DialogueFile {
        version: FORMAT_VERSION,
        reaction_version: REACTION_ENCODING_VERSION,
        dialogues: manager.dialogues().map(encode_dialogue).collect::<Result<_>>()?,
    };
    to_json(&file, options)
}

fn encode_dialogue(dialogue: &Dialogue) -> Result<DialogueRecord> {
    let choices = dialogue
        .choices()
        .map(|c| -> Result<ChoiceRecord> {
            Ok(ChoiceRecord {
                id: c.id(),
                choice: c.text.clone(),
                src: c.source(),
                dst: c.destination().map_or(Ok(NO_DESTINATION), |dst| {
                    i64::try_from(dst.value()).map_err(|_| FormatError::IdOutOfRange {
                        scope: dialogue.name().to_string(),
                        kind: "entry",
                        id: dst.value(),
                    })
                })?,
                guid: c.guid(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DialogueRecord {
        name: dialogue.name().to_string(),
        participants: dialogue
            .participants()
            .map(|p| ParticipantRecord {
                id: p.id(),
                name: p.name.clone(),
            })
            .collect(),
        entries: dialogue
            .entries()
            .map(|e| EntryRecord {
                id: e.id(),
                entry: e.text.clone(),
                active_participant: e.active_participant,
                position: Some(e.position),
                left_reaction: Some(i64::from(e.left_reaction.code())),
                right_reaction: Some(i64::from(e.right_reaction.code())),
            })
            .collect(),
        choices,
    })
}

// Choice registry documents

#[derive(Debug, Serialize, Deserialize)]
struct ChoiceFile {
    #[serde(default)]
    version: u32,
    choices: Vec<ChoiceNameRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChoiceNameRecord {
    id: ChoiceId,
    name: String,
}

pub(crate) fn read_choices(contents: &str) -> Result<ChoiceManager> {
    if contents.trim().is_empty() {
        return Ok(ChoiceManager::new());
    }

    let result = serde_json::from_str::<ChoiceFile>(contents)
        .map_err(FormatError::from)
        .and_then(decode_choices);
    if let Err(e) = &result {
        tracing::warn!("Failed to read choice document: {}", e);
    }
    result
}

fn decode_choices(file: ChoiceFile) -> Result<ChoiceManager> {
    if file.version > CHOICE_FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(file.version));
    }

    let mut manager = ChoiceManager::new();
    for record in file.choices {
        check_range("choices", "choice", record.id.value())?;
        if manager.choice(&record.name).is_some() {
            tracing::warn!("Skipping choice {:?}: the name is already loaded", record.name);
            continue;
        }
        manager
            .insert_loaded(Choice::new(record.id, record.name))
            .map_err(|c| FormatError::DuplicateId {
                scope: "choices".to_string(),
                kind: "choice",
                id: c.id().value(),
            })?;
    }
    Ok(manager)
}

pub(crate) fn write_choices(manager: &ChoiceManager, options: &WriteOptions) -> Result<String> {
    let file = ChoiceFile {
        version: CHOICE_FORMAT_VERSION,
        choices: manager
            .choices()
            .map(|c| ChoiceNameRecord {
                id: c.id(),
                name: c.name.clone(),
            })
            .collect(),
    };
    to_json(&file, options)
}

fn to_json<T: Serialize>(value: &T, options: &WriteOptions) -> Result<String> {
    let text = if options.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
