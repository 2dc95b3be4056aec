// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue graph data model for `Floofy` tooling.
//!
//! This crate provides the authoring model behind the dialogue editor:
//! - Dialogues made of participants, entries and choices
//! - A manager that owns uniquely named dialogues
//! - A flat registry of named choices shared across dialogues
//! - A versioned JSON file format that reads every older revision
//!
//! ## Architecture
//!
//! Every collection is a [`Registry`]: an insertion-ordered map keyed by a
//! typed identifier with a monotonic [`IdAllocator`]. Cross references
//! (an entry's speaker, a choice's source and destination) are stored as
//! identifiers and resolved through the owning [`Dialogue`] on use, so
//! removing an entity never invalidates storage, only the lookup.

pub mod id;
pub mod guid;
pub mod registry;
pub mod participant;
pub mod entry;
pub mod choice;
pub mod dialogue;
pub mod manager;
pub mod choices;
pub mod format;
pub mod error;

pub use id::{ChoiceId, DialogueChoiceId, DialogueId, EntryId, Id, IdAllocator, ParticipantId};
pub use guid::{Guid, GuidParseError};
pub use registry::{Record, Registry};
pub use participant::Participant;
pub use entry::{DialogueEntry, Reaction, ViewPosition};
pub use choice::DialogueChoice;
pub use dialogue::Dialogue;
pub use manager::DialogueManager;
pub use choices::{Choice, ChoiceManager};
pub use format::{WriteOptions, CHOICE_FORMAT_VERSION, FORMAT_VERSION, REACTION_ENCODING_VERSION};
pub use error::{FormatError, Result};
