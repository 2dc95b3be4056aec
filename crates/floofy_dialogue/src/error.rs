// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while reading or writing dialogue and choice files.

use thiserror::Error;

/// Any failure reading or writing a file. A failed read never produces a
/// partially loaded manager.
#[derive(Debug, Error)]
pub enum FormatError {
    /// File could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document bytes are not UTF-8
    #[error("Malformed document: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Not JSON, or a field has the wrong type or is missing
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// File was written by a newer format revision
    #[error("Unsupported file version {0}")]
    UnsupportedVersion(u32),

    /// Reaction codes use an encoding this reader does not know
    #[error("Unsupported reaction encoding version {0}")]
    UnsupportedReactionVersion(u32),

    /// A field required by the file's version is absent
    #[error("Entry {entry} in dialogue {dialogue:?} is missing `{field}`")]
    MissingField {
        /// Dialogue name
        dialogue: String,
        /// Entry id
        entry: u64,
        /// Missing field name
        field: &'static str,
    },

    /// Two records in one collection share an id
    #[error("Duplicate {kind} id {id} in {scope:?}")]
    DuplicateId {
        /// Dialogue name, or the file kind for flat registries
        scope: String,
        /// Record kind
        kind: &'static str,
        /// The repeated id
        id: u64,
    },

    /// An id is larger than [`Id::MAX`](crate::Id::MAX)
    #[error("{kind} id {id} in {scope:?} is out of range")]
    IdOutOfRange {
        /// Dialogue name, or the file kind for flat registries
        scope: String,
        /// Record kind
        kind: &'static str,
        /// The offending id
        id: u64,
    },

    /// An entry's speaker does not exist
    #[error("Entry {entry} in dialogue {dialogue:?} references unknown participant {participant}")]
    UnresolvedParticipant {
        /// Dialogue name
        dialogue: String,
        /// Entry id
        entry: u64,
        /// Referenced participant id
        participant: u64,
    },

    /// A choice's source entry does not exist
    #[error("Choice {choice} in dialogue {dialogue:?} references unknown source entry {source_entry}")]
    UnresolvedSource {
        /// Dialogue name
        dialogue: String,
        /// Choice id
        choice: u64,
        /// Referenced entry id
        source_entry: u64,
    },

    /// A reaction code has no meaning in the file's encoding
    #[error("Entry {entry} in dialogue {dialogue:?} has invalid reaction code {code}")]
    InvalidReaction {
        /// Dialogue name
        dialogue: String,
        /// Entry id
        entry: u64,
        /// The offending code
        code: i64,
    },
}

/// Result type for file operations
pub type Result<T> = std::result::Result<T, FormatError>;
