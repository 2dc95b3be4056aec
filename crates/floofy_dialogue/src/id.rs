// SPDX-License-Identifier: MIT OR Apache-2.0
//! Numeric identifiers and the allocator that hands them out.
//!
//! All entity kinds share the same [`Id`] representation. Typed wrappers keep
//! a participant id from being passed where an entry id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Local numeric identity of an entity within its owning collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    /// First identifier handed out by a fresh allocator
    pub const FIRST: Id = Id(1);

    /// Largest id a collection accepts from outside. The allocator can still
    /// hand out the id after it, and every id fits a signed 64-bit value.
    pub const MAX: Id = Id(i64::MAX as u64 - 1);

    /// Wrap a raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whether a collection may take this id from outside
    pub fn in_range(self) -> bool {
        self <= Self::MAX
    }

    /// The identifier immediately after this one
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The identifier immediately before this one, if any
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Id> for u64 {
    fn from(value: Id) -> Self {
        value.0
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Id);

        impl $name {
            /// Wrap a raw value
            pub const fn new(value: u64) -> Self {
                Self(Id::new(value))
            }

            /// Get the raw value
            pub const fn value(self) -> u64 {
                self.0.value()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Id> for $name {
            fn from(value: Id) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Id {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a participant within a dialogue
    ParticipantId
);
entity_id!(
    /// Identifier of an entry within a dialogue
    EntryId
);
entity_id!(
    /// Identifier of a choice edge within a dialogue
    DialogueChoiceId
);
entity_id!(
    /// Identifier of a dialogue within a manager (not persisted)
    DialogueId
);
entity_id!(
    /// Identifier of a record in a [`ChoiceManager`](crate::ChoiceManager)
    ChoiceId
);

/// Monotonic identifier cursor.
///
/// Every id returned by [`allocate`](Self::allocate) is strictly greater than
/// any id previously allocated or [`observe`](Self::observe)d.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    cursor: Id,
}

impl IdAllocator {
    /// Create an allocator starting at [`Id::FIRST`]
    pub fn new() -> Self {
        Self { cursor: Id::FIRST }
    }

    /// The id the next call to [`allocate`](Self::allocate) returns
    pub fn peek(&self) -> Id {
        self.cursor
    }

    /// Hand out the next id
    pub fn allocate(&mut self) -> Id {
        let id = self.cursor;
        self.cursor = self.cursor.next();
        id
    }

    /// Record an id that entered the collection from outside, so the cursor
    /// never hands it out again
    pub fn observe(&mut self, id: Id) {
        if id >= self.cursor {
            self.cursor = id.next();
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ordering_and_stepping() {
        let id = Id::new(4);
        assert!(id.next() > id);
        assert_eq!(id.next().value(), 5);
        assert_eq!(id.previous(), Some(Id::new(3)));
        assert_eq!(Id::new(0).previous(), None);
    }

    #[test]
    fn test_allocator_starts_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), Id::new(1));
        assert_eq!(ids.allocate(), Id::new(2));
        assert_eq!(ids.peek(), Id::new(3));
    }

    #[test]
    fn test_allocator_never_regresses() {
        let mut ids = IdAllocator::new();
        ids.observe(Id::new(1));
        ids.observe(Id::new(5));
        ids.observe(Id::new(3));
        assert_eq!(ids.allocate(), Id::new(6));

        // Observing something already behind the cursor is a no-op
        ids.observe(Id::new(2));
        assert_eq!(ids.allocate(), Id::new(7));
    }

    #[test]
    fn test_largest_accepted_id_leaves_room_to_allocate() {
        assert!(Id::MAX.in_range());
        assert!(!Id::MAX.next().in_range());
        assert!(!Id::new(u64::MAX).in_range());

        let mut ids = IdAllocator::new();
        ids.observe(Id::MAX);
        let next = ids.allocate();
        assert!(next > Id::MAX);
        assert!(i64::try_from(next.value()).is_ok());
    }

    #[test]
    fn test_typed_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&EntryId::new(12)).unwrap();
        assert_eq!(json, "12");
        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntryId::new(12));
    }
}
